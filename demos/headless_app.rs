//! Runs `MotionInputPlugin` in a windowless app, feeding it simulated key
//! presses instead of a real keyboard.
//!
//! ```text
//! cargo run --example headless_app
//! ```

use std::time::Duration;

use bevy::prelude::*;
use bevy_motion::DEFAULT_MOVES;
use bevy_motion::bevy::{MotionInputPlugin, RecognizedMove};

const FRAME: Duration = Duration::from_millis(16);

/// Keys held, and for how many frames. ↓ ↘ → then `Z` is a fireball.
const SCRIPT: &[(&[KeyCode], u32)] = &[
    (&[KeyCode::ArrowDown], 6),
    (&[KeyCode::ArrowDown, KeyCode::ArrowRight], 6),
    (&[KeyCode::ArrowRight], 6),
    (&[KeyCode::KeyZ], 6),
    (&[], 10),
];

fn report(recognized: Res<RecognizedMove>) {
    if recognized.is_changed()
        && let Some(name) = recognized.get()
    {
        println!("recognized: {name}");
    }
}

fn main() {
    let mut app = App::new();
    app.init_resource::<Time>()
        .init_resource::<ButtonInput<KeyCode>>()
        .add_plugins(MotionInputPlugin::from_definitions(DEFAULT_MOVES))
        .add_systems(Update, report);

    for &(keys, frames) in SCRIPT {
        {
            let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            input.release_all();
            for &key in keys {
                input.press(key);
            }
        }
        for _ in 0..frames {
            app.world_mut().resource_mut::<Time>().advance_by(FRAME);
            app.update();
        }
    }
}
