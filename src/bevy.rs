//! Bevy integration for command input.
//!
//! Provides:
//! - `MotionInputPlugin`: builder-pattern plugin that builds the move trie and
//!   runs recognition every frame
//! - `RecognizedMove`: resource holding the last recognized move
//! - `GamepadDevices` / `ConnectionNotice`: hot-plug bookkeeping
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_motion::bevy::*;
//! use bevy_motion::DEFAULT_MOVES;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(MotionInputPlugin::from_definitions(DEFAULT_MOVES))
//!         .add_systems(Update, show_move)
//!         .run();
//! }
//!
//! fn show_move(recognized: Res<RecognizedMove>) {
//!     if recognized.is_changed() {
//!         if let Some(name) = recognized.get() {
//!             info!("Move: {name}");
//!         }
//!     }
//! }
//! ```

use bevy::prelude::*;

use crate::{
    config::MotionConfig,
    devices::{ConnectedDevices, ConnectionBanner},
    mapper::{InputSnapshot, PadButton, PadState, PhysicalInput, Trigger},
    session::CommandSession,
    trie::{CommandTrie, MoveDef},
};

// =============================================================================
// Plugin
// =============================================================================

/// Bevy plugin for command input recognition.
///
/// Use the builder pattern to configure:
///
/// ```ignore
/// App::new()
///     .add_plugins(
///         MotionInputPlugin::from_definitions(DEFAULT_MOVES)
///             .with_config(MotionConfig::from_file("motion.toml")?)
///     )
/// ```
#[derive(Default)]
pub struct MotionInputPlugin {
    definitions: Option<&'static [MoveDef]>,
    config: MotionConfig,
    keyboard: KeyboardLayout,
}

impl MotionInputPlugin {
    /// Create a new plugin with no static moves.
    ///
    /// Only moves from the config (if any) will be recognized.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plugin from a static move table (from the `moves!` macro).
    pub fn from_definitions(definitions: &'static [MoveDef]) -> Self {
        Self {
            definitions: Some(definitions),
            ..Self::default()
        }
    }

    /// Use timing, policy and extra moves from a loaded config.
    pub fn with_config(mut self, config: MotionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the keyboard layout.
    pub fn with_keyboard(mut self, keyboard: KeyboardLayout) -> Self {
        self.keyboard = keyboard;
        self
    }
}

impl Plugin for MotionInputPlugin {
    fn build(&self, app: &mut App) {
        let mut trie = match self.definitions {
            Some(defs) => {
                CommandTrie::build(defs).expect("Failed to build CommandTrie from definitions")
            }
            None => CommandTrie::new(),
        };
        self.config
            .apply_moves(&mut trie)
            .expect("Failed to add configured moves to CommandTrie");
        tracing::info!(moves = trie.len(), policy = ?self.config.policy, "command input ready");

        app.insert_resource(MoveDictionary(trie))
            .insert_resource(CommandInput(self.config.session()))
            .insert_resource(self.keyboard.clone())
            .init_resource::<RecognizedMove>()
            .init_resource::<GamepadDevices>()
            .init_resource::<ConnectionNotice>()
            .add_systems(Update, (track_gamepads, recognize_commands).chain());
    }
}

// =============================================================================
// Resources
// =============================================================================

/// The move dictionary. Read-only after the plugin builds it.
#[derive(Resource, Debug)]
pub struct MoveDictionary(CommandTrie);

impl MoveDictionary {
    #[inline]
    pub fn trie(&self) -> &CommandTrie {
        &self.0
    }
}

/// Mapper and buffer state for the local player.
#[derive(Resource, Debug)]
pub struct CommandInput(CommandSession);

impl CommandInput {
    #[inline]
    pub fn session(&self) -> &CommandSession {
        &self.0
    }

    /// Drop buffered input, e.g. when the player gets hit.
    pub fn reset(&mut self) {
        self.0.reset();
    }
}

/// Last recognized move. Only written when a move is recognized, so
/// `is_changed()` signals a new recognition.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct RecognizedMove(Option<String>);

impl RecognizedMove {
    #[inline]
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Connected gamepads, in connection order. Index 0 is player one.
#[derive(Resource, Debug, Default)]
pub struct GamepadDevices(ConnectedDevices<Entity>);

impl GamepadDevices {
    #[inline]
    pub fn devices(&self) -> &ConnectedDevices<Entity> {
        &self.0
    }
}

/// "Controller connected" notice, visible for a moment after a connection.
#[derive(Resource, Debug, Default)]
pub struct ConnectionNotice(ConnectionBanner);

impl ConnectionNotice {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.0.is_visible()
    }
}

/// Keyboard keys mapped onto pad inputs.
///
/// The keyboard is merged into every device's snapshot. A key bound to a
/// trigger reads as fully pressed.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct KeyboardLayout {
    keys: Vec<(KeyCode, PhysicalInput)>,
}

impl Default for KeyboardLayout {
    /// Arrows for directions; `Z` `X` `C` punch, `A` `S` `D` kick.
    fn default() -> Self {
        Self::empty()
            .bind(KeyCode::ArrowUp, PadButton::Up)
            .bind(KeyCode::ArrowDown, PadButton::Down)
            .bind(KeyCode::ArrowLeft, PadButton::Left)
            .bind(KeyCode::ArrowRight, PadButton::Right)
            .bind(KeyCode::KeyZ, PadButton::X)
            .bind(KeyCode::KeyX, PadButton::Y)
            .bind(KeyCode::KeyC, PadButton::RightShoulder)
            .bind(KeyCode::KeyA, PadButton::A)
            .bind(KeyCode::KeyS, PadButton::B)
            .bind(KeyCode::KeyD, Trigger::Right)
    }
}

impl KeyboardLayout {
    pub fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// Builder method: bind a key and return self.
    pub fn bind(mut self, key: KeyCode, input: impl Into<PhysicalInput>) -> Self {
        self.keys.push((key, input.into()));
        self
    }

    /// Held keys as a pad state.
    pub fn read(&self, keys: &ButtonInput<KeyCode>) -> PadState {
        let mut pad = PadState::new();
        for &(key, input) in &self.keys {
            if !keys.pressed(key) {
                continue;
            }
            match input {
                PhysicalInput::Button(button) => pad.press(button),
                PhysicalInput::Trigger(trigger) => pad.set_trigger(trigger, 1.0),
            }
        }
        pad
    }
}

// =============================================================================
// Systems
// =============================================================================

const GAMEPAD_BUTTONS: [(GamepadButton, PadButton); 10] = [
    (GamepadButton::DPadUp, PadButton::Up),
    (GamepadButton::DPadDown, PadButton::Down),
    (GamepadButton::DPadLeft, PadButton::Left),
    (GamepadButton::DPadRight, PadButton::Right),
    (GamepadButton::South, PadButton::A),
    (GamepadButton::East, PadButton::B),
    (GamepadButton::West, PadButton::X),
    (GamepadButton::North, PadButton::Y),
    (GamepadButton::LeftTrigger, PadButton::LeftShoulder),
    (GamepadButton::RightTrigger, PadButton::RightShoulder),
];

fn pad_state(gamepad: &Gamepad) -> PadState {
    let mut pad = PadState::new();
    for (button, target) in GAMEPAD_BUTTONS {
        if gamepad.pressed(button) {
            pad.press(target);
        }
    }
    pad.set_trigger(
        Trigger::Left,
        gamepad.get(GamepadButton::LeftTrigger2).unwrap_or(0.0),
    );
    pad.set_trigger(
        Trigger::Right,
        gamepad.get(GamepadButton::RightTrigger2).unwrap_or(0.0),
    );
    pad
}

fn track_gamepads(
    time: Res<Time>,
    added: Query<Entity, Added<Gamepad>>,
    mut removed: RemovedComponents<Gamepad>,
    mut devices: ResMut<GamepadDevices>,
    mut notice: ResMut<ConnectionNotice>,
) {
    notice.0.tick(time.delta());

    for entity in removed.read() {
        devices.0.remove(entity);
    }
    for entity in &added {
        if devices.0.add(entity) {
            notice.0.show();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn recognize_commands(
    time: Res<Time>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    gamepads: Query<&Gamepad>,
    devices: Res<GamepadDevices>,
    layout: Res<KeyboardLayout>,
    dictionary: Res<MoveDictionary>,
    mut input: ResMut<CommandInput>,
    mut recognized: ResMut<RecognizedMove>,
) {
    let keyboard = keys.map(|keys| layout.read(&keys)).unwrap_or_default();
    let pads = devices
        .0
        .iter()
        .map(|entity| gamepads.get(entity).map(pad_state).unwrap_or_default())
        .collect();
    let snapshot = InputSnapshot { keyboard, pads };

    if let Some(name) = input.0.frame(&dictionary.0, time.delta(), &snapshot) {
        recognized.0 = Some(name.to_owned());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::matcher::BufferPolicy;
    use crate::token::Token;

    const TEST_MOVES: &[MoveDef] = &[
        MoveDef::new("Forward Punch", &[Token::Right, Token::Punch]),
        MoveDef::new("Kick", &[Token::Kick]),
        MoveDef::new("Grab", &[Token::Grab]),
    ];

    const FRAME: Duration = Duration::from_millis(20);

    fn app(plugin: MotionInputPlugin) -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins(plugin);
        app
    }

    /// Hold `held` for `frames` frames.
    fn hold(app: &mut App, held: &[KeyCode], frames: usize) {
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.release_all();
            for &key in held {
                keys.press(key);
            }
        }
        for _ in 0..frames {
            app.world_mut().resource_mut::<Time>().advance_by(FRAME);
            app.update();
        }
    }

    fn recognized(app: &App) -> Option<String> {
        app.world().resource::<RecognizedMove>().get().map(str::to_owned)
    }

    #[test]
    fn recognizes_keyboard_motion() {
        let mut app = app(MotionInputPlugin::from_definitions(TEST_MOVES));

        hold(&mut app, &[KeyCode::ArrowRight], 4);
        assert_eq!(recognized(&app), None);
        hold(&mut app, &[KeyCode::KeyX], 4);

        assert_eq!(recognized(&app).as_deref(), Some("Forward Punch"));
        let session = app.world().resource::<CommandInput>().session();
        assert!(session.matcher().buffer().is_empty());
    }

    #[test]
    fn recognition_persists_while_idle() {
        let mut app = app(MotionInputPlugin::from_definitions(TEST_MOVES));

        hold(&mut app, &[KeyCode::KeyS], 4);
        assert_eq!(recognized(&app).as_deref(), Some("Kick"));

        hold(&mut app, &[], 60);
        assert_eq!(recognized(&app).as_deref(), Some("Kick"));
    }

    #[test]
    fn grab_keys_produce_grab() {
        let mut app = app(MotionInputPlugin::from_definitions(TEST_MOVES));

        hold(&mut app, &[KeyCode::KeyZ, KeyCode::KeyA], 4);
        assert_eq!(recognized(&app).as_deref(), Some("Grab"));
    }

    #[test]
    fn config_moves_and_policy_apply() {
        const LOW_KICK: &str = "[[moves]]\nname = \"Low Kick\"\nsequence = \"2K\"";
        let config = MotionConfig {
            policy: BufferPolicy::FixedBatch {
                interval: Duration::from_millis(200),
            },
            ..MotionConfig::from_str(LOW_KICK).unwrap()
        };
        let mut app = app(MotionInputPlugin::from_definitions(TEST_MOVES).with_config(config));

        assert_eq!(app.world().resource::<MoveDictionary>().trie().len(), 4);

        hold(&mut app, &[KeyCode::ArrowDown], 4);
        hold(&mut app, &[KeyCode::KeyA], 4);
        // Batch still open: nothing recognized yet
        assert_eq!(recognized(&app), None);

        hold(&mut app, &[], 10);
        assert_eq!(recognized(&app).as_deref(), Some("Low Kick"));
    }

    #[test]
    fn no_gamepads_means_no_notice() {
        let mut app = app(MotionInputPlugin::new());
        hold(&mut app, &[], 2);

        assert!(app.world().resource::<GamepadDevices>().devices().is_empty());
        assert!(!app.world().resource::<ConnectionNotice>().is_visible());
    }

    #[test]
    fn keyboard_layout_reads_triggers_as_full_press() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyD);
        keys.press(KeyCode::ArrowUp);

        let pad = KeyboardLayout::default().read(&keys);
        assert!(pad.pressed(PadButton::Up));
        assert_eq!(pad.trigger(Trigger::Right), 1.0);
        assert!(!pad.pressed(PadButton::A));
    }

    #[test]
    #[should_panic(expected = "Failed to build CommandTrie")]
    fn empty_definition_panics_at_build() {
        const BAD: &[MoveDef] = &[MoveDef::new("Nothing", &[])];
        app(MotionInputPlugin::from_definitions(BAD));
    }
}
