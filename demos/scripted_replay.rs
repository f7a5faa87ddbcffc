//! Replays a scripted pad recording through a `CommandSession` and prints
//! every recognized move.
//!
//! ```text
//! cargo run --example scripted_replay
//! ```

use std::time::Duration;

use bevy_motion::{CommandSession, CommandTrie, DEFAULT_MOVES, InputSnapshot, PadButton, PadState};

/// Buttons held, and for how many 60Hz frames.
const SCRIPT: &[(&[PadButton], u32)] = &[
    // Fireball: ↓ ↘ → P
    (&[PadButton::Down], 6),
    (&[PadButton::Down, PadButton::Right], 6),
    (&[PadButton::Right], 6),
    (&[PadButton::X], 6),
    (&[], 40),
    // Shoryu with a stray up-tap in the middle
    (&[PadButton::Right], 6),
    (&[PadButton::Up], 5),
    (&[PadButton::Down], 6),
    (&[PadButton::Down, PadButton::Right], 6),
    (&[PadButton::Y], 6),
    (&[], 40),
    // Grab
    (&[PadButton::X, PadButton::A], 6),
];

const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let trie = CommandTrie::build(DEFAULT_MOVES)?;
    println!("{} moves loaded:", trie.len());
    for (sequence, name) in trie.moves() {
        println!("  {:<24} {}", name, bevy_motion::Token::render(&sequence));
    }

    let mut session = CommandSession::default();
    let mut elapsed = Duration::ZERO;
    for &(buttons, frames) in SCRIPT {
        let pad = buttons.iter().fold(PadState::new(), |pad, &b| pad.with(b));
        let snapshot = InputSnapshot::new().with_pad(pad);

        for _ in 0..frames {
            elapsed += FRAME;
            if let Some(name) = session.frame(&trie, FRAME, &snapshot) {
                println!("[{:>6.3}s] {}", elapsed.as_secs_f32(), name);
            }
        }
    }

    println!("last move: {}", session.last_move().unwrap_or("none"));
    Ok(())
}
