//! End-to-end recognition behavior: trie lookup, buffer expiry and the two
//! buffering policies, driven through the public API only.

use std::collections::HashMap;
use std::time::Duration;

use bevy_motion::*;
use proptest::prelude::*;

const NOTHING: [Token; 0] = [];

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn attack_or_direction() -> impl Strategy<Value = Token> {
    let tokens: Vec<Token> = Token::ALL
        .into_iter()
        .filter(|t| *t != Token::Neutral)
        .collect();
    prop::sample::select(tokens)
}

fn sequence() -> impl Strategy<Value = Vec<Token>> {
    prop::collection::vec(attack_or_direction(), 1..6)
}

proptest! {
    /// The most recent name stored for a sequence is what that exact
    /// sequence looks up to, no matter what else is in the trie.
    #[test]
    fn stored_sequences_look_up_their_latest_name(
        moves in prop::collection::vec(sequence(), 1..12)
    ) {
        let mut trie = CommandTrie::new();
        let mut latest = HashMap::new();
        for (i, seq) in moves.iter().enumerate() {
            let name = format!("Move {}", i);
            trie.add_move(seq, name.clone()).unwrap();
            latest.insert(seq.clone(), name);
        }

        prop_assert_eq!(trie.len(), latest.len());
        for (seq, name) in &latest {
            prop_assert_eq!(trie.get_move(seq.iter().copied()), Some(name.as_str()));
        }
    }

    /// Tokens with no branch anywhere in the trie never change the result.
    #[test]
    fn unused_tokens_are_skipped(
        seq in sequence(),
        noise in prop::collection::vec(0usize..4, 1..8),
    ) {
        let mut trie = CommandTrie::new();
        trie.add_move(&seq, "Target").unwrap();

        // Neutral never appears in generated moves
        let mut buffer = Vec::new();
        for (i, &token) in seq.iter().enumerate() {
            let count = noise.get(i).copied().unwrap_or(0);
            buffer.extend(std::iter::repeat_n(Token::Neutral, count));
            buffer.push(token);
        }
        buffer.push(Token::Neutral);

        prop_assert_eq!(trie.get_move(buffer), Some("Target"));
    }

    /// Lookup is read-only: repeating it gives the same answer on the same trie.
    #[test]
    fn lookup_is_idempotent(
        moves in prop::collection::vec(sequence(), 1..8),
        buffer in prop::collection::vec(attack_or_direction(), 0..12),
    ) {
        let mut trie = CommandTrie::new();
        for (i, seq) in moves.iter().enumerate() {
            trie.add_move(seq, format!("Move {}", i)).unwrap();
        }
        let before = trie.clone();

        let first = trie.get_move(buffer.iter().copied()).map(str::to_owned);
        let second = trie.get_move(buffer.iter().copied()).map(str::to_owned);

        prop_assert_eq!(first, second);
        prop_assert_eq!(trie, before);
    }

    /// After any tick, nothing left in the buffer is as old as the window.
    #[test]
    fn ticking_drops_everything_past_the_window(
        steps in prop::collection::vec((prop::option::of(attack_or_direction()), 0u64..400), 1..40)
    ) {
        let window = ms(600);
        let mut buffer = TimedInputBuffer::new();
        for (token, dt) in steps {
            if let Some(token) = token {
                buffer.insert(token);
            }
            buffer.tick(ms(dt), window);
            prop_assert!(buffer.entries().all(|e| e.age < window));
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

fn trie() -> CommandTrie {
    CommandTrie::build(DEFAULT_MOVES).unwrap()
}

#[test]
fn fireball_through_sliding_window() {
    let trie = trie();
    let mut matcher = CommandMatcher::default();

    assert_eq!(matcher.update(&trie, ms(80), [Token::Down]), None);
    assert_eq!(matcher.update(&trie, ms(80), [Token::DownRight]), None);
    assert_eq!(matcher.update(&trie, ms(80), [Token::Right]), None);
    assert_eq!(matcher.update(&trie, ms(80), [Token::Punch]), Some("Fireball"));
    assert!(matcher.buffer().is_empty());
}

#[test]
fn slow_motion_expires_before_completion() {
    let trie = trie();
    let mut matcher = CommandMatcher::default();

    matcher.update(&trie, ms(80), [Token::Down]);
    matcher.update(&trie, ms(300), [Token::DownRight]);
    matcher.update(&trie, ms(300), [Token::Right]);
    // Down reached the 600ms window on the previous tick and expired: only →P remains
    assert_eq!(
        matcher.update(&trie, ms(80), [Token::Punch]),
        Some("Forward Punch")
    );
}

#[test]
fn order_matters() {
    let trie = trie();
    let reversed = [Token::Right, Token::DownRight, Token::Down, Token::Punch];
    assert_ne!(trie.get_move(reversed), Some("Fireball"));
}

#[test]
fn fixed_batch_matches_once_and_clears() {
    let trie = trie();
    let mut matcher = CommandMatcher::new(BufferPolicy::FixedBatch {
        interval: ms(300),
    });

    assert_eq!(matcher.update(&trie, ms(16), [Token::Kick]), None);
    assert!(matcher.batch_open());
    assert_eq!(matcher.update(&trie, ms(150), [Token::Punch]), None);
    // Batch closes at 300ms with [K, P]; Kick is the first complete move
    assert_eq!(matcher.update(&trie, ms(150), NOTHING), Some("Kick"));
    assert!(matcher.buffer().is_empty());
    assert!(!matcher.batch_open());
}

#[test]
fn fixed_batch_clears_without_match() {
    let trie = trie();
    let mut matcher = CommandMatcher::new(BufferPolicy::FixedBatch {
        interval: ms(300),
    });

    matcher.update(&trie, ms(16), [Token::Down, Token::DownRight]);
    assert_eq!(matcher.update(&trie, ms(300), NOTHING), None);
    assert!(matcher.buffer().is_empty());

    // A fresh batch starts from scratch
    matcher.update(&trie, ms(16), [Token::Right, Token::Punch]);
    assert_eq!(matcher.update(&trie, ms(300), NOTHING), Some("Forward Punch"));
}

#[test]
fn composite_press_yields_grab_only() {
    let mapper = InputMapper::default();
    let snapshot = InputSnapshot::new().with_pad(
        PadState::new()
            .with(PadButton::X)
            .with(PadButton::A)
            .with(PadButton::Down),
    );

    assert_eq!(mapper.map(&snapshot), vec![Token::Down, Token::Grab]);
}

#[test]
fn keyboard_drives_session_without_pads() {
    let trie = trie();
    let mut session = CommandSession::default();
    let frame = ms(20);

    let held = |buttons: &[PadButton]| {
        InputSnapshot::from_keyboard(buttons.iter().fold(PadState::new(), |p, &b| p.with(b)))
    };

    let inputs: [&[PadButton]; 4] = [
        &[PadButton::Down],
        &[PadButton::Down, PadButton::Right],
        &[PadButton::Right],
        &[PadButton::Y],
    ];
    let mut found = None;
    for buttons in inputs {
        let snapshot = held(buttons);
        for _ in 0..4 {
            if let Some(name) = session.frame(&trie, frame, &snapshot) {
                found = Some(name);
            }
        }
    }

    assert_eq!(found, Some("Fireball"));
    assert_eq!(session.last_move(), Some("Fireball"));
}
