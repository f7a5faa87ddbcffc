//! Loading `MotionConfig` from disk and wiring it into a session.

use std::io::Write;
use std::time::Duration;

use bevy_motion::*;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_and_applies_config_file() {
    let file = write_config(
        r#"
sample_interval_ms = 40

[buffer]
policy = "batch"
batch_interval_ms = 200

[[moves]]
name = "Hadoken"
sequence = "236P"

[[moves]]
name = "Low Forward"
sequence = "down kick"
"#,
    );

    let config = MotionConfig::from_file(file.path()).unwrap();
    let mut trie = CommandTrie::build(DEFAULT_MOVES).unwrap();
    config.apply_moves(&mut trie).unwrap();

    // Renamed stock move, plus one new one
    assert_eq!(trie.len(), DEFAULT_MOVES.len() + 1);
    assert_eq!(
        trie.get_move([Token::Down, Token::DownRight, Token::Right, Token::Punch]),
        Some("Hadoken")
    );
    assert!(trie.contains(&[Token::Down, Token::Kick]));

    let session = config.session();
    assert_eq!(
        session.matcher().policy(),
        BufferPolicy::FixedBatch {
            interval: Duration::from_millis(200)
        }
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MotionConfig::from_file(dir.path().join("motion.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().contains("motion.toml"));
}

#[test]
fn invalid_file_is_rejected() {
    let file = write_config("[buffer]\npolicy = \"batch\"\nwindow_ms = 500\n");
    let err = MotionConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn policy_serializes_for_tooling() {
    let json = serde_json::to_string(&BufferPolicy::default()).unwrap();
    assert!(json.contains("SlidingWindow"));

    let back: BufferPolicy = serde_json::from_str(&json).unwrap();
    assert_eq!(back, BufferPolicy::default());
}
