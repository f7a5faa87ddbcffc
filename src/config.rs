//! TOML configuration for command input.
//!
//! ```toml
//! device = 0
//! sample_interval_ms = 80
//! trigger_threshold = 0.3
//! emit_neutral = false
//!
//! [buffer]
//! policy = "sliding"      # or "batch"
//! window_ms = 600         # sliding only
//! batch_interval_ms = 300 # batch only
//!
//! [[moves]]
//! name = "Fireball"
//! sequence = "236P"
//! ```
//!
//! Every key is optional. Moves listed here are added on top of whatever
//! table the trie was built from.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CommandError, ConfigError};
use crate::mapper::{DEFAULT_SAMPLE_INTERVAL, DEFAULT_TRIGGER_THRESHOLD, InputBindings, InputMapper};
use crate::matcher::{BufferPolicy, DEFAULT_BATCH_INTERVAL, DEFAULT_BUFFER_WINDOW};
use crate::session::CommandSession;
use crate::token::Token;
use crate::trie::CommandTrie;

/// Parsed and validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    /// Device index the mapper reads
    pub device: usize,
    pub sample_interval: Duration,
    pub trigger_threshold: f32,
    pub emit_neutral: bool,
    pub policy: BufferPolicy,
    /// Extra moves, in file order
    pub moves: Vec<MoveEntry>,
}

/// A move defined in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEntry {
    pub name: String,
    pub sequence: Vec<Token>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            device: 0,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            emit_neutral: false,
            policy: BufferPolicy::default(),
            moves: Vec::new(),
        }
    }
}

/// Raw TOML structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMotionConfig {
    device: Option<usize>,
    sample_interval_ms: Option<u64>,
    trigger_threshold: Option<f32>,
    emit_neutral: Option<bool>,
    buffer: Option<RawBuffer>,
    #[serde(default)]
    moves: Vec<RawMove>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuffer {
    /// "sliding" (default) or "batch"
    policy: Option<String>,
    window_ms: Option<u64>,
    batch_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMove {
    name: String,
    sequence: String,
}

impl MotionConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawMotionConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let sample_interval = raw
            .sample_interval_ms
            .map_or(defaults.sample_interval, Duration::from_millis);
        if sample_interval.is_zero() {
            return Err(ConfigError::Validation(
                "sample_interval_ms must be greater than 0".into(),
            ));
        }

        let trigger_threshold = raw.trigger_threshold.unwrap_or(defaults.trigger_threshold);
        // A resting trigger reads 0.0, so zero would hold every trigger down
        if !(f32::MIN_POSITIVE..=1.0).contains(&trigger_threshold) {
            return Err(ConfigError::Validation(format!(
                "trigger_threshold {} must be greater than 0.0 and at most 1.0",
                trigger_threshold
            )));
        }

        let policy = Self::parse_policy(raw.buffer.unwrap_or_default())?;
        let moves = raw
            .moves
            .into_iter()
            .map(Self::parse_move)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            device: raw.device.unwrap_or(defaults.device),
            sample_interval,
            trigger_threshold,
            emit_neutral: raw.emit_neutral.unwrap_or(defaults.emit_neutral),
            policy,
            moves,
        })
    }

    fn parse_policy(raw: RawBuffer) -> Result<BufferPolicy, ConfigError> {
        let positive = |key: &str, ms: Option<u64>, default: Duration| match ms {
            Some(0) => Err(ConfigError::Validation(format!(
                "{} must be greater than 0",
                key
            ))),
            Some(ms) => Ok(Duration::from_millis(ms)),
            None => Ok(default),
        };

        match raw.policy.as_deref() {
            None | Some("sliding") => {
                if raw.batch_interval_ms.is_some() {
                    return Err(ConfigError::Validation(
                        "batch_interval_ms only applies to policy = \"batch\"".into(),
                    ));
                }
                Ok(BufferPolicy::SlidingWindow {
                    window: positive("window_ms", raw.window_ms, DEFAULT_BUFFER_WINDOW)?,
                })
            }
            Some("batch") => {
                if raw.window_ms.is_some() {
                    return Err(ConfigError::Validation(
                        "window_ms only applies to policy = \"sliding\"".into(),
                    ));
                }
                Ok(BufferPolicy::FixedBatch {
                    interval: positive(
                        "batch_interval_ms",
                        raw.batch_interval_ms,
                        DEFAULT_BATCH_INTERVAL,
                    )?,
                })
            }
            Some(other) => Err(ConfigError::Validation(format!(
                "Invalid policy '{}': expected 'sliding' or 'batch'",
                other
            ))),
        }
    }

    fn parse_move(raw: RawMove) -> Result<MoveEntry, ConfigError> {
        if raw.name.trim().is_empty() {
            return Err(ConfigError::Validation("move name cannot be empty".into()));
        }
        let sequence = Token::parse_sequence(&raw.sequence)?;
        if sequence.is_empty() {
            return Err(CommandError::EmptySequence { name: raw.name }.into());
        }
        Ok(MoveEntry {
            name: raw.name,
            sequence,
        })
    }

    /// Mapper configured from this file, with the stock attack bindings.
    pub fn mapper(&self) -> InputMapper {
        let bindings = InputBindings::default()
            .trigger_threshold(self.trigger_threshold)
            .emit_neutral(self.emit_neutral);
        InputMapper::new(bindings, self.sample_interval).with_device(self.device)
    }

    pub fn session(&self) -> CommandSession {
        CommandSession::new(self.mapper(), self.policy)
    }

    /// Add this file's moves to `trie`. Config moves win over table moves
    /// with the same sequence.
    pub fn apply_moves(&self, trie: &mut CommandTrie) -> Result<(), CommandError> {
        for entry in &self.moves {
            trie.add_move(&entry.sequence, entry.name.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = MotionConfig::from_str("").unwrap();
        assert_eq!(config, MotionConfig::default());
        assert_eq!(
            config.policy,
            BufferPolicy::SlidingWindow {
                window: Duration::from_millis(600)
            }
        );
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
device = 1
sample_interval_ms = 50
trigger_threshold = 0.5
emit_neutral = true

[buffer]
policy = "batch"
batch_interval_ms = 250

[[moves]]
name = "Fireball"
sequence = "236P"

[[moves]]
name = "Tatsu"
sequence = "down down-left left kick"
"#;
        let config = MotionConfig::from_str(toml).unwrap();

        assert_eq!(config.device, 1);
        assert_eq!(config.sample_interval, Duration::from_millis(50));
        assert_eq!(config.trigger_threshold, 0.5);
        assert!(config.emit_neutral);
        assert_eq!(
            config.policy,
            BufferPolicy::FixedBatch {
                interval: Duration::from_millis(250)
            }
        );
        assert_eq!(config.moves.len(), 2);
        assert_eq!(
            config.moves[1].sequence,
            vec![Token::Down, Token::DownLeft, Token::Left, Token::Kick]
        );
        assert_eq!(config.mapper().device(), 1);
    }

    #[test]
    fn rejects_invalid_values() {
        let cases = [
            "sample_interval_ms = 0",
            "trigger_threshold = 1.5",
            "trigger_threshold = 0",
            "trigger_threshold = 0.0",
            "trigger_threshold = -0.2",
            "[buffer]\npolicy = \"sometimes\"",
            "[buffer]\nwindow_ms = 0",
            "[buffer]\npolicy = \"batch\"\nwindow_ms = 600",
            "[buffer]\nbatch_interval_ms = 300",
            "unknown_key = 1",
        ];

        for case in cases {
            assert!(MotionConfig::from_str(case).is_err(), "Should reject: {}", case);
        }
    }

    #[test]
    fn rejects_bad_moves() {
        let empty = "[[moves]]\nname = \"Nothing\"\nsequence = \"\"";
        let err = MotionConfig::from_str(empty).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Move(CommandError::EmptySequence { .. })
        ));

        let unknown = "[[moves]]\nname = \"Jump\"\nsequence = \"8J\"";
        assert!(matches!(
            MotionConfig::from_str(unknown).unwrap_err(),
            ConfigError::Move(CommandError::UnknownToken { .. })
        ));

        let unnamed = "[[moves]]\nname = \" \"\nsequence = \"P\"";
        assert!(matches!(
            MotionConfig::from_str(unnamed).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn config_moves_override_table() {
        let mut trie = CommandTrie::new();
        trie.add_move(&[Token::Punch], "Jab").unwrap();

        let toml = "[[moves]]\nname = \"Straight\"\nsequence = \"P\"";
        let config = MotionConfig::from_str(toml).unwrap();
        config.apply_moves(&mut trie).unwrap();

        assert_eq!(trie.get_move([Token::Punch]), Some("Straight"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn parse_error_is_reported() {
        let err = MotionConfig::from_str("device = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }
}
