//! # Fighting-Game Command Input (bevy-motion)
//!
//! Recognizes named moves ("Fireball", "Shoryu", ...) from a stream of
//! directional and attack inputs, tolerating noise between the inputs that
//! make up a move.
//!
//! ## Design
//!
//! Four pieces, driven once per frame:
//!
//! ```text
//! ┌─────────────┐  tokens  ┌──────────────────┐  buffer  ┌──────────────┐
//! │ InputMapper │ ───────► │ TimedInputBuffer │ ───────► │ CommandTrie  │ ──► move name
//! │ (sampling)  │          │ (age + expiry)   │          │ (greedy walk)│
//! └─────────────┘          └──────────────────┘          └──────────────┘
//! ```
//!
//! - `InputMapper` turns held buttons into at most one direction plus attacks,
//!   every sample tick.
//! - `CommandMatcher` owns the buffer and applies a `BufferPolicy`.
//! - `CommandTrie` walks the buffer, skipping tokens with no matching branch.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy_motion::{CommandSession, CommandTrie, DEFAULT_MOVES};
//!
//! let trie = CommandTrie::build(DEFAULT_MOVES)?;
//! let mut session = CommandSession::default();
//!
//! if let Some(name) = session.frame(&trie, dt, &snapshot) {
//!     println!("{name}!");
//! }
//! ```

extern crate self as bevy_motion;

pub mod bevy;
pub mod buffer;
pub mod config;
pub mod defaults;
pub mod devices;
pub mod error;
pub mod mapper;
pub mod matcher;
pub mod session;
pub mod token;
pub mod trie;

pub use buffer::{QueueEntry, TimedInputBuffer};
pub use config::{MotionConfig, MoveEntry};
pub use defaults::DEFAULT_MOVES;
pub use devices::{CONNECTION_NOTICE, ConnectedDevices, ConnectionBanner};
pub use error::{CommandError, ConfigError};
pub use mapper::{
    DEFAULT_SAMPLE_INTERVAL, DEFAULT_TRIGGER_THRESHOLD, InputBindings, InputMapper, InputSnapshot,
    InputSource, PadButton, PadState, PhysicalInput, SampleTimer, Trigger,
};
pub use matcher::{BufferPolicy, CommandMatcher, DEFAULT_BATCH_INTERVAL, DEFAULT_BUFFER_WINDOW};
pub use session::CommandSession;
pub use token::Token;
pub use trie::{CommandTrie, MoveDef, TrieNode};

pub use bevy_motion_macro::moves;
