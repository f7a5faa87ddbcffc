//! Command matcher: runs the buffer against the trie and decides on a move.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::buffer::TimedInputBuffer;
use crate::token::Token;
use crate::trie::CommandTrie;

/// Default buffer window for the sliding policy.
pub const DEFAULT_BUFFER_WINDOW: Duration = Duration::from_millis(600);

/// Default collection interval for the batch policy.
pub const DEFAULT_BATCH_INTERVAL: Duration = Duration::from_millis(300);

/// How buffered input is grouped into match attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferPolicy {
    /// Age tokens out after `window` and try a match every tick. Partial
    /// progress survives across ticks until it expires.
    SlidingWindow { window: Duration },
    /// Open a batch on the first token, match once when `interval` has
    /// elapsed, then clear whether or not anything matched. Tokens don't
    /// decay inside a batch.
    FixedBatch { interval: Duration },
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self::SlidingWindow {
            window: DEFAULT_BUFFER_WINDOW,
        }
    }
}

/// Owns the input buffer and applies a [`BufferPolicy`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandMatcher {
    policy: BufferPolicy,
    buffer: TimedInputBuffer,
    /// Time since the current batch opened; `None` when no batch is open.
    batch_elapsed: Option<Duration>,
}

impl CommandMatcher {
    pub fn new(policy: BufferPolicy) -> Self {
        Self {
            policy,
            buffer: TimedInputBuffer::new(),
            batch_elapsed: None,
        }
    }

    #[inline]
    pub fn policy(&self) -> BufferPolicy {
        self.policy
    }

    #[inline]
    pub fn buffer(&self) -> &TimedInputBuffer {
        &self.buffer
    }

    /// Whether a batch is currently collecting (always `false` for the sliding policy).
    #[inline]
    pub fn batch_open(&self) -> bool {
        self.batch_elapsed.is_some()
    }

    /// Run one tick: age the buffer, take in `tokens`, then try to match.
    ///
    /// Returns the recognized move name. The buffer is cleared on success
    /// (and, under the batch policy, at the end of every batch).
    pub fn update<'t>(
        &mut self,
        trie: &'t CommandTrie,
        dt: Duration,
        tokens: impl IntoIterator<Item = Token>,
    ) -> Option<&'t str> {
        match self.policy {
            BufferPolicy::SlidingWindow { window } => {
                self.buffer.tick(dt, window);
                self.push(tokens);
                self.try_match(trie, false)
            }
            BufferPolicy::FixedBatch { interval } => {
                if let Some(elapsed) = &mut self.batch_elapsed {
                    *elapsed += dt;
                }
                self.push(tokens);
                if self.batch_elapsed.is_none() && !self.buffer.is_empty() {
                    tracing::trace!("input batch opened");
                    self.batch_elapsed = Some(Duration::ZERO);
                }
                match self.batch_elapsed {
                    Some(elapsed) if elapsed >= interval => {
                        self.batch_elapsed = None;
                        self.try_match(trie, true)
                    }
                    _ => None,
                }
            }
        }
    }

    /// Drop all buffered input and any open batch.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.batch_elapsed = None;
    }

    fn push(&mut self, tokens: impl IntoIterator<Item = Token>) {
        for token in tokens {
            tracing::debug!(token = %token, "input buffered");
            self.buffer.insert(token);
        }
    }

    fn try_match<'t>(&mut self, trie: &'t CommandTrie, always_clear: bool) -> Option<&'t str> {
        let found = trie.get_move(self.buffer.tokens());
        if let Some(name) = found {
            tracing::info!(
                command = name,
                input = %Token::render(&self.buffer.tokens().collect::<Vec<_>>()),
                "command recognized"
            );
        }
        if found.is_some() || always_clear {
            self.buffer.clear();
        }
        found
    }
}
