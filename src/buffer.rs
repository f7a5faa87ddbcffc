//! Timed input buffer: FIFO of recent tokens that age out after a window.

use std::collections::VecDeque;
use std::time::Duration;

use crate::token::Token;

/// A buffered token and how long it has been resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueEntry {
    pub token: Token,
    pub age: Duration,
}

impl QueueEntry {
    #[inline]
    pub const fn new(token: Token) -> Self {
        Self {
            token,
            age: Duration::ZERO,
        }
    }
}

/// Ordered queue of recently observed tokens, oldest first.
///
/// Every entry ages by the same amount each tick, so ages never increase from
/// front to back and expiry always removes a prefix of the queue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimedInputBuffer {
    entries: VecDeque<QueueEntry>,
}

impl TimedInputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token with age zero.
    #[inline]
    pub fn insert(&mut self, token: Token) {
        self.entries.push_back(QueueEntry::new(token));
    }

    /// Age every entry by `dt`, then drop entries whose age reached `window`.
    ///
    /// Returns the number of expired entries.
    pub fn tick(&mut self, dt: Duration, window: Duration) -> usize {
        for entry in &mut self.entries {
            entry.age += dt;
        }

        let mut expired = 0;
        while self.entries.front().is_some_and(|e| e.age >= window) {
            self.entries.pop_front();
            expired += 1;
        }
        debug_assert!(self.entries.iter().all(|e| e.age < window));

        if expired > 0 {
            tracing::trace!(expired, remaining = self.entries.len(), "input buffer expired");
        }
        expired
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Buffered tokens, oldest first.
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.entries.iter().map(|e| e.token)
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> + '_ {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<Token> for TimedInputBuffer {
    fn extend<T: IntoIterator<Item = Token>>(&mut self, iter: T) {
        self.entries.extend(iter.into_iter().map(QueueEntry::new));
    }
}

impl FromIterator<Token> for TimedInputBuffer {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}
