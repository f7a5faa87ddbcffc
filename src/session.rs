//! Per-frame driver tying the mapper and matcher to a shared trie.

use std::time::Duration;

use crate::mapper::{InputMapper, InputSource};
use crate::matcher::{BufferPolicy, CommandMatcher};
use crate::trie::CommandTrie;

/// Everything a game loop mutates for command input, for one player.
///
/// The trie is not owned here: it is built once and lent to every frame.
///
/// ```ignore
/// let trie = CommandTrie::build(DEFAULT_MOVES)?;
/// let mut session = CommandSession::default();
///
/// loop {
///     let snapshot = poll_devices();
///     if let Some(name) = session.frame(&trie, clock.delta(), &snapshot) {
///         println!("{name}!");
///     }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandSession {
    mapper: InputMapper,
    matcher: CommandMatcher,
    last_move: Option<String>,
}

impl CommandSession {
    pub fn new(mapper: InputMapper, policy: BufferPolicy) -> Self {
        Self {
            mapper,
            matcher: CommandMatcher::new(policy),
            last_move: None,
        }
    }

    /// Advance one frame: sample input if a tick is due, age the buffer and
    /// try to match.
    pub fn frame<'t>(
        &mut self,
        trie: &'t CommandTrie,
        dt: Duration,
        source: &impl InputSource,
    ) -> Option<&'t str> {
        let tokens = self.mapper.sample(dt, source);
        let found = self.matcher.update(trie, dt, tokens);
        if let Some(name) = found {
            self.last_move = Some(name.to_owned());
        }
        found
    }

    /// Last recognized move; kept until another move replaces it.
    #[inline]
    pub fn last_move(&self) -> Option<&str> {
        self.last_move.as_deref()
    }

    #[inline]
    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    #[inline]
    pub fn matcher(&self) -> &CommandMatcher {
        &self.matcher
    }

    /// Drop buffered input. The last recognized move is kept.
    pub fn reset(&mut self) {
        self.matcher.reset();
    }
}
