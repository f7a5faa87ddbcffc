//! Command trie: prefix-tree dictionary from token sequences to move names.
//!
//! Each node exclusively owns its children, keyed by the token that leads to
//! them. A node carries a move name when some registered sequence ends there.
//!
//! ```text
//! root
//!  ├─ ↓ ─ ↘ ─ → ─ P        "Fireball"
//!  │          └─ ↓ ─ ↘ ─ → ─ P ─ P   "Super Fireball"
//!  ├─ → ─ ↓ ─ ↘ ─ P        "Shoryu"
//!  │   └─ P                "Forward Punch"
//!  └─ P                    "Punch"
//! ```
//!
//! Lookup is a greedy subsequence walk: buffered tokens that don't extend the
//! current path are skipped as noise, and the walk never backtracks.

use std::collections::HashMap;

use crate::error::CommandError;
use crate::token::Token;

/// Static move definition (used for building the trie from the `moves!` macro).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveDef {
    pub name: &'static str,
    pub sequence: &'static [Token],
}

impl MoveDef {
    pub const fn new(name: &'static str, sequence: &'static [Token]) -> Self {
        Self { name, sequence }
    }
}

/// One node of the trie.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrieNode {
    children: HashMap<Token, TrieNode>,
    move_name: Option<String>,
}

impl TrieNode {
    #[inline]
    pub fn child(&self, token: Token) -> Option<&TrieNode> {
        self.children.get(&token)
    }

    /// Name of the move ending at this node, if any.
    #[inline]
    pub fn move_name(&self) -> Option<&str> {
        self.move_name.as_deref()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Dictionary of special moves.
///
/// Built once at startup, then only read. Share it by reference between the
/// systems that match against it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandTrie {
    root: TrieNode,
    len: usize,
}

impl CommandTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie from a static move table (from the `moves!` macro).
    ///
    /// Later definitions overwrite earlier ones that end on the same node.
    pub fn build(defs: &[MoveDef]) -> Result<Self, CommandError> {
        let mut trie = Self::new();
        for def in defs {
            trie.add_move(def.sequence, def.name)?;
        }
        Ok(trie)
    }

    /// Register `name` for `sequence`, creating nodes along the way.
    ///
    /// Returns the name previously registered for the exact same sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EmptySequence`] for a zero-length sequence; the
    /// root never carries a name.
    pub fn add_move(
        &mut self,
        sequence: &[Token],
        name: impl Into<String>,
    ) -> Result<Option<String>, CommandError> {
        let name = name.into();
        if sequence.is_empty() {
            return Err(CommandError::EmptySequence { name });
        }

        let mut node = &mut self.root;
        for &token in sequence {
            node = node.children.entry(token).or_default();
        }

        let previous = node.move_name.replace(name);
        match &previous {
            Some(old) => tracing::debug!(
                sequence = %Token::render(sequence),
                old = %old,
                new = ?node.move_name,
                "move overwritten"
            ),
            None => self.len += 1,
        }
        Ok(previous)
    }

    /// Match a buffer of tokens against the dictionary.
    ///
    /// Scans the buffer in order, advancing to the child for each token that
    /// has one and skipping every token that doesn't. After the whole buffer
    /// is consumed, returns the name at the node reached, if any.
    ///
    /// ```text
    /// add_move([A, B], "X")
    /// get_move([Z, A, Q, B]) → Some("X")   // Z and Q are noise
    /// get_move([B, A])       → None        // order matters
    /// ```
    pub fn get_move(&self, buffer: impl IntoIterator<Item = Token>) -> Option<&str> {
        let mut node = &self.root;
        for token in buffer {
            if let Some(child) = node.child(token) {
                node = child;
            }
        }
        node.move_name()
    }

    /// Exact lookup, without noise skipping.
    pub fn find(&self, sequence: &[Token]) -> Option<&TrieNode> {
        sequence
            .iter()
            .try_fold(&self.root, |node, &token| node.child(token))
    }

    /// Check if a sequence is registered as a move.
    #[inline]
    pub fn contains(&self, sequence: &[Token]) -> bool {
        self.find(sequence).and_then(TrieNode::move_name).is_some()
    }

    #[inline]
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of distinct registered sequences.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All registered moves as `(sequence, name)`, in DFS order with siblings
    /// sorted by token.
    pub fn moves(&self) -> Vec<(Vec<Token>, &str)> {
        let mut out = Vec::with_capacity(self.len);
        let mut path = Vec::new();
        Self::collect_recursive(&self.root, &mut path, &mut out);
        out
    }

    fn collect_recursive<'a>(
        node: &'a TrieNode,
        path: &mut Vec<Token>,
        out: &mut Vec<(Vec<Token>, &'a str)>,
    ) {
        if let Some(name) = node.move_name() {
            out.push((path.clone(), name));
        }
        let mut kids: Vec<_> = node.children.iter().collect();
        kids.sort_by_key(|(token, _)| **token);
        for (&token, child) in kids {
            path.push(token);
            Self::collect_recursive(child, path, out);
            path.pop();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
