//! Token alphabet: the closed set of symbolic inputs a move is spelled with.
//!
//! Directions follow the numpad convention used in fighting-game notation,
//! seen from a player facing right:
//!
//! ```text
//! 7 8 9      ↖ ↑ ↗
//! 4 5 6  →   ← • →
//! 1 2 3      ↙ ↓ ↘
//! ```
//!
//! Attack tokens are `P` (punch), `K` (kick) and the composite `G` (grab).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// One symbolic unit of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    Neutral,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Punch,
    Kick,
    /// Composite: punch and kick pressed together.
    Grab,
}

impl Token {
    /// Every token, directions first.
    pub const ALL: [Token; 12] = [
        Token::Neutral,
        Token::Up,
        Token::Down,
        Token::Left,
        Token::Right,
        Token::UpLeft,
        Token::UpRight,
        Token::DownLeft,
        Token::DownRight,
        Token::Punch,
        Token::Kick,
        Token::Grab,
    ];

    /// True for the eight directions and neutral.
    #[inline]
    pub const fn is_direction(self) -> bool {
        matches!(
            self,
            Token::Neutral
                | Token::Up
                | Token::Down
                | Token::Left
                | Token::Right
                | Token::UpLeft
                | Token::UpRight
                | Token::DownLeft
                | Token::DownRight
        )
    }

    #[inline]
    pub const fn is_attack(self) -> bool {
        !self.is_direction()
    }

    /// Single-character display form (`↓`, `P`, ...).
    pub const fn glyph(self) -> char {
        match self {
            Token::Neutral => '•',
            Token::Up => '↑',
            Token::Down => '↓',
            Token::Left => '←',
            Token::Right => '→',
            Token::UpLeft => '↖',
            Token::UpRight => '↗',
            Token::DownLeft => '↙',
            Token::DownRight => '↘',
            Token::Punch => 'P',
            Token::Kick => 'K',
            Token::Grab => 'G',
        }
    }

    /// Numpad digit for directions, `None` for attacks.
    pub const fn numpad(self) -> Option<char> {
        let digit = match self {
            Token::DownLeft => '1',
            Token::Down => '2',
            Token::DownRight => '3',
            Token::Left => '4',
            Token::Neutral => '5',
            Token::Right => '6',
            Token::UpLeft => '7',
            Token::Up => '8',
            Token::UpRight => '9',
            _ => return None,
        };
        Some(digit)
    }

    /// Parse one character of compact notation: a numpad digit, a glyph or `P`/`K`/`G`.
    pub fn from_char(c: char) -> Option<Token> {
        let upper = c.to_ascii_uppercase();
        Token::ALL
            .into_iter()
            .find(|t| t.glyph() == c || t.glyph() == upper || t.numpad() == Some(c))
    }

    /// Parse a move sequence.
    ///
    /// Parts are separated by whitespace or commas. Each part is either a full
    /// token name (`down-right`, `DownRight`, `punch`) or compact notation
    /// where every character is one token (`236P`, `↓↘→P`).
    ///
    /// ```text
    /// "236P"                      → [Down, DownRight, Right, Punch]
    /// "down, down-right, right P" → [Down, DownRight, Right, Punch]
    /// ```
    pub fn parse_sequence(input: &str) -> Result<Vec<Token>, CommandError> {
        let mut tokens = Vec::new();
        for part in input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
        {
            if let Ok(token) = part.parse::<Token>() {
                tokens.push(token);
                continue;
            }
            for c in part.chars() {
                let token = Token::from_char(c).ok_or_else(|| CommandError::UnknownToken {
                    input: part.to_string(),
                })?;
                tokens.push(token);
            }
        }
        Ok(tokens)
    }

    /// Render a sequence in glyph form, e.g. `↓↘→P`.
    pub fn render(sequence: &[Token]) -> String {
        sequence.iter().map(|t| t.glyph()).collect()
    }

    fn name(self) -> &'static str {
        match self {
            Token::Neutral => "Neutral",
            Token::Up => "Up",
            Token::Down => "Down",
            Token::Left => "Left",
            Token::Right => "Right",
            Token::UpLeft => "UpLeft",
            Token::UpRight => "UpRight",
            Token::DownLeft => "DownLeft",
            Token::DownRight => "DownRight",
            Token::Punch => "Punch",
            Token::Kick => "Kick",
            Token::Grab => "Grab",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl FromStr for Token {
    type Err = CommandError;

    /// Accepts a variant name in any case, with or without `-`/`_` separators,
    /// or a single notation character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(token) = Token::from_char(c)
        {
            return Ok(token);
        }

        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Token::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| CommandError::UnknownToken {
                input: s.to_string(),
            })
    }
}
