//! Algebraic square and move notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BoardError, BoardResult};

/// A board position in algebraic notation: file letter plus rank digit.
///
/// Rank is structurally bounded to 1-8; whether the file is reachable depends
/// on the calibrated corner table and is checked by the mapper, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    file: char,
    rank: u8,
}

impl Square {
    /// Builds a square from a file letter (case-insensitive) and a rank.
    pub fn new(file: char, rank: u8) -> BoardResult<Self> {
        let file = file.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return Err(BoardError::MalformedMove {
                input: format!("{file}{rank}"),
                reason: "file must be a letter",
            });
        }
        if !(1..=8).contains(&rank) {
            return Err(BoardError::MalformedMove {
                input: format!("{file}{rank}"),
                reason: "rank must be 1-8",
            });
        }
        Ok(Self { file, rank })
    }

    /// File letter, always lowercase.
    pub fn file(&self) -> char {
        self.file
    }

    /// Rank, 1-8.
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Zero-based file index ('a' is 0).
    pub fn file_index(&self) -> u8 {
        self.file as u8 - b'a'
    }

    fn from_chars(input: &str, file: char, rank: char) -> BoardResult<Self> {
        let rank = rank.to_digit(10).ok_or_else(|| BoardError::MalformedMove {
            input: input.to_owned(),
            reason: "rank must be a digit",
        })?;
        if !(1..=8).contains(&rank) {
            return Err(BoardError::MalformedMove {
                input: input.to_owned(),
                reason: "rank must be 1-8",
            });
        }
        let file = file.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return Err(BoardError::MalformedMove {
                input: input.to_owned(),
                reason: "file must be a letter",
            });
        }
        Ok(Self {
            file,
            rank: rank as u8,
        })
    }
}

impl FromStr for Square {
    type Err = BoardError;

    fn from_str(s: &str) -> BoardResult<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::from_chars(s, file, rank),
            _ => Err(BoardError::MalformedMove {
                input: s.to_owned(),
                reason: "a square is two characters",
            }),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

/// One trusted piece transfer: start square and end square.
///
/// Parsed from the operator's 4-character input ("e2e4"); no chess-rule
/// validation happens here or anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMove {
    /// Square the piece is lifted from.
    pub from: Square,
    /// Square the piece is placed on.
    pub to: Square,
}

impl FromStr for PieceMove {
    type Err = BoardError;

    fn from_str(s: &str) -> BoardResult<Self> {
        let chars: Vec<char> = s.chars().collect();
        let &[f1, r1, f2, r2] = chars.as_slice() else {
            return Err(BoardError::MalformedMove {
                input: s.to_owned(),
                reason: "a move is four characters, e.g. e2e4",
            });
        };
        Ok(Self {
            from: Square::from_chars(s, f1, r1)?,
            to: Square::from_chars(s, f2, r2)?,
        })
    }
}

impl fmt::Display for PieceMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
