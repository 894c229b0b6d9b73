//! Matching of parenthesis pairs, the only structural primitive of the extractor.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum BracketError {
    /// A closing parenthesis was found at this offset while no parenthesis was open.
    #[error("closing parenthesis without a matching opening one")]
    Unopened(usize),
    /// The parenthesis opened at this offset is never closed.
    #[error("unclosed parenthesis")]
    Unclosed(usize),
    /// There is no opening parenthesis after the start offset.
    #[error("expected a parenthesized expression")]
    NoGroup,
}

/// Parenthesis pairs of the first balanced group of a text, keyed by the offset of the opening one.
///
/// All offsets are absolute byte offsets in the scanned text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Brackets {
    outer: (usize, usize),
    pairs: BTreeMap<usize, usize>,
}

impl Brackets {
    /// Scans `text` from `start` until the first group of parentheses is closed.
    ///
    /// Text after this group is ignored, even if unbalanced.
    /// The result contains every pair closed during the scan, nested ones included.
    pub fn scan(text: &str, start: usize) -> Result<Brackets, BracketError> {
        let mut pairs = BTreeMap::new();
        let mut open: SmallVec<[usize; 16]> = SmallVec::new();
        // parentheses are ASCII and can never appear inside a multi-byte character
        let bytes = text.as_bytes().get(start..).unwrap_or_default();
        for (i, b) in bytes.iter().enumerate() {
            let i = start + i;
            match b {
                b'(' => open.push(i),
                b')' => {
                    let opening = open.pop().ok_or(BracketError::Unopened(i))?;
                    pairs.insert(opening, i);
                    if open.is_empty() {
                        return Ok(Brackets {
                            outer: (opening, i),
                            pairs,
                        });
                    }
                }
                _ => {}
            }
        }
        match open.first() {
            Some(&unclosed) => Err(BracketError::Unclosed(unclosed)),
            None => Err(BracketError::NoGroup),
        }
    }

    /// Opening and closing offsets of the top-level group.
    pub fn outer(&self) -> (usize, usize) {
        self.outer
    }

    /// Offset of the parenthesis closing the one opened at `open`.
    pub fn close_of(&self, open: usize) -> Option<usize> {
        self.pairs.get(&open).copied()
    }

    /// All pairs, sorted by opening offset. The top-level group comes first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().map(|(&open, &close)| (open, close))
    }

    /// All pairs strictly inside the top-level group, sorted by opening offset.
    pub fn inner(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.iter().skip(1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
