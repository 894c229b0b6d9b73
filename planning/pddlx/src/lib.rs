//! Extraction of a structured model from PDDL domain and problem files.
//!
//! Extraction does not rely on a grammar: each section is located by its keyword and delimited by
//! matching parentheses (see [`brackets`]). Expressions (preconditions, effects, facts, ...) are
//! kept as raw text, in document order.
//!
//! ```ignore
//! let result = pddlx::parse_str(domain_text, problem_text)?;
//! let blocks = &result["blocksworld"];
//! println!("{}", blocks.actions["pick-up"]);
//! ```

pub mod brackets;
pub mod domain;
pub mod errors;
mod find_file;
pub mod input;
mod parse;
pub mod problem;
mod section;
pub mod segments;
pub mod typed_list;
pub(crate) mod utils;

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

pub use domain::{Action, Domain, Parameters, UNKNOWN_DOMAIN};
pub use errors::{ExtractError, Message};
pub use find_file::find_domain_of;
pub use input::Input;
pub use parse::*;
pub use problem::{Problem, UNKNOWN_PROBLEM};
pub use typed_list::TypedList;

use errors::Span;

pub type Res<T> = std::result::Result<T, ExtractError>;

/// A token of the input, with its location when known.
#[derive(Clone)]
pub struct Sym {
    pub symbol: String,
    pub span: Option<Span>,
}

impl Sym {
    pub fn with_source(s: impl Into<String>, source: Span) -> Sym {
        Sym {
            symbol: s.into(),
            span: Some(source),
        }
    }

    pub fn as_str(&self) -> &str {
        self.symbol.as_str()
    }

    pub fn is(&self, symbol: &str) -> bool {
        self.symbol == symbol
    }
}

impl From<&str> for Sym {
    fn from(value: &str) -> Self {
        Sym {
            symbol: value.to_string(),
            span: None,
        }
    }
}

impl From<Sym> for String {
    fn from(value: Sym) -> Self {
        value.symbol
    }
}

impl AsRef<str> for Sym {
    fn as_ref(&self) -> &str {
        &self.symbol
    }
}

impl Debug for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
impl Display for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl PartialEq for Sym {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Sym {}

impl Hash for Sym {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state)
    }
}
