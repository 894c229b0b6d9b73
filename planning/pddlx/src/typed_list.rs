//! Typed lists, such as `truck car - vehicle plane - aircraft`, found in `:types`, `:constants` and `:objects`.

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use itertools::{Either, Itertools};
use serde::Serialize;

use crate::{Res, Sym, errors::ExtractError};

/// Token separating a list of names from their type.
pub const SEPARATOR: &str = "-";

/// Type given to trailing names that are not followed by any type declaration.
pub const OBJECT_TYPE: &str = "object";

/// Content of a typed list, either a plain sequence of names (no type given anywhere) or the
/// names grouped by type.
///
/// Serialized as a JSON array or a JSON object, respectively.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedList {
    Flat(Vec<String>),
    Grouped(IndexMap<String, Vec<String>>),
}

impl Default for TypedList {
    fn default() -> Self {
        TypedList::Flat(Vec::new())
    }
}

impl TypedList {
    /// Total number of names, over all types.
    pub fn len(&self) -> usize {
        match self {
            TypedList::Flat(names) => names.len(),
            TypedList::Grouped(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, TypedList::Grouped(_))
    }

    /// All names, in order of appearance of their type then of the name.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        let names = match self {
            TypedList::Flat(names) => Either::Left(names.iter()),
            TypedList::Grouped(groups) => Either::Right(groups.values().flatten()),
        };
        names.map(String::as_str)
    }

    /// Names declared with type `tpe`. Always `None` for a flat list.
    pub fn of_type(&self, tpe: &str) -> Option<&[String]> {
        match self {
            TypedList::Flat(_) => None,
            TypedList::Grouped(groups) => groups.get(tpe).map(Vec::as_slice),
        }
    }
}

impl Display for TypedList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedList::Flat(names) => write!(f, "{}", names.iter().format(" ")),
            TypedList::Grouped(groups) => write!(
                f,
                "{}",
                groups
                    .iter()
                    .format_with("  ", |(tpe, names), f| f(&format_args!("{} - {tpe}", names.iter().format(" "))))
            ),
        }
    }
}

/// A run of names sharing the same type: `a b c - t`.
#[derive(Clone, Debug)]
pub struct TypedGroup {
    pub names: Vec<Sym>,
    /// `None` for names at the end of the list that are not followed by a type.
    pub tpe: Option<Sym>,
}

enum State {
    /// Collecting names until the next separator.
    Accumulating,
    /// A separator was just read, the next token names the type.
    AwaitingType { separator: Sym },
}

/// Splits `tokens` into groups of the form `name1 name2 ... - type`, in order.
///
/// Fails if a separator is not followed by a type name.
pub fn typed_groups(tokens: impl IntoIterator<Item = Sym>) -> Res<Vec<TypedGroup>> {
    let mut groups = Vec::new();
    let mut pending = Vec::new();
    let mut state = State::Accumulating;
    for token in tokens {
        state = match state {
            State::Accumulating if token.is(SEPARATOR) => State::AwaitingType { separator: token },
            State::Accumulating => {
                pending.push(token);
                State::Accumulating
            }
            State::AwaitingType { .. } if token.is(SEPARATOR) => {
                return Err(ExtractError::malformed("expected a type name after `-`", token.span));
            }
            State::AwaitingType { .. } => {
                groups.push(TypedGroup {
                    names: std::mem::take(&mut pending),
                    tpe: Some(token),
                });
                State::Accumulating
            }
        }
    }
    match state {
        State::AwaitingType { separator } => Err(ExtractError::malformed(
            "missing type name after `-`",
            separator.span,
        )),
        State::Accumulating => {
            if !pending.is_empty() {
                groups.push(TypedGroup {
                    names: pending,
                    tpe: None,
                });
            }
            Ok(groups)
        }
    }
}

/// Builds a typed list from a flat token sequence.
///
/// Without any separator, the tokens are returned as is. Otherwise names are grouped by type, a
/// type appearing several times accumulating all its names. Names not followed by a type are
/// grouped under [`OBJECT_TYPE`].
pub fn group(tokens: Vec<Sym>) -> Res<TypedList> {
    if !tokens.iter().any(|t| t.is(SEPARATOR)) {
        return Ok(TypedList::Flat(tokens.into_iter().map(String::from).collect()));
    }
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for TypedGroup { names, tpe } in typed_groups(tokens)? {
        let tpe = tpe.map_or_else(|| OBJECT_TYPE.to_string(), String::from);
        groups.entry(tpe).or_default().extend(names.into_iter().map(String::from));
    }
    Ok(TypedList::Grouped(groups))
}
