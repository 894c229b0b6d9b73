//! Extraction of the content of a PDDL problem: name, domain, objects, initial state and goal.

use std::fmt::{Error, Formatter};
use std::sync::{Arc, LazyLock};

use itertools::Itertools;
use regex::Regex;
use serde::Serialize;

use crate::Res;
use crate::domain::UNKNOWN_DOMAIN;
use crate::input::Input;
use crate::section::Section;
use crate::typed_list::{self, TypedList};

/// Name given to a problem whose header could not be recognized.
pub const UNKNOWN_PROBLEM: &str = "unknown_problem";

static BLANKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PROBLEM_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(define\s*\(problem\s+([^\s)]+)\)\s*\(:domain\s+([^\s)]+)\)").unwrap()
});

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub name: String,
    /// Domain declared by the problem. It is not checked against the domain it is parsed with.
    pub domain_link: String,
    pub objects: TypedList,
    pub init: Vec<String>,
    pub goal: Vec<String>,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "# Problem : {} (domain: {})", self.name, self.domain_link)?;
        write!(f, "\n# Objects \n  {}", self.objects)?;
        write!(f, "\n# Initial State \n  {}", self.init.iter().format("\n  "))?;
        write!(f, "\n# Goal \n  {}", self.goal.iter().format("\n  "))?;
        Result::Ok(())
    }
}

/// Extracts the model of a PDDL problem.
///
/// Absent sections are left empty. If the header is not of the form
/// `(define (problem NAME) (:domain DOMAIN)`, the names default to [`UNKNOWN_PROBLEM`] and
/// [`UNKNOWN_DOMAIN`].
pub fn read_problem(input: &Arc<Input>) -> Res<Problem> {
    let all = 0..input.text.len();
    let section = |keyword: &str| Section::find(input, keyword, all.clone());

    let (name, domain_link) = match problem_header(&input.text) {
        Some(names) => names,
        None => {
            tracing::warn!("No `(define (problem ...) (:domain ...))` header found, using `{UNKNOWN_PROBLEM}`");
            (UNKNOWN_PROBLEM.to_string(), UNKNOWN_DOMAIN.to_string())
        }
    };
    let objects = match section("(:objects")? {
        Some(objects) => typed_list::group(objects.tokens())?,
        None => TypedList::default(),
    };
    let init = match section("(:init")? {
        Some(init) => init.expressions(),
        None => Vec::new(),
    };
    let goal = match section("(:goal")? {
        Some(goal) => goal.expressions(),
        None => Vec::new(),
    };

    Ok(Problem {
        name,
        domain_link,
        objects,
        init,
        goal,
    })
}

/// Problem and domain names of a `(define (problem NAME) (:domain DOMAIN) ...` header.
///
/// The domain must be declared immediately after the problem name.
pub fn problem_header(text: &str) -> Option<(String, String)> {
    let text = BLANKS.replace_all(text, " ");
    let captures = PROBLEM_HEADER.captures(&text)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}
