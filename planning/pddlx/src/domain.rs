//! Extraction of the content of a PDDL domain: requirements, types, constants, predicates and actions.

use std::fmt::{Error, Formatter};
use std::ops::Range;
use std::sync::{Arc, LazyLock};

use derive_more::derive::Display;
use indexmap::IndexMap;
use itertools::Itertools;
use regex::Regex;
use serde::Serialize;

use crate::errors::{ExtractError, Span};
use crate::input::Input;
use crate::problem::Problem;
use crate::section::{Section, keyword_indices, scan};
use crate::typed_list::{self, SEPARATOR, TypedList};
use crate::utils::disp_slice;
use crate::{Res, Sym};

/// Name given to a domain whose `(domain ...)` header could not be found.
pub const UNKNOWN_DOMAIN: &str = "unknown_domain";

const ACTION: &str = "(:action";

static DOMAIN_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\(domain\s+([^\s)]+)").unwrap());

#[derive(Clone, Debug, Serialize)]
pub struct Domain {
    pub name: String,
    pub requirements: Vec<String>,
    pub types: TypedList,
    pub constants: TypedList,
    /// Predicate signatures, verbatim, e.g. `(on ?x ?y)`
    pub predicates: Vec<String>,
    pub actions: IndexMap<String, Action>,
    /// Problems declared for this domain, filled when parsing problems
    pub problems: IndexMap<String, Problem>,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "# Domain : {}", self.name)?;
        write!(f, "\n# Requirements \n  ")?;
        disp_slice(f, self.requirements.as_slice(), " ")?;
        write!(f, "\n# Types \n  {}", self.types)?;
        write!(f, "\n# Constants \n  {}", self.constants)?;
        write!(f, "\n# Predicates \n  ")?;
        disp_slice(f, self.predicates.as_slice(), "\n  ")?;
        write!(f, "\n# Actions \n  ")?;
        write!(f, "{}", self.actions.values().format("\n  "))?;
        Result::Ok(())
    }
}

/// Parameters of an action: `values[i]` has type `types[i]`.
///
/// There may be less types than values, trailing values being untyped.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Parameters {
    pub values: Vec<String>,
    pub types: Vec<String>,
}

impl Parameters {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Type of the `i`-th parameter, if it was given one.
    pub fn type_of(&self, i: usize) -> Option<&str> {
        self.types.get(i).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (value.as_str(), self.type_of(i)))
    }
}

impl std::fmt::Display for Parameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let params = self.iter().format_with(", ", |(value, tpe), f| match tpe {
            Some(tpe) => f(&format_args!("{value}: {tpe}")),
            None => f(&value),
        });
        write!(f, "{params}")
    }
}

#[derive(Clone, Debug, Display, Serialize)]
#[display("{name}({parameters})")]
pub struct Action {
    pub name: String,
    pub parameters: Parameters,
    pub preconditions: Vec<String>,
    pub effects: Vec<String>,
}

/// Extracts the model of a PDDL domain.
///
/// Sections that are absent from the input are left empty. The name of the domain defaults to
/// [`UNKNOWN_DOMAIN`].
pub fn read_domain(input: &Arc<Input>) -> Res<Domain> {
    let all = 0..input.text.len();
    let section = |keyword: &str| Section::find(input, keyword, all.clone());

    let name = match domain_name(&input.text) {
        Some(name) => name.to_string(),
        None => {
            tracing::warn!("No `(domain ...)` header found, using `{UNKNOWN_DOMAIN}`");
            UNKNOWN_DOMAIN.to_string()
        }
    };
    let requirements = match section("(:requirements")? {
        Some(reqs) => reqs.tokens().into_iter().map(String::from).collect(),
        None => Vec::new(),
    };
    let types = match section("(:types")? {
        Some(types) => typed_list::group(types.tokens())?,
        None => TypedList::default(),
    };
    let constants = match section("(:constants")? {
        Some(constants) => typed_list::group(constants.tokens())?,
        None => TypedList::default(),
    };
    let predicates = match section("(:predicates")? {
        Some(predicates) => predicates.children(),
        None => Vec::new(),
    };
    let actions = read_actions(input)?;

    Ok(Domain {
        name,
        requirements,
        types,
        constants,
        predicates,
        actions,
        problems: IndexMap::new(),
    })
}

/// Name declared in the first `(domain NAME)` header of the text, ignoring case.
pub fn domain_name(text: &str) -> Option<&str> {
    text.lines()
        .find_map(|line| DOMAIN_HEADER.captures(line)?.get(1))
        .map(|m| m.as_str())
}

fn read_actions(input: &Arc<Input>) -> Res<IndexMap<String, Action>> {
    let mut actions = IndexMap::new();
    for start in keyword_indices(&input.text, ACTION) {
        let action = read_action(input, start)?;
        tracing::trace!("action: {action}");
        actions.insert(action.name.clone(), action);
    }
    Ok(actions)
}

fn read_action(input: &Arc<Input>, start: usize) -> Res<Action> {
    let brackets = scan(input, start, input.text.len(), ACTION)?;
    let (open, close) = brackets.outer();
    let body = open..(close + 1);

    let name = action_name(&input.text[body.clone()]).ok_or_else(|| {
        ExtractError::malformed(
            "missing action name",
            Span::new(input.clone(), open, open + ACTION.len() - 1),
        )
    })?;
    let parameters = read_parameters(required(input, ":parameters", body.clone())?.tokens())?;
    let preconditions = required(input, ":precondition", body.clone())?.expressions();
    let effects = required(input, ":effect", body)?.expressions();

    Ok(Action {
        name: name.to_string(),
        parameters,
        preconditions,
        effects,
    })
}

fn required<'i>(input: &'i Arc<Input>, keyword: &'static str, action: Range<usize>) -> Res<Section<'i>> {
    Section::find(input, keyword, action.clone())?
        .ok_or_else(|| ExtractError::missing(keyword, Span::new(input.clone(), action.start, action.end - 1)))
}

/// Name of the action whose definition starts `action`: the last token of the header line that
/// precedes any keyword or parenthesis.
///
/// If the header line holds no name, the name is the first token after `(:action`, e.g. on the
/// next line.
fn action_name(action: &str) -> Option<&str> {
    let after_keyword = action.get(ACTION.len()..)?;
    let header = after_keyword.lines().next().unwrap_or_default();
    let header = header.split(['(', ')']).next().unwrap_or_default();
    header
        .split_whitespace()
        .take_while(|token| !token.starts_with(':'))
        .last()
        .or_else(|| {
            after_keyword
                .split_whitespace()
                .next()
                .and_then(|token| token.split(['(', ')']).next())
                .filter(|token| !token.is_empty() && !token.starts_with(':'))
        })
}

/// Pairs the variables of a parameter list with their types.
///
/// A type applies to all variables read since the previous type, e.g. `?x ?y - location ?z - car`
/// gives `location` to `?x` and `?y`, and `car` to `?z`. Variables not followed by a type are left
/// untyped.
pub fn read_parameters(tokens: Vec<Sym>) -> Res<Parameters> {
    let mut params = Parameters::default();
    // number of variables waiting for a type
    let mut untyped = 0;
    let mut separator: Option<Sym> = None;
    for token in tokens {
        if token.is(SEPARATOR) {
            if separator.is_some() {
                return Err(ExtractError::malformed("expected a type name after `-`", token.span));
            }
            separator = Some(token);
        } else if token.as_str().starts_with('?') {
            if separator.is_some() {
                return Err(ExtractError::malformed("expected a type name after `-`", token.span));
            }
            params.values.push(token.into());
            untyped += 1;
        } else {
            if untyped == 0 {
                return Err(ExtractError::malformed("type does not apply to any parameter", token.span));
            }
            params.types.extend(std::iter::repeat_n(token.symbol, untyped));
            untyped = 0;
            separator = None;
        }
    }
    match separator {
        Some(separator) => Err(ExtractError::malformed("missing type name after `-`", separator.span)),
        None => Ok(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(text: &str) -> Res<Domain> {
        read_domain(&Arc::new(Input::from_string(text)))
    }

    fn syms(s: &str) -> Vec<Sym> {
        s.split_whitespace().map(Sym::from).collect()
    }

    fn strings(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    const BLOCKS: &str = "
; blocks world, 4 operators
(define (domain BLOCKS)
  (:requirements :strips :typing)
  (:types block)
  (:predicates (on ?x - block ?y - block)
               (ontable ?x - block)
               (clear ?x - block)
               (handempty)
               (holding ?x - block))

  (:action pick-up
    :parameters (?x - block)
    :precondition (and (clear ?x) (ontable ?x) (handempty))
    :effect
    (and (not (ontable ?x))
         (not (clear ?x))
         (not (handempty))
         (holding ?x)))

  (:action stack
    :parameters (?x - block ?y - block)
    :precondition (and (holding ?x) (clear ?y))
    :effect (and (not (holding ?x)) (not (clear ?y)) (clear ?x) (handempty) (on ?x ?y))))";

    #[test]
    fn blocks_world() {
        let d = domain(BLOCKS).unwrap();
        assert_eq!(d.name, "BLOCKS");
        assert_eq!(d.requirements, strings(&[":strips", ":typing"]));
        assert_eq!(d.types, TypedList::Flat(strings(&["block"])));
        assert_eq!(d.constants, TypedList::default());
        assert_eq!(
            d.predicates,
            strings(&[
                "(on ?x - block ?y - block)",
                "(ontable ?x - block)",
                "(clear ?x - block)",
                "(handempty)",
                "(holding ?x - block)"
            ])
        );
        assert_eq!(d.actions.keys().collect_vec(), vec!["pick-up", "stack"]);

        let pick_up = &d.actions["pick-up"];
        assert_eq!(pick_up.parameters.values, strings(&["?x"]));
        assert_eq!(pick_up.parameters.types, strings(&["block"]));
        assert_eq!(pick_up.preconditions, strings(&["(clear ?x)", "(ontable ?x)", "(handempty)"]));
        assert_eq!(
            pick_up.effects,
            strings(&["(not (ontable ?x))", "(not (clear ?x))", "(not (handempty))", "(holding ?x)"])
        );

        let stack = &d.actions["stack"];
        assert_eq!(stack.to_string(), "stack(?x: block, ?y: block)");
        assert_eq!(stack.effects.len(), 5);
        assert!(d.problems.is_empty());
    }

    #[test]
    fn type_hierarchy() {
        let d = domain("(define (domain d) (:types car truck - vehicle vehicle - object))").unwrap();
        let TypedList::Grouped(types) = &d.types else {
            panic!("expected grouped types")
        };
        assert_eq!(types["vehicle"], strings(&["car", "truck"]));
        assert_eq!(types["object"], strings(&["vehicle"]));
        let d = domain("(define (domain d) (:types car truck))").unwrap();
        assert_eq!(d.types, TypedList::Flat(strings(&["car", "truck"])));
    }

    #[test]
    fn constants() {
        let d = domain("(define (domain d) (:constants red green - color home))").unwrap();
        assert_eq!(d.constants.of_type("color").unwrap(), strings(&["red", "green"]).as_slice());
        assert_eq!(d.constants.of_type("object").unwrap(), strings(&["home"]).as_slice());
    }

    #[test]
    fn missing_sections_are_empty() {
        let d = domain("(define (domain empty))").unwrap();
        assert_eq!(d.name, "empty");
        assert!(d.requirements.is_empty());
        assert_eq!(d.types, TypedList::Flat(vec![]));
        assert_eq!(d.constants, TypedList::Flat(vec![]));
        assert!(d.predicates.is_empty());
        assert!(d.actions.is_empty());
    }

    #[test]
    fn unknown_domain_name() {
        assert_eq!(domain("(define (:types a))").unwrap().name, UNKNOWN_DOMAIN);
        assert_eq!(domain_name("(define (DOMAIN Logistics)"), Some("Logistics"));
        assert_eq!(domain_name("(define (domain\n logistics)"), None);
        assert_eq!(domain_name("x\n (define (domain log-istics))"), Some("log-istics"));
    }

    #[test]
    fn malformed_types() {
        let err = domain("(define (domain d) (:types car - ))").unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.span().unwrap().str(), "-");
    }

    #[test]
    fn unbalanced_section() {
        let err = domain("(define (domain d) (:predicates (p ?x)").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn parameters_alignment() {
        let params = read_parameters(syms("?x ?y - location ?z - car")).unwrap();
        assert_eq!(params.values, strings(&["?x", "?y", "?z"]));
        assert_eq!(params.types, strings(&["location", "location", "car"]));
        assert_eq!(params.to_string(), "?x: location, ?y: location, ?z: car");
    }

    #[test]
    fn untyped_parameters() {
        let params = read_parameters(syms("?a - t ?b ?c")).unwrap();
        assert_eq!(params.values, strings(&["?a", "?b", "?c"]));
        assert_eq!(params.types, strings(&["t"]));
        assert_eq!(params.type_of(1), None);
        assert_eq!(params.iter().collect_vec(), vec![("?a", Some("t")), ("?b", None), ("?c", None)]);

        let params = read_parameters(syms("?x ?y")).unwrap();
        assert_eq!(params.len(), 2);
        assert!(params.types.is_empty());
        assert!(read_parameters(vec![]).unwrap().is_empty());
    }

    #[test]
    fn hyphenated_parameter_names() {
        let params = read_parameters(syms("?from-loc ?to-loc - place")).unwrap();
        assert_eq!(params.values, strings(&["?from-loc", "?to-loc"]));
        assert_eq!(params.types, strings(&["place", "place"]));
    }

    #[test]
    fn type_without_separator() {
        let params = read_parameters(syms("?x location ?y ?z car")).unwrap();
        assert_eq!(params.types, strings(&["location", "car", "car"]));
    }

    #[test]
    fn malformed_parameters() {
        assert!(read_parameters(syms("?x -")).unwrap_err().is_malformed());
        assert!(read_parameters(syms("?x - - t")).unwrap_err().is_malformed());
        assert!(read_parameters(syms("?x - ?y")).unwrap_err().is_malformed());
        assert!(read_parameters(syms("?x - t u")).unwrap_err().is_malformed());
        assert!(read_parameters(syms("t ?x")).unwrap_err().is_malformed());
    }

    #[test]
    fn action_names() {
        assert_eq!(action_name("(:action pick-up\n :parameters (?x))"), Some("pick-up"));
        assert_eq!(action_name("(:action move :parameters (?x) :effect (p))"), Some("move"));
        assert_eq!(action_name("(:action noop)"), Some("noop"));
        assert_eq!(action_name("(:action\n move)"), Some("move"));
        assert_eq!(action_name("(:action\n :parameters (?x))"), None);
        assert_eq!(action_name("(:action\n (p))"), None);
        assert_eq!(action_name("(:ACTION Move :parameters ())"), Some("Move"));
    }

    #[test]
    fn one_line_action() {
        let d = domain("(define (domain d) (:action noop :parameters () :precondition () :effect (and (done))))")
            .unwrap();
        let noop = &d.actions["noop"];
        assert!(noop.parameters.is_empty());
        assert!(noop.preconditions.is_empty());
        assert_eq!(noop.effects, strings(&["(done)"]));
    }

    #[test]
    fn single_effect_without_conjunction() {
        let d = domain("(define (domain d)\n(:action a\n:parameters (?x)\n:precondition (p ?x)\n:effect (not (p ?x))))")
            .unwrap();
        let a = &d.actions["a"];
        assert_eq!(a.preconditions, strings(&["(p ?x)"]));
        assert_eq!(a.effects, strings(&["(not (p ?x))"]));
    }

    #[test]
    fn action_without_effect() {
        let err = domain("(define (domain d) (:action a :parameters () :precondition (p)) (:predicates (q)))")
            .unwrap_err();
        assert!(matches!(err, ExtractError::MissingSection { section: ":effect", .. }));
    }

    #[test]
    fn name_on_next_line() {
        let d = domain("(define (domain d)\n(:action\n  move\n :parameters (?x)\n :precondition (p ?x)\n :effect (q ?x)))")
            .unwrap();
        let action = &d.actions["move"];
        assert_eq!(action.parameters.values, strings(&["?x"]));
        assert_eq!(action.preconditions, strings(&["(p ?x)"]));
        assert_eq!(action.effects, strings(&["(q ?x)"]));
    }

    #[test]
    fn precondition_without_value() {
        let err = domain("(define (domain d) (:action a :parameters (?x) :precondition :effect (q ?x)))").unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.span().unwrap().str(), ":precondition");
    }

    #[test]
    fn unnamed_action() {
        let err = domain("(define (domain d) (:action\n :parameters () :precondition (p) :effect (q)))").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn display() {
        let d = domain(BLOCKS).unwrap();
        let summary = d.to_string();
        assert!(summary.starts_with("# Domain : BLOCKS\n# Requirements \n  :strips :typing"));
        assert!(summary.contains("\n  pick-up(?x: block)\n  stack(?x: block, ?y: block)"));
    }
}
