use pddlx::{ExtractError, Input, TypedList, parse_pddl, parse_str};

const DOMAIN: &str = "
(define (domain handling)
  (:requirements :strips :typing)
  (:types car truck - vehicle)
  (:predicates (holding ?x) (clear ?x))
  (:action pick-up
    :parameters (?x ?y - location ?z - car)
    :precondition (and (clear ?x))
    :effect (and (holding ?x))))";

const PROBLEM: &str = "
(define (problem move-one)
  (:domain handling)
  (:objects a b)
  (:init (clear a))
  (:goal (and (holding a))))";

fn strings(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
}

#[test]
fn end_to_end() {
    let result = parse_str(DOMAIN, PROBLEM).unwrap();
    assert_eq!(result.len(), 1);
    let domain = &result["handling"];

    assert_eq!(domain.actions.len(), 1);
    let pick_up = &domain.actions["pick-up"];
    assert_eq!(pick_up.preconditions.len(), 1);
    assert_eq!(pick_up.effects.len(), 1);

    assert_eq!(domain.problems.len(), 1);
    let problem = &domain.problems["move-one"];
    assert_eq!(problem.objects.len(), 2);
    assert_eq!(problem.goal.len(), 1);
}

#[test]
fn parameters_are_aligned_with_types() {
    let result = parse_str(DOMAIN, PROBLEM).unwrap();
    let params = &result["handling"].actions["pick-up"].parameters;
    assert_eq!(params.values, strings(&["?x", "?y", "?z"]));
    assert_eq!(params.types, strings(&["location", "location", "car"]));
}

#[test]
fn types_and_constants() {
    let result = parse_str(DOMAIN, PROBLEM).unwrap();
    let domain = &result["handling"];
    let TypedList::Grouped(types) = &domain.types else {
        panic!("types should be grouped: {:?}", domain.types)
    };
    assert_eq!(types.len(), 1);
    assert_eq!(types["vehicle"], strings(&["car", "truck"]));
    assert_eq!(domain.constants, TypedList::Flat(vec![]));
}

#[test]
fn missing_type_name() {
    let domain = "(define (domain d) (:types car - ))";
    let err = parse_str(domain, PROBLEM).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedStructure { .. }), "{err:?}");
}

#[test]
fn unbalanced_action() {
    let domain = "(define (domain d)\n(:action a :parameters (?x) :precondition (p ?x) :effect (and (q ?x))";
    let err = parse_str(domain, PROBLEM).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn error_message_shows_the_input() {
    let domain = Input::from("(define (domain d)\n  (:types car - ))");
    let err = parse_pddl(domain, Input::from(PROBLEM)).unwrap_err();
    let message = err.to_message().to_string();
    assert!(message.contains("malformed structure"), "{message}");
    assert!(message.contains("(:types car"), "{message}");
}

#[test]
fn nested_expressions_are_not_repeated() {
    let result = parse_str(DOMAIN, "(define (problem p) (:domain handling) (:goal (and (not (holding a)) (clear b))))").unwrap();
    let goal = &result["handling"].problems["p"].goal;
    assert_eq!(goal, &strings(&["(not (holding a))", "(clear b)"]));
}
