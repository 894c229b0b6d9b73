use std::fmt::{Display, Formatter};
use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::Res;
use crate::domain::{Domain, read_domain};
use crate::input::Input;
use crate::problem::read_problem;

/// Extracted domains, indexed by name, each holding its problems.
///
/// Serialized as a JSON object whose keys are the domain names.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ParseResult {
    domains: IndexMap<String, Domain>,
}

impl ParseResult {
    pub fn get(&self, domain: &str) -> Option<&Domain> {
        self.domains.get(domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Domain)> + '_ {
        self.domains.iter().map(|(name, domain)| (name.as_str(), domain))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Domain> {
        self.domains
    }
}

impl Index<&str> for ParseResult {
    type Output = Domain;

    fn index(&self, domain: &str) -> &Domain {
        &self.domains[domain]
    }
}

impl Display for ParseResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let blocks = self
            .domains
            .values()
            .flat_map(|d| std::iter::once(d.to_string()).chain(d.problems.values().map(|p| p.to_string())));
        write!(f, "{}", blocks.format("\n\n"))
    }
}

/// Extracts a domain and one of its problems.
///
/// The problem is filed under the name of the domain as read from the domain input, regardless of
/// the domain the problem declares.
pub fn parse_pddl(domain: Input, problem: Input) -> Res<ParseResult> {
    parse_pddl_all(domain, [problem])
}

/// Extracts a domain and any number of its problems.
///
/// Problems are indexed by name: a problem with the same name as a previous one replaces it.
pub fn parse_pddl_all(domain: Input, problems: impl IntoIterator<Item = Input>) -> Res<ParseResult> {
    let _span = tracing::span!(tracing::Level::DEBUG, "PARSE", source = domain.source().unwrap_or("<string>")).entered();

    let mut model = read_domain(&Arc::new(domain))?;
    tracing::debug!(
        requirements = model.requirements.len(),
        types = model.types.len(),
        constants = model.constants.len(),
        predicates = model.predicates.len(),
        actions = model.actions.len(),
        "Extracted domain `{}`",
        model.name
    );

    for problem in problems {
        let problem = read_problem(&Arc::new(problem))?;
        tracing::debug!(
            objects = problem.objects.len(),
            init = problem.init.len(),
            goal = problem.goal.len(),
            "Extracted problem `{}` (domain: `{}`)",
            problem.name,
            problem.domain_link
        );
        if problem.domain_link != model.name {
            tracing::debug!("Problem `{}` declares another domain: `{}`", problem.name, problem.domain_link);
        }
        model.problems.insert(problem.name.clone(), problem);
    }

    let mut domains = IndexMap::new();
    domains.insert(model.name.clone(), model);
    Ok(ParseResult { domains })
}

/// Extracts a domain and a problem given as strings.
pub fn parse_str(domain: &str, problem: &str) -> Res<ParseResult> {
    parse_pddl(Input::from(domain), Input::from(problem))
}
