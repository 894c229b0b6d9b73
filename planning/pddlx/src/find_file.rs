//! Locates the domain file associated to a problem file, based on common naming conventions.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{Ctx, Message};

/// Naming conventions relating a problem file name to the file name of its domain.
///
/// Each rule is tried on the problem file name and, when it matches, gives a candidate domain file
/// name by substituting the captured groups in the template.
static CONVENTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // XXX.YY.pb.pddl -> XXX.dom.pddl
        (r"^(.+)\.[^\.]+\.pb\.pddl$", "$1.dom.pddl"),
        // XXX.pb.pddl -> XXX.dom.pddl
        (r"^(.+)\.pb\.pddl$", "$1.dom.pddl"),
        // XXX.pddl -> XXX-domain.pddl or domain-XXX.pddl
        (r"^(.+)\.pddl$", "$1-domain.pddl"),
        (r"^(.+)\.pddl$", "domain-$1.pddl"),
        // instance-NN.pddl -> domain-NN.pddl
        (r"^instance-([0-9]+)\.pddl$", "domain-$1.pddl"),
    ]
    .into_iter()
    .map(|(pattern, template)| (Regex::new(pattern).unwrap(), template))
    .collect()
});

/// Candidate file names for the domain of a problem named `problem_filename`, by order of preference.
fn candidate_names(problem_filename: &str) -> Vec<String> {
    let mut candidates = vec!["domain.pddl".to_string()];
    for (re, template) in CONVENTIONS.iter() {
        if let Some(captures) = re.captures(problem_filename) {
            let mut name = String::new();
            captures.expand(template, &mut name);
            if !candidates.contains(&name) {
                candidates.push(name);
            }
        }
    }
    candidates
}

/// Attempts to find the domain file of the given PDDL problem.
///
/// Candidate names are looked for in the directory of the problem, its parent directory and a
/// `domains` directory next to it.
pub fn find_domain_of(problem_file: &Path) -> Result<PathBuf, Message> {
    let problem_filename = problem_file
        .file_name()
        .title("Invalid file")?
        .to_str()
        .title("Could not convert file name to utf8")?;
    let candidates = candidate_names(problem_filename);

    let mut directories = Vec::with_capacity(3);
    if let Some(curr) = problem_file.parent() {
        directories.push(curr.to_owned());
        if let Some(parent) = curr.parent() {
            directories.push(parent.to_owned());
            directories.push(parent.join("domains"));
        }
    }

    for name in &candidates {
        for dir in &directories {
            let candidate = dir.join(name);
            if candidate.exists() {
                tracing::debug!("Domain of {} found at {}", problem_file.display(), candidate.display());
                return Ok(candidate);
            }
        }
    }
    Err(Message::error(format!(
        "Could not find a domain file in the same or parent directory as the problem file. Candidates: {candidates:?}"
    )))
}
