use std::path::Path;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

static BLANKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// A PDDL source, ready for extraction.
///
/// The text is normalized on construction (see [`normalize`]) and all spans produced while
/// extracting from it refer to the normalized text.
pub struct Input {
    pub(crate) text: String,
    pub(crate) source: Option<String>,
}

impl Input {
    pub fn from_string(input: impl ToString) -> Input {
        Input {
            text: normalize(&input.to_string()),
            source: None,
        }
    }

    pub fn from_file(file: &Path) -> std::result::Result<Input, std::io::Error> {
        let s = std::fs::read_to_string(file)?;
        Ok(Input {
            text: normalize(&s),
            source: Some(file.display().to_string()),
        })
    }

    /// The normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the file this input was read from, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::from_string(s)
    }
}

impl TryFrom<&Path> for Input {
    type Error = std::io::Error;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        Input::from_file(path)
    }
}

/// Removes `;` comments, collapses runs of spaces and tabs into a single space and drops blank lines.
///
/// Line structure is otherwise preserved: the name of an action is read from its header line.
pub fn normalize(text: &str) -> String {
    text.lines()
        .map(|line| line.split_once(';').map_or(line, |(code, _comment)| code))
        .map(|line| BLANKS.replace_all(line, " "))
        .filter(|line| !line.trim().is_empty())
        .join("\n")
}
