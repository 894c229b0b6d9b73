use std::{
    fmt::{Debug, Display},
    ops::Range,
    sync::Arc,
};

use crate::input::Input;
use annotate_snippets::*;
use thiserror::Error;

pub type SrcRange = Range<usize>;

/// A substring of an input, with metadata for displaying (filename, indices, ...)
#[derive(Clone)]
pub struct Span {
    input: Arc<Input>,
    span: SrcRange,
}

impl Span {
    /// Span covering the bytes `first..=last` of `input`.
    pub fn new(input: Arc<Input>, first: usize, last: usize) -> Self {
        Span {
            input,
            span: first..(last + 1),
        }
    }

    pub fn range(&self) -> SrcRange {
        self.span.clone()
    }

    pub fn str(&self) -> &str {
        &self.input.text.as_str()[self.span.clone()]
    }

    pub fn annotate(&self, lvl: Level<'static>, message: impl ToString) -> Annot {
        Annot {
            level: lvl,
            span: self.clone(),
            message: message.to_string(),
        }
    }

    pub fn error(&self, message: impl ToString) -> Annot {
        self.annotate(Level::ERROR, message)
    }

    pub fn invalid(&self, msg: impl ToString) -> Message {
        let msg = msg.to_string();
        if self.span.len() < 40 {
            Message::error(format!("{msg}: {}", self.str())).snippet(self.error(msg))
        } else {
            Message::error(&msg).snippet(self.error(msg))
        }
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[span {}..{}]", self.span.start, self.span.end)
    }
}

pub struct Annot {
    level: Level<'static>,
    span: Span,
    message: String,
}

impl Annot {
    fn build(&self) -> Snippet<'_, Annotation<'_>> {
        let annotation_kind = match self.level {
            Level::ERROR => AnnotationKind::Primary,
            _ => AnnotationKind::Context,
        };
        let annotation = annotation_kind.span(self.span.span.clone()).label(&self.message);
        let snippet = Snippet::source(&self.span.input.text)
            .line_start(1)
            .fold(true)
            .annotation(annotation);
        if let Some(file) = self.span.input.source.as_ref() {
            snippet.path(file.as_str())
        } else {
            snippet
        }
    }
}

/// A diagnostic ready to be displayed to a user, with annotated excerpts of the inputs.
pub struct Message {
    level: Level<'static>,
    title: String,
    snippets: Vec<Annot>,
}

impl Message {
    #[cold]
    pub fn new(level: Level<'static>, title: impl ToString) -> Self {
        Self {
            level,
            title: title.to_string(),
            snippets: Vec::new(),
        }
    }

    #[cold]
    pub fn error(title: impl ToString) -> Self {
        Self::new(Level::ERROR, title)
    }

    #[cold]
    pub fn snippet(mut self, snippet: Annot) -> Self {
        self.snippets.push(snippet);
        self
    }

    #[cold]
    pub fn title(mut self, s: impl ToString) -> Message {
        self.title = s.to_string();
        self
    }
}

pub trait Ctx<T> {
    fn title(self, error_context: impl Display) -> std::result::Result<T, Message>;
}
impl<T> Ctx<T> for std::result::Result<T, Message> {
    fn title(self, error_context: impl Display) -> Result<T, Message> {
        self.map_err(|e| e.title(error_context))
    }
}
impl<T> Ctx<T> for Option<T> {
    fn title(self, msg: impl Display) -> Result<T, Message> {
        self.ok_or_else(|| Message::error(msg))
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let renderer = Renderer::styled();
        let disp = self
            .level
            .clone()
            .primary_title(&self.title)
            .elements(self.snippets.iter().map(|s| s.build()));
        let disp = renderer.render(&[disp]);
        f.write_str(&disp)
    }
}
impl Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl From<std::io::Error> for Message {
    #[cold]
    fn from(error: std::io::Error) -> Self {
        Message::error(error)
    }
}

impl From<serde_json::Error> for Message {
    #[cold]
    fn from(error: serde_json::Error) -> Self {
        Message::error(format!("Could not serialize the result: {error}"))
    }
}

impl From<ExtractError> for Message {
    #[cold]
    fn from(error: ExtractError) -> Self {
        error.to_message()
    }
}

/// Failure to extract a model from a PDDL input.
///
/// An absent *optional* section is not an error: it yields an empty value. Likewise, a missing
/// domain or problem name is replaced by a placeholder and never reported here.
#[derive(Error, Debug, Clone)]
pub enum ExtractError {
    /// A section that must be present is absent, e.g. the `:effect` of an action.
    #[error("missing `{section}` section")]
    MissingSection { section: &'static str, span: Option<Span> },
    /// Unbalanced parentheses, a separator with no type name after it, an orphaned parameter token...
    #[error("{reason}")]
    MalformedStructure { reason: String, span: Option<Span> },
}

impl ExtractError {
    pub(crate) fn missing(section: &'static str, span: impl Into<Option<Span>>) -> Self {
        ExtractError::MissingSection {
            section,
            span: span.into(),
        }
    }

    pub(crate) fn malformed(reason: impl ToString, span: impl Into<Option<Span>>) -> Self {
        ExtractError::MalformedStructure {
            reason: reason.to_string(),
            span: span.into(),
        }
    }

    /// Location of the problem in the (normalized) input, when known.
    pub fn span(&self) -> Option<&Span> {
        match self {
            ExtractError::MissingSection { span, .. } | ExtractError::MalformedStructure { span, .. } => span.as_ref(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ExtractError::MalformedStructure { .. })
    }

    pub fn is_missing_section(&self) -> bool {
        matches!(self, ExtractError::MissingSection { .. })
    }

    /// Builds a displayable message, with the offending part of the input annotated when known.
    pub fn to_message(&self) -> Message {
        let title = match self {
            ExtractError::MissingSection { .. } => "Invalid PDDL: missing section",
            ExtractError::MalformedStructure { .. } => "Invalid PDDL: malformed structure",
        };
        match self.span() {
            Some(span) => span.invalid(self).title(format!("{title}: {self}")),
            None => Message::error(format!("{title}: {self}")),
        }
    }
}
