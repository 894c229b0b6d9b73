use std::{
    ops::Range,
    sync::{Arc, LazyLock},
};

use regex::Regex;

use crate::{
    Res, Sym,
    brackets::{BracketError, Brackets},
    errors::{ExtractError, Span},
    input::Input,
    segments,
};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Form {
    /// `(:init ...)`: the keyword is the head of the delimited group.
    Block,
    /// `:effect (...)`: the keyword precedes the delimited group.
    Value,
}

/// A keyword-tagged section of an input, delimited by its parentheses.
pub(crate) struct Section<'i> {
    input: &'i Arc<Input>,
    form: Form,
    brackets: Brackets,
}

impl<'i> Section<'i> {
    /// Locates the first occurrence of `keyword` in the `within` range of the input, ignoring case.
    ///
    /// A keyword starting with a parenthesis (`(:types`) denotes a block whose content follows the
    /// keyword. Otherwise (`:effect`) the section is the parenthesized value following the keyword.
    pub fn find(input: &'i Arc<Input>, keyword: &str, within: Range<usize>) -> Res<Option<Section<'i>>> {
        let Some(at) = keyword_indices(&input.text[within.clone()], keyword)
            .next()
            .map(|i| within.start + i)
        else {
            return Ok(None);
        };
        let form = if keyword.starts_with('(') { Form::Block } else { Form::Value };
        let brackets = scan(input, at, within.end, keyword)?;
        if form == Form::Value {
            // the value must directly follow the keyword
            let (open, _) = brackets.outer();
            if !input.text[(at + keyword.len())..open].trim().is_empty() {
                return Err(ExtractError::malformed(
                    format!("expected a parenthesized expression after `{keyword}`"),
                    Span::new(input.clone(), at, at + keyword.len() - 1),
                ));
            }
        }
        Ok(Some(Section { input, form, brackets }))
    }

    /// Whitespace separated tokens inside the group, excluding the keyword of a block.
    pub fn tokens(&self) -> Vec<Sym> {
        let (open, close) = self.brackets.outer();
        let tokens = tokens(self.input, (open + 1)..close);
        match self.form {
            Form::Block => tokens.into_iter().skip(1).collect(),
            Form::Value => tokens,
        }
    }

    /// Top-level expressions of the section, a leading conjunction being unwrapped.
    pub fn expressions(&self) -> Vec<String> {
        let text = self.input.text.as_str();
        let expressions = match self.form {
            Form::Block => segments::expressions(text, self.brackets.inner()),
            Form::Value => segments::expressions(text, self.brackets.iter()),
        };
        expressions.into_iter().map(str::to_string).collect()
    }

    /// Parenthesized groups directly inside the section, verbatim.
    pub fn children(&self) -> Vec<String> {
        segments::top_level(self.brackets.inner())
            .into_iter()
            .map(|(open, close)| self.input.text[open..=close].to_string())
            .collect()
    }
}

/// Offsets of the occurrences of the ASCII `keyword` in `text`, ignoring case.
pub(crate) fn keyword_indices<'t>(text: &'t str, keyword: &'t str) -> impl Iterator<Item = usize> + 't {
    text.as_bytes()
        .windows(keyword.len())
        .enumerate()
        .filter(move |(_, window)| window.eq_ignore_ascii_case(keyword.as_bytes()))
        .map(|(i, _)| i)
}

/// Matches the first group of parentheses found after `start` and before `end`.
///
/// `context` designates the text at `start`, it is used to locate errors.
pub(crate) fn scan(input: &Arc<Input>, start: usize, end: usize, context: &str) -> Res<Brackets> {
    let text = &input.text[..end];
    Brackets::scan(text, start).map_err(|e| {
        let span = match e {
            BracketError::Unopened(i) | BracketError::Unclosed(i) => Span::new(input.clone(), i, i),
            BracketError::NoGroup => Span::new(input.clone(), start, start + context.len().max(1) - 1),
        };
        match e {
            BracketError::NoGroup => {
                ExtractError::malformed(format!("expected a parenthesized expression after `{context}`"), span)
            }
            _ => ExtractError::malformed(e, span),
        }
    })
}

/// Whitespace separated tokens of the `range` of the input.
pub(crate) fn tokens(input: &Arc<Input>, range: Range<usize>) -> Vec<Sym> {
    TOKEN
        .find_iter(&input.text[range.clone()])
        .map(|m| {
            let span = Span::new(input.clone(), range.start + m.start(), range.start + m.end() - 1);
            Sym::with_source(m.as_str(), span)
        })
        .collect()
}
