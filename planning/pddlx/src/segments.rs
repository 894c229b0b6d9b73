//! Enumeration of the top-level expressions of a section, e.g. the facts of `(:init ...)` or the
//! conditions of `:precondition (and ...)`.

use itertools::Itertools;

/// Reserved head of a conjunction wrapper.
pub const CONJUNCTION: &str = "and";

/// Keeps the spans that are not nested in a previously kept one, in order of opening offset.
///
/// Spans are `(open, close)` pairs of inclusive offsets.
pub fn top_level(spans: impl IntoIterator<Item = (usize, usize)>) -> Vec<(usize, usize)> {
    let mut spans = spans.into_iter().collect_vec();
    spans.sort_unstable();
    let mut consumed: Option<usize> = None;
    spans
        .into_iter()
        .filter(|&(open, close)| {
            if consumed.is_some_and(|end| open <= end) {
                false
            } else {
                consumed = Some(close);
                true
            }
        })
        .collect()
}

/// Head symbol of a parenthesized expression, e.g. `and` for `(and (p) (q))`.
pub fn head(expr: &str) -> Option<&str> {
    let inner = expr.strip_prefix('(')?.trim_start();
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .unwrap_or(inner.len());
    (end > 0).then(|| &inner[..end])
}

/// True for `(and ...)` and for the empty expression `()`, which carry no meaning by themselves.
fn is_wrapper(expr: &str) -> bool {
    match head(expr) {
        Some(head) => head.eq_ignore_ascii_case(CONJUNCTION),
        None => expr.strip_prefix('(').is_some_and(|inner| inner.trim_start().starts_with(')')),
    }
}

/// Top-level expressions of `text` among the `candidates` spans, in document order.
///
/// If the first candidate is a conjunction, it is not returned itself: its direct children are
/// (without unwrapping them any further) as well as any expression following it.
pub fn expressions<'t>(text: &'t str, candidates: impl IntoIterator<Item = (usize, usize)>) -> Vec<&'t str> {
    let mut spans = candidates.into_iter().collect_vec();
    spans.sort_unstable();
    if spans.first().is_some_and(|&(open, close)| is_wrapper(&text[open..=close])) {
        spans.remove(0);
    }
    top_level(spans)
        .into_iter()
        .map(|(open, close)| &text[open..=close])
        .collect()
}
