//! Filter-pattern matching engine.
//!
//! A pattern is a comma-separated list of clauses, matched against an
//! ordered sequence of tabs. A tab is selected when any clause matches
//! (logical OR), optionally inverted for "close everything except" flows.
//!
//! Clause shapes, in the order they are recognized:
//!
//! - `1:3`, `1:`, `:3`, `:` — 1-based inclusive index range
//! - `5` — 1-based exact index
//! - `\123` — literal digits, matched as a label substring (for filenames
//!   that are purely numeric and would otherwise be read as an index)
//! - `?folder`, `?folder*` — containing-folder filter, `*` includes
//!   subfolders; relative folders resolve against the workspace root
//! - anything else — wildcard on the label (`*` any run, `_` one char)
//!
//! Malformed or unresolvable clauses are never an error; they simply match
//! nothing.

use std::path::Path;

use regex::Regex;

use crate::filter::wildcard::wildcard_regex;
use crate::filter::TabLike;
use crate::tab::TabUri;
use crate::workspace::resolve_filter_path;

/// One parsed clause of a filter pattern.
#[derive(Debug)]
enum Clause {
    /// 1-based inclusive range; `end` of `None` means the sequence length.
    Range { start: usize, end: Option<usize> },
    /// 1-based exact index.
    Index(usize),
    /// Digits from a `\123` clause, matched as a label substring.
    NumericLiteral(String),
    /// Resolved folder filter from a `?folder` clause.
    Folder { path: String, recursive: bool },
    /// Anchored case-insensitive label regex.
    Wildcard(Regex),
    /// A clause that cannot match anything (unresolvable folder, numeric
    /// overflow). Kept so clause positions stay inert rather than erroring.
    Never,
}

impl Clause {
    fn parse(text: &str, workspace_root: Option<&Path>) -> Self {
        // Range: digits, ':', digits, either side optional.
        if let Some((start, end)) = text.split_once(':') {
            if is_digits(start) && is_digits(end) {
                let parse = |s: &str| s.parse::<usize>().ok();
                return match (start.is_empty(), end.is_empty()) {
                    (true, true) => Clause::Range { start: 1, end: None },
                    (false, true) => match parse(start) {
                        Some(start) => Clause::Range { start, end: None },
                        None => Clause::Never,
                    },
                    (true, false) => match parse(end) {
                        Some(end) => Clause::Range {
                            start: 1,
                            end: Some(end),
                        },
                        None => Clause::Never,
                    },
                    (false, false) => match (parse(start), parse(end)) {
                        (Some(start), Some(end)) => Clause::Range {
                            start,
                            end: Some(end),
                        },
                        _ => Clause::Never,
                    },
                };
            }
        }

        // Exact 1-based index.
        if !text.is_empty() && is_digits(text) {
            return match text.parse::<usize>() {
                Ok(value) => Clause::Index(value),
                Err(_) => Clause::Never,
            };
        }

        // Escaped numeric literal: backslash then digits.
        if let Some(digits) = text.strip_prefix('\\') {
            if !digits.is_empty() && is_digits(digits) {
                return Clause::NumericLiteral(digits.to_string());
            }
        }

        // Folder filter.
        if let Some(rest) = text.strip_prefix('?') {
            let recursive = rest.ends_with('*');
            let cleaned = if recursive {
                &rest[..rest.len() - 1]
            } else {
                rest
            };
            return match resolve_filter_path(cleaned, workspace_root) {
                Some(path) => Clause::Folder { path, recursive },
                None => Clause::Never,
            };
        }

        // Everything else is a label wildcard.
        match wildcard_regex(text) {
            Some(regex) => Clause::Wildcard(regex),
            None => Clause::Never,
        }
    }

    fn matches<T: TabLike>(&self, index: usize, tab: &T, total: usize) -> bool {
        match self {
            Clause::Range { start, end } => {
                let end = end.unwrap_or(total);
                index + 1 >= *start && index + 1 <= end
            }
            Clause::Index(value) => index + 1 == *value,
            Clause::NumericLiteral(digits) => tab.label().contains(digits.as_str()),
            Clause::Folder { path, recursive } => {
                let hit = |uri: &TabUri| {
                    let folder = uri.folder();
                    folder == path.as_str() || (*recursive && folder.starts_with(path.as_str()))
                };
                if let Some(uri) = tab.uri() {
                    hit(uri)
                } else if let Some((original, modified)) = tab.diff_uris() {
                    hit(original) || hit(modified)
                } else {
                    false
                }
            }
            Clause::Wildcard(regex) => regex.is_match(tab.label()),
            Clause::Never => false,
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Select the subsequence of `tabs` matching `pattern`.
///
/// A tab is selected when any clause matches it, or, with `invert`, when no
/// clause does. Relative order is preserved and index clauses are evaluated
/// against the full input sequence, never against an already-filtered
/// subset. This function is total: malformed clauses contribute no matches.
pub fn filter_tabs<'a, T: TabLike>(
    tabs: &'a [T],
    pattern: &str,
    invert: bool,
    workspace_root: Option<&Path>,
) -> Vec<&'a T> {
    let clauses: Vec<Clause> = pattern
        .split(',')
        .map(str::trim)
        .map(|clause| Clause::parse(clause, workspace_root))
        .collect();

    let total = tabs.len();
    tabs.iter()
        .enumerate()
        .filter(|(i, tab)| {
            let matched = clauses.iter().any(|clause| clause.matches(*i, *tab, total));
            matched != invert
        })
        .map(|(_, tab)| tab)
        .collect()
}
