//! Class rename engine
//!
//! Replaces whole class tokens inside every string value of a structured
//! document. No schema is assumed: any string value, at any depth, is treated
//! as a whitespace-separated class list. Object keys are never touched.
//!
//! The document is checked for well-formedness and then rewritten in place.
//! Only string literals that contain a renamed token are re-encoded and
//! spliced back; layout, escapes, number literals and repeated keys everywhere
//! else come through byte-for-byte.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::content_detection::is_json;
use crate::interface::{RenameOutcome, RenameRule};

/// A class token: a maximal run of non-whitespace
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Rename lookup. The first rule for a given `from` wins; rules that can
/// never match a token (empty or containing whitespace) or that map a token
/// onto itself are ignored.
struct RuleTable<'a> {
    renames: HashMap<&'a str, &'a str>,
}

impl<'a> RuleTable<'a> {
    fn new(rules: &'a [RenameRule]) -> Self {
        let mut renames = HashMap::new();
        for rule in rules {
            let from = rule.from.as_str();
            if from.is_empty() || from.chars().any(char::is_whitespace) || from == rule.to {
                continue;
            }
            renames.entry(from).or_insert(rule.to.as_str());
        }
        Self { renames }
    }

    fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }
}

/// Apply `rules` to every class token in `content`.
///
/// Never fails. Content that does not parse comes back unchanged with
/// `renameable = false`. An empty rule set, or one that matches nothing,
/// returns the input as-is.
pub fn rename(content: &str, rules: &[RenameRule]) -> RenameOutcome {
    if !is_json(content) {
        debug!("content is not a document tree, skipping rename");
        return unchanged(content, false);
    }

    let table = RuleTable::new(rules);
    if table.is_empty() {
        return unchanged(content, true);
    }

    let mut renamed = String::with_capacity(content.len());
    let mut last = 0;
    let mut replacements = 0;

    for span in value_literals(content) {
        let Some(value) = decode_literal(&content[span.clone()]) else {
            continue;
        };
        let Some((value, count)) = rename_tokens(&value, &table) else {
            continue;
        };
        let Ok(literal) = serde_json::to_string(&value) else {
            continue;
        };
        renamed.push_str(&content[last..span.start]);
        renamed.push_str(&literal);
        last = span.end;
        replacements += count;
    }

    if replacements == 0 {
        return unchanged(content, true);
    }
    renamed.push_str(&content[last..]);

    debug!(replacements, "renamed class tokens");
    RenameOutcome {
        content: renamed,
        renameable: true,
        replacements,
    }
}

/// `rename` without the outcome details
pub fn rename_content(content: &str, rules: &[RenameRule]) -> String {
    rename(content, rules).content
}

/// Distinct class tokens in document order. Empty when the content does not
/// parse.
pub fn class_tokens(content: &str) -> Vec<String> {
    if !is_json(content) {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for value in value_literals(content)
        .into_iter()
        .filter_map(|span| decode_literal(&content[span]))
    {
        for token in TOKEN_REGEX.find_iter(&value) {
            if seen.insert(token.as_str().to_string()) {
                tokens.push(token.as_str().to_string());
            }
        }
    }
    tokens
}

fn unchanged(content: &str, renameable: bool) -> RenameOutcome {
    RenameOutcome {
        content: content.to_string(),
        renameable,
        replacements: 0,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LITERAL SCANNING
// ─────────────────────────────────────────────────────────────────────────────

/// Byte ranges of the string literals in value position, quotes included, in
/// document order. Object keys are skipped. `content` must be well-formed.
fn value_literals(content: &str) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let mut literals = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        while i < bytes.len() && bytes[i] != b'"' {
            i += if bytes[i] == b'\\' { 2 } else { 1 };
        }
        i = (i + 1).min(bytes.len());

        // A key is the only literal followed by ':'
        let is_key = bytes[i..]
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b':');
        if !is_key {
            literals.push(start..i);
        }
    }
    literals
}

/// Unescaped value of one string literal
fn decode_literal(literal: &str) -> Option<String> {
    serde_json::from_str::<String>(literal).ok()
}

/// Replace matching tokens in one string, keeping every separator as-is.
/// None when no token matched.
fn rename_tokens(value: &str, table: &RuleTable<'_>) -> Option<(String, usize)> {
    let mut renamed = String::with_capacity(value.len());
    let mut last = 0;
    let mut count = 0;

    for token in TOKEN_REGEX.find_iter(value) {
        if let Some(to) = table.renames.get(token.as_str()) {
            renamed.push_str(&value[last..token.start()]);
            renamed.push_str(to);
            last = token.end();
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    renamed.push_str(&value[last..]);
    Some((renamed, count))
}
