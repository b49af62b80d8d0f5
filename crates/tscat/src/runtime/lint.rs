//! Consistency checks over a loaded catalog.
//!
//! These are the checks a translator wants before shipping a file: numerus
//! messages with the wrong number of forms, translations that drop or invent
//! `%1`-style arguments, and live messages nobody translated yet.

use std::collections::BTreeSet;

use strsim::levenshtein;

use crate::runtime::catalog::Catalog;
use crate::runtime::error::LoadWarning;
use crate::types::{Context, Message, TranslationText};

/// Run every check over the live messages of `catalog`, in document order.
///
/// Warnings collected while the catalog was built (duplicates) are not
/// repeated here; see [`Catalog::warnings`].
pub fn lint_catalog(catalog: &Catalog) -> Vec<LoadWarning> {
    let expected_forms = catalog.plural_rule().form_count();
    let mut warnings = Vec::new();
    for (context, message) in catalog.messages() {
        if !message.is_live() {
            continue;
        }
        if message.translation.text.is_empty() {
            warnings.push(LoadWarning::EmptyTranslation {
                context: context.name.clone(),
                source_text: message.source.clone(),
            });
            continue;
        }
        lint_numerus_forms(context, message, expected_forms, &mut warnings);
        lint_placeholders(context, message, &mut warnings);
    }
    warnings
}

fn lint_numerus_forms(
    context: &Context,
    message: &Message,
    expected: Option<usize>,
    warnings: &mut Vec<LoadWarning>,
) {
    let (Some(expected), TranslationText::Numerus(forms)) = (expected, &message.translation.text)
    else {
        return;
    };
    if forms.len() != expected {
        warnings.push(LoadWarning::NumerusFormCount {
            context: context.name.clone(),
            source_text: message.source.clone(),
            expected,
            found: forms.len(),
        });
    }
}

/// Every non-empty form must use exactly the numbered arguments of the source.
fn lint_placeholders(context: &Context, message: &Message, warnings: &mut Vec<LoadWarning>) {
    let expected = placeholders(&message.source);
    let mut found = BTreeSet::new();
    for form in message.translation.text.forms() {
        if !form.is_empty() {
            found.extend(placeholders(form));
        }
    }
    if expected == found {
        return;
    }
    warnings.push(LoadWarning::PlaceholderMismatch {
        context: context.name.clone(),
        source_text: message.source.clone(),
        missing: expected.difference(&found).map(|n| format!("%{n}")).collect(),
        unexpected: found.difference(&expected).map(|n| format!("%{n}")).collect(),
    });
}

/// Numbered arguments (`%1` to `%99`, also `%L1`) used in `text`.
///
/// `%n` is the count of a numerus message and is not an argument.
fn placeholders(text: &str) -> BTreeSet<u8> {
    let bytes = text.as_bytes();
    let mut numbers = BTreeSet::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        if bytes.get(j) == Some(&b'L') {
            j += 1;
        }
        let digits = bytes[j..]
            .iter()
            .take(2)
            .take_while(|b| b.is_ascii_digit())
            .fold(0u8, |acc, b| acc * 10 + (b - b'0'));
        if digits > 0 {
            numbers.insert(digits);
        }
        i = j;
    }
    numbers
}

/// Live source texts in `context` that look like a misspelling of `source`,
/// closest first, at most three.
///
/// Used to explain a lookup miss: a source with a trailing period or a
/// different mnemonic is a common cause.
pub fn suggest_sources(catalog: &Catalog, context: &str, source: &str) -> Vec<String> {
    let Some(context) = catalog.context(context) else {
        return Vec::new();
    };
    let length = source.chars().count();
    let max_distance = if length <= 3 { 1 } else { length.div_ceil(8).max(2) };
    let mut suggestions: Vec<(usize, &str)> = context
        .live_messages()
        .filter_map(|message| {
            let distance = levenshtein(source, &message.source);
            (distance > 0 && distance <= max_distance).then_some((distance, message.source.as_str()))
        })
        .collect();
    suggestions.sort_unstable();
    suggestions.dedup();
    suggestions
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
