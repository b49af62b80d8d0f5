//! The immutable translation catalog and its lookup operations.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::parser::{ParseError, TsDocument, parse_document};
use crate::runtime::error::LoadWarning;
use crate::runtime::index::{Insert, MessageIndex, MessageRef};
use crate::runtime::options::LoadOptions;
use crate::runtime::plural::{CldrPluralRule, PluralRule, SingleForm};
use crate::types::{Context, Message, MessageId, TranslationStatus, TranslationText};

/// Parse a `.ts` document into a catalog with default options.
///
/// This is a pure function: on error nothing is returned, there is no
/// partially populated catalog. Callers that must keep running should fall
/// back to [`Catalog::empty`], which makes every lookup miss.
///
/// # Example
///
/// ```
/// let catalog = tscat::load(r#"<?xml version="1.0" encoding="utf-8"?>
/// <TS version="2.1" language="ko">
/// <context>
///     <name>AddressBookPage</name>
///     <message>
///         <source>&amp;New</source>
///         <translation type="unfinished">&amp;새 항목</translation>
///     </message>
/// </context>
/// </TS>"#.as_bytes()).unwrap();
///
/// assert_eq!(catalog.lookup("AddressBookPage", "&New", None), Some("&새 항목"));
/// assert_eq!(catalog.lookup("AddressBookPage", "&Delete", None), None);
/// ```
pub fn load(input: &[u8]) -> Result<Catalog, ParseError> {
    load_with(input, &LoadOptions::default())
}

/// Parse a `.ts` document into a catalog with explicit options.
pub fn load_with(input: &[u8], options: &LoadOptions) -> Result<Catalog, ParseError> {
    let document = parse_document(input)?;
    Ok(Catalog::from_document(document, options))
}

/// Replace `%n` (and Qt's localized `%Ln`) with the decimal rendering of
/// `count`. Other placeholders are left for the caller.
///
/// ```
/// assert_eq!(tscat::substitute_count("%n 초", 30), "30 초");
/// assert_eq!(tscat::substitute_count("%1: %Ln items", 2), "%1: 2 items");
/// ```
pub fn substitute_count(template: &str, count: i64) -> String {
    let rendered = count.to_string();
    template.replace("%Ln", &rendered).replace("%n", &rendered)
}

/// Message counts of a catalog, by review state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub contexts: usize,
    /// All messages, obsolete ones included.
    pub messages: usize,
    pub finished: usize,
    pub needs_review: usize,
    pub obsolete: usize,
    /// Live messages without any translation text.
    pub empty: usize,
}

impl CatalogStats {
    /// Messages that take part in lookups.
    pub fn live(&self) -> usize {
        self.finished + self.needs_review
    }

    /// Share of live messages that are final, from 0.0 to 1.0.
    pub fn completion(&self) -> f64 {
        if self.live() == 0 {
            return 1.0;
        }
        self.finished as f64 / self.live() as f64
    }
}

/// An immutable, indexed translation catalog.
///
/// A catalog is built once from a document and never mutated; it is `Send +
/// Sync` and can be shared freely between readers. Replacing the active
/// catalog is done by swapping in a new one (see
/// [`Translator`](crate::Translator)).
///
/// Lookups take strings as they appear in the UI, with XML entities
/// resolved: the document's `&amp;New` is looked up as `&New`. Returned text
/// is the stored template; `%1`-style placeholders and `&` mnemonics are the
/// caller's business.
pub struct Catalog {
    version: Option<String>,
    language: Option<String>,
    source_language: Option<String>,
    contexts: Vec<Context>,
    context_names: HashMap<String, usize>,
    index: MessageIndex,
    plural_rule: Arc<dyn PluralRule>,
    warnings: Vec<LoadWarning>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::empty()
    }
}

impl Debug for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Catalog")
            .field("version", &self.version)
            .field("language", &self.language)
            .field("contexts", &self.contexts.len())
            .field("indexed", &self.index.len())
            .field("warnings", &self.warnings.len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// A catalog with no messages. Every lookup returns `None`.
    pub fn empty() -> Self {
        Catalog {
            version: None,
            language: None,
            source_language: None,
            contexts: Vec::new(),
            context_names: HashMap::new(),
            index: MessageIndex::default(),
            plural_rule: Arc::new(SingleForm),
            warnings: Vec::new(),
        }
    }

    /// Index a parsed document.
    ///
    /// Contexts that share a name are merged into the first one. Duplicate
    /// message keys are resolved by [`LoadOptions::duplicate_policy`]. Both
    /// are recorded in [`Catalog::warnings`]. Obsolete messages are kept in
    /// the context but never indexed.
    pub fn from_document(document: TsDocument, options: &LoadOptions) -> Self {
        let TsDocument {
            version,
            language,
            source_language,
            contexts: document_contexts,
        } = document;
        let language = options.language.clone().or(language);
        let plural_rule: Arc<dyn PluralRule> = match (&options.plural_rule, &language) {
            (Some(rule), _) => Arc::clone(rule),
            (None, Some(language)) => Arc::new(CldrPluralRule::for_language(language)),
            (None, None) => Arc::new(SingleForm),
        };

        let mut warnings = Vec::new();
        let mut contexts: Vec<Context> = Vec::with_capacity(document_contexts.len());
        let mut context_names: HashMap<String, usize> =
            HashMap::with_capacity(document_contexts.len());
        for context in document_contexts {
            match context_names.entry(context.name.clone()) {
                Entry::Occupied(existing) => {
                    warn!(context = %context.name, "merging repeated context");
                    warnings.push(LoadWarning::DuplicateContext {
                        name: context.name.clone(),
                    });
                    contexts[*existing.get()].messages.extend(context.messages);
                }
                Entry::Vacant(slot) => {
                    slot.insert(contexts.len());
                    contexts.push(context);
                }
            }
        }

        let mut index = MessageIndex::default();
        for (context_index, context) in contexts.iter().enumerate() {
            for (message_index, message) in context.messages.iter().enumerate() {
                if !message.is_live() {
                    continue;
                }
                let comment = normalized_comment(message);
                let exact = MessageId::new(&context.name, &message.source, comment);
                let source_only = MessageId::new(&context.name, &message.source, None);
                let at = MessageRef {
                    context: context_index,
                    message: message_index,
                };
                let same_key = |existing: MessageRef| {
                    let owner = &contexts[existing.context];
                    let other = &owner.messages[existing.message];
                    owner.name == context.name
                        && other.source == message.source
                        && normalized_comment(other) == comment
                };
                let Insert::Duplicate { previous } =
                    index.insert(exact, source_only, at, options.duplicate_policy, same_key)
                else {
                    continue;
                };
                debug!(
                    context = %context.name,
                    line = message.line,
                    first_line = contexts[previous.context].messages[previous.message].line,
                    "duplicate message key"
                );
                warnings.push(LoadWarning::DuplicateMessage {
                    context: context.name.clone(),
                    source_text: message.source.clone(),
                    line: message.line,
                });
            }
        }

        debug!(
            contexts = contexts.len(),
            indexed = index.len(),
            language = language.as_deref().unwrap_or("<none>"),
            warnings = warnings.len(),
            "built translation catalog"
        );

        Catalog {
            version,
            language,
            source_language,
            contexts,
            context_names,
            index,
            plural_rule,
            warnings,
        }
    }

    /// Replace the plural rule, e.g. with a hand-written one for a language
    /// CLDR data does not cover.
    pub fn with_plural_rule(mut self, rule: Arc<dyn PluralRule>) -> Self {
        self.plural_rule = rule;
        self
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Translation of `source` in `context`.
    ///
    /// With a disambiguation, the message carrying that comment is preferred
    /// and the uncommented message is the fallback. Without one, the
    /// uncommented message is preferred and the first live message with that
    /// source is the fallback. An empty disambiguation counts as none.
    ///
    /// Returns `None` when nothing matches, when the match is obsolete, or
    /// when its text is empty. Translations still marked unfinished are
    /// returned. For numerus messages this is the first form.
    pub fn lookup(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<&str> {
        let message = self.message(context, source, disambiguation)?;
        let text = message.translation.text.first();
        (!text.is_empty()).then_some(text)
    }

    /// Plural-aware translation of `source` in `context` for `count`.
    ///
    /// The form is chosen by the catalog's plural rule (clamped to the last
    /// stored form) and `%n` is replaced with `count`. Never panics; returns
    /// `None` when nothing matches or the selected form is empty.
    pub fn lookup_plural(&self, context: &str, source: &str, count: i64) -> Option<String> {
        self.lookup_plural_with(context, source, None, count)
    }

    /// [`lookup_plural`](Catalog::lookup_plural) with a disambiguation.
    pub fn lookup_plural_with(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: i64,
    ) -> Option<String> {
        let message = self.message(context, source, disambiguation)?;
        let form = self.select_form(&message.translation.text, count)?;
        Some(substitute_count(form, count))
    }

    /// The live message a lookup would use, with all its metadata.
    pub fn message(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&Message> {
        let disambiguation = disambiguation.filter(|comment| !comment.is_empty());
        if let Some(comment) = disambiguation {
            let id = MessageId::new(context, source, Some(comment));
            let found = self
                .index
                .exact(id)
                .find_map(|at| self.verified(at, context, source, Some(comment)));
            if found.is_some() {
                return found;
            }
        }

        let plain = MessageId::new(context, source, None);
        let found = self
            .index
            .exact(plain)
            .find_map(|at| self.verified(at, context, source, None));
        if found.is_some() || disambiguation.is_some() {
            return found;
        }
        self.index
            .by_source(plain)
            .find_map(|at| self.verified_source(at, context, source))
    }

    fn select_form<'c>(&self, text: &'c TranslationText, count: i64) -> Option<&'c str> {
        let forms = text.forms();
        let last = forms.len().checked_sub(1)?;
        let index = match text {
            TranslationText::Single(_) => 0,
            TranslationText::Numerus(_) => self.plural_rule.form_index(count).min(last),
        };
        let form = forms.get(index)?.as_str();
        (!form.is_empty()).then_some(form)
    }

    fn verified_source(&self, at: MessageRef, context: &str, source: &str) -> Option<&Message> {
        let owner = self.contexts.get(at.context)?;
        let message = owner.messages.get(at.message)?;
        (owner.name == context && message.source == source).then_some(message)
    }

    fn verified(
        &self,
        at: MessageRef,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Option<&Message> {
        self.verified_source(at, context, source)
            .filter(|message| normalized_comment(message) == comment)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// `language` attribute of the document, or the override from
    /// [`LoadOptions`].
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Format version of the document (`2.1` for current Qt).
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn plural_rule(&self) -> &dyn PluralRule {
        self.plural_rule.as_ref()
    }

    /// Contexts in document order.
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.context_names
            .get(name)
            .and_then(|&index| self.contexts.get(index))
    }

    /// Every message with its context, in document order, obsolete included.
    pub fn messages(&self) -> impl Iterator<Item = (&Context, &Message)> {
        self.contexts
            .iter()
            .flat_map(|context| context.messages.iter().map(move |message| (context, message)))
    }

    /// Warnings collected while the catalog was built.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// True when no message can be found by a lookup.
    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    /// Message counts by review state.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            contexts: self.contexts.len(),
            ..CatalogStats::default()
        };
        for (_, message) in self.messages() {
            stats.messages += 1;
            match message.translation.status {
                TranslationStatus::Final => stats.finished += 1,
                TranslationStatus::NeedsReview => stats.needs_review += 1,
                TranslationStatus::Obsolete => {
                    stats.obsolete += 1;
                    continue;
                }
            }
            if message.translation.text.is_empty() {
                stats.empty += 1;
            }
        }
        stats
    }
}

/// The disambiguation comment as a key part: absent and empty are the same.
fn normalized_comment(message: &Message) -> Option<&str> {
    message.comment.as_deref().filter(|comment| !comment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Translation;

    fn catalog_with(messages: Vec<Message>) -> Catalog {
        let mut context = Context::new("Ctx");
        context.messages = messages;
        let document = TsDocument {
            contexts: vec![context],
            ..TsDocument::default()
        };
        Catalog::from_document(document, &LoadOptions::default())
    }

    #[test]
    fn empty_catalog_misses_everything() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.lookup("Ctx", "Src", None), None);
        assert_eq!(catalog.lookup_plural("Ctx", "%n", 3), None);
    }

    #[test]
    fn comment_filter_treats_empty_as_none() {
        let message = Message::builder()
            .source("Open".to_string())
            .comment(String::new())
            .translation(Translation::final_text("열기"))
            .build();
        let catalog = catalog_with(vec![message]);
        assert_eq!(catalog.lookup("Ctx", "Open", None), Some("열기"));
        assert_eq!(catalog.lookup("Ctx", "Open", Some("")), Some("열기"));
    }

    #[test]
    fn single_text_used_for_plural_lookup() {
        let message = Message::builder()
            .source("%n file(s)".to_string())
            .translation(Translation::final_text("파일 %n개"))
            .build();
        let catalog = catalog_with(vec![message]);
        assert_eq!(
            catalog.lookup_plural("Ctx", "%n file(s)", 4).as_deref(),
            Some("파일 4개")
        );
    }

    #[test]
    fn stats_count_states() {
        let messages = vec![
            Message::builder()
                .source("a".to_string())
                .translation(Translation::final_text("A"))
                .build(),
            Message::builder()
                .source("b".to_string())
                .translation(Translation {
                    status: TranslationStatus::NeedsReview,
                    text: TranslationText::Single(String::new()),
                })
                .build(),
            Message::builder()
                .source("c".to_string())
                .translation(Translation {
                    status: TranslationStatus::Obsolete,
                    text: TranslationText::Single(String::new()),
                })
                .build(),
        ];
        let stats = catalog_with(messages).stats();
        assert_eq!(
            stats,
            CatalogStats {
                contexts: 1,
                messages: 3,
                finished: 1,
                needs_review: 1,
                obsolete: 1,
                empty: 1,
            }
        );
        assert_eq!(stats.live(), 2);
        assert!((stats.completion() - 0.5).abs() < f64::EPSILON);
    }
}
