//! Plural form selection for numerus messages.
//!
//! A numerus message stores one string per plural form of the target
//! language. Which form a count selects is language specific: Korean has a
//! single form, English two (`one`, `other`), Russian three for integers
//! (`one`, `few`, `many`) and Arabic six. Selection is delegated to a
//! [`PluralRule`] so callers can plug in their own.
//!
//! [`CldrPluralRule`] derives the form order from CLDR data. ICU plural rule
//! objects are cached per thread per language and built lazily on first use
//! within each thread.

use std::cell::RefCell;

use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

/// Maps a count to the index of the numerus form to display.
///
/// Implemented for closures, so an ad hoc rule is a one-liner:
///
/// ```
/// use tscat::PluralRule;
///
/// let english = |n: i64| usize::from(n != 1);
/// assert_eq!(english.form_index(1), 0);
/// assert_eq!(english.form_index(3), 1);
/// ```
pub trait PluralRule: Send + Sync {
    /// Index of the numerus form for `count`.
    ///
    /// Indices past the last stored form are clamped by the catalog.
    fn form_index(&self, count: i64) -> usize;

    /// Number of forms the language defines, when known.
    fn form_count(&self) -> Option<usize> {
        None
    }
}

impl<F> PluralRule for F
where
    F: Fn(i64) -> usize + Send + Sync,
{
    fn form_index(&self, count: i64) -> usize {
        self(count)
    }
}

/// Rule for languages with a single plural form (Korean, Japanese, Chinese,
/// Vietnamese...). Every count selects form 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleForm;

impl PluralRule for SingleForm {
    fn form_index(&self, _count: i64) -> usize {
        0
    }

    fn form_count(&self) -> Option<usize> {
        Some(1)
    }
}

/// CLDR cardinal plural rule for a language tag.
///
/// Forms are ordered by CLDR category (zero, one, two, few, many, other),
/// keeping only the categories small integer counts reach. Fraction-only
/// categories are left out, so Russian has three forms. Tags may use Qt's
/// underscore style (`en_GB`). Tags ICU cannot resolve degrade to a single
/// form.
///
/// # Example
///
/// ```
/// use tscat::{CldrPluralRule, PluralRule};
///
/// let korean = CldrPluralRule::for_language("ko");
/// assert_eq!(korean.form_count(), Some(1));
/// assert_eq!(korean.form_index(5), 0);
///
/// let english = CldrPluralRule::for_language("en_GB");
/// assert_eq!(english.form_index(1), 0);
/// assert_eq!(english.form_index(2), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CldrPluralRule {
    language: String,
    categories: Vec<PluralCategory>,
}

impl CldrPluralRule {
    /// Build the rule for a BCP-47 or Qt-style language tag.
    pub fn for_language(tag: &str) -> Self {
        let language = normalize_tag(tag);
        let categories = with_rules(&language, |rules| {
            let mut categories: Vec<PluralCategory> = Vec::new();
            for n in 0..=INTEGER_SAMPLES {
                let category = rules.category_for(n);
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
            categories.sort_by_key(|category| category_rank(*category));
            categories
        })
        .unwrap_or_default();
        CldrPluralRule {
            language,
            categories,
        }
    }

    /// The normalized language tag.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The language's plural categories in form order.
    pub fn categories(&self) -> &[PluralCategory] {
        &self.categories
    }
}

impl PluralRule for CldrPluralRule {
    fn form_index(&self, count: i64) -> usize {
        if self.categories.len() <= 1 {
            return 0;
        }
        with_rules(&self.language, |rules| rules.category_for(count))
            .and_then(|category| self.categories.iter().position(|c| *c == category))
            .unwrap_or(self.categories.len() - 1)
    }

    fn form_count(&self) -> Option<usize> {
        Some(self.categories.len().max(1))
    }
}

/// Counts probed to find the categories a language uses for integers.
const INTEGER_SAMPLES: i64 = 1000;

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by normalized language tag.
    /// `None` records a tag ICU could not resolve.
    static PLURAL_RULES_CACHE: RefCell<Vec<(String, Option<PluralRules>)>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` with the cached rules for `language`, building them on first use.
fn with_rules<T>(language: &str, f: impl FnOnce(&PluralRules) -> T) -> Option<T> {
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        let index = match cache.iter().position(|(code, _)| code == language) {
            Some(index) => index,
            None => {
                cache.push((language.to_string(), build_rules(language)));
                cache.len() - 1
            }
        };
        cache[index].1.as_ref().map(f)
    })
}

fn build_rules(language: &str) -> Option<PluralRules> {
    let locale: Locale = language.parse().ok()?;
    PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).ok()
}

/// Qt writes `ko_KR`; ICU expects `ko-KR`.
fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-")
}

fn category_rank(category: PluralCategory) -> u8 {
    match category {
        PluralCategory::Zero => 0,
        PluralCategory::One => 1,
        PluralCategory::Two => 2,
        PluralCategory::Few => 3,
        PluralCategory::Many => 4,
        PluralCategory::Other => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_form_always_zero() {
        for n in [-3, 0, 1, 2, 1_000_000, i64::MAX] {
            assert_eq!(SingleForm.form_index(n), 0);
        }
    }

    #[test]
    fn normalizes_qt_tags() {
        assert_eq!(normalize_tag("ko_KR"), "ko-KR");
        assert_eq!(normalize_tag(" en "), "en");
    }

    #[test]
    fn korean_has_one_form() {
        let rule = CldrPluralRule::for_language("ko_KR");
        assert_eq!(rule.form_count(), Some(1));
        assert_eq!(rule.form_index(0), 0);
        assert_eq!(rule.form_index(21), 0);
    }

    #[test]
    fn russian_integer_forms() {
        let rule = CldrPluralRule::for_language("ru");
        assert_eq!(rule.form_count(), Some(3));
        assert_eq!(rule.form_index(1), 0);
        assert_eq!(rule.form_index(21), 0);
        assert_eq!(rule.form_index(2), 1);
        assert_eq!(rule.form_index(4), 1);
        assert_eq!(rule.form_index(5), 2);
        assert_eq!(rule.form_index(11), 2);
    }

    #[test]
    fn unresolvable_tag_is_single_form() {
        let rule = CldrPluralRule::for_language("not a tag!");
        assert_eq!(rule.form_count(), Some(1));
        assert_eq!(rule.form_index(7), 0);
    }

    #[test]
    fn category_ranks_follow_cldr_order() {
        let mut categories = vec![
            PluralCategory::Other,
            PluralCategory::One,
            PluralCategory::Few,
        ];
        categories.sort_by_key(|c| category_rank(*c));
        assert_eq!(
            categories,
            vec![
                PluralCategory::One,
                PluralCategory::Few,
                PluralCategory::Other
            ]
        );
    }
}
