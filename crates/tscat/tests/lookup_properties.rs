//! Property tests: whatever text a document stores comes back from lookups.

use proptest::prelude::*;
use quick_xml::escape::escape;
use tscat::{MessageId, load, substitute_count};

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 &<>\"'%.가-힣\n]{1,24}"
}

fn context_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z]{0,15}"
}

fn document(context: &str, source: &str, comment: Option<&str>, translation: &str) -> String {
    let comment = comment
        .map(|comment| format!("<comment>{}</comment>", escape(comment)))
        .unwrap_or_default();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<TS version=\"2.1\" language=\"ko\">\n<context>\n    <name>{}</name>\n    <message>\n        <source>{}</source>{comment}\n        <translation>{}</translation>\n    </message>\n</context>\n</TS>\n",
        escape(context),
        escape(source),
        escape(translation)
    )
}

proptest! {
    #[test]
    fn escaped_text_round_trips(
        context in context_strategy(),
        source in text_strategy(),
        translation in text_strategy(),
    ) {
        let catalog = load(document(&context, &source, None, &translation).as_bytes()).unwrap();
        prop_assert_eq!(catalog.lookup(&context, &source, None), Some(translation.as_str()));
        prop_assert_eq!(
            catalog.lookup_plural(&context, &source, 3),
            Some(substitute_count(&translation, 3))
        );
    }

    #[test]
    fn disambiguated_text_round_trips(
        context in context_strategy(),
        source in text_strategy(),
        comment in text_strategy(),
        translation in text_strategy(),
    ) {
        let catalog =
            load(document(&context, &source, Some(&comment), &translation).as_bytes()).unwrap();
        prop_assert_eq!(
            catalog.lookup(&context, &source, Some(&comment)),
            Some(translation.as_str())
        );
        prop_assert_eq!(catalog.lookup(&context, &source, None), Some(translation.as_str()));
    }

    #[test]
    fn message_ids_separate_key_parts(
        context in context_strategy(),
        source in text_strategy(),
        comment in text_strategy(),
    ) {
        let plain = MessageId::new(&context, &source, None);
        prop_assert_eq!(plain, MessageId::new(&context, &source, None));
        prop_assert_ne!(plain, MessageId::new(&context, &source, Some(&comment)));
        if context != source {
            prop_assert_ne!(plain, MessageId::new(&source, &context, None));
        }
    }

    #[test]
    fn swapped_names_both_resolve(
        first in context_strategy(),
        second in context_strategy(),
    ) {
        prop_assume!(first != second);
        let document = format!(
            "<TS version=\"2.1\" language=\"ko\">\n<context><name>{first}</name><message><source>{second}</source><translation>a</translation></message></context>\n<context><name>{second}</name><message><source>{first}</source><translation>b</translation></message></context>\n</TS>\n"
        );
        let catalog = load(document.as_bytes()).unwrap();
        prop_assert_eq!(catalog.lookup(&first, &second, None), Some("a"));
        prop_assert_eq!(catalog.lookup(&second, &first, None), Some("b"));
    }
}
