//! Integration tests for the `.ts` document parser.

use tscat::{Location, ParseError, TranslationStatus, TranslationText, parse_document, parse_document_str};

// =========================================================================
// Structure
// =========================================================================

#[test]
fn parses_root_attributes_and_contexts() {
    let document = parse_document_str(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="ko" sourcelanguage="en_US">
<context>
    <name>ABIFunctionField</name>
    <message>
        <source>Function</source>
        <translation type="unfinished">함수</translation>
    </message>
</context>
<context>
    <name>ABIParam</name>
    <comment>Parameter editor</comment>
</context>
</TS>"#,
    )
    .unwrap();

    assert_eq!(document.version.as_deref(), Some("2.1"));
    assert_eq!(document.language.as_deref(), Some("ko"));
    assert_eq!(document.source_language.as_deref(), Some("en_US"));
    assert_eq!(document.contexts.len(), 2);
    assert_eq!(document.contexts[0].name, "ABIFunctionField");
    assert_eq!(document.contexts[0].messages[0].source, "Function");
    assert_eq!(document.contexts[1].comment.as_deref(), Some("Parameter editor"));
    assert!(document.contexts[1].messages.is_empty());
}

#[test]
fn byte_order_mark_is_ignored() {
    let mut input = "\u{feff}".as_bytes().to_vec();
    input.extend_from_slice(b"<TS version=\"2.1\"></TS>");
    let document = parse_document(&input).unwrap();
    assert!(document.contexts.is_empty());
}

#[test]
fn message_metadata_is_kept() {
    let document = parse_document_str(
        r#"<TS version="2.1" language="ko">
<context>
    <name>BitcoinGUI</name>
    <message id="gui-sync" numerus="yes">
        <location filename="../bitcoingui.cpp" line="982"/>
        <location filename="../bitcoingui.cpp"/>
        <source>Processed %n block(s) of transaction history.</source>
        <oldsource>Processed %n blocks of transaction history.</oldsource>
        <comment>tooltip</comment>
        <extracomment>A substring of the tooltip.</extracomment>
        <translatorcomment>check wording</translatorcomment>
        <translation type="unfinished">
            <numerusform>%n 블록 만큼의 거래 기록이 처리됩니다.</numerusform>
        </translation>
        <userdata>ignored</userdata>
    </message>
</context>
</TS>"#,
    )
    .unwrap();

    let message = &document.contexts[0].messages[0];
    assert!(message.numerus);
    assert_eq!(message.id.as_deref(), Some("gui-sync"));
    assert_eq!(message.comment.as_deref(), Some("tooltip"));
    assert_eq!(
        message.old_source.as_deref(),
        Some("Processed %n blocks of transaction history.")
    );
    assert_eq!(message.extra_comment.as_deref(), Some("A substring of the tooltip."));
    assert_eq!(message.translator_comment.as_deref(), Some("check wording"));
    assert_eq!(
        message.locations,
        vec![
            Location {
                filename: "../bitcoingui.cpp".to_string(),
                line: Some(982),
            },
            Location {
                filename: "../bitcoingui.cpp".to_string(),
                line: None,
            },
        ]
    );
    assert_eq!(message.line, 4);
    assert_eq!(message.translation.status, TranslationStatus::NeedsReview);
    assert_eq!(
        message.translation.text,
        TranslationText::Numerus(vec!["%n 블록 만큼의 거래 기록이 처리됩니다.".to_string()])
    );
}

// =========================================================================
// Text Content
// =========================================================================

#[test]
fn entities_and_character_references_are_resolved() {
    let document = parse_document_str(
        r#"<TS><context><name>C</name><message>
<source>&lt;b&gt;&amp;Send&lt;/b&gt; &quot;%1&quot; &apos;x&apos; &#xD55C;&#44544;</source>
<translation>&amp;보내기</translation>
</message></context></TS>"#,
    )
    .unwrap();
    let message = &document.contexts[0].messages[0];
    assert_eq!(message.source, "<b>&Send</b> \"%1\" 'x' 한글");
    assert_eq!(message.translation.text.first(), "&보내기");
}

#[test]
fn cdata_is_kept_verbatim() {
    let document = parse_document_str(
        "<TS><context><name>C</name><message><source><![CDATA[a & <b>]]></source><translation>ok</translation></message></context></TS>",
    )
    .unwrap();
    assert_eq!(document.contexts[0].messages[0].source, "a & <b>");
}

#[test]
fn crlf_line_breaks_read_as_newlines() {
    let input = "<TS version=\"2.1\" language=\"ko\">\r\n<context>\r\n    <name>C</name>\r\n    <message>\r\n        <source>Line one\r\nLine two\rLine three</source>\r\n        <translation><![CDATA[첫 줄\r\n둘째 줄]]></translation>\r\n    </message>\r\n</context>\r\n</TS>\r\n";
    let document = parse_document_str(input).unwrap();
    let message = &document.contexts[0].messages[0];
    assert_eq!(message.source, "Line one\nLine two\nLine three");
    assert_eq!(message.translation.text.first(), "첫 줄\n둘째 줄");
    assert_eq!(message.line, 4);

    let catalog = tscat::load(input.as_bytes()).unwrap();
    assert_eq!(
        catalog.lookup("C", "Line one\nLine two\nLine three", None),
        Some("첫 줄\n둘째 줄")
    );
}

#[test]
fn carriage_return_reference_is_kept() {
    let document = parse_document_str(
        "<TS><context><name>C</name><message><source>a&#13;\r\nb&#xD;</source></message></context></TS>",
    )
    .unwrap();
    assert_eq!(document.contexts[0].messages[0].source, "a\r\nb\r");
}

#[test]
fn length_variants_use_the_first_variant() {
    let document = parse_document_str(
        r#"<TS><context><name>C</name>
<message>
    <source>Settings</source>
    <translation variants="yes"><lengthvariant>환경 설정</lengthvariant><lengthvariant>설정</lengthvariant></translation>
</message>
</context></TS>"#,
    )
    .unwrap();
    assert_eq!(document.contexts[0].messages[0].translation.text.first(), "환경 설정");
}

#[test]
fn byte_elements_are_decoded() {
    let document = parse_document_str(
        r#"<TS><context><name>C</name><message><source>tab<byte value="x9"/>end<byte value="10"/></source></message></context></TS>"#,
    )
    .unwrap();
    assert_eq!(document.contexts[0].messages[0].source, "tab\tend\n");
}

#[test]
fn message_without_translation_needs_review() {
    let document = parse_document_str(
        "<TS><context><name>C</name><message><source>Untouched</source></message></context></TS>",
    )
    .unwrap();
    let translation = &document.contexts[0].messages[0].translation;
    assert_eq!(translation.status, TranslationStatus::NeedsReview);
    assert!(translation.text.is_empty());
}

#[test]
fn legacy_obsolete_type_is_obsolete() {
    let document = parse_document_str(
        r#"<TS><context><name>C</name><message><source>Old</source><translation type="obsolete">옛</translation></message></context></TS>"#,
    )
    .unwrap();
    assert_eq!(
        document.contexts[0].messages[0].translation.status,
        TranslationStatus::Obsolete
    );
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn mismatched_end_tag_is_syntax_error() {
    let err = parse_document_str("<TS>\n<context><name>C</name></message>\n</TS>").unwrap_err();
    match err {
        ParseError::Syntax { line, .. } => assert_eq!(line, 2),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn message_outside_context_is_rejected() {
    let err = parse_document_str("<TS>\n  <message><source>x</source></message>\n</TS>").unwrap_err();
    assert!(
        matches!(&err, ParseError::Syntax { line: 2, column: 3, message } if message.contains("outside")),
        "got {err:?}"
    );
}

#[test]
fn context_without_name_is_rejected() {
    let err = parse_document_str("<TS><context><message><source>x</source></message></context></TS>")
        .unwrap_err();
    assert!(err.to_string().contains("without <name>"), "got {err}");
}

#[test]
fn message_without_source_is_rejected() {
    let err = parse_document_str(
        "<TS><context><name>C</name><message><translation>x</translation></message></context></TS>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("without <source>"), "got {err}");
}

#[test]
fn wrong_root_element_is_rejected() {
    let err = parse_document_str("<xliff></xliff>").unwrap_err();
    assert!(err.to_string().contains("<TS>"), "got {err}");
}

#[test]
fn empty_input_is_rejected() {
    let err = parse_document(b"").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }), "got {err:?}");
}

#[test]
fn unclosed_message_reports_innermost_element() {
    let err = parse_document_str("<TS><context><name>C</name><message><source>x</source>").unwrap_err();
    assert!(
        matches!(&err, ParseError::UnexpectedEof { element, .. } if element == "message"),
        "got {err:?}"
    );
}

#[test]
fn invalid_utf8_is_rejected() {
    let err = parse_document(b"<TS><context><name>\xff</name></context></TS>").unwrap_err();
    assert!(matches!(err, ParseError::InvalidUtf8));
}

#[test]
fn non_utf8_encoding_declaration_is_rejected() {
    let err = parse_document_str(r#"<?xml version="1.0" encoding="ISO-8859-1"?><TS></TS>"#).unwrap_err();
    assert!(
        matches!(&err, ParseError::UnsupportedEncoding { encoding } if encoding == "ISO-8859-1"),
        "got {err:?}"
    );
}
