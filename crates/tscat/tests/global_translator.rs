//! Tests for the process-wide translator.
#![cfg(feature = "global")]

use std::io::Write;

use tempfile::NamedTempFile;
use tscat::global::{install, language, load_file, tr, tr_n, with_translator};
use tscat::{Catalog, load};

const KOREAN: &str = r#"<TS version="2.1" language="ko">
<context>
    <name>BitcoinGUI</name>
    <message>
        <source>&amp;Send</source>
        <translation>보내기(&amp;S)</translation>
    </message>
    <message numerus="yes">
        <source>%n day(s)</source>
        <translation><numerusform>%n 일</numerusform></translation>
    </message>
</context>
</TS>"#;

// One test so the shared state is not raced by the test harness.
#[test]
fn global_translator_lifecycle() {
    assert_eq!(tr("BitcoinGUI", "&Send"), "&Send");
    assert_eq!(language(), None);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(KOREAN.as_bytes()).unwrap();
    file.flush().unwrap();
    assert_eq!(load_file(file.path()).unwrap(), 2);

    assert_eq!(tr("BitcoinGUI", "&Send"), "보내기(&S)");
    assert_eq!(tr_n("BitcoinGUI", "%n day(s)", 4), "4 일");
    assert_eq!(language().as_deref(), Some("ko"));
    assert!(with_translator(|translator| translator.reload()).is_ok());

    let previous = install(Catalog::empty());
    assert_eq!(previous.lookup("BitcoinGUI", "&Send", None), Some("보내기(&S)"));
    assert_eq!(tr("BitcoinGUI", "&Send"), "&Send");

    install(load(KOREAN.as_bytes()).unwrap());
    assert_eq!(tr_n("BitcoinGUI", "%n day(s)", 1), "1 일");
}
