//! `.ts` document reader.
//!
//! Streams the document with `quick-xml` and builds contexts and messages in
//! a single pass. XML entities and character references are resolved while
//! reading; character data is otherwise kept verbatim, whitespace included.

use std::borrow::Cow;
use std::mem;
use std::str;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use tracing::trace;

use super::error::ParseError;
use crate::types::{Context, Location, Message, Translation, TranslationStatus, TranslationText};

/// A parsed `.ts` document, in document order, before any indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsDocument {
    /// `version` attribute of `<TS>`.
    pub version: Option<String>,
    /// `language` attribute of `<TS>`, e.g. `ko` or `en_GB`.
    pub language: Option<String>,
    /// `sourcelanguage` attribute of `<TS>`.
    pub source_language: Option<String>,
    pub contexts: Vec<Context>,
}

/// Parse a `.ts` document from raw bytes.
///
/// The bytes must be UTF-8; a leading byte order mark is ignored.
pub fn parse_document(input: &[u8]) -> Result<TsDocument, ParseError> {
    let text = str::from_utf8(input).map_err(|_| ParseError::InvalidUtf8)?;
    parse_document_str(text)
}

/// Parse a `.ts` document from a string.
pub fn parse_document_str(input: &str) -> Result<TsDocument, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    DocumentReader::new(input).read()
}

/// Calculate the 1-based line and byte column of `offset` in `source`.
fn position_at(source: &str, offset: usize) -> (usize, usize) {
    let bytes = &source.as_bytes()[..offset.min(source.len())];
    let line = bytes.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = match bytes.iter().rposition(|&b| b == b'\n') {
        Some(pos) => bytes.len() - pos,
        None => bytes.len() + 1,
    };
    (line, column)
}

/// Literal `\r\n` and lone `\r` read as `\n`, as XML line-end handling
/// requires. Runs before unescaping so `&#13;` survives.
fn normalize_line_breaks(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

fn syntax_error(source: &str, offset: usize, message: impl Into<String>) -> ParseError {
    let (line, column) = position_at(source, offset);
    ParseError::Syntax {
        line,
        column,
        message: message.into(),
    }
}

/// Elements of the `.ts` schema the reader understands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Root,
    Context,
    ContextName,
    ContextComment,
    Message,
    Source,
    Comment,
    OldSource,
    OldComment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
    LengthVariant,
    Location,
    Byte,
    /// Anything else (`userdata`, `extra-*`, `dependencies`...). Skipped.
    Other(String),
}

impl Element {
    fn name(&self) -> &str {
        match self {
            Element::Root => "TS",
            Element::Context => "context",
            Element::ContextName => "name",
            Element::ContextComment | Element::Comment => "comment",
            Element::Message => "message",
            Element::Source => "source",
            Element::OldSource => "oldsource",
            Element::OldComment => "oldcomment",
            Element::ExtraComment => "extracomment",
            Element::TranslatorComment => "translatorcomment",
            Element::Translation => "translation",
            Element::NumerusForm => "numerusform",
            Element::LengthVariant => "lengthvariant",
            Element::Location => "location",
            Element::Byte => "byte",
            Element::Other(name) => name,
        }
    }

    /// Whether character data directly inside this element is kept.
    fn captures_text(&self) -> bool {
        matches!(
            self,
            Element::ContextName
                | Element::ContextComment
                | Element::Source
                | Element::Comment
                | Element::OldSource
                | Element::OldComment
                | Element::ExtraComment
                | Element::TranslatorComment
                | Element::Translation
                | Element::NumerusForm
                | Element::LengthVariant
        )
    }

    /// Classify a start tag by its name and the enclosing element.
    fn classify(parent: Option<&Element>, name: &str) -> Result<Element, String> {
        let element = match (parent, name) {
            (None, "TS") => Element::Root,
            (None, other) => return Err(format!("expected <TS> root element, found <{other}>")),
            (Some(Element::Root), "context") => Element::Context,
            (Some(Element::Root), "message") => {
                return Err("<message> outside of <context>".to_string());
            }
            (Some(Element::Context), "context") => return Err("nested <context>".to_string()),
            (Some(Element::Context), "name") => Element::ContextName,
            (Some(Element::Context), "comment") => Element::ContextComment,
            (Some(Element::Context), "message") => Element::Message,
            (Some(Element::Message), "message") => return Err("nested <message>".to_string()),
            (Some(Element::Message), "source") => Element::Source,
            (Some(Element::Message), "comment") => Element::Comment,
            (Some(Element::Message), "oldsource") => Element::OldSource,
            (Some(Element::Message), "oldcomment") => Element::OldComment,
            (Some(Element::Message), "extracomment") => Element::ExtraComment,
            (Some(Element::Message), "translatorcomment") => Element::TranslatorComment,
            (Some(Element::Message), "translation") => Element::Translation,
            (Some(Element::Message), "location") => Element::Location,
            (Some(Element::Translation), "numerusform") => Element::NumerusForm,
            (Some(Element::Translation | Element::NumerusForm), "lengthvariant") => {
                Element::LengthVariant
            }
            (Some(parent), "byte") if parent.captures_text() => Element::Byte,
            (_, other) => Element::Other(other.to_string()),
        };
        Ok(element)
    }
}

/// A `<context>` being read.
#[derive(Default)]
struct PendingContext {
    name: Option<String>,
    comment: Option<String>,
    messages: Vec<Message>,
}

/// A `<message>` being read.
#[derive(Default)]
struct PendingMessage {
    message: Message,
    source: Option<String>,
    status: Option<TranslationStatus>,
    forms: Vec<String>,
    single: Option<String>,
}

impl PendingMessage {
    fn finish(self) -> Option<Message> {
        let PendingMessage {
            mut message,
            source,
            status,
            forms,
            single,
        } = self;
        message.source = source?;
        let numerus = message.numerus;
        let text = match single {
            _ if !forms.is_empty() => TranslationText::Numerus(forms),
            Some(text) if numerus && text.trim().is_empty() => TranslationText::Numerus(Vec::new()),
            Some(text) if numerus => TranslationText::Numerus(vec![text]),
            Some(text) => TranslationText::Single(text),
            None if numerus => TranslationText::Numerus(Vec::new()),
            None => TranslationText::Single(String::new()),
        };
        message.translation = Translation {
            // A message without <translation> has never been translated.
            status: status.unwrap_or(TranslationStatus::NeedsReview),
            text,
        };
        Some(message)
    }
}

/// Tracks line numbers for increasing offsets without rescanning the input.
#[derive(Default)]
struct LineTracker {
    offset: usize,
    line: usize,
}

impl LineTracker {
    fn line_at(&mut self, source: &str, offset: usize) -> usize {
        let offset = offset.min(source.len());
        if offset < self.offset || self.line == 0 {
            self.offset = 0;
            self.line = 1;
        }
        let skipped = &source.as_bytes()[self.offset..offset];
        self.line += skipped.iter().filter(|&&b| b == b'\n').count();
        self.offset = offset;
        self.line
    }
}

struct DocumentReader<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    open: Vec<Element>,
    document: TsDocument,
    seen_root: bool,
    context: Option<PendingContext>,
    message: Option<PendingMessage>,
    /// Character data of the innermost capturing element.
    text: String,
    /// Character data of the current `<lengthvariant>`.
    variant_text: String,
    /// First `<lengthvariant>` of the current translation or form.
    variant: Option<String>,
    lines: LineTracker,
}

impl<'a> DocumentReader<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = true;
        DocumentReader {
            source,
            reader,
            open: Vec::new(),
            document: TsDocument::default(),
            seen_root: false,
            context: None,
            message: None,
            text: String::new(),
            variant_text: String::new(),
            variant: None,
            lines: LineTracker::default(),
        }
    }

    fn read(mut self) -> Result<TsDocument, ParseError> {
        loop {
            let offset = self.reader.buffer_position() as usize;
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let at = self.reader.error_position() as usize;
                    return Err(syntax_error(self.source, at, err.to_string()));
                }
            };
            match event {
                Event::Decl(decl) => self.check_declaration(&decl, offset)?,
                Event::Start(start) => self.open_element(&start, offset)?,
                Event::Empty(start) => {
                    self.open_element(&start, offset)?;
                    self.close_element(offset)?;
                }
                Event::End(_) => self.close_element(offset)?,
                Event::Text(text) => {
                    if self.capturing() {
                        let raw = str::from_utf8(&text)
                            .map_err(|_| syntax_error(self.source, offset, "invalid UTF-8 in text"))?;
                        let text = unescape(&normalize_line_breaks(raw))
                            .map_err(|err| syntax_error(self.source, offset, err.to_string()))?
                            .into_owned();
                        self.push_text(&text);
                    }
                }
                Event::CData(data) => {
                    if self.capturing() {
                        let data = data.into_inner();
                        let text = str::from_utf8(&data)
                            .map_err(|_| syntax_error(self.source, offset, "invalid UTF-8 in CDATA"))?;
                        self.push_text(&normalize_line_breaks(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(element) = self.open.last() {
            let (line, column) = position_at(self.source, self.source.len());
            return Err(ParseError::UnexpectedEof {
                line,
                column,
                element: element.name().to_string(),
            });
        }
        if !self.seen_root {
            return Err(syntax_error(
                self.source,
                self.source.len(),
                "missing <TS> root element",
            ));
        }
        Ok(self.document)
    }

    fn check_declaration(&self, decl: &BytesDecl<'_>, offset: usize) -> Result<(), ParseError> {
        let Some(encoding) = decl.encoding() else {
            return Ok(());
        };
        let encoding = encoding.map_err(|err| syntax_error(self.source, offset, err.to_string()))?;
        let name = String::from_utf8_lossy(&encoding);
        if name.eq_ignore_ascii_case("utf-8") || name.eq_ignore_ascii_case("utf8") {
            Ok(())
        } else {
            Err(ParseError::UnsupportedEncoding {
                encoding: name.into_owned(),
            })
        }
    }

    fn capturing(&self) -> bool {
        self.open.last().is_some_and(Element::captures_text)
    }

    fn push_text(&mut self, text: &str) {
        if self.open.last() == Some(&Element::LengthVariant) {
            self.variant_text.push_str(text);
        } else {
            self.text.push_str(text);
        }
    }

    fn attribute(
        &self,
        start: &BytesStart<'_>,
        key: &str,
        offset: usize,
    ) -> Result<Option<String>, ParseError> {
        for attr in start.attributes() {
            let attr = attr.map_err(|err| syntax_error(self.source, offset, err.to_string()))?;
            if attr.key.as_ref() == key.as_bytes() {
                let value = attr
                    .unescape_value()
                    .map_err(|err| syntax_error(self.source, offset, err.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn open_element(&mut self, start: &BytesStart<'_>, offset: usize) -> Result<(), ParseError> {
        let name = str::from_utf8(start.name().as_ref())
            .map_err(|_| syntax_error(self.source, offset, "invalid UTF-8 in element name"))?
            .to_string();
        if self.open.is_empty() && self.seen_root {
            return Err(syntax_error(
                self.source,
                offset,
                format!("unexpected <{name}> after the root element"),
            ));
        }
        let element = Element::classify(self.open.last(), &name)
            .map_err(|message| syntax_error(self.source, offset, message))?;

        match &element {
            Element::Root => {
                self.seen_root = true;
                self.document.version = self.attribute(start, "version", offset)?;
                self.document.language = self.attribute(start, "language", offset)?;
                self.document.source_language = self.attribute(start, "sourcelanguage", offset)?;
            }
            Element::Context => self.context = Some(PendingContext::default()),
            Element::Message => {
                let numerus = self.attribute(start, "numerus", offset)?;
                let id = self.attribute(start, "id", offset)?;
                let line = self.lines.line_at(self.source, offset);
                self.message = Some(PendingMessage {
                    message: Message {
                        numerus: numerus.as_deref() == Some("yes"),
                        id,
                        line,
                        ..Message::default()
                    },
                    ..PendingMessage::default()
                });
            }
            Element::Translation => {
                let kind = self.attribute(start, "type", offset)?;
                if let Some(pending) = self.message.as_mut() {
                    pending.status = Some(TranslationStatus::from_type_attribute(kind.as_deref()));
                }
                self.text.clear();
                self.variant = None;
            }
            Element::NumerusForm => {
                self.text.clear();
                self.variant = None;
            }
            Element::LengthVariant => self.variant_text.clear(),
            Element::Location => {
                let filename = self.attribute(start, "filename", offset)?.unwrap_or_default();
                let line = self
                    .attribute(start, "line", offset)?
                    .and_then(|value| value.trim().parse().ok());
                if let Some(pending) = self.message.as_mut() {
                    pending.message.locations.push(Location { filename, line });
                }
            }
            Element::Byte => {
                let value = self.attribute(start, "value", offset)?.unwrap_or_default();
                let ch = decode_byte_value(&value).ok_or_else(|| {
                    syntax_error(
                        self.source,
                        offset,
                        format!("invalid <byte> value '{value}'"),
                    )
                })?;
                let mut buf = [0; 4];
                self.push_text(ch.encode_utf8(&mut buf));
            }
            Element::Other(name) => trace!(element = %name, "skipping unknown element"),
            _ => self.text.clear(),
        }

        self.open.push(element);
        Ok(())
    }

    fn close_element(&mut self, offset: usize) -> Result<(), ParseError> {
        let Some(element) = self.open.pop() else {
            return Err(syntax_error(self.source, offset, "unexpected closing tag"));
        };

        match element {
            Element::Context => {
                let Some(pending) = self.context.take() else {
                    return Ok(());
                };
                let Some(name) = pending.name else {
                    return Err(syntax_error(self.source, offset, "<context> without <name>"));
                };
                self.document.contexts.push(Context {
                    name,
                    comment: pending.comment,
                    messages: pending.messages,
                });
            }
            Element::ContextName => {
                let name = mem::take(&mut self.text);
                if let Some(pending) = self.context.as_mut() {
                    pending.name = Some(name);
                }
            }
            Element::ContextComment => {
                let comment = non_empty(mem::take(&mut self.text));
                if let Some(pending) = self.context.as_mut() {
                    pending.comment = comment;
                }
            }
            Element::Message => {
                let Some(pending) = self.message.take() else {
                    return Ok(());
                };
                let Some(message) = pending.finish() else {
                    return Err(syntax_error(self.source, offset, "<message> without <source>"));
                };
                if let Some(context) = self.context.as_mut() {
                    context.messages.push(message);
                }
            }
            Element::Source => {
                let source = mem::take(&mut self.text);
                if let Some(pending) = self.message.as_mut() {
                    pending.source = Some(source);
                }
            }
            Element::Comment
            | Element::OldSource
            | Element::OldComment
            | Element::ExtraComment
            | Element::TranslatorComment => {
                let value = non_empty(mem::take(&mut self.text));
                if let Some(pending) = self.message.as_mut() {
                    let slot = match element {
                        Element::Comment => &mut pending.message.comment,
                        Element::OldSource => &mut pending.message.old_source,
                        Element::OldComment => &mut pending.message.old_comment,
                        Element::ExtraComment => &mut pending.message.extra_comment,
                        _ => &mut pending.message.translator_comment,
                    };
                    *slot = value;
                }
            }
            Element::NumerusForm => {
                let form = self
                    .variant
                    .take()
                    .unwrap_or_else(|| mem::take(&mut self.text));
                self.text.clear();
                if let Some(pending) = self.message.as_mut() {
                    pending.forms.push(form);
                }
            }
            Element::Translation => {
                let text = self
                    .variant
                    .take()
                    .unwrap_or_else(|| mem::take(&mut self.text));
                self.text.clear();
                if let Some(pending) = self.message.as_mut() {
                    pending.single = Some(text);
                }
            }
            Element::LengthVariant => {
                let variant = mem::take(&mut self.variant_text);
                if self.variant.is_none() {
                    self.variant = Some(variant);
                }
            }
            Element::Root | Element::Location | Element::Byte | Element::Other(_) => {}
        }
        Ok(())
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Decode the `value` of a `<byte>` element: decimal, or hexadecimal with an
/// `x` prefix.
fn decode_byte_value(value: &str) -> Option<char> {
    let code = match value.strip_prefix('x').or_else(|| value.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse().ok()?,
    };
    char::from_u32(code)
}
