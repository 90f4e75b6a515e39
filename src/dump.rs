//! Streaming reader for MediaWiki XML dumps.
//!
//! The reader walks `<page>` elements one at a time, so memory use does not
//! grow with the dump. Pages outside the article namespace and redirects are
//! skipped and counted in [`DumpStats`].

use crate::config::CleanConfig;
use crate::error::{Error, Result};
use crate::model::Document;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 256 * 1024;

const REDIRECT_MARKERS: [&str; 2] = ["#redirect", "#重定向"];

/// Counters kept while reading a dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    /// `<page>` elements encountered
    pub pages_seen: u64,
    /// Pages outside the accepted namespaces
    pub skipped_namespace: u64,
    /// Redirect pages
    pub skipped_redirect: u64,
    /// Pages missing their title or id, or carrying unparsable fields
    pub malformed: u64,
}

impl DumpStats {
    /// Pages handed out as documents.
    pub fn yielded(&self) -> u64 {
        self.pages_seen - self.skipped_namespace - self.skipped_redirect - self.malformed
    }
}

/// Fields collected from one `<page>` element.
#[derive(Default)]
struct PageFields {
    title: Option<String>,
    ns: Option<String>,
    id: Option<String>,
    redirect: bool,
    text: Option<String>,
}

/// Which page field character data currently belongs to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Title,
    Ns,
    Id,
    Text,
}

/// Iterates the candidate articles of a dump.
///
/// # Example
///
/// ```
/// use wikiclean::DumpReader;
///
/// let xml = r#"<mediawiki><page><title>北京</title><ns>0</ns><id>1</id>
///   <revision><id>9</id><text>正文</text></revision></page></mediawiki>"#;
///
/// let docs: Vec<_> = DumpReader::new(xml.as_bytes()).collect::<Result<_, _>>()?;
/// assert_eq!(docs[0].id, 1);
/// assert_eq!(docs[0].text, "正文");
/// # Ok::<(), wikiclean::Error>(())
/// ```
pub struct DumpReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    config: &'static CleanConfig,
    stats: DumpStats,
    finished: bool,
}

impl<R: BufRead> DumpReader<R> {
    /// Creates a reader over an XML stream.
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            config: CleanConfig::global(),
            stats: DumpStats::default(),
            finished: false,
        }
    }

    /// Returns the counters gathered so far.
    pub fn stats(&self) -> DumpStats {
        self.stats
    }

    /// Advances to the next candidate article.
    ///
    /// Returns `Ok(None)` at the end of the dump.
    fn next_document(&mut self) -> Result<Option<Document>> {
        loop {
            self.buf.clear();
            let starts_page = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => local_name(&e) == "page",
                Event::Eof => return Ok(None),
                _ => false,
            };
            if !starts_page {
                continue;
            }

            self.stats.pages_seen += 1;
            let fields = self.read_page()?;
            match self.accept(fields) {
                Ok(Some(doc)) => return Ok(Some(doc)),
                Ok(None) => {}
                Err(e) => {
                    self.stats.malformed += 1;
                    return Err(e);
                }
            }
        }
    }

    /// Reads the body of a `<page>` up to and including its end tag.
    fn read_page(&mut self) -> Result<PageFields> {
        let mut fields = PageFields::default();
        // Element names below <page>
        let mut path: Vec<String> = Vec::new();
        let mut slot: Option<Slot> = None;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    path.push(local_name(&e));
                    slot = slot_for(&path);
                    match slot {
                        Some(Slot::Text) => fields.text = Some(String::new()),
                        Some(Slot::Title) => fields.title = Some(String::new()),
                        Some(Slot::Ns) => fields.ns = Some(String::new()),
                        Some(Slot::Id) => fields.id = Some(String::new()),
                        None => {}
                    }
                }
                Event::Empty(e) => {
                    let name = local_name(&e);
                    if path.is_empty() && name == "redirect" {
                        fields.redirect = true;
                    } else if path.len() == 1 && path[0] == "revision" && name == "text" {
                        fields.text = Some(String::new());
                    }
                }
                Event::Text(t) => {
                    if let Some(slot) = slot {
                        let value = t.unescape()?;
                        push_to(&mut fields, slot, &value);
                    }
                }
                Event::CData(c) => {
                    if let Some(slot) = slot {
                        let value = String::from_utf8_lossy(&c);
                        push_to(&mut fields, slot, &value);
                    }
                }
                Event::End(e) => {
                    if path.is_empty() && local_end_name(&e) == "page" {
                        return Ok(fields);
                    }
                    path.pop();
                    slot = slot_for(&path);
                }
                Event::Eof => {
                    return Err(Error::XmlParse(
                        "unexpected end of dump inside <page>".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    /// Applies the namespace and redirect filters and validates the fields.
    fn accept(&mut self, fields: PageFields) -> Result<Option<Document>> {
        let title = fields.title.map(|t| t.trim().to_string()).unwrap_or_default();

        let ns = match fields.ns.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| Error::InvalidPage(format!("{title:?}: bad namespace {raw:?}")))?,
        };
        if !self.config.accepts_namespace(ns) {
            self.stats.skipped_namespace += 1;
            tracing::debug!(%title, ns, "skipping page outside accepted namespaces");
            return Ok(None);
        }

        if title.is_empty() {
            return Err(Error::InvalidPage("page without title".to_string()));
        }
        let id = match fields.id.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(Error::InvalidPage(format!("{title:?}: page without id")));
            }
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| Error::InvalidPage(format!("{title:?}: bad id {raw:?}")))?,
        };

        let text = fields.text.unwrap_or_default();
        if fields.redirect || is_redirect_text(&text) {
            self.stats.skipped_redirect += 1;
            tracing::debug!(%title, id, "skipping redirect");
            return Ok(None);
        }

        Ok(Some(Document { title, id, text }))
    }
}

impl<R: BufRead> Iterator for DumpReader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_document() {
            Ok(Some(doc)) => Some(Ok(doc)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                if e.is_fatal() {
                    self.finished = true;
                } else {
                    tracing::warn!(error = %e, "skipping malformed page");
                }
                Some(Err(e))
            }
        }
    }
}

/// Opens a dump file. Files ending in `.bz2` are decompressed on the fly.
pub fn open_dump(path: impl AsRef<Path>) -> Result<DumpReader<Box<dyn BufRead + Send>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let compressed = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bz2"));

    let source: Box<dyn BufRead + Send> = if compressed {
        bz2_source(file)?
    } else {
        Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file))
    };
    Ok(DumpReader::new(source))
}

#[cfg(feature = "bz2")]
fn bz2_source(file: File) -> Result<Box<dyn BufRead + Send>> {
    let decoder = bzip2::read::MultiBzDecoder::new(file);
    Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, decoder)))
}

#[cfg(not(feature = "bz2"))]
fn bz2_source(_file: File) -> Result<Box<dyn BufRead + Send>> {
    Err(Error::InvalidData(
        "bz2 dumps require the 'bz2' feature".to_string(),
    ))
}

/// Returns true if the revision text is a redirect directive.
fn is_redirect_text(text: &str) -> bool {
    let head: String = text.trim_start().chars().take(9).collect();
    let head = head.to_lowercase();
    REDIRECT_MARKERS.iter().any(|marker| head.starts_with(marker))
}

/// Maps an element path below `<page>` to the field its text belongs to.
fn slot_for(path: &[String]) -> Option<Slot> {
    match path {
        [name] if name == "title" => Some(Slot::Title),
        [name] if name == "ns" => Some(Slot::Ns),
        [name] if name == "id" => Some(Slot::Id),
        [revision, text] if revision == "revision" && text == "text" => Some(Slot::Text),
        _ => None,
    }
}

fn push_to(fields: &mut PageFields, slot: Slot, value: &str) {
    let target = match slot {
        Slot::Title => &mut fields.title,
        Slot::Ns => &mut fields.ns,
        Slot::Id => &mut fields.id,
        Slot::Text => &mut fields.text,
    };
    target.get_or_insert_with(String::new).push_str(value);
}

fn local_name(e: &BytesStart) -> String {
    std::str::from_utf8(e.local_name().as_ref())
        .unwrap_or("")
        .to_string()
}

fn local_end_name(e: &BytesEnd) -> String {
    std::str::from_utf8(e.local_name().as_ref())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, ns: &str, id: &str, body: &str) -> String {
        format!(
            "<page><title>{title}</title><ns>{ns}</ns><id>{id}</id>\
             <revision><id>999</id><contributor><id>7</id></contributor>\
             <text xml:space=\"preserve\">{body}</text></revision></page>"
        )
    }

    fn dump(pages: &[String]) -> String {
        format!(
            "<mediawiki xmlns=\"http://www.mediawiki.org/xml/export-0.10/\">\n{}\n</mediawiki>",
            pages.join("\n")
        )
    }

    fn read_all(xml: &str) -> (Vec<Result<Document>>, DumpStats) {
        let mut reader = DumpReader::new(xml.as_bytes());
        let items: Vec<_> = reader.by_ref().collect();
        (items, reader.stats())
    }

    #[test]
    fn test_reads_article() {
        let xml = dump(&[page("北京", "0", "42", "'''北京'''是首都")]);
        let (items, stats) = read_all(&xml);
        assert_eq!(items.len(), 1);
        let doc = items.into_iter().next().unwrap().unwrap();
        assert_eq!(doc, Document::new("北京", 42, "'''北京'''是首都"));
        assert_eq!(stats.pages_seen, 1);
        assert_eq!(stats.yielded(), 1);
    }

    #[test]
    fn test_page_id_not_revision_id() {
        let xml = dump(&[page("上海", "0", "5", "文本")]);
        let (items, _) = read_all(&xml);
        assert_eq!(items[0].as_ref().unwrap().id, 5);
    }

    #[test]
    fn test_xml_entities_decoded_once() {
        let xml = dump(&[page("A&amp;B", "0", "1", "&lt;ref&gt;x&lt;/ref&gt; &amp;nbsp;")]);
        let (items, _) = read_all(&xml);
        let doc = items[0].as_ref().unwrap();
        assert_eq!(doc.title, "A&B");
        assert_eq!(doc.text, "<ref>x</ref> &nbsp;");
    }

    #[test]
    fn test_namespace_filter() {
        let xml = dump(&[
            page("Category:城市", "14", "1", "分类"),
            page("Talk:北京", "1", "2", "讨论"),
            page("北京", "0", "3", "正文"),
        ]);
        let (items, stats) = read_all(&xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap().id, 3);
        assert_eq!(stats.skipped_namespace, 2);
    }

    #[test]
    fn test_missing_namespace_defaults_to_article() {
        let xml = dump(&["<page><title>无名</title><id>8</id><revision><text>正文</text></revision></page>".to_string()]);
        let (items, _) = read_all(&xml);
        assert_eq!(items[0].as_ref().unwrap().id, 8);
    }

    #[test]
    fn test_redirects_skipped() {
        let xml = dump(&[
            "<page><title>京</title><ns>0</ns><id>1</id><redirect title=\"北京\" /><revision><text>#REDIRECT [[北京]]</text></revision></page>".to_string(),
            page("首都", "0", "2", "#重定向 [[北京]]"),
            page("帝都", "0", "3", "  #redirect [[北京]]"),
            page("北京", "0", "4", "正文"),
        ]);
        let (items, stats) = read_all(&xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap().id, 4);
        assert_eq!(stats.skipped_redirect, 3);
    }

    #[test]
    fn test_last_revision_wins() {
        let xml = dump(&["<page><title>T</title><ns>0</ns><id>1</id>\
             <revision><text>旧版</text></revision>\
             <revision><text>新版</text></revision></page>"
            .to_string()]);
        let (items, _) = read_all(&xml);
        assert_eq!(items[0].as_ref().unwrap().text, "新版");
    }

    #[test]
    fn test_empty_text_element() {
        let xml = dump(&["<page><title>T</title><ns>0</ns><id>1</id><revision><text bytes=\"0\" /></revision></page>".to_string()]);
        let (items, _) = read_all(&xml);
        assert_eq!(items[0].as_ref().unwrap().text, "");
    }

    #[test]
    fn test_cdata_text() {
        let xml = dump(&["<page><title>T</title><ns>0</ns><id>1</id><revision><text><![CDATA[a<b>c]]></text></revision></page>".to_string()]);
        let (items, _) = read_all(&xml);
        assert_eq!(items[0].as_ref().unwrap().text, "a<b>c");
    }

    #[test]
    fn test_malformed_page_skipped_and_reading_continues() {
        let xml = dump(&[
            page("坏页", "0", "abc", "正文"),
            "<page><ns>0</ns><id>3</id><revision><text>x</text></revision></page>".to_string(),
            page("好页", "0", "2", "正文"),
        ]);
        let (items, stats) = read_all(&xml);
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], Err(Error::InvalidPage(_))));
        assert!(matches!(items[1], Err(Error::InvalidPage(_))));
        assert_eq!(items[2].as_ref().unwrap().id, 2);
        assert_eq!(stats.malformed, 2);
        assert_eq!(stats.yielded(), 1);
    }

    #[test]
    fn test_truncated_dump_is_fatal() {
        let xml = "<mediawiki><page><title>T</title><ns>0</ns><id>1</id><revision><text>正文";
        let (items, _) = read_all(xml);
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Error::XmlParse(_))));
    }

    #[test]
    fn test_redirect_text_detection() {
        assert!(is_redirect_text("#REDIRECT [[x]]"));
        assert!(is_redirect_text("#Redirect[[x]]"));
        assert!(is_redirect_text("\n#重定向 [[x]]"));
        assert!(!is_redirect_text("正文 #REDIRECT"));
    }

    #[test]
    fn test_open_plain_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        file.write_all(dump(&[page("北京", "0", "1", "正文")]).as_bytes())
            .unwrap();
        let docs: Vec<_> = open_dump(file.path()).unwrap().collect();
        assert_eq!(docs.len(), 1);
    }

    #[cfg(feature = "bz2")]
    #[test]
    fn test_open_bz2_file() {
        use bzip2::write::BzEncoder;
        use bzip2::Compression;
        use std::io::Write;

        let xml = dump(&[page("北京", "0", "1", "正文"), page("上海", "0", "2", "正文")]);
        let file = tempfile::Builder::new().suffix(".xml.bz2").tempfile().unwrap();
        let mut encoder = BzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(xml.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let docs: Vec<_> = open_dump(file.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].title, "上海");
    }
}
