//! Loads a dblp XML dump into memory.
//!
//! Every child of the root element is a record and every child of a record is
//! a field. Inline markup inside a field (`<i>`, `<sub>`, ...) only
//! contributes its text. `www` records keyed `homepages/...` describe persons:
//! the first name they list is the primary name, the rest are aliases.
//!
//! The DTD is only read for its general entity declarations; the document is
//! not validated against it.

use crate::domain::model::{Field, PersonName, Publication};
use crate::domain::ports::RecordSource;
use crate::utils::error::{EtlError, Result};
use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

const PERSON_RECORD: &str = "www";
const PERSON_KEY_PREFIX: &str = "homepages/";
const NAME_FIELDS: [&str; 2] = ["author", "editor"];

/// Named entities available while unescaping text.
#[derive(Debug, Clone)]
pub struct EntityTable {
    entities: HashMap<String, String>,
}

impl Default for EntityTable {
    fn default() -> Self {
        let entities = [
            ("lt", "<"),
            ("gt", ">"),
            ("amp", "&"),
            ("apos", "'"),
            ("quot", "\""),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
        Self { entities }
    }
}

impl EntityTable {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EtlError::SourceError {
            message: format!("cannot read dblp DTD '{}': {}", path.display(), e),
        })?;
        Self::from_dtd_str(&content)
    }

    /// Collect `<!ENTITY name "value">` declarations. Parameter entities are skipped.
    pub fn from_dtd_str(content: &str) -> Result<Self> {
        let declaration = compile(r#"<!ENTITY\s+([A-Za-z_][\w.-]*)\s+"([^"]*)"\s*>"#)?;
        let char_ref = compile(r"&#(x[0-9A-Fa-f]+|[0-9]+);")?;

        let mut table = Self::default();
        for caps in declaration.captures_iter(content) {
            let value = char_ref.replace_all(&caps[2], |c: &regex::Captures| {
                decode_char_ref(&c[1]).map_or_else(|| c[0].to_string(), String::from)
            });
            table.entities.insert(caps[1].to_string(), value.into_owned());
        }

        Ok(table)
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entities.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| EtlError::SourceError {
        message: format!("invalid entity pattern: {}", e),
    })
}

fn decode_char_ref(reference: &str) -> Option<char> {
    let code = match reference.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => reference.parse().ok()?,
    };
    char::from_u32(code)
}

/// In-memory dblp database.
#[derive(Debug, Default)]
pub struct DblpXmlSource {
    publications: Vec<Publication>,
    persons: usize,
}

impl DblpXmlSource {
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(xml_path: P, dtd_path: Q) -> Result<Self> {
        let entities = EntityTable::from_file(dtd_path)?;
        tracing::debug!("Loaded {} entity declarations", entities.len());

        let xml_path = xml_path.as_ref();
        let file = File::open(xml_path).map_err(|e| EtlError::SourceError {
            message: format!("cannot read dblp XML '{}': {}", xml_path.display(), e),
        })?;

        Self::from_reader(BufReader::with_capacity(1 << 20, file), &entities)
    }

    pub fn from_reader<R: BufRead>(input: R, entities: &EntityTable) -> Result<Self> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut current: Option<RecordBuilder> = None;
        let mut publications = Vec::new();
        let mut persons = Vec::new();

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("XML parse error at position {}", reader.buffer_position());
                    return Err(e.into());
                }
            };

            match event {
                Event::Start(e) => {
                    depth += 1;
                    match depth {
                        2 => current = Some(RecordBuilder::new(&e)),
                        3 => {
                            if let Some(record) = current.as_mut() {
                                record.open_field(tag_name(&e));
                            }
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => match depth + 1 {
                    2 => RecordBuilder::new(&e).finish(&mut publications, &mut persons),
                    3 => {
                        if let Some(record) = current.as_mut() {
                            record.open_field(tag_name(&e));
                            record.close_field();
                        }
                    }
                    _ => {}
                },
                Event::Text(e) if depth >= 3 => {
                    let raw = std::str::from_utf8(&e).map_err(|err| EtlError::SourceError {
                        message: format!("invalid UTF-8 at position {}: {}", reader.buffer_position(), err),
                    })?;
                    let text = unescape_with(raw, |name| entities.resolve(name)).map_err(|err| {
                        EtlError::SourceError {
                            message: format!(
                                "cannot parse XML at position {}: {}",
                                reader.buffer_position(),
                                err
                            ),
                        }
                    })?;
                    if let Some(record) = current.as_mut() {
                        record.push_text(&text);
                    }
                }
                Event::CData(e) if depth >= 3 => {
                    if let Some(record) = current.as_mut() {
                        record.push_text(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    match depth {
                        2 => {
                            if let Some(record) = current.take() {
                                record.finish(&mut publications, &mut persons);
                            }
                        }
                        3 => {
                            if let Some(record) = current.as_mut() {
                                record.close_field();
                            }
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        resolve_primary_names(&mut publications, &persons);

        Ok(Self {
            publications,
            persons: persons.len(),
        })
    }
}

impl RecordSource for DblpXmlSource {
    fn publications(&self) -> Box<dyn Iterator<Item = &Publication> + '_> {
        Box::new(self.publications.iter())
    }

    fn number_of_publications(&self) -> usize {
        self.publications.len()
    }

    fn number_of_persons(&self) -> usize {
        self.persons
    }
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

struct RecordBuilder {
    publication: Publication,
    open: Option<(String, String)>,
}

impl RecordBuilder {
    fn new(e: &BytesStart) -> Self {
        let key = e
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == b"key")
            .map(|a| String::from_utf8_lossy(&a.value).into_owned())
            .unwrap_or_default();

        let mut publication = Publication::new(key);
        publication.record_type = tag_name(e);
        Self {
            publication,
            open: None,
        }
    }

    fn open_field(&mut self, tag: String) {
        self.open = Some((tag, String::new()));
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, value)) = self.open.as_mut() {
            value.push_str(text);
        }
    }

    fn close_field(&mut self) {
        let Some((tag, value)) = self.open.take() else {
            return;
        };
        let value = value.trim().to_string();

        if NAME_FIELDS.contains(&tag.as_str()) {
            self.publication.names.push(PersonName::new(value.clone()));
        } else if tag == "year" && self.publication.year == 0 {
            self.publication.year = value.parse().unwrap_or(0);
        }

        self.publication.fields.push(Field { tag, value });
    }

    fn is_person(&self) -> bool {
        self.publication.record_type == PERSON_RECORD
            && self.publication.key.starts_with(PERSON_KEY_PREFIX)
    }

    fn finish(self, publications: &mut Vec<Publication>, persons: &mut Vec<Vec<PersonName>>) {
        if self.is_person() {
            persons.push(self.publication.names);
        } else {
            publications.push(self.publication);
        }
    }
}

fn resolve_primary_names(publications: &mut [Publication], persons: &[Vec<PersonName>]) {
    let mut aliases: HashMap<&str, &str> = HashMap::new();
    for names in persons {
        if let Some((primary, others)) = names.split_first() {
            for alias in others {
                aliases
                    .entry(alias.name.as_str())
                    .or_insert(primary.name.as_str());
            }
        }
    }

    if aliases.is_empty() {
        return;
    }

    for name in publications.iter_mut().flat_map(|p| p.names.iter_mut()) {
        if let Some(primary) = aliases.get(name.name.as_str()) {
            name.primary = Some(primary.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DTD: &str = r##"
<!ELEMENT dblp (article|inproceedings|proceedings|www)*>
<!ENTITY % titlecontents "#PCDATA|sub|sup|i|tt">
<!ENTITY uuml   "&#252;" ><!-- small u, dieresis or umlaut mark -->
<!ENTITY eacute "&#xE9;">
<!ENTITY reg    "&#174;">
"##;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE dblp SYSTEM "dblp.dtd">
<dblp>
<article mdate="2020-01-01" key="journals/x/OneT15">
<author>A. One</author>
<author>J&uuml;rgen Two</author>
<title>MCTS for <i>Go</i> &amp; Chess.</title>
<year>2015</year>
<ee type="oa"/>
</article>
<www mdate="2021-03-04" key="homepages/12/345">
<author>Bob Smith</author>
<author>Robert Smith</author>
<title>Home Page</title>
</www>
<inproceedings mdate="2021-03-04" key="conf/y/Smith20">
<author>Robert Smith</author>
<title><![CDATA[Caf]]>&eacute; search</title>
<year>n/a</year>
</inproceedings>
<proceedings key="conf/y/2020">
<editor>E. Ditor</editor>
<year>2020</year>
</proceedings>
<www key="www/org/example">
<title>Some site</title>
</www>
</dblp>
"#;

    fn load() -> DblpXmlSource {
        let entities = EntityTable::from_dtd_str(DTD).unwrap();
        DblpXmlSource::from_reader(XML.as_bytes(), &entities).unwrap()
    }

    #[test]
    fn test_entity_table_from_dtd() {
        let entities = EntityTable::from_dtd_str(DTD).unwrap();
        assert_eq!(entities.resolve("uuml"), Some("ü"));
        assert_eq!(entities.resolve("eacute"), Some("é"));
        assert_eq!(entities.resolve("reg"), Some("®"));
        assert_eq!(entities.resolve("amp"), Some("&"));
        assert_eq!(entities.resolve("titlecontents"), None);
    }

    #[test]
    fn test_counts_publications_and_persons() {
        let source = load();
        assert_eq!(source.number_of_publications(), 4);
        assert_eq!(source.number_of_persons(), 1);
    }

    #[test]
    fn test_fields_and_inline_markup() {
        let source = load();
        let first = source.publications().next().unwrap();

        assert_eq!(first.key, "journals/x/OneT15");
        assert_eq!(first.record_type, "article");
        let title: Vec<&str> = first.fields("title").map(|f| f.value.as_str()).collect();
        assert_eq!(title, vec!["MCTS for Go & Chess."]);
        assert_eq!(first.year(), 2015);
        let names: Vec<&str> = first.names().iter().map(|n| n.primary_name()).collect();
        assert_eq!(names, vec!["A. One", "Jürgen Two"]);
        assert_eq!(first.fields("ee").next().map(|f| f.value.as_str()), Some(""));
    }

    #[test]
    fn test_aliases_resolve_to_primary_name() {
        let source = load();
        let publ = source.publications().nth(1).unwrap();

        assert_eq!(publ.names()[0].name, "Robert Smith");
        assert_eq!(publ.names()[0].primary_name(), "Bob Smith");
        assert_eq!(publ.fields("title").next().unwrap().value, "Café search");
        assert_eq!(publ.year(), 0);
    }

    #[test]
    fn test_records_without_title_and_editors() {
        let source = load();
        let proceedings = source.publications().nth(2).unwrap();

        assert_eq!(proceedings.fields("title").count(), 0);
        assert_eq!(proceedings.names()[0].primary_name(), "E. Ditor");
        assert_eq!(proceedings.year(), 2020);

        // 非 homepages 的 www 記錄仍算出版品
        let site = source.publications().nth(3).unwrap();
        assert_eq!(site.record_type, "www");
    }

    #[test]
    fn test_mismatched_tags_are_fatal() {
        let xml = r#"<dblp><article key="a"><title>x</article></dblp>"#;
        let result = DblpXmlSource::from_reader(xml.as_bytes(), &EntityTable::default());
        assert!(matches!(result, Err(EtlError::XmlError(_))));
    }

    #[test]
    fn test_undeclared_entity_is_fatal() {
        let xml = r#"<dblp><article key="a"><title>M&ouml;ller</title></article></dblp>"#;
        let result = DblpXmlSource::from_reader(xml.as_bytes(), &EntityTable::default());
        assert!(matches!(result, Err(EtlError::SourceError { .. })));
    }

    #[test]
    fn test_load_reports_missing_files() {
        let err = DblpXmlSource::load("/nonexistent/dblp.xml", "/nonexistent/dblp.dtd").unwrap_err();
        assert!(err.to_string().contains("cannot read dblp DTD"));
    }
}
