use std::collections::BTreeMap;

/// A single field of a dblp record, e.g. `<title>` or `<ee>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub tag: String,
    pub value: String,
}

/// An author or editor name as it appears on a publication.
///
/// `primary` is filled in by the record source when the name is a known
/// alias of a person whose canonical name differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub name: String,
    pub primary: Option<String>,
}

impl PersonName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: None,
        }
    }

    pub fn primary_name(&self) -> &str {
        self.primary.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub key: String,
    pub record_type: String,
    pub fields: Vec<Field>,
    pub names: Vec<PersonName>,
    /// `0` when the record has no parseable year
    pub year: i32,
}

impl Publication {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            record_type: "article".to_string(),
            fields: Vec::new(),
            names: Vec::new(),
            year: 0,
        }
    }

    pub fn with_field(mut self, tag: &str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            tag: tag.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field("title", title)
    }

    pub fn with_author(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.fields.push(Field {
            tag: "author".to_string(),
            value: name.clone(),
        });
        self.names.push(PersonName::new(name));
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// All values of the given field, in document order.
    pub fn fields<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag == tag)
    }

    pub fn names(&self) -> &[PersonName] {
        &self.names
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

/// One row of the detail report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub title: String,
    pub authors: String,
    pub year: String,
}

impl MatchRecord {
    pub fn from_publication(title: &str, publication: &Publication) -> Self {
        Self {
            title: title.to_string(),
            authors: join_authors(publication.names()),
            year: publication.year().to_string(),
        }
    }
}

pub fn join_authors(names: &[PersonName]) -> String {
    names
        .iter()
        .map(PersonName::primary_name)
        .collect::<Vec<_>>()
        .join(";")
}

/// Number of matching publications per year, ordered by year string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearCounts {
    counts: BTreeMap<String, u64>,
}

impl YearCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, year: &str) {
        *self.counts.entry(year.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, year: &str) -> Option<u64> {
        self.counts.get(year).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(year, count)| (year.as_str(), *count))
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
