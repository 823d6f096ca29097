use crate::domain::model::Publication;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleMatch<'a> {
    Matched(&'a str),
    NoMatch,
    NoTitleField,
    BlankTitle,
}

/// Case-insensitive substring test against a publication's first title.
#[derive(Debug, Clone)]
pub struct TitleFilter {
    keyword: String,
}

impl TitleFilter {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn evaluate<'a>(&self, publication: &'a Publication) -> TitleMatch<'a> {
        let Some(field) = publication.fields("title").next() else {
            return TitleMatch::NoTitleField;
        };

        let title = field.value.as_str();
        if title.trim().is_empty() {
            return TitleMatch::BlankTitle;
        }

        if title.to_lowercase().contains(&self.keyword) {
            TitleMatch::Matched(title)
        } else {
            TitleMatch::NoMatch
        }
    }
}
