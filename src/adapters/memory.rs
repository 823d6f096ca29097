use crate::domain::model::Publication;
use crate::domain::ports::RecordSource;

/// Vector-backed record source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    publications: Vec<Publication>,
    persons: usize,
}

impl MemorySource {
    pub fn new(publications: Vec<Publication>) -> Self {
        Self {
            publications,
            persons: 0,
        }
    }

    pub fn with_persons(mut self, persons: usize) -> Self {
        self.persons = persons;
        self
    }
}

impl RecordSource for MemorySource {
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
