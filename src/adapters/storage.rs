use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    type Writer = BufWriter<File>;

    fn create(&self, name: &str) -> Result<BufWriter<File>> {
        let full_path = Path::new(&self.base_path).join(name);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(full_path)?;
        Ok(BufWriter::new(file))
    }

    fn location(&self, name: &str) -> String {
        Path::new(&self.base_path).join(name).display().to_string()
    }
}
