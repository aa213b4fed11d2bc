use crate::error::Error;
use crate::support::os;
use crate::text::{self, TextRange};
use std::path::PathBuf;

crate::define_id!(pub ModuleID);

/// Source files loaded during this run, keyed by `ModuleID`.
/// Line ranges are computed once on load and shared by the
/// parser statistics and the diagnostic renderer.
pub struct Session {
    pub curr_work_dir: PathBuf,
    files: Vec<File>,
}

pub struct File {
    pub path: PathBuf,
    pub source: String,
    pub line_ranges: Vec<TextRange>,
}

impl Session {
    pub fn new() -> Session {
        let curr_work_dir = std::env::current_dir().unwrap_or_default();
        Session { curr_work_dir, files: Vec::new() }
    }

    pub fn load_file(&mut self, path: PathBuf) -> Result<ModuleID, Error> {
        let source = os::file_read(&path)?;
        Ok(self.add_file(path, source))
    }

    pub fn add_file(&mut self, path: PathBuf, source: String) -> ModuleID {
        let module_id = ModuleID::new(self.files.len());
        let line_ranges = text::find_line_ranges(&source);
        self.files.push(File { path, source, line_ranges });
        module_id
    }

    pub fn file(&self, module_id: ModuleID) -> &File {
        &self.files[module_id.index()]
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
