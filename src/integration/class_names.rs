//! Class index to label lookup, loaded from `coco.names`-style files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// Ordered list of class labels; line `i` names class `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// One label per line, surrounding whitespace trimmed. Blank lines still
    /// occupy an index so numbering matches the detector.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let names = BufReader::new(reader)
            .lines()
            .map(|line| line.map(|l| l.trim().to_string()))
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self { names })
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    /// Name of `class_id`, falling back to `class {id}`.
    pub fn label(&self, class_id: usize) -> String {
        match self.get(class_id) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("class {class_id}"),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
