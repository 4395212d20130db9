//! Class label table.
//!
//! The only persisted artifact the pipeline reads: a plain newline-delimited
//! text file, one label per line, where the line index is the class id
//! (`coco.names` layout). Loaded once at startup and read-only afterward.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

#[derive(Clone, Debug)]
pub struct ClassLabels {
    labels: Vec<String>,
}

impl ClassLabels {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read class names from {}", path.display()))?;
        let mut labels: Vec<String> = raw.lines().map(|line| line.trim().to_string()).collect();
        // A trailing newline is not an extra class.
        while labels.last().is_some_and(|label| label.is_empty()) {
            labels.pop();
        }
        if labels.is_empty() {
            return Err(anyhow!("class name file {} is empty", path.display()));
        }
        Ok(Self { labels })
    }

    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.labels.get(class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
