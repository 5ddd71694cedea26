//! In-memory previous index, optionally loaded from JSON lines (one [`FileInfo`] per line).

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::PreviousIndex;
use crate::FileInfo;

/// Map of record name → last known record.
#[derive(Clone, Debug, Default)]
pub struct MemoryIndex {
    records: HashMap<String, FileInfo>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records for the same name replace earlier ones.
    pub fn from_records<I: IntoIterator<Item = FileInfo>>(records: I) -> Self {
        let mut index = Self::new();
        index.extend(records);
        index
    }

    pub fn insert(&mut self, record: FileInfo) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn extend<I: IntoIterator<Item = FileInfo>>(&mut self, records: I) {
        for r in records {
            self.insert(r);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FileInfo> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest version held; a clock seeded from this never reissues a stamp.
    pub fn max_version(&self) -> u64 {
        self.records.values().map(|r| r.version).max().unwrap_or(0)
    }

    /// Load JSON lines as written by the CLI. Blank lines are skipped; later lines win.
    pub fn load_jsonl(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open previous index {}", path.display()))?;
        let mut index = Self::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: FileInfo = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: parse record", path.display(), i + 1))?;
            index.insert(record);
        }
        log::debug!(
            "loaded {} records from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }
}

impl PreviousIndex for MemoryIndex {
    fn lookup(&self, name: &str) -> Option<FileInfo> {
        self.records.get(name).cloned()
    }
}
