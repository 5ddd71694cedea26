//! Ignore rules in gitignore syntax, read from the folder's `.stignore`.

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::warn;
use std::path::Path;

use super::IgnoreMatcher;
use crate::utils::config::ReservedNames;

pub struct IgnoreFile {
    rules: Gitignore,
}

impl IgnoreFile {
    /// Load `root/.stignore` if present and add `extra` patterns on top.
    pub fn load(root: &Path, extra: &[String]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let file = root.join(ReservedNames::IGNORE_FILE);
        if file.is_file()
            && let Some(err) = builder.add(&file)
        {
            warn!("{}: {}", file.display(), err);
        }
        for pattern in extra {
            builder
                .add_line(None, pattern)
                .with_context(|| format!("ignore pattern {pattern:?}"))?;
        }
        let rules = builder.build().context("build ignore rules")?;
        log::debug!("ignore rules: {} patterns", rules.len());
        Ok(Self { rules })
    }

    /// Rules from patterns only (no file).
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new("");
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .with_context(|| format!("ignore pattern {pattern:?}"))?;
        }
        let rules = builder.build().context("build ignore rules")?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl IgnoreMatcher for IgnoreFile {
    fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        self.rules
            .matched_path_or_any_parents(name, is_dir)
            .is_ignore()
    }
}
