use super::TempNamer;
use crate::utils::config::PackagePaths;

/// Temp names of the form `dir/.syncscan.<base>.tmp`.
#[derive(Clone, Debug)]
pub struct PrefixTempNamer {
    prefix: String,
    suffix: String,
}

impl PrefixTempNamer {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl Default for PrefixTempNamer {
    fn default() -> Self {
        let paths = PackagePaths::get();
        Self::new(paths.temp_prefix(), paths.temp_suffix())
    }
}

impl TempNamer for PrefixTempNamer {
    fn temp_name(&self, name: &str) -> String {
        match name.rsplit_once('/') {
            Some((dir, base)) => format!("{dir}/{}{base}{}", self.prefix, self.suffix),
            None => format!("{}{name}{}", self.prefix, self.suffix),
        }
    }

    fn is_temporary(&self, name: &str) -> bool {
        let base = name.rsplit('/').next().unwrap_or(name);
        base.len() > self.prefix.len() + self.suffix.len()
            && base.starts_with(&self.prefix)
            && base.ends_with(&self.suffix)
    }
}
