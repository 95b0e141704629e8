//! Extraction of the experiment parameter from result file names.
//!
//! The ns-3 scenario names its output `qos_dsr_<N>node_speed<V>_<M>client.txt`. A
//! [`FilenameTemplate`] describes that convention as a small grammar: a required prefix, a tag
//! immediately followed by a number and a delimiter, and a required extension. Everything else in
//! the name is opaque.

use crate::units::MetersPerSec;

/// A file name grammar with one tagged numeric field.
#[derive(Debug, Clone, PartialEq, Eq, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilenameTemplate {
    /// Every matching name starts with this.
    #[builder(default = "qos_dsr_".into(), setter(into))]
    pub prefix: String,
    /// The literal preceding the numeric field. It must occur exactly once.
    #[builder(default = "speed".into(), setter(into))]
    pub tag: String,
    /// Terminates the numeric field.
    #[builder(default = '_')]
    pub delimiter: char,
    /// Every matching name ends with this.
    #[builder(default = ".txt".into(), setter(into))]
    pub extension: String,
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FilenameTemplate {
    /// Extract the tagged value from a file name (not a path).
    pub fn extract(&self, name: &str) -> Result<MetersPerSec, MalformedFilename> {
        let malformed = |defect| MalformedFilename {
            name: name.to_owned(),
            defect,
        };
        if !name.starts_with(&self.prefix) {
            return Err(malformed(FilenameDefect::Prefix(self.prefix.clone())));
        }
        if !name.ends_with(&self.extension) {
            return Err(malformed(FilenameDefect::Extension(self.extension.clone())));
        }
        let mut tags = name.match_indices(self.tag.as_str());
        let (at, _) = tags
            .next()
            .ok_or_else(|| malformed(FilenameDefect::MissingTag(self.tag.clone())))?;
        if tags.next().is_some() {
            return Err(malformed(FilenameDefect::RepeatedTag(self.tag.clone())));
        }
        let rest = &name[at + self.tag.len()..];
        let end = rest
            .find(self.delimiter)
            .ok_or_else(|| malformed(FilenameDefect::MissingDelimiter(self.delimiter)))?;
        let field = &rest[..end];
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(MetersPerSec::new(value.abs())),
            _ => Err(malformed(FilenameDefect::NotNumeric(field.to_owned()))),
        }
    }
}

/// A file name that does not follow the [`FilenameTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed file name `{name}`: {defect}")]
pub struct MalformedFilename {
    /// The offending name.
    pub name: String,
    /// What is wrong with it.
    pub defect: FilenameDefect,
}

/// The ways a file name can violate a [`FilenameTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameDefect {
    #[error("expected prefix `{0}`")]
    Prefix(String),

    #[error("expected extension `{0}`")]
    Extension(String),

    #[error("tag `{0}` not found")]
    MissingTag(String),

    #[error("tag `{0}` appears more than once")]
    RepeatedTag(String),

    #[error("no `{0}` after the tagged value")]
    MissingDelimiter(char),

    #[error("`{0}` is not a non-negative number")]
    NotNumeric(String),
}
