use std::io;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::config::{FrontMatterMode, MetadataFormat};
use crate::error::BuildError;

/// Metadata block of a content file, before the date is validated.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(alias = "Title", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(alias = "Date", deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(alias = "Tags", deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
pub enum SplitError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    InvalidFormat(&'static str),
}

impl SplitError {
    pub fn at(self, path: &Path) -> BuildError {
        match self {
            SplitError::Io(e) => BuildError::io(path, e),
            SplitError::InvalidFormat(reason) => BuildError::InvalidPostFormat {
                path: path.to_path_buf(),
                reason,
            },
        }
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MetadataError(String);

impl MetadataError {
    pub fn at(self, path: &Path) -> BuildError {
        BuildError::MetadataFormat {
            path: path.to_path_buf(),
            message: self.0,
        }
    }
}

/// Splits a content stream into its trimmed metadata block and trimmed body.
pub fn split_front_matter<R: Read>(mut input: R, delimiter: &str, mode: FrontMatterMode) -> Result<(String, String), SplitError> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;

    let (metadata, body) = match mode {
        FrontMatterMode::SingleDelimiter => split_single(&raw, delimiter),
        FrontMatterMode::Wrapped => split_wrapped(&raw, delimiter)?,
    };
    Ok((metadata.to_string(), body.to_string()))
}

fn split_single<'a>(raw: &'a str, delimiter: &str) -> (&'a str, &'a str) {
    if delimiter.is_empty() {
        return ("", raw.trim());
    }
    match raw.find(delimiter) {
        Some(start) => (raw[..start].trim(), raw[start + delimiter.len()..].trim()),
        None => ("", raw.trim()),
    }
}

fn split_wrapped<'a>(raw: &'a str, delimiter: &str) -> Result<(&'a str, &'a str), SplitError> {
    if delimiter.is_empty() {
        return Err(SplitError::InvalidFormat("empty front matter delimiter"));
    }

    let Some(rest) = raw.trim_start().strip_prefix(delimiter) else {
        return Err(SplitError::InvalidFormat(if raw.contains(delimiter) {
            "text before the opening front matter delimiter"
        } else {
            "missing front matter delimiter"
        }));
    };

    match rest.find(delimiter) {
        Some(end) => Ok((rest[..end].trim(), rest[end + delimiter.len()..].trim())),
        None => Err(SplitError::InvalidFormat("missing closing front matter delimiter")),
    }
}

/// Decodes a metadata block. An empty block gives the default front matter.
pub fn decode_front_matter(block: &str, format: MetadataFormat) -> Result<FrontMatter, MetadataError> {
    if block.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    match format {
        MetadataFormat::Json => serde_json::from_str(block).map_err(|e| MetadataError(e.to_string())),
        MetadataFormat::Yaml => serde_yaml_ng::from_str(block).map_err(|e| MetadataError(e.to_string())),
        MetadataFormat::Toml => decode_toml(block),
    }
}

// TOML has a native date type. `date = 2024-04-22` must end up as the same
// string a quoted date would give.
fn decode_toml(block: &str) -> Result<FrontMatter, MetadataError> {
    let mut table: toml::Table = toml::from_str(block).map_err(|e| MetadataError(e.to_string()))?;
    for key in ["date", "Date"] {
        if let Some(toml::Value::Datetime(datetime)) = table.get(key) {
            let date = datetime.to_string();
            table.insert(key.to_string(), toml::Value::String(date));
        }
    }
    toml::Value::Table(table).try_into().map_err(|e: toml::de::Error| MetadataError(e.to_string()))
}
