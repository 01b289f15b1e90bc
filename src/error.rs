use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a site build. Each variant names the file or
/// directory it came from.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: can not parse front matter: {message}", path.display())]
    MetadataFormat { path: PathBuf, message: String },

    #[error("{}: can not parse date {value:?}, expected YYYY-MM-DD", path.display())]
    DateFormat {
        path: PathBuf,
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("{}: invalid post format: {reason}", path.display())]
    InvalidPostFormat { path: PathBuf, reason: &'static str },

    #[error("{url} is produced by both {} and {}", first.display(), second.display())]
    DuplicateUrl {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{}: error parsing template: {message}", path.display())]
    TemplateCompile { path: PathBuf, message: String },

    #[error("layout files {} and {} both map to template {name:?}", first.display(), second.display())]
    DuplicateTemplate {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no layout file provides the {name:?} template")]
    MissingTemplate { name: &'static str },

    #[error("error rendering {target}: {source}")]
    TemplateExec {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("{}: error rendering markup: {message}", path.display())]
    Markup { path: PathBuf, message: String },
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
