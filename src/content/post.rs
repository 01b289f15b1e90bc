use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::content::front_matter::FrontMatter;
use crate::content::ContentFormat;
use crate::error::BuildError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    // chrono alone also takes `2023-6-1`
    static ref DATE_SHAPE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// One content file, parsed and ready to render. The body is still raw markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub title: String,
    pub published_at: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub content: String,
    pub url: String,
    pub format: ContentFormat,
    pub source: PathBuf,
}

#[derive(Debug, Error)]
pub enum PostError {
    #[error("can not parse date {value:?}, expected YYYY-MM-DD")]
    Date {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },
}

impl PostError {
    pub fn at(self, path: &Path) -> BuildError {
        match self {
            PostError::Date { value, source } => BuildError::DateFormat {
                path: path.to_path_buf(),
                value,
                source,
            },
        }
    }
}

impl Post {
    /// `relative_path` is the source path relative to the content root.
    pub fn build(front_matter: FrontMatter, content: String, relative_path: &Path, source: PathBuf, format: ContentFormat) -> Result<Post, PostError> {
        let published_at = parse_date(&front_matter.date)?;

        Ok(Post {
            title: front_matter.title,
            published_at,
            tags: front_matter.tags,
            content,
            url: post_url(relative_path),
            format,
            source,
        })
    }

    pub fn date_string(&self) -> String {
        match self.published_at {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => String::new(),
        }
    }
}

fn parse_date(date: &str) -> Result<Option<NaiveDate>, PostError> {
    let date = date.trim();
    if date.is_empty() {
        return Ok(None);
    }
    if !DATE_SHAPE.is_match(date) {
        return Err(PostError::Date { value: date.to_string(), source: None });
    }
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(d) => Ok(Some(d)),
        Err(source) => Err(PostError::Date { value: date.to_string(), source: Some(source) }),
    }
}

/// `b/c.md` becomes `b/c.html`. Always `/` separated.
pub fn post_url(relative_path: &Path) -> String {
    let html_path = relative_path.with_extension("html");
    let parts: Vec<String> = html_path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}
