use std::path::Path;

pub mod collector;
pub mod front_matter;
pub mod highlight;
pub mod markup;
pub mod org_renderer;
pub mod parsing_utils;
pub mod post;

pub use front_matter::FrontMatter;
pub use post::Post;

/// Markup language of a content file, guessed from its extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentFormat {
    Markdown,
    Org,
}

impl ContentFormat {
    pub fn from_path(path: &Path) -> Option<ContentFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("md") => Some(ContentFormat::Markdown),
            Some("org") => Some(ContentFormat::Org),
            _ => None,
        }
    }
}
