use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use spdlog::{debug, info};
use walkdir::WalkDir;

use crate::config::FrontMatterConfig;
use crate::content::front_matter::{decode_front_matter, split_front_matter};
use crate::content::{ContentFormat, Post};
use crate::error::BuildError;

/// Converts a walk failure into a `BuildError` carrying the failing path.
pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> BuildError {
    let path = err.path().unwrap_or(root).to_path_buf();
    BuildError::io(path, io::Error::from(err))
}

/// Reads every `.md` and `.org` file under `content_dir`, in file name order.
/// Stops at the first file that can not be turned into a post.
pub fn collect_posts(content_dir: &Path, front_matter: &FrontMatterConfig) -> Result<Vec<Post>, BuildError> {
    info!("Collecting content in {}", content_dir.display());
    if !content_dir.is_dir() {
        return Err(BuildError::NotFound(content_dir.to_path_buf()));
    }

    let mut posts = vec![];
    let mut urls: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(content_dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(content_dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(format) = ContentFormat::from_path(entry.path()) else {
            debug!("Skipping {}", entry.path().display());
            continue;
        };

        let post = read_post(content_dir, entry.path(), format, front_matter)?;
        if let Some(first) = urls.insert(post.url.clone(), post.source.clone()) {
            return Err(BuildError::DuplicateUrl {
                url: post.url,
                first,
                second: post.source,
            });
        }
        posts.push(post);
    }

    info!("Collected {} posts", posts.len());
    Ok(posts)
}

fn read_post(content_dir: &Path, path: &Path, format: ContentFormat, front_matter: &FrontMatterConfig) -> Result<Post, BuildError> {
    debug!("Processing content file {}", path.display());
    let file = File::open(path).map_err(|e| BuildError::io(path, e))?;

    let (metadata, body) = split_front_matter(file, &front_matter.delimiter, front_matter.mode)
        .map_err(|e| e.at(path))?;
    let decoded = decode_front_matter(&metadata, front_matter.format)
        .map_err(|e| e.at(path))?;

    let relative_path = path.strip_prefix(content_dir).unwrap_or(path);
    Post::build(decoded, body, relative_path, path.to_path_buf(), format)
        .map_err(|e| e.at(path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::config::{FrontMatterMode, MetadataFormat};
    use crate::test_data::{write_file, POST_DATA_JSON, POST_DATA_ORG};

    use super::*;

    fn content_tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("a.md"), POST_DATA_JSON);
        write_file(&root.join("b/c.md"), "{\"title\": \"C\", \"date\": \"2023-06-01\"}\n+++\nSee C.");
        write_file(&root.join("b/d.org"), POST_DATA_ORG);
        write_file(&root.join("b/notes.txt"), "not a post");
        fs::create_dir_all(root.join("empty")).unwrap();
        dir
    }

    #[test]
    fn test_collect_posts() {
        let dir = content_tree();
        let posts = collect_posts(dir.path(), &FrontMatterConfig::default()).unwrap();

        let urls: Vec<&str> = posts.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, ["a.html", "b/c.html", "b/d.html"]);
        assert_eq!(posts[0].title, "What I learned after 20+ years of software development");
        assert_eq!(posts[1].title, "C");
        assert_eq!(posts[1].published_at, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(posts[1].content, "See C.");
        assert_eq!(posts[2].format, ContentFormat::Org);
        assert_eq!(posts[2].source, dir.path().join("b/d.org"));
    }

    #[test]
    fn test_collect_is_repeatable() {
        let dir = content_tree();
        let first = collect_posts(dir.path(), &FrontMatterConfig::default()).unwrap();
        let second = collect_posts(dir.path(), &FrontMatterConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("content");
        let err = collect_posts(&missing, &FrontMatterConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::NotFound(ref p) if *p == missing));
    }

    #[test]
    fn test_bad_date_names_file() {
        let dir = content_tree();
        let bad = dir.path().join("b/bad.md");
        write_file(&bad, "{\"title\": \"Bad\", \"date\": \"13/13/2023\"}\n+++\nbody");
        let err = collect_posts(dir.path(), &FrontMatterConfig::default()).unwrap_err();
        match err {
            BuildError::DateFormat { path, value, .. } => {
                assert_eq!(path, bad);
                assert_eq!(value, "13/13/2023");
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn test_malformed_metadata_names_file() {
        let dir = content_tree();
        let bad = dir.path().join("broken.md");
        write_file(&bad, "{\"title\": \n+++\nbody");
        let err = collect_posts(dir.path(), &FrontMatterConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::MetadataFormat { ref path, .. } if *path == bad));
        assert!(err.to_string().starts_with(&bad.display().to_string()));
    }

    #[test]
    fn test_missing_delimiter_single_mode() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("note.md"), "\n# A note\n\nWithout any header.\n\n");
        let posts = collect_posts(dir.path(), &FrontMatterConfig::default()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "# A note\n\nWithout any header.");
        assert_eq!(posts[0].title, "");
        assert_eq!(posts[0].published_at, None);
        assert!(posts[0].tags.is_empty());
    }

    #[test]
    fn test_missing_delimiter_wrapped_mode() {
        let dir = tempfile::tempdir().unwrap();
        let note = dir.path().join("note.md");
        write_file(&note, "\n# A note\n\nWithout any header.\n\n");
        let config = FrontMatterConfig {
            mode: FrontMatterMode::Wrapped,
            format: MetadataFormat::Toml,
            ..FrontMatterConfig::default()
        };
        let err = collect_posts(dir.path(), &config).unwrap_err();
        assert!(matches!(err, BuildError::InvalidPostFormat { ref path, .. } if *path == note));
    }

    #[test]
    fn test_duplicate_url() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("same.md"), "{}\n+++\nmarkdown");
        write_file(&dir.path().join("same.org"), "{}\n+++\norg");
        let err = collect_posts(dir.path(), &FrontMatterConfig::default()).unwrap_err();
        match err {
            BuildError::DuplicateUrl { url, first, second } => {
                assert_eq!(url, "same.html");
                assert_eq!(first, dir.path().join("same.md"));
                assert_eq!(second, dir.path().join("same.org"));
            }
            other => panic!("unexpected error {}", other),
        }
    }
}
