use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use lazy_static::lazy_static;
use ramhorns::{Ramhorns, Template};
use regex::Regex;
use spdlog::{debug, info};
use walkdir::WalkDir;

use crate::content::collector::walk_error;
use crate::error::BuildError;

lazy_static! {
    static ref SECTION_TAG: Regex = Regex::new(r"\{\{\s*([#^/])\s*([^}\s]+)\s*\}\}").unwrap();
}

/// The pages a build renders, each bound to one template of the layout set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TemplateRole {
    PostPage,
    IndexPage,
}

impl TemplateRole {
    pub fn logical_name(self) -> &'static str {
        match self {
            TemplateRole::PostPage => "posthtml",
            TemplateRole::IndexPage => "indexhtml",
        }
    }
}

/// All layout files, compiled together so they can include each other
/// (`{{>partials/header.html}}`).
pub struct LayoutSet {
    templates: Ramhorns,
    // logical name -> file name relative to the layout dir
    names: HashMap<String, String>,
}

impl LayoutSet {
    pub fn load(layout_dir: &Path) -> Result<LayoutSet, BuildError> {
        info!("Collecting layout files in {}", layout_dir.display());
        if !layout_dir.is_dir() {
            return Err(BuildError::NotFound(layout_dir.to_path_buf()));
        }

        let compile_error = |path: &Path, e: ramhorns::Error| BuildError::TemplateCompile {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut templates: Ramhorns = Ramhorns::lazy(layout_dir).map_err(|e| compile_error(layout_dir, e))?;
        let mut names = HashMap::new();

        for entry in WalkDir::new(layout_dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(layout_dir, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = template_name(entry.path().strip_prefix(layout_dir).unwrap_or(entry.path()));
            debug!("Got layout file: {}", name);

            let source = fs::read_to_string(entry.path()).map_err(|e| BuildError::io(entry.path(), e))?;
            check_sections(&source).map_err(|message| BuildError::TemplateCompile {
                path: entry.path().to_path_buf(),
                message,
            })?;
            templates.from_file(&name).map_err(|e| compile_error(entry.path(), e))?;

            let logical = logical_name(&name);
            if let Some(first) = names.get(&logical) {
                return Err(BuildError::DuplicateTemplate {
                    name: logical,
                    first: layout_dir.join(first),
                    second: entry.path().to_path_buf(),
                });
            }
            names.insert(logical, name);
        }

        info!("Collecting layout files done, {} templates", names.len());
        Ok(LayoutSet { templates, names })
    }

    pub fn template(&self, role: TemplateRole) -> Result<&Template<'static>, BuildError> {
        self.names.get(role.logical_name())
            .and_then(|file_name| self.templates.get(file_name))
            .ok_or(BuildError::MissingTemplate { name: role.logical_name() })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.names.len()
    }
}

// Ramhorns accepts sections that are never closed.
fn check_sections(source: &str) -> Result<(), String> {
    let mut open: Vec<&str> = vec![];
    for caps in SECTION_TAG.captures_iter(source) {
        let (Some(kind), Some(name)) = (caps.get(1), caps.get(2)) else { continue };
        if kind.as_str() != "/" {
            open.push(name.as_str());
            continue;
        }
        match open.pop() {
            Some(opened) if opened == name.as_str() => {}
            Some(opened) => return Err(format!("section {:?} closed by {{{{/{}}}}}", opened, name.as_str())),
            None => return Err(format!("unexpected closing section {:?}", name.as_str())),
        }
    }
    match open.last() {
        Some(name) => Err(format!("section {:?} is never closed", name)),
        None => Ok(()),
    }
}

fn template_name(relative: &Path) -> String {
    let parts: Vec<String> = relative.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// `post.html` -> `posthtml`, `partials/header.html` -> `partialsheaderhtml`.
pub fn logical_name(file_name: &str) -> String {
    file_name.chars().filter(|c| c.is_alphanumeric()).collect()
}
