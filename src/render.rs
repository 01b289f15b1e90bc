use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use spdlog::{debug, info};

use crate::content::markup::{MarkupRenderer, RenderedContent};
use crate::content::Post;
use crate::error::BuildError;
use crate::layout::{LayoutSet, TemplateRole};
use crate::view::index_renderer::IndexRenderer;
use crate::view::post_renderer::PostRenderer;

pub const INDEX_FILE_NAME: &str = "index.html";

/// A post together with its HTML.
pub struct RenderedPost<'p> {
    pub post: &'p Post,
    pub html: RenderedContent,
}

/// Most recent first. Undated posts go last; equal dates keep their order.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

fn create_output(path: &Path) -> Result<BufWriter<File>, BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| BuildError::io(path, e))?;
    Ok(BufWriter::new(file))
}

/// Writes `publish_dir/<url>` for every post with the `posthtml` template.
pub fn render_posts<'p>(posts: &'p [Post], layouts: &LayoutSet, markup: &MarkupRenderer, publish_dir: &Path) -> Result<Vec<RenderedPost<'p>>, BuildError> {
    let renderer = PostRenderer::new(layouts.template(TemplateRole::PostPage)?);
    let mut rendered = Vec::with_capacity(posts.len());

    for post in posts {
        let html = markup.render(post)?;
        let out_path = publish_dir.join(&post.url);
        let mut writer = create_output(&out_path)?;
        renderer.render_to(&mut writer, post, &html)
            .and_then(|_| writer.flush())
            .map_err(|source| BuildError::TemplateExec {
                target: format!("{} ({})", post.url, post.source.display()),
                source,
            })?;
        debug!("Rendered {} -> {}", post.source.display(), out_path.display());
        rendered.push(RenderedPost { post, html });
    }

    info!("Rendered {} posts", rendered.len());
    Ok(rendered)
}

/// Writes `publish_dir/index.html` with the `indexhtml` template.
pub fn render_index(posts: &[RenderedPost], layouts: &LayoutSet, publish_dir: &Path) -> Result<PathBuf, BuildError> {
    let renderer = IndexRenderer::new(layouts.template(TemplateRole::IndexPage)?);
    let out_path = publish_dir.join(INDEX_FILE_NAME);
    let mut writer = create_output(&out_path)?;
    renderer.render_to(&mut writer, posts)
        .and_then(|_| writer.flush())
        .map_err(|source| BuildError::TemplateExec {
            target: INDEX_FILE_NAME.to_string(),
            source,
        })?;

    info!("Rendered {}", out_path.display());
    Ok(out_path)
}
