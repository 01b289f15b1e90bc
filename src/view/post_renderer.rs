use std::io;
use std::io::Write;

use ramhorns::Template;

use crate::content::markup::RenderedContent;
use crate::content::Post;
use crate::view::{view_tags, ViewTag};

#[derive(ramhorns::Content)]
struct PostView<'a> {
    title: &'a str,
    date: String,
    url: &'a str,
    link: String,
    tags: Vec<ViewTag<'a>>,
    content: &'a str,
    summary: &'a str,
}

/// Binds one post to the `posthtml` template.
pub struct PostRenderer<'t> {
    template: &'t Template<'static>,
}

impl<'t> PostRenderer<'t> {
    pub fn new(template: &'t Template<'static>) -> PostRenderer<'t> {
        PostRenderer { template }
    }

    fn view<'a>(post: &'a Post, rendered: &'a RenderedContent) -> PostView<'a> {
        PostView {
            title: post.title.as_str(),
            date: post.date_string(),
            url: post.url.as_str(),
            link: format!("/{}", post.url),
            tags: view_tags(&post.tags),
            content: rendered.content.as_str(),
            summary: rendered.summary.as_str(),
        }
    }

    #[cfg(test)]
    pub fn render(&self, post: &Post, rendered: &RenderedContent) -> String {
        self.template.render(&Self::view(post, rendered))
    }

    pub fn render_to<W: Write>(&self, writer: &mut W, post: &Post, rendered: &RenderedContent) -> io::Result<()> {
        self.template.render_to_writer(writer, &Self::view(post, rendered))
    }
}
