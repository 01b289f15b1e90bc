use std::collections::HashMap;
use std::io;
use std::io::Write;

use ramhorns::Template;

use crate::render::RenderedPost;
use crate::view::{view_tags, ViewTag};

#[derive(ramhorns::Content)]
struct IndexPage<'a> {
    posts: Vec<PostItem<'a>>,
    post_count: u32,
    tags: Vec<TagCount<'a>>,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    title: &'a str,
    date: String,
    url: &'a str,
    link: String,
    tags: Vec<ViewTag<'a>>,
    content: &'a str,
    summary: &'a str,
}

#[derive(ramhorns::Content)]
struct TagCount<'a> {
    tag: &'a str,
    count: u32,
}

/// Binds the whole, already sorted, post list to the `indexhtml` template.
pub struct IndexRenderer<'t> {
    template: &'t Template<'static>,
}

impl<'t> IndexRenderer<'t> {
    pub fn new(template: &'t Template<'static>) -> IndexRenderer<'t> {
        IndexRenderer { template }
    }

    fn view<'a>(posts: &'a [RenderedPost]) -> IndexPage<'a> {
        let post_list = posts.iter()
            .map(|rendered| PostItem {
                title: rendered.post.title.as_str(),
                date: rendered.post.date_string(),
                url: rendered.post.url.as_str(),
                link: format!("/{}", rendered.post.url),
                tags: view_tags(&rendered.post.tags),
                content: rendered.html.content.as_str(),
                summary: rendered.html.summary.as_str(),
            })
            .collect();

        IndexPage {
            posts: post_list,
            post_count: posts.len() as u32,
            tags: tag_counts(posts),
        }
    }

    #[cfg(test)]
    pub fn render(&self, posts: &[RenderedPost]) -> String {
        self.template.render(&Self::view(posts))
    }

    pub fn render_to<W: Write>(&self, writer: &mut W, posts: &[RenderedPost]) -> io::Result<()> {
        self.template.render_to_writer(writer, &Self::view(posts))
    }
}

// Most used tags first, alphabetical among equals.
fn tag_counts<'a>(posts: &'a [RenderedPost]) -> Vec<TagCount<'a>> {
    let mut tag_map: HashMap<&str, u32> = HashMap::new();
    for rendered in posts {
        for tag in rendered.post.tags.iter() {
            *tag_map.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tag_list: Vec<(&str, u32)> = tag_map.into_iter().collect();
    tag_list.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));
    tag_list.into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect()
}
