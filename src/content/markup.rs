use lazy_static::lazy_static;
use markdown::{CompileOptions, Options};
use regex::{Captures, Regex};

use crate::config::ContentConfig;
use crate::content::highlight::SyntectHighlighter;
use crate::content::org_renderer::org_to_html;
use crate::content::parsing_utils::{extract_summary, unescape_html};
use crate::content::{ContentFormat, Post};
use crate::error::BuildError;

lazy_static! {
    static ref CODE_REGEX: Regex = Regex::new(
        r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>|<code>(.*?)</code>"#
    ).unwrap();
}

/// Turns a code block (or an inline code span) into HTML. `code` is the raw,
/// unescaped source; the returned HTML replaces the whole element.
pub trait CodeHighlighter {
    fn highlight(&self, code: &str, language: &str, inline: bool) -> String;
}

/// HTML produced for one post.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedContent {
    pub content: String,
    /// Everything before the summary marker, or the whole content without one.
    pub summary: String,
}

pub struct MarkupRenderer {
    summary_marker: String,
    highlighter: Option<Box<dyn CodeHighlighter>>,
}

impl MarkupRenderer {
    pub fn new(config: &ContentConfig) -> MarkupRenderer {
        let highlighter: Option<Box<dyn CodeHighlighter>> = if config.highlight {
            Some(Box::new(SyntectHighlighter::new(&config.highlight_theme)))
        } else {
            None
        };
        MarkupRenderer {
            summary_marker: config.summary_marker.clone(),
            highlighter,
        }
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn CodeHighlighter>) -> MarkupRenderer {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn render(&self, post: &Post) -> Result<RenderedContent, BuildError> {
        let to_html = |raw: &str| {
            self.render_markup(raw, post.format).map_err(|message| BuildError::Markup {
                path: post.source.clone(),
                message,
            })
        };

        let body = if self.summary_marker.is_empty() {
            post.content.clone()
        } else {
            post.content.replace(&self.summary_marker, "")
        };
        let content = to_html(&body)?;
        let summary = match extract_summary(&post.content, &self.summary_marker) {
            Some(summary) => to_html(summary)?,
            None => content.clone(),
        };

        Ok(RenderedContent { content, summary })
    }

    pub fn render_markup(&self, raw: &str, format: ContentFormat) -> Result<String, String> {
        let html = match format {
            ContentFormat::Markdown => render_markdown(raw)?,
            ContentFormat::Org => org_to_html(raw),
        };
        Ok(match self.highlighter {
            Some(ref highlighter) => highlight_code(&html, highlighter.as_ref()),
            None => html,
        })
    }
}

// Raw HTML, comments included, goes through untouched.
fn render_markdown(md_text: &str) -> Result<String, String> {
    let options = Options {
        compile: CompileOptions {
            allow_dangerous_html: true,
            ..CompileOptions::gfm()
        },
        ..Options::gfm()
    };
    markdown::to_html_with_options(md_text, &options).map_err(|e| e.reason)
}

fn highlight_code(html: &str, highlighter: &dyn CodeHighlighter) -> String {
    let result = CODE_REGEX.replace_all(html, |captures: &Captures| {
        match captures.get(3) {
            Some(inline) => highlighter.highlight(&unescape_html(inline.as_str()), "", true),
            None => {
                let language = captures.get(1).map_or("", |m| m.as_str());
                let code = captures.get(2).map_or("", |m| m.as_str());
                highlighter.highlight(&unescape_html(code), &unescape_html(language), false)
            }
        }
    });
    result.into_owned()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::test_data::POST_DATA_MD_BODY;

    use super::*;

    fn post(content: &str, format: ContentFormat) -> Post {
        Post {
            title: "t".to_string(),
            published_at: None,
            tags: vec![],
            content: content.to_string(),
            url: "t.html".to_string(),
            format,
            source: PathBuf::from("content/t.md"),
        }
    }

    fn plain() -> MarkupRenderer {
        MarkupRenderer::new(&ContentConfig { highlight: false, ..ContentConfig::default() })
    }

    struct Shouting;

    impl CodeHighlighter for Shouting {
        fn highlight(&self, code: &str, language: &str, inline: bool) -> String {
            format!("[{}|{}|{}]", language, inline, code.to_uppercase())
        }
    }

    #[test]
    fn test_markdown_summary() {
        let rendered = plain().render(&post(POST_DATA_MD_BODY, ContentFormat::Markdown)).unwrap();
        assert_eq!(rendered.summary.trim_end(), "<p>How to be a great software engineer?</p>\n<p>I will divide this in parts, non-technical and technical</p>");
        assert_eq!(rendered.content.trim_end(), r##"<p>How to be a great software engineer?</p>
<p>I will divide this in parts, non-technical and technical</p>
<h2>Non technical</h2>
<p>You finished university and learned a lot. <strong>The earlier you find that, the better.</strong></p>"##);
    }

    #[test]
    fn test_no_marker_summary_is_content() {
        let rendered = plain().render(&post("Just *one* part", ContentFormat::Markdown)).unwrap();
        assert_eq!(rendered.content.trim_end(), "<p>Just <em>one</em> part</p>");
        assert_eq!(rendered.summary, rendered.content);
    }

    #[test]
    fn test_org_format() {
        let rendered = plain().render(&post("* Head\ntext\n<!-- more -->\nrest", ContentFormat::Org)).unwrap();
        assert_eq!(rendered.summary, "<h1>Head</h1>\n<p>text</p>\n");
        assert_eq!(rendered.content, "<h1>Head</h1>\n<p>text</p>\n<p>rest</p>\n");
    }

    #[test]
    fn test_comment_opener_in_code_span() {
        let rendered = plain().render(&post("HTML comments start with `<!--`.", ContentFormat::Markdown)).unwrap();
        assert_eq!(rendered.content.trim_end(), "<p>HTML comments start with <code>&lt;!--</code>.</p>");
    }

    #[test]
    fn test_comment_in_fenced_code_is_kept() {
        let html = plain().render_markup("```html\n<!-- nav -->\n<nav></nav>\n```", ContentFormat::Markdown).unwrap();
        assert_eq!(html.trim_end(), "<pre><code class=\"language-html\">&lt;!-- nav --&gt;\n&lt;nav&gt;&lt;/nav&gt;\n</code></pre>");
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = plain().render_markup("<div class=\"note\">hi</div>\n\nText <!-- hidden --> here.", ContentFormat::Markdown).unwrap();
        assert!(html.contains("<div class=\"note\">hi</div>"));
        assert!(html.contains("<p>Text <!-- hidden --> here.</p>"));
        assert!(!html.contains("&lt;div"));
    }

    #[test]
    fn test_default_highlighting() {
        let renderer = MarkupRenderer::new(&ContentConfig::default());
        let html = renderer.render_markup("```rust\nlet a = 1 < 2;\n```\n\nUse `x<y` here.", ContentFormat::Markdown).unwrap();
        assert!(html.starts_with("<pre style=\""));
        assert!(html.contains("<span style=\""));
        assert!(html.contains("<p>Use <code>x&lt;y</code> here.</p>"));
    }

    #[test]
    fn test_custom_highlighter_hook() {
        let renderer = plain().with_highlighter(Box::new(Shouting));
        let html = renderer.render_markup("```sh\nls -la\n```", ContentFormat::Markdown).unwrap();
        assert_eq!(html.trim_end(), "[sh|false|LS -LA\n]");

        let html = renderer.render_markup("#+BEGIN_SRC\nplain\n#+END_SRC\nan =inline= bit", ContentFormat::Org).unwrap();
        assert_eq!(html, "[|false|PLAIN\n]\n<p>an [|true|INLINE] bit</p>\n");
    }
}
