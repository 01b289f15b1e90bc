//! A small Org-mode to HTML converter.
//!
//! Covers what blog posts usually use: headlines, paragraphs, plain and
//! numbered lists, `#+BEGIN_SRC`/`#+BEGIN_EXAMPLE`/`#+BEGIN_QUOTE` blocks,
//! horizontal rules, links and the `*bold*`, `/italic/`, `=verbatim=` and
//! `~code~` inline markers. Keyword lines (`#+TITLE:` and friends) and
//! comment lines are dropped. Anything else is rendered as paragraph text.

use std::str::Lines;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::content::parsing_utils::escape_html;

lazy_static! {
    static ref HEADLINE: Regex = Regex::new(r"^(\*+)\s+(.*)$").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"^\s*([-+]|\d+[.)])\s+(.*)$").unwrap();
    static ref BLOCK_BEGIN: Regex = Regex::new(r"(?i)^#\+begin_(\w+)(?:\s+(\S+))?").unwrap();
    static ref RULE: Regex = Regex::new(r"^-{5,}$").unwrap();
    static ref INLINE_ATOM: Regex = Regex::new(
        r"[=~]([^\s=~](?:[^=~]*?[^\s=~])?)[=~]|\[\[([^\]]+)\](?:\[([^\]]+)\])?\]"
    ).unwrap();
    static ref BOLD: Regex = Regex::new(r"(^|[^\w*])\*([^*\s](?:[^*]*?[^*\s])?)\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r#"(^|[^\w/:"=<])/([^/\s](?:[^/]*?[^/\s])?)/"#).unwrap();
}

#[derive(PartialEq)]
enum ListKind {
    Unordered,
    Ordered,
}

#[derive(Default)]
struct HtmlWriter {
    html: String,
    paragraph: Vec<String>,
    list: Option<(ListKind, Vec<String>)>,
}

impl HtmlWriter {
    fn flush(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join(" ");
            self.html.push_str(&format!("<p>{}</p>\n", render_inline(&text)));
            self.paragraph.clear();
        }
        if let Some((kind, items)) = self.list.take() {
            let tag = match kind {
                ListKind::Unordered => "ul",
                ListKind::Ordered => "ol",
            };
            self.html.push_str(&format!("<{}>\n", tag));
            for item in items {
                self.html.push_str(&format!("<li>{}</li>\n", render_inline(&item)));
            }
            self.html.push_str(&format!("</{}>\n", tag));
        }
    }

    fn push_block(&mut self, block: &str) {
        self.flush();
        self.html.push_str(block);
    }
}

pub fn org_to_html(src: &str) -> String {
    let mut out = HtmlWriter::default();
    let mut lines = src.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            out.flush();
        } else if let Some(caps) = HEADLINE.captures(line) {
            let level = caps[1].len().min(6);
            let heading = format!("<h{level}>{}</h{level}>\n", render_inline(caps[2].trim()));
            out.push_block(&heading);
        } else if let Some(caps) = BLOCK_BEGIN.captures(trimmed) {
            let kind = caps[1].to_lowercase();
            let inner = collect_block(&mut lines, &kind);
            let block = match kind.as_str() {
                "src" => match caps.get(2) {
                    Some(lang) => format!("<pre><code class=\"language-{}\">{}</code></pre>\n", escape_html(lang.as_str()), escape_html(&inner)),
                    None => format!("<pre><code>{}</code></pre>\n", escape_html(&inner)),
                },
                "quote" => format!("<blockquote>\n{}</blockquote>\n", org_to_html(&inner)),
                _ => format!("<pre>{}</pre>\n", escape_html(&inner)),
            };
            out.push_block(&block);
        } else if trimmed.starts_with("#+") || trimmed == "#" || trimmed.starts_with("# ") {
            out.flush();
        } else if RULE.is_match(trimmed) {
            out.push_block("<hr />\n");
        } else if let Some(caps) = LIST_ITEM.captures(line) {
            if !out.paragraph.is_empty() {
                out.flush();
            }
            let kind = if caps[1].starts_with(['-', '+']) { ListKind::Unordered } else { ListKind::Ordered };
            let same_kind = matches!(out.list, Some((ref current, _)) if *current == kind);
            if !same_kind {
                out.flush();
                out.list = Some((kind, Vec::new()));
            }
            if let Some((_, ref mut items)) = out.list {
                items.push(caps[2].trim().to_string());
            }
        } else if line.starts_with(char::is_whitespace) && out.list.is_some() {
            if let Some((_, ref mut items)) = out.list {
                if let Some(last) = items.last_mut() {
                    last.push(' ');
                    last.push_str(trimmed);
                }
            }
        } else {
            if out.list.is_some() {
                out.flush();
            }
            out.paragraph.push(trimmed.to_string());
        }
    }

    out.flush();
    out.html
}

/// Reads lines up to the matching `#+END_<kind>`, which is consumed.
fn collect_block(lines: &mut Lines, kind: &str) -> String {
    let end = format!("#+end_{}", kind);
    let mut inner = String::new();
    for line in lines.by_ref() {
        if line.trim().to_lowercase() == end {
            break;
        }
        inner.push_str(line);
        inner.push('\n');
    }
    inner
}

fn render_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::new();
    let mut last = 0;

    for caps in INLINE_ATOM.captures_iter(&escaped) {
        let Some(atom) = caps.get(0) else { continue };
        let after_word = escaped[..atom.start()].chars().last().is_some_and(char::is_alphanumeric);
        if caps.get(1).is_some() && after_word {
            continue;
        }

        out.push_str(&render_emphasis(&escaped[last..atom.start()]));
        if let Some(code) = caps.get(1) {
            out.push_str(&format!("<code>{}</code>", code.as_str()));
        } else if let Some(target) = caps.get(2) {
            let label = match caps.get(3) {
                Some(label) => render_emphasis(label.as_str()),
                None => target.as_str().to_string(),
            };
            out.push_str(&format!("<a href=\"{}\">{}</a>", target.as_str(), label));
        }
        last = atom.end();
    }

    out.push_str(&render_emphasis(&escaped[last..]));
    out
}

fn render_emphasis(text: &str) -> String {
    let bold = BOLD.replace_all(text, |caps: &Captures| format!("{}<strong>{}</strong>", &caps[1], &caps[2]));
    let italic = ITALIC.replace_all(&bold, |caps: &Captures| format!("{}<em>{}</em>", &caps[1], &caps[2]));
    italic.into_owned()
}
