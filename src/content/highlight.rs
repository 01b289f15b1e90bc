use spdlog::warn;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::content::markup::CodeHighlighter;
use crate::content::parsing_utils::escape_html;

pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Colours fenced code with inline styles from a bundled syntect theme.
/// Inline code spans and blocks in unknown languages are left plain.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl SyntectHighlighter {
    pub fn new(theme_name: &str) -> SyntectHighlighter {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                warn!("Unknown highlight theme {:?}, using {}", theme_name, DEFAULT_THEME);
                themes.remove(DEFAULT_THEME).unwrap_or_default()
            }
        };

        SyntectHighlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str, inline: bool) -> String {
        if inline {
            return format!("<code>{}</code>", escape_html(code));
        }

        let syntax = match language {
            "" => None,
            lang => self.syntaxes.find_syntax_by_token(lang),
        };
        let highlighted = syntax
            .and_then(|syntax| highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme).ok());

        match highlighted {
            Some(html) => html,
            None if language.is_empty() => format!("<pre><code>{}</code></pre>", escape_html(code)),
            None => format!("<pre><code class=\"language-{}\">{}</code></pre>", escape_html(language), escape_html(code)),
        }
    }
}
