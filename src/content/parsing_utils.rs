/// The part of a raw body before the summary marker, if the marker is there.
pub fn extract_summary<'a>(raw: &'a str, marker: &str) -> Option<&'a str> {
    if marker.is_empty() {
        return None;
    }
    raw.find(marker).map(|end| raw[..end].trim_end())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reverses [`escape_html`]. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_summary() {
        let body = "Intro line.\n\n<!-- more -->\n\nRest of the post.";
        assert_eq!(extract_summary(body, "<!-- more -->"), Some("Intro line."));
        assert_eq!(extract_summary("No marker", "<!-- more -->"), None);
        assert_eq!(extract_summary(body, ""), None);
    }

    #[test]
    fn test_escape_roundtrip() {
        let src = r#"if a < b && c > "d" {}"#;
        let escaped = escape_html(src);
        assert_eq!(escaped, "if a &lt; b &amp;&amp; c &gt; &quot;d&quot; {}");
        assert_eq!(unescape_html(&escaped), src);
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }
}
