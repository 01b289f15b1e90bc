use std::fs;
use std::path::Path;

pub const POST_DATA_JSON: &str = r#"{
  "title": "What I learned after 20+ years of software development",
  "date": "2022-04-02",
  "tags": ["career", "programming"]
}
+++

How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer. After thinking for a while, I came up with a list of what I try to do myself.

I will divide this in parts, non-technical and technical

<!-- more -->

## Non technical

### Have a honest image of yourself

You finished university and learned a lot. You solved many hard problems.
"#;

pub const POST_DATA_MD_BODY: &str = "How to be a great software engineer?

I will divide this in parts, non-technical and technical

<!-- more -->

## Non technical

You finished university and learned a lot. __The earlier you find that, the better.__";

pub const POST_DATA_ORG: &str = r#"{"title": "An org post", "date": "2023-02-11", "tags": ["org"]}
+++
Org posts are rendered too.

* Section

#+begin_src sh
ls -la
#+end_src
"#;

pub const POST_DATA_WRAPPED_TOML: &str = "+++
title = \"Wrapped\"
date = 2023-06-01
tags = [\"toml\"]
+++

Wrapped body.

+++ is fine in the body
";

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn write_layouts(dir: &Path) {
    write_file(&dir.join("partials/header.html"), "<header>Blog</header>\n");
    write_file(&dir.join("post.html"), "{{>partials/header.html}}<h1>{{title}}</h1>\n<time>{{date}}</time>\n<article>{{{content}}}</article>\n");
    write_file(&dir.join("index.html"), "{{>partials/header.html}}<ul>\n{{#posts}}<li><a href=\"{{link}}\">{{title}}</a> {{date}}</li>\n{{/posts}}</ul>\n");
}
