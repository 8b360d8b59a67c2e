//! Markdown-to-HTML rendering for the report pane.
//!
//! The agent's output is treated as untrusted: raw HTML events from the
//! markdown stream are re-emitted as text so they reach the page escaped.
//! The stored and downloaded markdown is never altered; only this rendered
//! view is defanged.

use pulldown_cmark::{html, Event, Options, Parser};

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
