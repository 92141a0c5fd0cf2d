//! Gemtext bodies for the dynamic pages.

use crate::feed::Status;
use crate::search::Page;

pub fn search_page(query: &str, pages: &[&Page]) -> String {
    let mut lines = vec![format!("# Search: {query}"), String::new()];

    if pages.is_empty() {
        lines.push("No pages found.".to_string());
    }
    lines.extend(
        pages
            .iter()
            .map(|page| format!("=> {} {} {}", page.url, page.date, page.title)),
    );

    lines.push(String::new());
    lines.push("=> /search New search".to_string());
    to_body(lines)
}

pub fn feed_page(statuses: &[Status]) -> String {
    let mut lines = vec!["# Microblog".to_string()];

    for status in statuses {
        lines.push(String::new());
        lines.push(format!("## {}", status.created_at.format("%Y-%m-%d %H:%M")));
        if !status.content.is_empty() {
            lines.push(status.content.clone());
        }
        lines.extend(
            status
                .links
                .iter()
                .map(|link| format!("=> {} {}", link.url, link.title)),
        );
        if !status.url.is_empty() {
            lines.push(format!("=> {} 💬 View post", status.url));
        }
    }
    to_body(lines)
}

/// Joins lines into a body where every line, the last included, ends in `\n`.
fn to_body(lines: Vec<String>) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}
