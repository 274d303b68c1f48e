// Re-export: turn sections back into one HTML document after editing.

use crate::blocks::{parse_blocks, Block};
use crate::error::SectionError;
use crate::sections::{Section, SectionMap};
use std::collections::HashMap;

const DEFAULT_HEADING_TAG: &str = "h2";

/// Anchor id for a section title: "2.3 Results & More" -> "23-results-more".
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_ws = false;
    for ch in title.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push('-');
                in_ws = true;
            }
            continue;
        }
        in_ws = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }

    let mut collapsed = String::with_capacity(out.len());
    for ch in out.chars() {
        if ch == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(ch);
    }
    collapsed
}

/// Tag of the first heading in `original` whose text equals `title`.
pub fn heading_tag_for(title: &str, original: &[Block]) -> &'static str {
    original
        .iter()
        .find(|b| b.kind.is_heading() && b.text == title)
        .map(|b| b.kind.tag())
        .unwrap_or(DEFAULT_HEADING_TAG)
}

/// Rebuild a full document from map-form sections, preferring non-empty
/// `edits` over the extracted content for any title present in both.
pub fn reconstruct_document(
    sections: &SectionMap,
    original_html: &str,
    edits: &HashMap<String, String>,
) -> Result<String, SectionError> {
    if sections.is_empty() {
        return Ok(original_html.to_string());
    }

    let original = parse_blocks(original_html)?;
    let mut out = String::new();
    for (title, content) in sections {
        let tag = heading_tag_for(title, &original);
        push_heading(&mut out, tag, title);
        let edited = edits.get(title).filter(|e| !e.is_empty());
        out.push_str(edited.unwrap_or(content));
    }
    Ok(out)
}

/// Emit list-form sections as HTML; the implicit level-0 section has no heading.
pub fn render_section_list(sections: &[Section]) -> String {
    let mut out = String::new();
    for s in sections {
        match s.level {
            0 => {}
            1 => push_heading(&mut out, "h1", &s.title),
            2 => push_heading(&mut out, "h2", &s.title),
            _ => push_heading(&mut out, "h3", &s.title),
        }
        out.push_str(&s.content);
    }
    out
}

fn push_heading(out: &mut String, tag: &str, title: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(&esc_text(title));
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn esc_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
