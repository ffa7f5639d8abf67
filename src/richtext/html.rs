//! Rich text to HTML

use super::{BlockKind, RichTextBlock, Span, SpanKind};
use crate::helpers::html_escape;

/// Render rich text blocks as HTML.
///
/// Consecutive list items share one `<ul>`/`<ol>`. The output is not
/// sanitized; see [`crate::helpers::Sanitizer`].
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut out = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = match block.kind {
            BlockKind::ListItem => Some("ul"),
            BlockKind::OrderedListItem => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                out.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        match block.kind {
            BlockKind::Paragraph => wrap(&mut out, "p", block, true),
            BlockKind::Heading1 => wrap(&mut out, "h1", block, true),
            BlockKind::Heading2 => wrap(&mut out, "h2", block, true),
            BlockKind::Heading3 => wrap(&mut out, "h3", block, true),
            BlockKind::Heading4 => wrap(&mut out, "h4", block, true),
            BlockKind::Heading5 => wrap(&mut out, "h5", block, true),
            BlockKind::Heading6 => wrap(&mut out, "h6", block, true),
            BlockKind::Preformatted => wrap(&mut out, "pre", block, false),
            BlockKind::ListItem | BlockKind::OrderedListItem => wrap(&mut out, "li", block, true),
            BlockKind::Image => {
                if let Some(url) = &block.url {
                    out.push_str(&format!(
                        r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                        html_escape(url),
                        html_escape(block.alt.as_deref().unwrap_or(""))
                    ));
                }
            }
            BlockKind::Embed => {
                if let Some(embed) = &block.oembed {
                    out.push_str(&format!(
                        r#"<div data-oembed="{}">{}</div>"#,
                        html_escape(embed.embed_url.as_deref().unwrap_or("")),
                        embed.html.as_deref().unwrap_or("")
                    ));
                }
            }
            BlockKind::Unknown => {
                tracing::debug!("Skipping unknown rich text block");
            }
        }
    }

    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

fn wrap(out: &mut String, tag: &str, block: &RichTextBlock, line_breaks: bool) {
    out.push_str(&format!("<{}>", tag));
    out.push_str(&render_spans(&block.text, &block.spans, line_breaks));
    out.push_str(&format!("</{}>", tag));
}

/// A span with its bounds converted to character indices
struct Placed<'a> {
    start: usize,
    end: usize,
    span: &'a Span,
}

/// Apply spans to `text`. Offsets count UTF-16 code units, as the CMS
/// editor computes them in JavaScript.
fn render_spans(text: &str, spans: &[Span], line_breaks: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    // UTF-16 offset at which each character starts, plus the total length
    let mut units = Vec::with_capacity(len + 1);
    let mut offset = 0;
    for c in &chars {
        units.push(offset);
        offset += c.len_utf16();
    }
    units.push(offset);
    let to_char = |unit: usize| units.partition_point(|&u| u < unit).min(len);

    let mut spans: Vec<Placed> = spans
        .iter()
        .map(|span| Placed {
            start: to_char(span.start),
            end: to_char(span.end),
            span,
        })
        .filter(|s| s.start < s.end)
        .collect();
    // Outer spans first so nested ones close before them
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut stack: Vec<&Placed> = Vec::new();
    let mut next = 0;

    for i in 0..=len {
        // Close spans ending here, reopening any that were interleaved
        if stack.iter().any(|s| s.end == i) {
            let mut reopen = Vec::new();
            while let Some(placed) = stack.pop() {
                out.push_str(close_tag(placed.span));
                if placed.end != i {
                    reopen.push(placed);
                }
                if !stack.iter().any(|s| s.end == i) {
                    break;
                }
            }
            for placed in reopen.into_iter().rev() {
                out.push_str(&open_tag(placed.span));
                stack.push(placed);
            }
        }

        while next < spans.len() && spans[next].start == i {
            out.push_str(&open_tag(spans[next].span));
            stack.push(&spans[next]);
            next += 1;
        }

        if i < len {
            match chars[i] {
                '\n' if line_breaks => out.push_str("<br />"),
                c => push_escaped(&mut out, c),
            }
        }
    }

    out
}

fn open_tag(span: &Span) -> String {
    match span.kind {
        SpanKind::Strong => "<strong>".to_string(),
        SpanKind::Em => "<em>".to_string(),
        SpanKind::Hyperlink => {
            let data = span.data.as_ref();
            let href = data.map(link_href).unwrap_or_else(|| "#".to_string());
            let target = data
                .and_then(|d| d.target.as_deref())
                .map(|t| format!(r#" target="{}""#, html_escape(t)))
                .unwrap_or_default();
            format!(r#"<a href="{}"{}>"#, html_escape(&href), target)
        }
        SpanKind::Label => {
            let class = span
                .data
                .as_ref()
                .and_then(|d| d.label.as_deref())
                .unwrap_or("");
            format!(r#"<span class="{}">"#, html_escape(class))
        }
        SpanKind::Unknown => "<span>".to_string(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Label | SpanKind::Unknown => "</span>",
    }
}

fn link_href(data: &super::SpanData) -> String {
    if let Some(url) = &data.url {
        return url.clone();
    }
    match (&data.doc_type, &data.uid) {
        (Some(doc_type), Some(uid)) => format!("/{}/{}", doc_type, uid),
        _ => "#".to_string(),
    }
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        c => out.push(c),
    }
}
