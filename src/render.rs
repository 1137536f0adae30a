// WHY: one pass over the segments yields both the highlighted markup and the copyable plain text

use crate::engine::{AnnotatedText, SegmentKind};

/// Presentation settings for the highlighted markup
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// CSS class placed on every replacement container
    pub highlight_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            highlight_class: "hl-yellow".to_string(),
        }
    }
}

/// Display and plain projections of a replace result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub display_markup: String,
    pub plain_text: String,
}

/// Render with the default highlight class
pub fn render(text: &AnnotatedText) -> Rendered {
    render_with(text, &RenderConfig::default())
}

pub fn render_with(text: &AnnotatedText, config: &RenderConfig) -> Rendered {
    let mut markup = String::new();
    let open_tag = format!("<mark class=\"{}\">", escape_html(&config.highlight_class));

    for (kind, piece) in text.pieces() {
        match kind {
            SegmentKind::Replaced => {
                markup.push_str(&open_tag);
                escape_html_into(piece, &mut markup);
                markup.push_str("</mark>");
            }
            SegmentKind::Plain => escape_html_into(piece, &mut markup),
        }
    }

    Rendered {
        display_markup: markup,
        plain_text: collapse_blank_lines(&text.plain_text()),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html_into(text, &mut out);
    out
}

/// Append `text` to `out` with `& < > " '` escaped
pub fn escape_html_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
}

/// Collapse each run of blank (whitespace-only) lines into a single empty line
///
/// Lines are split on `\n`; a trailing `\r` stays with its line, so CRLF text stays CRLF.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lines = text.split('\n').peekable();
    let mut in_blank_run = false;

    while let Some(line) = lines.next() {
        let is_last = lines.peek().is_none();
        if line.trim().is_empty() {
            if in_blank_run {
                continue;
            }
            in_blank_run = true;
            if !is_last {
                // Keep the line ending of the first blank line in the run
                out.push_str(if line.ends_with('\r') { "\r\n" } else { "\n" });
            }
            continue;
        }
        in_blank_run = false;
        out.push_str(line);
        if !is_last {
            out.push('\n');
        }
    }

    out
}
