//! Built-in markdown to reStructuredText renderer

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use relnote_core::{ConvertError, Dialect, Result};
use tracing::debug;

use super::MarkupConverter;

/// Columns code block content is indented by
const CODE_INDENT: usize = 3;

/// In-process converter for the markdown family to reStructuredText.
///
/// Covers what release-note fragments typically contain: paragraphs, inline
/// emphasis and code, links, headings, nested lists, code blocks and rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeConverter;

impl NativeConverter {
    /// Create the converter
    pub fn new() -> Self {
        Self
    }

    /// Whether this converter handles the dialect pair
    pub fn supports(from: Dialect, to: Dialect) -> bool {
        from == to || (from.is_markdown() && to == Dialect::Rst)
    }
}

impl MarkupConverter for NativeConverter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn convert(&self, text: &str, from: Dialect, to: Dialect) -> Result<String> {
        if from == to {
            return Ok(text.to_string());
        }
        if !Self::supports(from, to) {
            return Err(ConvertError::Unsupported {
                backend: self.name().to_string(),
                from: from.to_string(),
                to: to.to_string(),
            }
            .into());
        }

        let converted = markdown_to_rst(text);
        debug!(
            input_len = text.len(),
            output_len = converted.len(),
            "native conversion finished"
        );
        Ok(converted)
    }
}

/// Render markdown as reStructuredText
pub fn markdown_to_rst(text: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut writer = RstWriter::default();
    // Merged so escaping sees whole runs of text, not parser fragments
    for event in TextMergeStream::new(Parser::new_ext(text, options)) {
        writer.event(event);
    }
    writer.finish()
}

#[derive(Default)]
struct RstWriter {
    out: String,
    indent: usize,
    /// Open lists; ordered lists carry their next number
    lists: Vec<Option<u64>>,
    /// Width of each open item marker
    markers: Vec<usize>,
    /// Output offsets where open headings and links begin
    marks: Vec<usize>,
    /// Destinations of open links and images
    links: Vec<String>,
    in_code: bool,
    /// Directly after a list marker, before any content
    at_item_start: bool,
}

impl RstWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline(&format!("``{}``", code)),
            Event::Html(html) | Event::InlineHtml(html) => self.inline(&html),
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Rule => {
                self.start_block();
                self.out.push_str("----\n");
            }
            Event::TaskListMarker(done) => self.inline(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => self.start_block(),
            Tag::Heading { .. } => {
                self.start_block();
                self.marks.push(self.out.len());
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next(),
                    CodeBlockKind::Indented => None,
                };
                match lang {
                    Some(lang) => self.out.push_str(&format!(".. code:: {}\n\n", lang)),
                    None => self.out.push_str("::\n\n"),
                }
                self.in_code = true;
            }
            Tag::List(first) => {
                self.separate();
                self.lists.push(first);
            }
            Tag::Item => {
                if !self.out.is_empty() && !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{}. ", number);
                        *number += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.pad(self.indent);
                self.out.push_str(&marker);
                self.indent += marker.len();
                self.markers.push(marker.len());
                self.at_item_start = true;
            }
            Tag::Emphasis => self.inline("*"),
            Tag::Strong => self.inline("**"),
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.at_item_start = false;
                self.marks.push(self.out.len());
                self.links.push(dest_url.to_string());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock => self.end_block(),
            TagEnd::Heading(level) => {
                let start = self.marks.pop().unwrap_or(self.out.len());
                let width = self.out[start..].chars().count().max(1);
                self.out.push('\n');
                self.pad(self.indent);
                self.out.push_str(&underline(level).to_string().repeat(width));
                self.out.push('\n');
            }
            TagEnd::CodeBlock => {
                self.in_code = false;
                self.end_block();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if !self.lists.is_empty() {
                    // A nested list needs a blank line before the parent continues
                    self.end_block();
                    if !self.out.ends_with("\n\n") {
                        self.out.push('\n');
                    }
                }
            }
            TagEnd::Item => {
                let width = self.markers.pop().unwrap_or(0);
                self.indent = self.indent.saturating_sub(width);
                self.at_item_start = false;
                self.end_block();
            }
            TagEnd::Emphasis => self.inline("*"),
            TagEnd::Strong => self.inline("**"),
            TagEnd::Link | TagEnd::Image => {
                let start = self.marks.pop().unwrap_or(self.out.len());
                let dest = self.links.pop().unwrap_or_default();
                let label = self.out.split_off(start);
                if label.is_empty() || label == dest {
                    self.out.push_str(&dest);
                } else {
                    self.out.push_str(&format!("`{} <{}>`__", label, dest));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.in_code {
            self.inline(&escape(text));
            return;
        }

        for line in text.split_inclusive('\n') {
            if line.trim().is_empty() {
                self.out.push('\n');
            } else {
                self.pad(self.indent + CODE_INDENT);
                self.out.push_str(line);
            }
        }
    }

    fn inline(&mut self, text: &str) {
        self.at_item_start = false;
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.pad(self.indent);
    }

    fn pad(&mut self, width: usize) {
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    /// Ensure a blank line separates the next block from what came before
    fn separate(&mut self) {
        if self.out.is_empty() || self.at_item_start || self.out.ends_with("\n\n") {
            return;
        }
        if self.out.ends_with('\n') {
            self.out.push('\n');
        } else {
            self.out.push_str("\n\n");
        }
    }

    fn start_block(&mut self) {
        if self.at_item_start {
            return;
        }
        self.separate();
        self.pad(self.indent);
    }

    fn end_block(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn finish(self) -> String {
        let trimmed = self.out.trim_end();
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}\n", trimmed)
        }
    }
}

fn underline(level: HeadingLevel) -> char {
    match level {
        HeadingLevel::H1 => '=',
        HeadingLevel::H2 => '-',
        HeadingLevel::H3 => '~',
        HeadingLevel::H4 => '^',
        HeadingLevel::H5 => '"',
        HeadingLevel::H6 => '\'',
    }
}

/// Backslash-escape characters that carry inline markup meaning in rst.
///
/// `_` only needs escaping where it could end a hyperlink reference, so
/// `snake_case` is left alone while `foo_` becomes `foo\_`.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let needs_escape = match c {
            '\\' | '*' | '`' | '|' => true,
            '_' => !chars.peek().is_some_and(|next| next.is_alphanumeric()),
            _ => false,
        };
        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
