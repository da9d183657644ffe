//! Line-level block grouping.
//!
//! A small state machine walks the lines of a text run. Consecutive lines of
//! the same prefix kind share one wrapper (`<ul>`, `<ol>`, `<blockquote>`);
//! a blank line closes whatever is open; all other lines accumulate into a
//! paragraph.

use std::sync::LazyLock;

use regex::Regex;

/// `1.`, `12.` and so on at the start of a line.
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // literal pattern
    Regex::new(r"^\d+\.\s*").expect("numbered pattern is valid")
});

/// Open wrapper state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    None,
    Bullet,
    Numbered,
    Quote,
}

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// `- text` or `* text`.
    Bullet(&'a str),
    /// `1. text`.
    Numbered(&'a str),
    /// `> text`.
    Quote(&'a str),
    /// Anything else.
    Plain(&'a str),
}

impl<'a> LineKind<'a> {
    /// Classifies a line by its prefix.
    pub(crate) fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Blank;
        }

        if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            return Self::Bullet(rest.trim_start());
        }

        if let Some(found) = NUMBERED.find(line) {
            return Self::Numbered(&line[found.end()..]);
        }

        if let Some(rest) = line.strip_prefix("> ") {
            return Self::Quote(rest.trim_start());
        }

        Self::Plain(line)
    }

    const fn state(self) -> BlockState {
        match self {
            Self::Bullet(_) => BlockState::Bullet,
            Self::Numbered(_) => BlockState::Numbered,
            Self::Quote(_) => BlockState::Quote,
            Self::Blank | Self::Plain(_) => BlockState::None,
        }
    }
}

struct BlockWriter<'a> {
    out: String,
    state: BlockState,
    items: Vec<&'a str>,
    paragraph: Vec<&'a str>,
}

impl<'a> BlockWriter<'a> {
    const fn new() -> Self {
        Self {
            out: String::new(),
            state: BlockState::None,
            items: Vec::new(),
            paragraph: Vec::new(),
        }
    }

    fn line(&mut self, kind: LineKind<'a>) {
        match kind {
            LineKind::Blank => {
                self.flush_paragraph();
                self.close();
            }
            LineKind::Bullet(text) | LineKind::Numbered(text) | LineKind::Quote(text) => {
                self.flush_paragraph();
                if self.state != kind.state() {
                    self.close();
                    self.state = kind.state();
                }
                self.items.push(text);
            }
            LineKind::Plain(text) => {
                self.close();
                self.paragraph.push(text);
            }
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        self.out.push_str("<p>");
        self.out.push_str(&self.paragraph.join("<br>"));
        self.out.push_str("</p>");
        self.paragraph.clear();
    }

    fn close(&mut self) {
        match self.state {
            BlockState::None => {}
            BlockState::Bullet => self.write_list("ul"),
            BlockState::Numbered => self.write_list("ol"),
            BlockState::Quote => {
                self.out.push_str("<blockquote>");
                self.out.push_str(&self.items.join("<br>"));
                self.out.push_str("</blockquote>");
            }
        }
        self.items.clear();
        self.state = BlockState::None;
    }

    fn write_list(&mut self, tag: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        for item in &self.items {
            self.out.push_str("<li>");
            self.out.push_str(item);
            self.out.push_str("</li>");
        }
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn finish(mut self) -> String {
        self.flush_paragraph();
        self.close();
        self.out
    }
}

/// Groups the lines of `text` into HTML blocks.
pub(crate) fn compile_blocks(text: &str) -> String {
    let mut writer = BlockWriter::new();
    for line in text.lines() {
        writer.line(LineKind::classify(line));
    }
    writer.finish()
}
