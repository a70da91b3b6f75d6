//! Rich text model
//!
//! A document body is an ordered list of blocks; a block is an ordered
//! list of text runs sharing one set of character flags. This is the
//! in-memory form the codec converts to and from the tagged JSON format.

/// Stands in for a forced line break inside a single block
///
/// Must round-trip exactly through the codec, which stores it as a
/// literal newline in the run text.
pub const LINE_SEPARATOR: char = '\u{2028}';

/// Paragraph-level block type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// Heading level 1 to 4
    Heading(u8),
}

/// Horizontal block alignment; `Leading` is the default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Leading,
    Center,
    Trailing,
    Justify,
}

/// First-line indent mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstLineIndent {
    #[default]
    None,
    /// Regular first-line indent
    Indent,
    /// Hanging indent: negative first line with a matching left margin,
    /// used for dialogue-style runs
    Segment,
}

/// A contiguous span of text with one set of character flags
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub superscript: bool,
    pub subscript: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Superscript and subscript are mutually exclusive
    pub fn set_superscript(&mut self, state: bool) {
        self.superscript = state;
        if state {
            self.subscript = false;
        }
    }

    pub fn set_subscript(&mut self, state: bool) {
        self.subscript = state;
        if state {
            self.superscript = false;
        }
    }
}

/// One paragraph-level unit of rich text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub alignment: Alignment,
    pub first_line: FirstLineIndent,
    /// Visual nesting depth 0..=9, unrelated to outline nesting
    pub indent_level: u8,
    /// An empty run list is a meaningful empty paragraph
    pub runs: Vec<TextRun>,
}

impl Block {
    pub fn paragraph() -> Self {
        Self {
            kind: BlockKind::Paragraph,
            alignment: Alignment::Leading,
            first_line: FirstLineIndent::None,
            indent_level: 0,
            runs: Vec::new(),
        }
    }

    pub fn heading(level: u8) -> Self {
        Self {
            kind: BlockKind::Heading(level.clamp(1, 4)),
            ..Self::paragraph()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.runs.push(TextRun::plain(text));
        self
    }

    /// Concatenated text of all runs, forced breaks as newlines
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .map(|run| run.text.replace(LINE_SEPARATOR, "\n"))
            .collect()
    }
}
