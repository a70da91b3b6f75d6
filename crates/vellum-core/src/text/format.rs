//! Format catalog
//!
//! Fixed table of paragraph and heading presets derived from one base
//! font size. The catalog is supplied by configuration and consumed
//! read-only by the codec and by whatever renders blocks.

use super::block::{Block, BlockKind, FirstLineIndent};

/// Effective metrics for rendering one block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    /// 0 for paragraphs, 1..=4 for headings
    pub heading_level: u8,
    pub font_size: f32,
    pub line_height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// First-line indent; negative for hanging (segment) indents
    pub text_indent: f32,
    pub left_margin: f32,
    /// Visual nesting depth carried through from the block
    pub indent_level: u8,
}

/// Preset styles for every block kind, derived from the base font size
#[derive(Debug, Clone)]
pub struct FormatCatalog {
    font_size: f32,
    text_indent: f32,
    tab_width: f32,
    paragraph: BlockStyle,
    headers: [BlockStyle; 4],
}

impl FormatCatalog {
    /// Build the catalog from a base font size
    ///
    /// Heading sizes scale the base by 2.2 / 1.9 / 1.6 / 1.3; margins and
    /// the indent widths scale with it too, so the whole document follows
    /// one setting.
    pub fn new(font_size: f32) -> Self {
        let font_size = font_size.max(5.0);
        let text_indent = 2.0 * font_size;
        let tab_width = 2.0 * font_size;

        let paragraph = BlockStyle {
            heading_level: 0,
            font_size,
            line_height: 1.15,
            top_margin: 0.5 * font_size,
            bottom_margin: 0.5 * font_size,
            text_indent: 0.0,
            left_margin: 0.0,
            indent_level: 0,
        };

        let header_bottom = 0.7 * font_size;
        let header = |level: u8, scale: f32| BlockStyle {
            heading_level: level,
            font_size: scale * font_size,
            top_margin: scale * font_size,
            bottom_margin: header_bottom,
            ..paragraph
        };

        Self {
            font_size,
            text_indent,
            tab_width,
            paragraph,
            headers: [
                header(1, 2.2),
                header(2, 1.9),
                header(3, 1.6),
                header(4, 1.3),
            ],
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Width of a regular first-line indent
    pub fn text_indent(&self) -> f32 {
        self.text_indent
    }

    /// Width of the hanging (segment) indent and its left margin
    pub fn tab_width(&self) -> f32 {
        self.tab_width
    }

    /// Base preset for a block kind
    ///
    /// Out-of-range heading levels fall back to the paragraph preset.
    pub fn preset(&self, kind: BlockKind) -> &BlockStyle {
        match kind {
            BlockKind::Paragraph => &self.paragraph,
            BlockKind::Heading(level @ 1..=4) => &self.headers[(level - 1) as usize],
            BlockKind::Heading(_) => &self.paragraph,
        }
    }

    /// Resolve a block to its effective style
    ///
    /// `Indent` applies the regular first-line indent; `Segment` applies a
    /// negative first-line indent with a matching left margin so the
    /// hanging indent renders correctly.
    pub fn resolve(&self, block: &Block) -> BlockStyle {
        let mut style = *self.preset(block.kind);
        match block.first_line {
            FirstLineIndent::None => {}
            FirstLineIndent::Indent => style.text_indent = self.text_indent,
            FirstLineIndent::Segment => {
                style.text_indent = -self.tab_width;
                style.left_margin = self.tab_width;
            }
        }
        style.indent_level = block.indent_level;
        style
    }
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::new(13.0)
    }
}
