//! Document body codec
//!
//! Converts between the in-memory block/run model and the compact tagged
//! JSON array persisted on disk. Each block becomes one object with a
//! colon-joined format list under `u:fmt` and its runs under `u:txt`
//! (single run) or `x:txt` (several). A run is encoded as
//! `"<tags>|<text>"` where the tag list always starts with `t`.
//!
//! The tag grammar is a closed micro-format; the `TagBuilder`/`TagScanner`
//! pair below is the only place it is produced or consumed, which keeps
//! the encode/decode symmetry enforceable in one spot.
//!
//! Decode tolerates malformed entries: a bad block or run is logged and
//! downgraded or skipped, never fatal to the rest of the document.

use serde_json::{json, Map, Value};
use tracing::warn;

use super::block::{Alignment, Block, BlockKind, FirstLineIndent, TextRun, LINE_SEPARATOR};

/// Builds one colon-joined tag list
struct TagBuilder {
    tags: String,
}

impl TagBuilder {
    fn new(first: &str) -> Self {
        Self {
            tags: first.to_string(),
        }
    }

    fn push(&mut self, tag: &str) {
        self.tags.push(':');
        self.tags.push_str(tag);
    }

    fn finish(self) -> String {
        self.tags
    }
}

/// Splits a colon-joined tag list back into tokens
struct TagScanner<'a> {
    tokens: std::str::Split<'a, char>,
}

impl<'a> TagScanner<'a> {
    fn new(tags: &'a str) -> Self {
        Self {
            tokens: tags.split(':'),
        }
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }
}

// -----------------------------------------------------------------------
// Encode
// -----------------------------------------------------------------------

/// Encode an ordered block sequence into the tagged JSON array
pub fn encode(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(encode_block).collect())
}

fn encode_block(block: &Block) -> Value {
    let mut fmt = TagBuilder::new(match block.kind {
        BlockKind::Paragraph => "p",
        BlockKind::Heading(1) => "h1",
        BlockKind::Heading(2) => "h2",
        BlockKind::Heading(3) => "h3",
        BlockKind::Heading(_) => "h4",
    });

    // The alignment tag is always written; decode treats an absent tag
    // the same as leading, so the two are never distinguished
    fmt.push(match block.alignment {
        Alignment::Leading => "al",
        Alignment::Center => "ac",
        Alignment::Trailing => "at",
        Alignment::Justify => "aj",
    });

    match block.first_line {
        FirstLineIndent::None => {}
        FirstLineIndent::Indent => fmt.push("ti"),
        FirstLineIndent::Segment => fmt.push("sg"),
    }

    if block.indent_level > 0 {
        fmt.push(&format!("in{}", block.indent_level.min(9)));
    }

    let mut obj = Map::new();
    obj.insert("u:fmt".into(), json!(fmt.finish()));

    let frags: Vec<String> = block.runs.iter().map(encode_run).collect();
    match frags.len() {
        // An empty block still carries one empty text run
        0 => obj.insert("u:txt".into(), json!("t|")),
        1 => obj.insert("u:txt".into(), json!(frags[0])),
        _ => obj.insert("x:txt".into(), json!(frags)),
    };

    Value::Object(obj)
}

fn encode_run(run: &TextRun) -> String {
    let mut tags = TagBuilder::new("t");
    if run.bold {
        tags.push("b");
    }
    if run.italic {
        tags.push("i");
    }
    if run.underline {
        tags.push("u");
    }
    if run.strike_out {
        tags.push("s");
    }
    if run.superscript {
        tags.push("sup");
    }
    if run.subscript {
        tags.push("sub");
    }
    format!(
        "{}|{}",
        tags.finish(),
        run.text.replace(LINE_SEPARATOR, "\n")
    )
}

// -----------------------------------------------------------------------
// Decode
// -----------------------------------------------------------------------

/// Decode the tagged JSON array back into blocks
///
/// Unknown format tokens are ignored, unknown block types fall back to a
/// paragraph, and a run without the `|` separator is inserted as raw
/// unformatted text. A bare `t|` empty-run marker decodes back to a block
/// with no runs.
pub fn decode(json: &Value) -> Vec<Block> {
    let Some(entries) = json.as_array() else {
        warn!("Document content is not a JSON array");
        return Vec::new();
    };

    let mut blocks = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            warn!("Unexpected content in document array, expected an object");
            continue;
        };
        blocks.push(decode_block(obj));
    }
    blocks
}

fn decode_block(obj: &Map<String, Value>) -> Block {
    let fmt = obj.get("u:fmt").and_then(Value::as_str).unwrap_or("");
    let mut scanner = TagScanner::new(fmt);

    // The first entry describes the block type; anything unrecognized
    // falls back to a plain paragraph
    let mut block = match scanner.next() {
        Some("h1") => Block::heading(1),
        Some("h2") => Block::heading(2),
        Some("h3") => Block::heading(3),
        Some("h4") => Block::heading(4),
        _ => Block::paragraph(),
    };

    // The remaining entries are the other format flags
    for tag in scanner {
        match tag {
            "al" => block.alignment = Alignment::Leading,
            "ac" => block.alignment = Alignment::Center,
            "at" => block.alignment = Alignment::Trailing,
            "aj" => block.alignment = Alignment::Justify,
            "ti" => block.first_line = FirstLineIndent::Indent,
            "sg" => block.first_line = FirstLineIndent::Segment,
            _ => {
                if let Some(level) = parse_indent_tag(tag) {
                    block.indent_level = level;
                }
            }
        }
    }

    let mut frags: Vec<&str> = Vec::new();
    if let Some(single) = obj.get("u:txt").and_then(Value::as_str) {
        frags.push(single);
    } else if let Some(list) = obj.get("x:txt").and_then(Value::as_array) {
        frags.extend(list.iter().filter_map(Value::as_str));
    }

    for frag in frags {
        if let Some(run) = decode_run(frag) {
            block.runs.push(run);
        }
    }
    block
}

/// Parse `in<digit>` block indent tags
fn parse_indent_tag(tag: &str) -> Option<u8> {
    let digit = tag.strip_prefix("in")?;
    if digit.len() != 1 {
        return None;
    }
    digit.parse().ok()
}

fn decode_run(frag: &str) -> Option<TextRun> {
    let Some(split) = frag.find('|') else {
        // Parse failure for this run only; keep the raw text unformatted
        warn!("Could not parse format of text run");
        if frag.is_empty() {
            return None;
        }
        return Some(TextRun::plain(frag));
    };

    let mut run = TextRun::plain(frag[split + 1..].replace('\n', &LINE_SEPARATOR.to_string()));

    let mut is_text = false;
    for tag in TagScanner::new(&frag[..split]) {
        match tag {
            "t" => is_text = true,
            "b" => run.bold = true,
            "i" => run.italic = true,
            "u" => run.underline = true,
            "s" => run.strike_out = true,
            "sup" => run.set_superscript(true),
            "sub" => run.set_subscript(true),
            _ => {}
        }
    }

    // Only tagged text runs are materialized; the reserved `t` marker
    // leaves room for future non-text run kinds. The bare empty-run
    // marker stands for "no runs".
    if !is_text || (run.text.is_empty() && run == TextRun::default()) {
        return None;
    }
    Some(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> TextRun {
        TextRun::plain(text)
    }

    #[test]
    fn test_encode_example() {
        let block = Block {
            kind: BlockKind::Heading(1),
            alignment: Alignment::Leading,
            first_line: FirstLineIndent::None,
            indent_level: 0,
            runs: vec![
                TextRun {
                    bold: true,
                    ..run("Hello ")
                },
                TextRun {
                    italic: true,
                    ..run("World")
                },
            ],
        };
        let json = encode(&[block]);
        assert_eq!(json[0]["u:fmt"], "h1:al");
        assert_eq!(json[0]["x:txt"], json!(["t:b|Hello ", "t:i|World"]));
        assert!(json[0].get("u:txt").is_none());
    }

    #[test]
    fn test_single_run_uses_u_txt() {
        let block = Block::paragraph().with_text("Just text");
        let json = encode(&[block]);
        assert_eq!(json[0]["u:fmt"], "p:al");
        assert_eq!(json[0]["u:txt"], "t|Just text");
        assert!(json[0].get("x:txt").is_none());
    }

    #[test]
    fn test_empty_block_marker() {
        let json = encode(&[Block::paragraph()]);
        assert_eq!(json[0]["u:txt"], "t|");
        let blocks = decode(&json);
        assert_eq!(blocks, vec![Block::paragraph()]);
    }

    #[test]
    fn test_format_tags() {
        let block = Block {
            kind: BlockKind::Paragraph,
            alignment: Alignment::Trailing,
            first_line: FirstLineIndent::Indent,
            indent_level: 3,
            runs: vec![run("x")],
        };
        let json = encode(&[block]);
        assert_eq!(json[0]["u:fmt"], "p:at:ti:in3");

        let block = Block {
            kind: BlockKind::Heading(2),
            alignment: Alignment::Center,
            first_line: FirstLineIndent::Segment,
            indent_level: 0,
            runs: vec![run("x")],
        };
        let json = encode(&[block]);
        assert_eq!(json[0]["u:fmt"], "h2:ac:sg");
    }

    #[test]
    fn test_round_trip_all_formats() {
        let alignments = [
            Alignment::Leading,
            Alignment::Center,
            Alignment::Trailing,
            Alignment::Justify,
        ];
        let indents = [
            FirstLineIndent::None,
            FirstLineIndent::Indent,
            FirstLineIndent::Segment,
        ];
        let kinds = [
            BlockKind::Paragraph,
            BlockKind::Heading(1),
            BlockKind::Heading(2),
            BlockKind::Heading(3),
            BlockKind::Heading(4),
        ];

        let mut blocks = Vec::new();
        for (i, kind) in kinds.into_iter().enumerate() {
            for (j, alignment) in alignments.into_iter().enumerate() {
                for (k, first_line) in indents.into_iter().enumerate() {
                    blocks.push(Block {
                        kind,
                        alignment,
                        first_line,
                        indent_level: ((i + j + k) % 10) as u8,
                        runs: vec![
                            TextRun {
                                bold: i % 2 == 0,
                                italic: j % 2 == 0,
                                underline: k % 2 == 0,
                                strike_out: (i + j) % 2 == 0,
                                ..run("first ")
                            },
                            run(&format!("second{LINE_SEPARATOR}line")),
                        ],
                    });
                }
            }
        }
        // Empty block and single-run block round-trip too
        blocks.push(Block::paragraph());
        blocks.push(Block::heading(3).with_text("title"));

        assert_eq!(decode(&encode(&blocks)), blocks);
    }

    #[test]
    fn test_round_trip_sup_sub() {
        let mut sup = run("2");
        sup.set_superscript(true);
        let mut sub = run("n");
        sub.set_subscript(true);
        let blocks = vec![Block {
            runs: vec![run("x"), sup, sub],
            ..Block::paragraph()
        }];
        assert_eq!(decode(&encode(&blocks)), blocks);
    }

    #[test]
    fn test_decode_sup_sub_exclusive() {
        let json = json!([{"u:fmt": "p", "u:txt": "t:sup:sub|x"}]);
        let blocks = decode(&json);
        assert!(!blocks[0].runs[0].superscript);
        assert!(blocks[0].runs[0].subscript);
    }

    #[test]
    fn test_line_separator_round_trip() {
        let text = format!("one{LINE_SEPARATOR}two{LINE_SEPARATOR}three");
        let blocks = vec![Block::paragraph().with_text(&text)];
        let json = encode(&blocks);
        // Stored form uses literal newlines
        assert_eq!(json[0]["u:txt"], "t|one\ntwo\nthree");
        assert_eq!(decode(&json), blocks);
    }

    #[test]
    fn test_missing_separator_downgrades_run() {
        let json = json!([
            {"u:fmt": "p:al", "u:txt": "t:b|formatted"},
            {"u:fmt": "p:al", "u:txt": "no separator here"},
            {"u:fmt": "p:al", "u:txt": "t:i|also fine"},
        ]);
        let blocks = decode(&json);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].runs[0].bold);
        // The bad entry keeps its raw text, unformatted
        assert_eq!(blocks[1].runs[0], run("no separator here"));
        assert!(blocks[2].runs[0].italic);
    }

    #[test]
    fn test_unknown_block_type_falls_back() {
        let json = json!([
            {"u:fmt": "h9:ac", "u:txt": "t|odd"},
            {"u:txt": "t|no fmt"},
        ]);
        let blocks = decode(&json);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].alignment, Alignment::Center);
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].alignment, Alignment::Leading);
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let json = json!([
            "stray string",
            42,
            {"u:fmt": "p:al", "u:txt": "t|kept"},
        ]);
        let blocks = decode(&json);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "kept");
    }

    #[test]
    fn test_untagged_run_dropped() {
        // No `t` marker means the run is not a text run
        let json = json!([{"u:fmt": "p:al", "u:txt": "b|bold but untagged"}]);
        let blocks = decode(&json);
        assert!(blocks[0].runs.is_empty());
    }

    #[test]
    fn test_bad_indent_tags_ignored() {
        let json = json!([{"u:fmt": "p:al:in42:inx", "u:txt": "t|x"}]);
        let blocks = decode(&json);
        assert_eq!(blocks[0].indent_level, 0);
    }
}
