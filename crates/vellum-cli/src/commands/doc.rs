//! Document commands: show, import

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use vellum_core::text::LINE_SEPARATOR;
use vellum_core::{Block, Project, TextRun};

use super::parse_handle;
use crate::output::Output;

pub fn show(path: &Path, handle: &str, output: &Output) -> Result<()> {
    let handle = parse_handle(handle)?;
    let mut project =
        Project::open(path).with_context(|| format!("Failed to open project at {:?}", path))?;
    let doc = project
        .open_document(handle)
        .with_context(|| format!("Failed to open document {handle}"))?;

    if output.is_quiet() {
        return Ok(());
    }
    let text: Vec<String> = doc.content().iter().map(Block::plain_text).collect();
    println!("{}", text.join("\n\n"));
    Ok(())
}

pub fn import(path: &Path, handle: &str, file: Option<&Path>, output: &Output) -> Result<()> {
    let handle = parse_handle(handle)?;
    let text = match file {
        Some(file) => std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read input file {:?}", file))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let blocks = text_to_blocks(&text);
    let count = blocks.len();

    let mut project =
        Project::open(path).with_context(|| format!("Failed to open project at {:?}", path))?;
    project.open_document_or_create(handle)?;
    if let Some(doc) = project.document_mut() {
        doc.set_content(blocks);
    }
    project.save_document()?;
    project.close_document()?;

    output.message(&format!("Imported {count} paragraphs into {handle}"));
    Ok(())
}

/// Blank-line separated paragraphs; single newlines become forced breaks
fn text_to_blocks(text: &str) -> Vec<Block> {
    text.split("\n\n")
        .map(str::trim_end)
        .filter(|para| !para.is_empty())
        .map(|para| {
            let joined = para
                .lines()
                .collect::<Vec<_>>()
                .join(&LINE_SEPARATOR.to_string());
            Block {
                runs: vec![TextRun::plain(joined)],
                ..Block::paragraph()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_blocks() {
        let blocks = text_to_blocks("first para\n\nsecond line one\nline two\n\n\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].plain_text(), "first para");
        assert_eq!(
            blocks[1].runs[0].text,
            format!("second line one{LINE_SEPARATOR}line two")
        );
    }
}
