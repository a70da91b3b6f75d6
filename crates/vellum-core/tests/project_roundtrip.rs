//! End-to-end project round-trip through the file store

use tempfile::TempDir;
use uuid::Uuid;

use vellum_core::text::{codec, Block, BlockKind, TextRun, LINE_SEPARATOR};
use vellum_core::{AddLocation, ItemKind, ModelKind, Project, ProjectError, StorageError};

fn dialogue(text: &str) -> Block {
    Block {
        first_line: vellum_core::FirstLineIndent::Segment,
        runs: vec![TextRun::plain(text)],
        ..Block::paragraph()
    }
}

#[test]
fn full_project_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("novel");

    let mut project = Project::create(&path, "Round Trip").unwrap();

    // Outline: a book with a front page and two chapters of scenes
    let book = project
        .add_child(ModelKind::Story, None, ItemKind::Book, None)
        .unwrap();
    let chp1 = project
        .add_child(ModelKind::Story, Some(book), ItemKind::Chapter, None)
        .unwrap();
    let scene = project
        .add_child(ModelKind::Story, Some(chp1), ItemKind::Scene, None)
        .unwrap();
    let chp2 = project
        .add_sibling(ModelKind::Story, chp1, ItemKind::Chapter, AddLocation::After)
        .unwrap();
    let title_page = project
        .add_sibling(ModelKind::Story, chp1, ItemKind::Page, AddLocation::Before)
        .unwrap();

    project.rename(ModelKind::Story, book, "The Novel").unwrap();
    project
        .rename(ModelKind::Story, title_page, "Title Page")
        .unwrap();
    project.set_expanded(ModelKind::Story, book, true).unwrap();
    project
        .set_word_count(ModelKind::Story, scene, 250)
        .unwrap();

    // Notes trees
    let group = project
        .add_child(ModelKind::Characters, None, ItemKind::Group, None)
        .unwrap();
    project
        .add_child(ModelKind::Characters, Some(group), ItemKind::Note, None)
        .unwrap();

    // Document body with formatting and a forced line break
    let mut bold = TextRun::plain("It was a dark ");
    bold.bold = true;
    let body = vec![
        Block::heading(1).with_text("Chapter One"),
        Block {
            runs: vec![bold, TextRun::plain("and stormy night.")],
            ..Block::paragraph()
        },
        dialogue(&format!("\"Hello,\"{LINE_SEPARATOR}she said.")),
        Block::paragraph(),
    ];
    project.open_document_or_create(scene).unwrap();
    project.document_mut().unwrap().set_content(body.clone());
    project.save().unwrap();
    drop(project);

    // Reopen from disk and verify everything survived
    let mut reopened = Project::open(&path).unwrap();
    assert_eq!(reopened.name(), "Round Trip");

    let story = reopened.tree(ModelKind::Story);
    let root = story.root();
    let book_id = story.child_at(root, 0).unwrap();
    let book_item = story.item(book_id).unwrap();
    assert_eq!(book_item.name(), "The Novel");
    assert_eq!(book_item.handle(), Some(book));
    assert!(book_item.is_expanded());

    // Sibling positions: page before chapter 1, chapter 2 after
    let rows: Vec<Uuid> = (0..story.child_count(book_id))
        .map(|row| {
            let id = story.child_at(book_id, row).unwrap();
            story.item(id).unwrap().handle().unwrap()
        })
        .collect();
    assert_eq!(rows, vec![title_page, chp1, chp2]);

    let scene_id = story.find_by_handle(scene).unwrap();
    assert_eq!(story.item(scene_id).unwrap().word_count(), 250);
    assert_eq!(story.word_total(root), 250);

    let characters = reopened.tree(ModelKind::Characters);
    assert_eq!(characters.child_count(characters.root()), 1);

    let doc = reopened.open_document(scene).unwrap();
    assert_eq!(doc.content(), body.as_slice());
}

#[test]
fn stored_body_matches_codec_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("novel");

    let mut project = Project::create(&path, "Codec Check").unwrap();
    let book = project
        .add_child(ModelKind::Story, None, ItemKind::Book, None)
        .unwrap();
    let page = project
        .add_child(ModelKind::Story, Some(book), ItemKind::Page, None)
        .unwrap();

    let body = vec![Block::heading(2).with_text("Notes")];
    project.open_document_or_create(page).unwrap();
    project.document_mut().unwrap().set_content(body.clone());
    project.save_document().unwrap();

    let raw = project.store().load_document(page).unwrap();
    assert_eq!(raw["x:content"], codec::encode(&body));
    assert_eq!(raw["x:content"][0]["u:fmt"], "h2:al");
    assert_eq!(raw["x:content"][0]["u:txt"], "t|Notes");

    let blocks = codec::decode(&raw["x:content"]);
    assert_eq!(blocks[0].kind, BlockKind::Heading(2));
}

#[test]
fn missing_body_does_not_create_document() {
    let dir = TempDir::new().unwrap();
    let mut project = Project::create(&dir.path().join("p"), "No Body").unwrap();
    let note = project
        .add_child(ModelKind::Plot, None, ItemKind::Note, None)
        .unwrap();

    assert!(matches!(
        project.open_document(note),
        Err(ProjectError::Storage(StorageError::NotFound { .. }))
    ));
    // The failed open left nothing behind
    assert!(project.document().is_none());
    assert!(!project.store().has_document(note));
}
