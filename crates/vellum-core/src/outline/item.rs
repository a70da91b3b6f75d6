//! Outline item kinds and tree nodes
//!
//! `ItemKind` is a closed enum: the adjacency table, the storage tags and
//! the capability checks are all exhaustive matches, so adding a kind
//! forces every table to be revisited.

use uuid::Uuid;

/// Structural category of an outline item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Synthetic tree root, never user-created
    Root,
    Book,
    Partition,
    Chapter,
    Scene,
    Page,
    Group,
    Note,
}

/// All non-root kinds, for table-driven tests and CLI parsing
pub const USER_KINDS: [ItemKind; 7] = [
    ItemKind::Book,
    ItemKind::Partition,
    ItemKind::Chapter,
    ItemKind::Scene,
    ItemKind::Page,
    ItemKind::Group,
    ItemKind::Note,
];

impl ItemKind {
    /// Display label for the kind
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Root => "Root",
            ItemKind::Book => "Book",
            ItemKind::Partition => "Partition",
            ItemKind::Chapter => "Chapter",
            ItemKind::Scene => "Scene",
            ItemKind::Page => "Page",
            ItemKind::Group => "Group",
            ItemKind::Note => "Note",
        }
    }

    /// Upper-case tag used in the outline JSON format
    pub fn as_tag(&self) -> &'static str {
        match self {
            ItemKind::Root => "ROOT",
            ItemKind::Book => "BOOK",
            ItemKind::Partition => "PARTITION",
            ItemKind::Chapter => "CHAPTER",
            ItemKind::Scene => "SCENE",
            ItemKind::Page => "PAGE",
            ItemKind::Group => "GROUP",
            ItemKind::Note => "NOTE",
        }
    }

    /// Parse a storage tag, case-insensitive
    pub fn from_tag(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ROOT" => Some(ItemKind::Root),
            "BOOK" => Some(ItemKind::Book),
            "PARTITION" => Some(ItemKind::Partition),
            "CHAPTER" => Some(ItemKind::Chapter),
            "SCENE" => Some(ItemKind::Scene),
            "PAGE" => Some(ItemKind::Page),
            "GROUP" => Some(ItemKind::Group),
            "NOTE" => Some(ItemKind::Note),
            _ => None,
        }
    }

    /// Whether items of this kind can hold a document body
    ///
    /// Only leaf kinds own documents; container kinds only structure the
    /// outline.
    pub fn can_hold_document(&self) -> bool {
        matches!(
            self,
            ItemKind::Chapter | ItemKind::Scene | ItemKind::Page | ItemKind::Note
        )
    }

    /// Whether the expansion flag is meaningful (and persisted) for this kind
    pub fn is_expandable(&self) -> bool {
        matches!(
            self,
            ItemKind::Book | ItemKind::Partition | ItemKind::Chapter | ItemKind::Group
        )
    }

    /// Check which child kinds an item of this kind may hold
    ///
    /// This is the authoritative adjacency table; no other code path may
    /// bypass it. The `story` flag selects between the story family and the
    /// notes family, fixed for the whole tree.
    pub fn allowed_child(&self, story: bool, child: ItemKind) -> bool {
        if story {
            match self {
                ItemKind::Root => child == ItemKind::Book,
                ItemKind::Book => matches!(
                    child,
                    ItemKind::Partition | ItemKind::Chapter | ItemKind::Page
                ),
                ItemKind::Partition => matches!(child, ItemKind::Chapter | ItemKind::Page),
                ItemKind::Chapter => child == ItemKind::Scene,
                ItemKind::Scene
                | ItemKind::Page
                | ItemKind::Group
                | ItemKind::Note => false,
            }
        } else {
            match self {
                ItemKind::Root => matches!(child, ItemKind::Group | ItemKind::Note),
                ItemKind::Group => child == ItemKind::Note,
                ItemKind::Book
                | ItemKind::Partition
                | ItemKind::Chapter
                | ItemKind::Scene
                | ItemKind::Page
                | ItemKind::Note => false,
            }
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Index-based handle into the tree's node arena
///
/// Stable for the lifetime of the node; slots of removed nodes are never
/// reused within one tree instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub(crate) usize);

/// A single outline entry
///
/// Nodes are owned exclusively by the tree arena. The parent link is an
/// index, never a second owner, so the node graph has no cycles.
#[derive(Debug, Clone)]
pub struct Item {
    pub(crate) handle: Option<Uuid>,
    pub(crate) name: String,
    pub(crate) kind: ItemKind,
    pub(crate) words: u32,
    pub(crate) expanded: bool,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
}

impl Item {
    pub(crate) fn new(
        handle: Option<Uuid>,
        name: &str,
        kind: ItemKind,
        parent: Option<ItemId>,
    ) -> Self {
        let name = name.trim();
        Self {
            handle,
            name: if name.is_empty() {
                String::from("Unnamed")
            } else {
                name.to_string()
            },
            kind,
            words: 0,
            expanded: false,
            parent,
            children: Vec::new(),
        }
    }

    /// The item's storage handle, `None` only for the synthetic root
    pub fn handle(&self) -> Option<Uuid> {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Author-reported word count, not recomputed from content
    pub fn word_count(&self) -> u32 {
        self.words
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether this item can hold a document body
    pub fn can_hold_document(&self) -> bool {
        self.kind.can_hold_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in USER_KINDS {
            assert_eq!(ItemKind::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(ItemKind::from_tag("ROOT"), Some(ItemKind::Root));
        assert_eq!(ItemKind::from_tag("chapter"), Some(ItemKind::Chapter));
        assert_eq!(ItemKind::from_tag("WIDGET"), None);
    }

    #[test]
    fn test_document_kinds() {
        assert!(ItemKind::Chapter.can_hold_document());
        assert!(ItemKind::Scene.can_hold_document());
        assert!(ItemKind::Page.can_hold_document());
        assert!(ItemKind::Note.can_hold_document());
        assert!(!ItemKind::Root.can_hold_document());
        assert!(!ItemKind::Book.can_hold_document());
        assert!(!ItemKind::Partition.can_hold_document());
        assert!(!ItemKind::Group.can_hold_document());
    }

    #[test]
    fn test_story_adjacency_table() {
        use ItemKind::*;
        let all = [Root, Book, Partition, Chapter, Scene, Page, Group, Note];
        // (parent, allowed children) pairs for the story family
        let allowed: &[(ItemKind, &[ItemKind])] = &[
            (Root, &[Book]),
            (Book, &[Partition, Chapter, Page]),
            (Partition, &[Chapter, Page]),
            (Chapter, &[Scene]),
            (Scene, &[]),
            (Page, &[]),
            (Group, &[]),
            (Note, &[]),
        ];
        for (parent, children) in allowed {
            for child in all {
                assert_eq!(
                    parent.allowed_child(true, child),
                    children.contains(&child),
                    "story: {parent} -> {child}"
                );
            }
        }
    }

    #[test]
    fn test_notes_adjacency_table() {
        use ItemKind::*;
        let all = [Root, Book, Partition, Chapter, Scene, Page, Group, Note];
        let allowed: &[(ItemKind, &[ItemKind])] = &[
            (Root, &[Group, Note]),
            (Group, &[Note]),
            (Book, &[]),
            (Partition, &[]),
            (Chapter, &[]),
            (Scene, &[]),
            (Page, &[]),
            (Note, &[]),
        ];
        for (parent, children) in allowed {
            for child in all {
                assert_eq!(
                    parent.allowed_child(false, child),
                    children.contains(&child),
                    "notes: {parent} -> {child}"
                );
            }
        }
    }

    #[test]
    fn test_blank_name_normalized() {
        let item = Item::new(Some(Uuid::new_v4()), "  ", ItemKind::Scene, None);
        assert_eq!(item.name(), "Unnamed");
    }
}
