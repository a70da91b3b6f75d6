//! Outline tree
//!
//! The tree owns all its nodes in an index arena. Parent links are ids,
//! never a second owner, and external views address nodes through the
//! `child_count`/`child_at`/`parent_of`/`row_of` contract instead of raw
//! references. Rows are recomputed from live child order, not cached.

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::item::{Item, ItemId, ItemKind};

/// Errors from outline tree operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// Adjacency table violation
    #[error("a {child} item cannot be placed under a {parent} item")]
    InvalidChildKind { parent: ItemKind, child: ItemKind },

    /// Sibling insertion relative to the root item
    #[error("the root item cannot have siblings")]
    RootSibling,

    /// Removal of the root item
    #[error("the root item cannot be removed")]
    RootImmutable,

    /// The item id does not resolve to a live node
    #[error("item no longer exists in the tree")]
    ItemGone,

    /// The outline JSON does not start with a ROOT object
    #[error("outline data has no ROOT item")]
    NotRootDocument,
}

/// Which of the project's outline trees this is
///
/// A project holds exactly one tree per kind. `Invalid` marks an
/// unpopulated placeholder slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Invalid,
    Story,
    Plot,
    Characters,
    Locations,
}

/// The populated tree kinds, in display order
pub const MODEL_KINDS: [ModelKind; 4] = [
    ModelKind::Story,
    ModelKind::Plot,
    ModelKind::Characters,
    ModelKind::Locations,
];

impl ModelKind {
    /// Whether trees of this kind use the story type family
    ///
    /// The alternative is the notes family (groups and notes). The family
    /// is fixed at tree creation and partitions the adjacency table.
    pub fn is_story(&self) -> bool {
        matches!(self, ModelKind::Story)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Invalid => "",
            ModelKind::Story => "Story",
            ModelKind::Plot => "Plot",
            ModelKind::Characters => "Characters",
            ModelKind::Locations => "Locations",
        }
    }

    /// Icon key for the UI layer, purely presentational
    pub fn icon(&self) -> &'static str {
        match self {
            ModelKind::Invalid => "",
            ModelKind::Story => "storyModel",
            ModelKind::Plot => "plotModel",
            ModelKind::Characters => "characterModel",
            ModelKind::Locations => "locationModel",
        }
    }

    /// File stem for the tree's persisted JSON file
    pub fn file_stem(&self) -> &'static str {
        match self {
            ModelKind::Invalid => "",
            ModelKind::Story => "story",
            ModelKind::Plot => "plot",
            ModelKind::Characters => "characters",
            ModelKind::Locations => "locations",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "story" => Some(ModelKind::Story),
            "plot" => Some(ModelKind::Plot),
            "characters" => Some(ModelKind::Characters),
            "locations" => Some(ModelKind::Locations),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where to place a new sibling relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddLocation {
    Before,
    After,
}

/// One outline tree: a root item plus its descendants
#[derive(Debug)]
pub struct OutlineTree {
    kind: ModelKind,
    nodes: Vec<Option<Item>>,
    root: ItemId,
}

impl OutlineTree {
    /// Create an empty tree of the given kind
    pub fn new(kind: ModelKind) -> Self {
        let root = Item::new(None, "Root", ItemKind::Root, None);
        Self {
            kind,
            nodes: vec![Some(root)],
            root: ItemId(0),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Look up a live item
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.nodes.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    fn get(&self, id: ItemId) -> Result<&Item, TreeError> {
        self.item(id).ok_or(TreeError::ItemGone)
    }

    /// Number of live items, root included
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Add a new item under `parent` from user input
    ///
    /// A fresh handle is minted and the name defaults to "New <label>".
    /// The insert position clamps to append when out of range. Fails with
    /// `InvalidChildKind` when the adjacency table forbids the pairing.
    pub fn add_child(
        &mut self,
        parent: ItemId,
        kind: ItemKind,
        pos: Option<usize>,
    ) -> Result<ItemId, TreeError> {
        let name = format!("New {}", kind.label());
        self.insert(parent, Some(Uuid::new_v4()), &name, kind, pos)
    }

    /// Add a new item next to `anchor`
    ///
    /// Resolves to an `add_child` on the anchor's parent, at the anchor's
    /// row for `Before` and one past it for `After`.
    pub fn add_sibling(
        &mut self,
        anchor: ItemId,
        kind: ItemKind,
        loc: AddLocation,
    ) -> Result<ItemId, TreeError> {
        let parent = self.get(anchor)?.parent.ok_or(TreeError::RootSibling)?;
        let row = self.row_of(anchor).ok_or(TreeError::ItemGone)?;
        let pos = match loc {
            AddLocation::Before => row,
            AddLocation::After => row + 1,
        };
        self.add_child(parent, kind, Some(pos))
    }

    /// Shared insertion path for user input and JSON load
    fn insert(
        &mut self,
        parent: ItemId,
        handle: Option<Uuid>,
        name: &str,
        kind: ItemKind,
        pos: Option<usize>,
    ) -> Result<ItemId, TreeError> {
        let parent_kind = self.get(parent)?.kind;
        if !parent_kind.allowed_child(self.kind.is_story(), kind) {
            return Err(TreeError::InvalidChildKind {
                parent: parent_kind,
                child: kind,
            });
        }

        let id = ItemId(self.nodes.len());
        self.nodes.push(Some(Item::new(handle, name, kind, Some(parent))));

        let children = &mut self
            .item_mut(parent)
            .expect("parent checked above")
            .children;
        match pos {
            Some(p) if p < children.len() => children.insert(p, id),
            _ => children.push(id),
        }
        Ok(id)
    }

    /// Detach an item and drop it with all its descendants
    ///
    /// The root cannot be removed. Document bodies of removed leaves stay
    /// on disk; the store does not garbage-collect them here.
    pub fn remove(&mut self, id: ItemId) -> Result<(), TreeError> {
        let parent = self.get(id)?.parent.ok_or(TreeError::RootImmutable)?;
        if let Some(item) = self.item_mut(parent) {
            item.children.retain(|child| *child != id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(item) = self.nodes.get_mut(next.0).and_then(Option::take) {
                stack.extend(item.children);
            }
        }
        Ok(())
    }

    pub fn rename(&mut self, id: ItemId, name: &str) -> Result<(), TreeError> {
        let name = name.trim();
        let item = self.item_mut(id).ok_or(TreeError::ItemGone)?;
        item.name = if name.is_empty() {
            String::from("Unnamed")
        } else {
            name.to_string()
        };
        Ok(())
    }

    pub fn set_expanded(&mut self, id: ItemId, state: bool) -> Result<(), TreeError> {
        self.item_mut(id).ok_or(TreeError::ItemGone)?.expanded = state;
        Ok(())
    }

    pub fn set_word_count(&mut self, id: ItemId, words: u32) -> Result<(), TreeError> {
        self.item_mut(id).ok_or(TreeError::ItemGone)?.words = words;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Lookup and view addressing
    // -------------------------------------------------------------------

    /// Depth-first handle lookup
    ///
    /// O(n) by design; outline trees are small and no index is maintained.
    pub fn find_by_handle(&self, handle: Uuid) -> Option<ItemId> {
        self.find_in(self.root, handle)
    }

    fn find_in(&self, id: ItemId, handle: Uuid) -> Option<ItemId> {
        let item = self.item(id)?;
        if item.handle == Some(handle) {
            return Some(id);
        }
        item.children
            .iter()
            .find_map(|child| self.find_in(*child, handle))
    }

    pub fn child_count(&self, id: ItemId) -> usize {
        self.item(id).map(|item| item.children.len()).unwrap_or(0)
    }

    pub fn child_at(&self, id: ItemId, row: usize) -> Option<ItemId> {
        self.item(id)?.children.get(row).copied()
    }

    pub fn parent_of(&self, id: ItemId) -> Option<ItemId> {
        self.item(id)?.parent
    }

    /// Row of the item among its siblings, recomputed from live order
    ///
    /// The root reports row 0.
    pub fn row_of(&self, id: ItemId) -> Option<usize> {
        let item = self.item(id)?;
        match item.parent {
            Some(parent) => self
                .item(parent)?
                .children
                .iter()
                .position(|child| *child == id),
            None => Some(0),
        }
    }

    /// Recursive word count over the subtree rooted at `id`
    pub fn word_total(&self, id: ItemId) -> u32 {
        let Some(item) = self.item(id) else { return 0 };
        item.words
            + item
                .children
                .iter()
                .map(|child| self.word_total(*child))
                .sum::<u32>()
    }

    /// Depth-first iteration as (depth, id) pairs, root excluded
    pub fn walk(&self) -> Vec<(usize, ItemId)> {
        let mut out = Vec::new();
        self.walk_in(self.root, 0, &mut out);
        out
    }

    fn walk_in(&self, id: ItemId, depth: usize, out: &mut Vec<(usize, ItemId)>) {
        let Some(item) = self.item(id) else { return };
        for child in &item.children {
            out.push((depth, *child));
            self.walk_in(*child, depth + 1, out);
        }
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    /// Pack the whole tree into its JSON object form
    ///
    /// The root serializes only its type tag and child array; every other
    /// item carries handle, order, words, name and type, with `items`
    /// present only when it has children and `expanded` only for
    /// expandable kinds. The `order` field duplicates the row for
    /// debuggability; array order is authoritative on reload.
    pub fn to_json(&self) -> Value {
        self.item_to_json(self.root)
    }

    fn item_to_json(&self, id: ItemId) -> Value {
        let Some(item) = self.item(id) else {
            return Value::Null;
        };

        let children: Vec<Value> = item
            .children
            .iter()
            .map(|child| self.item_to_json(*child))
            .collect();

        if item.parent.is_none() {
            return json!({
                "type": item.kind.as_tag(),
                "items": children,
            });
        }

        let mut out = Map::new();
        out.insert(
            "handle".into(),
            json!(item.handle.unwrap_or_default().to_string()),
        );
        out.insert("order".into(), json!(self.row_of(id).unwrap_or(0)));
        out.insert("words".into(), json!(item.words));
        out.insert("name".into(), json!(item.name));
        out.insert("type".into(), json!(item.kind.as_tag()));
        if !children.is_empty() {
            out.insert("items".into(), Value::Array(children));
        }
        if item.kind.is_expandable() {
            out.insert("expanded".into(), json!(item.expanded));
        }
        Value::Object(out)
    }

    /// Rebuild a tree from its JSON object form
    ///
    /// The outer object must be a ROOT item. Individual entries that fail
    /// validation (bad handle, unknown type, adjacency violation) are
    /// skipped with a warning; the rest of the tree still loads.
    pub fn from_json(kind: ModelKind, json: &Value) -> Result<Self, TreeError> {
        let root_tag = json
            .get("type")
            .and_then(Value::as_str)
            .and_then(ItemKind::from_tag);
        if root_tag != Some(ItemKind::Root) {
            return Err(TreeError::NotRootDocument);
        }

        let mut tree = Self::new(kind);
        if let Some(items) = json.get("items").and_then(Value::as_array) {
            let root = tree.root;
            for entry in items {
                tree.load_item(root, entry);
            }
        } else {
            debug!("Outline {} has no items", kind.file_stem());
        }
        Ok(tree)
    }

    /// Load a single stored entry, recursing into its children
    fn load_item(&mut self, parent: ItemId, entry: &Value) {
        let Some(obj) = entry.as_object() else {
            warn!("Outline entry is not a JSON object, skipping");
            return;
        };

        let handle = obj
            .get("handle")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .filter(|uuid| !uuid.is_nil());
        let Some(handle) = handle else {
            warn!("Outline entry has no valid handle, skipping");
            return;
        };

        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .and_then(ItemKind::from_tag);
        let kind = match kind {
            Some(ItemKind::Root) => {
                warn!("Only one ROOT item is allowed, skipping entry");
                return;
            }
            Some(kind) => kind,
            None => {
                warn!("Outline entry has unknown item type, skipping");
                return;
            }
        };

        let name = obj.get("name").and_then(Value::as_str).unwrap_or("");
        let words = obj.get("words").and_then(Value::as_u64).unwrap_or(0) as u32;
        let expanded = obj.get("expanded").and_then(Value::as_bool).unwrap_or(false);

        let id = match self.insert(parent, Some(handle), name, kind, None) {
            Ok(id) => id,
            Err(err) => {
                warn!(%handle, "Skipping outline entry: {err}");
                return;
            }
        };
        debug!(%handle, "Added {} item", kind.label());

        if let Some(item) = self.item_mut(id) {
            item.words = words;
            item.expanded = expanded;
        }

        if let Some(children) = obj.get("items").and_then(Value::as_array) {
            for child in children {
                self.load_item(id, child);
            }
        }
    }
}
