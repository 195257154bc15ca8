use rocket::serde::{Deserialize, Serialize};

/// represents a row in the Tag table of the database. Rows are flat; use [`TagNode`] for the nested form
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TagRow {
    /// assigned by the database on insert, never reused
    pub id: u32,
    /// the land this tag belongs to
    pub land_id: u32,
    /// `None` if this is a root tag of its land
    pub parent_id: Option<u32>,
    pub name: String,
    /// zero-based position among the tags sharing the same `parent_id`
    pub sorting: u32,
    pub color: String,
}

/// a tag with its children nested inside it. This is what clients read and submit.
///
/// A node without an `id` has not been saved yet. `land_id`, `parent_id` and `sorting` are
/// always overwritten from the node's position in the tree when a tree is saved
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct TagNode {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub land_id: u32,
    #[serde(default)]
    pub parent_id: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub sorting: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub children: Vec<TagNode>,
}

/// body of a tree submission. `tags` is required: an empty list deletes every tag of the land
#[derive(Deserialize, Debug)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SaveTagTreeRequest {
    pub land_id: u32,
    pub tags: Vec<TagNode>,
}

/// counts of what a reconciliation did to the store
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl TagNode {
    /// flattens this node into the row that gets persisted. Children are not included.
    /// Unsaved nodes get an id of 0, which the store ignores on insert
    pub fn to_row(&self) -> TagRow {
        TagRow {
            id: self.id.unwrap_or_default(),
            land_id: self.land_id,
            parent_id: self.parent_id,
            name: self.name.clone(),
            sorting: self.sorting,
            color: self.color.clone(),
        }
    }
}

impl From<TagRow> for TagNode {
    fn from(value: TagRow) -> Self {
        Self {
            id: Some(value.id),
            land_id: value.land_id,
            parent_id: value.parent_id,
            name: value.name,
            sorting: value.sorting,
            color: value.color,
            children: Vec::new(),
        }
    }
}
