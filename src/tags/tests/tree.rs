use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::tags::repository::TagStore;
use crate::tags::{TagNode, TagRow};

#[derive(Debug, PartialEq, Clone, Copy)]
enum Op {
    Insert(u32),
    Update(u32),
    Delete(u32),
}

/// keeps rows in memory and records every write, optionally failing the nth insert
struct MemoryStore {
    rows: RefCell<BTreeMap<u32, TagRow>>,
    next_id: Cell<u32>,
    ops: RefCell<Vec<Op>>,
    fail_on_insert: Option<usize>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            rows: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            ops: RefCell::new(Vec::new()),
            fail_on_insert: None,
        }
    }

    fn failing_on_insert(n: usize) -> Self {
        Self {
            fail_on_insert: Some(n),
            ..Self::new()
        }
    }

    /// adds a row without recording it as an operation
    fn seed(&self, land_id: u32, parent_id: Option<u32>, name: &str, sorting: u32) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.rows.borrow_mut().insert(
            id,
            TagRow {
                id,
                land_id,
                parent_id,
                name: name.to_string(),
                sorting,
                color: String::new(),
            },
        );
        id
    }

    fn rows_for(&self, land_id: u32) -> Vec<TagRow> {
        self.rows
            .borrow()
            .values()
            .filter(|row| row.land_id == land_id)
            .cloned()
            .collect()
    }

    fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }
}

impl TagStore for MemoryStore {
    fn list_by_land(&self, land_id: u32) -> Result<Vec<TagRow>, rusqlite::Error> {
        Ok(self.rows_for(land_id))
    }

    fn insert(&self, row: &TagRow) -> Result<u32, rusqlite::Error> {
        let inserts = self
            .ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, Op::Insert(_)))
            .count();
        if self.fail_on_insert == Some(inserts + 1) {
            return Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
                None,
            ));
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let mut row = row.clone();
        row.id = id;
        self.rows.borrow_mut().insert(id, row);
        self.ops.borrow_mut().push(Op::Insert(id));
        Ok(id)
    }

    fn update(&self, row: &TagRow) -> Result<(), rusqlite::Error> {
        if let Some(existing) = self.rows.borrow_mut().get_mut(&row.id) {
            existing.parent_id = row.parent_id;
            existing.name = row.name.clone();
            existing.sorting = row.sorting;
            existing.color = row.color.clone();
        }
        self.ops.borrow_mut().push(Op::Update(row.id));
        Ok(())
    }

    fn delete(&self, id: u32) -> Result<(), rusqlite::Error> {
        self.rows.borrow_mut().remove(&id);
        self.ops.borrow_mut().push(Op::Delete(id));
        Ok(())
    }
}

fn new_node(name: &str, children: Vec<TagNode>) -> TagNode {
    TagNode {
        id: None,
        land_id: 0,
        parent_id: None,
        name: name.to_string(),
        sorting: 0,
        color: "#abcdef".to_string(),
        children,
    }
}

fn existing_node(id: u32, name: &str, children: Vec<TagNode>) -> TagNode {
    TagNode {
        id: Some(id),
        ..new_node(name, children)
    }
}

fn row(id: u32, parent_id: Option<u32>, name: &str, sorting: u32) -> TagRow {
    TagRow {
        id,
        land_id: 1,
        parent_id,
        name: name.to_string(),
        sorting,
        color: String::new(),
    }
}

/// every group of siblings must be sorted 0..n-1
fn assert_sorting_is_dense(rows: &[TagRow]) {
    let mut groups: BTreeMap<Option<u32>, Vec<u32>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.parent_id).or_default().push(row.sorting);
    }
    for (parent, mut sortings) in groups {
        sortings.sort();
        let expected: Vec<u32> = (0..sortings.len() as u32).collect();
        assert_eq!(expected, sortings, "sorting of children of {parent:?}");
    }
}

mod build_tree_tests {
    use super::*;
    use crate::tags::tree::build_tree;

    #[test]
    fn build_tree_nests_and_orders_siblings() {
        let rows = vec![
            row(4, Some(1), "b child", 1),
            row(2, None, "second", 1),
            row(3, Some(1), "a child", 0),
            row(1, None, "first", 0),
        ];
        let tree = build_tree(rows);
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(vec!["first", "second"], names);
        let children: Vec<&str> = tree[0].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(vec!["a child", "b child"], children);
        assert!(tree[1].children.is_empty());
        assert_eq!(Some(1), tree[0].children[0].parent_id);
    }

    #[test]
    fn build_tree_breaks_sorting_ties_by_id() {
        let tree = build_tree(vec![row(7, None, "later", 0), row(5, None, "earlier", 0)]);
        let ids: Vec<Option<u32>> = tree.iter().map(|n| n.id).collect();
        assert_eq!(vec![Some(5), Some(7)], ids);
    }

    #[test]
    fn build_tree_excludes_orphans() {
        let tree = build_tree(vec![
            row(1, None, "root", 0),
            row(2, Some(99), "orphan", 0),
            row(3, Some(2), "orphan child", 0),
        ]);
        assert_eq!(1, tree.len());
        assert_eq!(Some(1), tree[0].id);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn build_tree_excludes_parent_cycles() {
        let tree = build_tree(vec![
            row(1, None, "root", 0),
            row(2, Some(3), "loop a", 0),
            row(3, Some(2), "loop b", 0),
        ]);
        assert_eq!(1, tree.len());
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn build_tree_empty() {
        assert!(build_tree(vec![]).is_empty());
    }
}

mod reconcile_tests {
    use super::*;
    use crate::model::error::tag_errors::TagTreeError;
    use crate::tags::tree::{build_tree, reconcile};
    use crate::tags::ReconcileSummary;

    #[test]
    fn new_parent_id_is_used_by_new_children() {
        let store = MemoryStore::new();
        let mut tree = vec![new_node("Parent", vec![new_node("Child", vec![])])];
        reconcile(1, &mut tree, &store).unwrap();
        let rows = store.rows_for(1);
        let parent = rows.iter().find(|r| r.name == "Parent").unwrap();
        let child = rows.iter().find(|r| r.name == "Child").unwrap();
        assert_eq!(None, parent.parent_id);
        assert_eq!(Some(parent.id), child.parent_id);
        // ids are written back into the submitted tree
        assert_eq!(Some(parent.id), tree[0].id);
        assert_eq!(Some(child.id), tree[0].children[0].id);
        assert_eq!(Some(parent.id), tree[0].children[0].parent_id);
        assert_eq!(vec![Op::Insert(parent.id), Op::Insert(child.id)], store.ops());
    }

    #[test]
    fn omitted_tags_are_deleted() {
        let store = MemoryStore::new();
        let a = store.seed(1, None, "A", 0);
        let b = store.seed(1, None, "B", 1);
        let c = store.seed(1, None, "C", 2);
        let mut tree = vec![existing_node(a, "A", vec![]), existing_node(c, "C", vec![])];
        let summary = reconcile(1, &mut tree, &store).unwrap();
        assert_eq!(
            ReconcileSummary {
                inserted: 0,
                updated: 2,
                deleted: 1
            },
            summary
        );
        assert_eq!(Some(&Op::Delete(b)), store.ops().last());
        let rows = store.rows_for(1);
        let remaining: Vec<(u32, u32)> = rows.iter().map(|r| (r.id, r.sorting)).collect();
        assert_eq!(vec![(a, 0), (c, 1)], remaining);
    }

    #[test]
    fn empty_tree_deletes_every_tag_of_the_land() {
        let store = MemoryStore::new();
        let root = store.seed(1, None, "root", 0);
        store.seed(1, Some(root), "child", 0);
        let other_land = store.seed(2, None, "other", 0);
        let summary = reconcile(1, &mut [], &store).unwrap();
        assert_eq!(2, summary.deleted);
        assert!(store.rows_for(1).is_empty());
        assert_eq!(other_land, store.rows_for(2)[0].id);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let store = MemoryStore::new();
        let kept = store.seed(1, None, "kept", 0);
        let mut tree = vec![
            new_node("new root", vec![new_node("new child", vec![])]),
            existing_node(kept, "kept", vec![new_node("nested", vec![])]),
        ];
        reconcile(1, &mut tree, &store).unwrap();
        let first = store.rows_for(1);
        store.clear_ops();

        let summary = reconcile(1, &mut tree, &store).unwrap();
        assert_eq!(
            ReconcileSummary {
                inserted: 0,
                updated: 4,
                deleted: 0
            },
            summary
        );
        assert_eq!(first, store.rows_for(1));
        assert!(store.ops().iter().all(|op| matches!(op, Op::Update(_))));
    }

    #[test]
    fn reordering_updates_every_node() {
        let store = MemoryStore::new();
        let a = store.seed(1, None, "A", 0);
        let b = store.seed(1, None, "B", 1);
        let c = store.seed(1, None, "C", 2);
        let mut tree = vec![
            existing_node(c, "C", vec![]),
            existing_node(a, "A", vec![]),
            existing_node(b, "B", vec![]),
        ];
        reconcile(1, &mut tree, &store).unwrap();
        assert_eq!(vec![Op::Update(c), Op::Update(a), Op::Update(b)], store.ops());
        let sortings: Vec<(u32, u32)> = store
            .rows_for(1)
            .iter()
            .map(|r| (r.id, r.sorting))
            .collect();
        assert_eq!(vec![(a, 1), (b, 2), (c, 0)], sortings);
    }

    #[test]
    fn moving_a_subtree_changes_its_parent() {
        let store = MemoryStore::new();
        let first = store.seed(1, None, "first", 0);
        let second = store.seed(1, None, "second", 1);
        let moved = store.seed(1, Some(first), "moved", 0);
        let grandchild = store.seed(1, Some(moved), "grandchild", 0);
        let mut tree = vec![
            existing_node(first, "first", vec![]),
            existing_node(
                second,
                "second",
                vec![existing_node(
                    moved,
                    "moved",
                    vec![existing_node(grandchild, "grandchild", vec![])],
                )],
            ),
        ];
        reconcile(1, &mut tree, &store).unwrap();
        let rows = store.rows_for(1);
        let moved_row = rows.iter().find(|r| r.id == moved).unwrap();
        let grandchild_row = rows.iter().find(|r| r.id == grandchild).unwrap();
        assert_eq!(Some(second), moved_row.parent_id);
        assert_eq!(Some(moved), grandchild_row.parent_id);
        assert_eq!(4, rows.len());
    }

    #[test]
    fn renames_and_recolors_are_saved() {
        let store = MemoryStore::new();
        let id = store.seed(1, None, "old", 0);
        let mut node = existing_node(id, "new", vec![]);
        node.color = "#000000".to_string();
        reconcile(1, &mut [node], &store).unwrap();
        let rows = store.rows_for(1);
        assert_eq!("new", rows[0].name);
        assert_eq!("#000000", rows[0].color);
    }

    #[test]
    fn submitted_positions_overwrite_client_values() {
        let store = MemoryStore::new();
        let mut node = new_node("tag", vec![]);
        node.land_id = 42;
        node.parent_id = Some(1000);
        node.sorting = 7;
        let mut tree = vec![new_node("first", vec![]), node];
        reconcile(1, &mut tree, &store).unwrap();
        assert_eq!(1, tree[1].land_id);
        assert_eq!(None, tree[1].parent_id);
        assert_eq!(1, tree[1].sorting);
    }

    #[test]
    fn sorting_is_dense_after_reconcile() {
        let store = MemoryStore::new();
        let a = store.seed(1, None, "A", 5);
        let b = store.seed(1, Some(a), "B", 9);
        store.seed(1, Some(a), "C", 9);
        let mut tree = vec![
            new_node("x", vec![]),
            existing_node(
                a,
                "A",
                vec![new_node("y", vec![]), existing_node(b, "B", vec![])],
            ),
            new_node("z", vec![new_node("z1", vec![]), new_node("z2", vec![])]),
        ];
        reconcile(1, &mut tree, &store).unwrap();
        assert_sorting_is_dense(&store.rows_for(1));
    }

    #[test]
    fn stored_rows_round_trip_through_build_tree() {
        let store = MemoryStore::new();
        let kept = store.seed(1, None, "kept", 3);
        store.seed(1, Some(kept), "dropped", 0);
        let mut tree = vec![
            new_node("a", vec![new_node("a1", vec![new_node("a1x", vec![])])]),
            existing_node(kept, "kept", vec![new_node("k1", vec![])]),
            new_node("b", vec![]),
        ];
        reconcile(1, &mut tree, &store).unwrap();
        assert_eq!(tree, build_tree(store.rows_for(1)));
    }

    #[test]
    fn unknown_id_is_rejected_before_any_write() {
        let store = MemoryStore::new();
        let a = store.seed(1, None, "A", 0);
        let mut tree = vec![
            new_node("new", vec![]),
            existing_node(a, "A", vec![existing_node(500, "stale", vec![])]),
        ];
        let res = reconcile(1, &mut tree, &store);
        assert!(matches!(res, Err(TagTreeError::DataIntegrityError(_))));
        assert!(store.ops().is_empty());
        assert_eq!(None, tree[0].id);
    }

    #[test]
    fn id_from_another_land_is_rejected() {
        let store = MemoryStore::new();
        let foreign = store.seed(2, None, "foreign", 0);
        let mut tree = vec![existing_node(foreign, "foreign", vec![])];
        let res = reconcile(1, &mut tree, &store);
        assert!(matches!(res, Err(TagTreeError::DataIntegrityError(_))));
        assert!(store.ops().is_empty());
        assert_eq!(None, store.rows_for(2)[0].parent_id);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        let a = store.seed(1, None, "A", 0);
        let b = store.seed(1, None, "B", 1);
        let mut tree = vec![
            existing_node(a, "A", vec![existing_node(b, "B", vec![])]),
            existing_node(b, "B again", vec![]),
        ];
        let res = reconcile(1, &mut tree, &store);
        assert!(matches!(res, Err(TagTreeError::DataIntegrityError(_))));
        assert!(store.ops().is_empty());
    }

    #[test]
    fn store_failure_stops_the_walk() {
        let store = MemoryStore::failing_on_insert(2);
        let doomed = store.seed(1, None, "would be deleted", 0);
        let mut tree = vec![
            new_node("first", vec![new_node("fails", vec![new_node("never", vec![])])]),
            new_node("never either", vec![]),
        ];
        let res = reconcile(1, &mut tree, &store);
        assert_eq!(Err(TagTreeError::StoreUnavailable), res);
        assert_eq!(1, store.ops().len());
        assert!(store.rows_for(1).iter().any(|r| r.id == doomed));
        assert_eq!(None, tree[1].id);
    }
}
