use std::backtrace::Backtrace;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::model::error::tag_errors::TagTreeError;
use crate::tags::repository::TagStore;
use crate::tags::{ReconcileSummary, TagNode, TagRow};

/// nests a land's flat tag rows into a tree. Roots are the rows without a parent, and every
/// group of siblings is ordered by `sorting` (then `id`, so equal sortings still come out stable).
///
/// Rows that can't be reached from a root - their parent doesn't exist, or they sit on a parent
/// cycle - are left out of the tree and reported as a warning
pub fn build_tree(rows: Vec<TagRow>) -> Vec<TagNode> {
    let mut by_parent: HashMap<Option<u32>, Vec<TagRow>> = HashMap::new();
    for row in rows {
        by_parent.entry(row.parent_id).or_default().push(row);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|row| (row.sorting, row.id));
    }
    let roots = take_children(None, &mut by_parent);
    if !by_parent.is_empty() {
        let orphaned: BTreeSet<u32> = by_parent.values().flatten().map(|row| row.id).collect();
        log::warn!("Left orphaned tags {orphaned:?} out of the tag tree; their parents are missing");
    }
    roots
}

/// removes the children of `parent_id` from `by_parent` and nests them, recursively.
/// Removing as we go means a parent cycle can never be visited twice
fn take_children(
    parent_id: Option<u32>,
    by_parent: &mut HashMap<Option<u32>, Vec<TagRow>>,
) -> Vec<TagNode> {
    let Some(siblings) = by_parent.remove(&parent_id) else {
        return Vec::new();
    };
    siblings
        .into_iter()
        .map(|row| {
            let id = row.id;
            let mut node = TagNode::from(row);
            node.children = take_children(Some(id), by_parent);
            node
        })
        .collect()
}

/// makes the stored tags of `land_id` match `submitted_roots` exactly.
///
/// The submitted tree is authoritative for the whole land:
/// - nodes without an id are inserted, and the new id is written back into the node
///   before its children are saved, so children always point at their parent's real id
/// - nodes with an id are updated, including their parent and position
/// - stored tags that don't appear anywhere in the tree are deleted. An empty tree deletes every tag of the land
///
/// `land_id`, `parent_id` and `sorting` of every submitted node are overwritten from its position in the tree.
///
/// Submitted ids have to be unique and belong to this land; if they aren't, nothing is written
/// and [`TagTreeError::DataIntegrityError`] is returned. The first failing store call stops the
/// walk and returns [`TagTreeError::StoreUnavailable`]; run this inside a transaction to make that all-or-nothing
pub fn reconcile<S: TagStore + ?Sized>(
    land_id: u32,
    submitted_roots: &mut [TagNode],
    store: &S,
) -> Result<ReconcileSummary, TagTreeError> {
    let persisted_ids: HashSet<u32> = store
        .list_by_land(land_id)
        .map_err(|e| store_failure("list", land_id, e))?
        .into_iter()
        .map(|row| row.id)
        .collect();
    validate_submitted_ids(land_id, submitted_roots, &persisted_ids)?;

    let mut summary = ReconcileSummary::default();
    let mut visited_ids: HashSet<u32> = HashSet::with_capacity(persisted_ids.len());
    save_siblings(
        land_id,
        None,
        submitted_roots,
        store,
        &mut visited_ids,
        &mut summary,
    )?;

    let deletions: BTreeSet<u32> = persisted_ids.difference(&visited_ids).copied().collect();
    for id in deletions {
        store
            .delete(id)
            .map_err(|e| store_failure("delete", land_id, e))?;
        summary.deleted += 1;
    }
    Ok(summary)
}

/// pre-order walk over one group of siblings: each node is saved before its children
fn save_siblings<S: TagStore + ?Sized>(
    land_id: u32,
    parent_id: Option<u32>,
    siblings: &mut [TagNode],
    store: &S,
    visited_ids: &mut HashSet<u32>,
    summary: &mut ReconcileSummary,
) -> Result<(), TagTreeError> {
    for (position, node) in siblings.iter_mut().enumerate() {
        node.land_id = land_id;
        node.parent_id = parent_id;
        node.sorting = position as u32;
        let id = match node.id {
            Some(id) => {
                store
                    .update(&node.to_row())
                    .map_err(|e| store_failure("update", land_id, e))?;
                summary.updated += 1;
                id
            }
            None => {
                let id = store
                    .insert(&node.to_row())
                    .map_err(|e| store_failure("insert", land_id, e))?;
                node.id = Some(id);
                summary.inserted += 1;
                id
            }
        };
        visited_ids.insert(id);
        save_siblings(
            land_id,
            Some(id),
            &mut node.children,
            store,
            visited_ids,
            summary,
        )?;
    }
    Ok(())
}

/// every id in the submitted tree must be one of the land's stored tags, and appear only once
fn validate_submitted_ids(
    land_id: u32,
    roots: &[TagNode],
    persisted_ids: &HashSet<u32>,
) -> Result<(), TagTreeError> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut pending: Vec<&TagNode> = roots.iter().collect();
    while let Some(node) = pending.pop() {
        if let Some(id) = node.id {
            if !persisted_ids.contains(&id) {
                log::warn!("Rejected tag tree for land {land_id}: tag {id} does not belong to it");
                return Err(TagTreeError::DataIntegrityError(format!(
                    "Tag {id} does not exist in land {land_id}"
                )));
            }
            if !seen.insert(id) {
                log::warn!("Rejected tag tree for land {land_id}: tag {id} appears more than once");
                return Err(TagTreeError::DataIntegrityError(format!(
                    "Tag {id} appears more than once in the submitted tree"
                )));
            }
        }
        pending.extend(node.children.iter());
    }
    Ok(())
}

fn store_failure(operation: &str, land_id: u32, e: rusqlite::Error) -> TagTreeError {
    log::error!(
        "Failed to {operation} tags while saving the tag tree for land {land_id}! Error is {e:?}\n{}",
        Backtrace::force_capture()
    );
    TagTreeError::StoreUnavailable
}
