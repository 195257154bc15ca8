use std::collections::HashMap;

use crate::tagged_content::{TagGroup, TaggedContent};
use crate::tags::TagRow;

/// groups excerpts under the tag they're filed under.
///
/// Groups come out in the order their tag first shows up in `contents`, and each group keeps its
/// excerpts in input order. Tags without excerpts get no group. Excerpts whose tag isn't in
/// `tags_by_id` are dropped, since there's nothing to label their group with
pub fn categorize(
    contents: Vec<TaggedContent>,
    tags_by_id: &HashMap<u32, TagRow>,
) -> Vec<TagGroup> {
    let mut groups: Vec<TagGroup> = Vec::new();
    let mut group_index: HashMap<u32, usize> = HashMap::new();
    for content in contents {
        let Some(tag) = tags_by_id.get(&content.tag_id) else {
            log::debug!(
                "Skipping tagged content {} because tag {} is unknown",
                content.id,
                content.tag_id
            );
            continue;
        };
        let index = *group_index.entry(tag.id).or_insert_with(|| {
            groups.push(TagGroup {
                tag_id: tag.id,
                name: tag.name.clone(),
                color: tag.color.clone(),
                contents: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].contents.push(content);
    }
    groups
}
