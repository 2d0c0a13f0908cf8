//! Compaction of accepted leaf cells into prefix-tree records.

use geohash_tree_types::IndexRecord;
use rustc_hash::FxHashSet;

/// Turn one polygon's leaf cells into index records.
///
/// Every ancestor of a leaf down to `min_precision` gets a sentinel record,
/// emitted once per call, and every leaf gets a record carrying `polygon_id`.
/// Sentinels come first. An ancestor that is itself one of the leaves only
/// gets its leaf record, so each prefix appears exactly once.
///
/// # Examples
///
/// ```
/// use geohash_tree::index::compact::compact;
///
/// let records = compact(&["9xj5".to_string()], "08013", 2);
/// let lines: Vec<_> = records.iter().map(|r| format!("{},{}", r.cell, r.value)).collect();
/// assert_eq!(lines, vec!["9xj,-1", "9x,-1", "9xj5,08013"]);
/// ```
pub fn compact(leaf_cells: &[String], polygon_id: &str, min_precision: usize) -> Vec<IndexRecord> {
    let leaves: FxHashSet<&str> = leaf_cells.iter().map(String::as_str).collect();
    let mut emitted: FxHashSet<&str> = FxHashSet::default();
    let mut sentinels = Vec::new();
    let mut matches = Vec::with_capacity(leaves.len());

    for leaf in leaf_cells {
        if !emitted.insert(leaf.as_str()) {
            continue;
        }

        let mut prefix = leaf.as_str();
        while prefix.len() > min_precision {
            prefix = &prefix[..prefix.len() - 1];
            if !leaves.contains(prefix) && emitted.insert(prefix) {
                sentinels.push(IndexRecord::sentinel(prefix));
            }
        }
        matches.push(IndexRecord::new(leaf.as_str(), polygon_id));
    }

    sentinels.extend(matches);
    sentinels
}

#[cfg(test)]
mod tests {
    use super::*;
    use geohash_tree_types::SENTINEL;
    use rustc_hash::FxHashMap;

    fn cells(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_every_prefix_recorded_once() {
        let leaves = cells(&["9xj5", "9xj6", "9xm", "9w"]);
        let records = compact(&leaves, "P", 1);

        let mut by_cell: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for record in &records {
            by_cell
                .entry(record.cell.as_str())
                .or_default()
                .push(record.value.as_str());
        }

        for leaf in &leaves {
            for len in 1..=leaf.len() {
                let values = &by_cell[&leaf[..len]];
                assert_eq!(values.len(), 1, "{} recorded {} times", &leaf[..len], values.len());
                let expected = if len == leaf.len() { "P" } else { SENTINEL };
                assert_eq!(values[0], expected);
            }
        }
        assert_eq!(records.len(), by_cell.len());
    }

    #[test]
    fn test_sentinels_precede_leaves() {
        let records = compact(&cells(&["s00", "s01"]), "P1", 1);
        let first_leaf = records.iter().position(|r| !r.is_sentinel()).unwrap();
        assert!(records[first_leaf..].iter().all(|r| !r.is_sentinel()));
        assert_eq!(records[..first_leaf].len(), 2);
    }

    #[test]
    fn test_leaf_at_min_precision_has_no_ancestors() {
        let records = compact(&cells(&["s", "7"]), "P1", 1);
        assert_eq!(
            records,
            vec![IndexRecord::new("s", "P1"), IndexRecord::new("7", "P1")]
        );
    }

    #[test]
    fn test_leaf_that_is_an_ancestor_keeps_its_id() {
        // Possible when the member polygons of one feature overlap.
        let records = compact(&cells(&["9x", "9xj5"]), "P", 1);
        let nine_x: Vec<_> = records.iter().filter(|r| r.cell == "9x").collect();
        assert_eq!(nine_x, vec![&IndexRecord::new("9x", "P")]);
    }

    #[test]
    fn test_duplicate_leaves_collapse() {
        let records = compact(&cells(&["u4", "u4"]), "P", 1);
        assert_eq!(records.len(), 2);
    }
}
