//! Result merging by item identity.
//!
//! Strategies frequently return the same item. Merging unions their lists
//! by `key`; when keys collide the first copy inserted wins and later copies
//! are discarded without comparing content.

use std::collections::HashSet;

use crate::item::Item;

/// Union item lists by key, keeping the first-seen copy of each item.
///
/// The output order is **not** meaningful: callers rank afterwards. Which
/// lists are merged determines membership; their order only decides which
/// duplicate copy survives.
pub fn merge<I>(lists: I) -> HashSet<Item>
where
    I: IntoIterator<Item = Vec<Item>>,
{
    let mut merged: HashSet<Item> = HashSet::new();
    for list in lists {
        merged.reserve(list.len());
        for item in list {
            // `insert` leaves an existing equal element untouched.
            merged.insert(item);
        }
    }
    merged
}
