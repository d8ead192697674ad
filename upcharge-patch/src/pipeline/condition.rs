//! Drift check between `price` and `combo_upcharge`

use shared::ItemRecord;

/// True when both fields read as decimals and differ.
///
/// Unreadable values (null, text, booleans) never qualify, so malformed
/// records are left alone rather than "corrected".
pub fn needs_patch(item: &ItemRecord) -> bool {
    match (item.price.as_decimal(), item.combo_upcharge.as_decimal()) {
        (Some(price), Some(upcharge)) => price != upcharge,
        _ => false,
    }
}

/// Records needing a patch, in input order
pub fn filter_needing_patch(items: &[ItemRecord]) -> Vec<ItemRecord> {
    items.iter().filter(|item| needs_patch(item)).cloned().collect()
}
