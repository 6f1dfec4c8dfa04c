//! Reverse hotspot index: parent SKU -> lookbooks that show it.

use serde::Serialize;

use crate::lookbook::Lookbook;
use crate::ordered::OrderedIndex;

/// Maps an uppercased parent SKU to the IDs of the lookbooks referencing it.
///
/// Keys keep the order in which they were first referenced. Each ID appears at
/// most once per key, in first-reference order, with its original casing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HotspotIndex {
    refs: OrderedIndex<Vec<String>>,
}

impl HotspotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from lookbooks in source order.
    pub fn from_lookbooks<'a>(lookbooks: impl IntoIterator<Item = &'a Lookbook>) -> Self {
        let mut index = Self::new();
        for lookbook in lookbooks {
            for hotspot in &lookbook.hotspots {
                index.add(hotspot, &lookbook.id);
            }
        }
        index
    }

    /// Record that `lookbook_id` references `hotspot`.
    pub fn add(&mut self, hotspot: &str, lookbook_id: &str) {
        let ids = self.refs.entry_or_default(hotspot.to_uppercase());
        if !ids.iter().any(|id| id == lookbook_id) {
            ids.push(lookbook_id.to_string());
        }
    }

    /// Lookbook IDs for a parent SKU (matched case-insensitively).
    pub fn lookbooks_for(&self, sku: &str) -> &[String] {
        self.refs
            .get(&sku.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The `n` parent SKUs referenced by the most lookbooks. Ties keep
    /// first-reference order.
    pub fn most_referenced(&self, n: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<_> = self.refs.iter().map(|(k, v)| (k, v.len())).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(n);
        counts
    }

    /// Number of distinct parent SKUs.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
