//! Catalog of displayable items and logical-index math

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Unbounded position in the infinitely repeated catalog sequence.
///
/// `item_at(i) == item_at(i + k * len)` for any integer `k`, including
/// negative `i` via floored modulo.
pub type LogicalIndex = i64;

/// An entry in the displayed catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique, stable identifier
    pub id: String,
    /// Draw weight; 0 = can appear visually, never wins
    pub weight: f64,
    /// Opaque display metadata (image refs, labels); never read by the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<serde_json::Value>,
}

impl Item {
    /// Create an item with a draw weight
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            display: None,
        }
    }

    /// Builder: attach display metadata
    pub fn with_display(mut self, display: serde_json::Value) -> Self {
        self.display = Some(display);
        self
    }
}

/// Ordered, insertion-stable item catalog
///
/// Order is significant: it defines logical-index spacing on the reel.
/// Fixed for the duration of one play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Create a catalog; fails on an empty item list
    pub fn new(items: Vec<Item>) -> EngineResult<Self> {
        if items.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        Ok(Self { items })
    }

    /// Number of items in one catalog cycle
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: construction rejects empty catalogs
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at a logical index (wraps, well-defined for negative indices)
    pub fn item_at(&self, index: LogicalIndex) -> &Item {
        let n = self.items.len() as i64;
        &self.items[index.rem_euclid(n) as usize]
    }

    /// Catalog position of an item id, if present
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// All items in catalog order
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item::new("coin", 5.0),
            Item::new("gem", 2.0),
            Item::new("crown", 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            Catalog::new(Vec::new()),
            Err(EngineError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_item_at_wraps() {
        let cat = catalog();
        assert_eq!(cat.item_at(0).id, "coin");
        assert_eq!(cat.item_at(4).id, "gem");
        assert_eq!(cat.item_at(300).id, "coin");
    }

    #[test]
    fn test_item_at_negative_uses_floored_modulo() {
        let cat = catalog();
        assert_eq!(cat.item_at(-1).id, "crown");
        assert_eq!(cat.item_at(-3).id, "coin");
        assert_eq!(cat.item_at(-4).id, "crown");
    }

    #[test]
    fn test_cycle_invariant() {
        let cat = catalog();
        let n = cat.len() as i64;
        for i in -10..10 {
            for k in [-2, -1, 1, 3] {
                assert_eq!(cat.item_at(i).id, cat.item_at(i + k * n).id);
            }
        }
    }

    #[test]
    fn test_position_of() {
        let cat = catalog();
        assert_eq!(cat.position_of("gem"), Some(1));
        assert_eq!(cat.position_of("skull"), None);
    }
}
