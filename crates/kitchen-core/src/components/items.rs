//! Kitchen item components: the movable ingredients, dishes and plates.

use crate::catalog::KindId;
use hecs::Entity;

/// A physical object in the kitchen
#[derive(Debug, Clone, Copy)]
pub struct KitchenItem {
    pub kind: KindId,
    /// The one holder carrying this item. `None` only while it is being spawned.
    pub holder: Option<Entity>,
}

impl KitchenItem {
    pub fn new(kind: KindId) -> Self {
        Self { kind, holder: None }
    }
}

/// Plate role, attached next to [`KitchenItem`] when the item is a plate
#[derive(Debug, Clone, Default)]
pub struct Plate {
    allowed: Vec<KindId>,
    contents: Vec<KindId>,
}

impl Plate {
    pub fn new(allowed: Vec<KindId>) -> Self {
        Self {
            allowed,
            contents: Vec::new(),
        }
    }

    pub fn accepts(&self, kind: KindId) -> bool {
        self.allowed.contains(&kind) && !self.contents.contains(&kind)
    }

    /// Add an ingredient kind. Disallowed or duplicate kinds leave the plate unchanged.
    pub fn try_add(&mut self, kind: KindId) -> bool {
        if !self.accepts(kind) {
            return false;
        }
        self.contents.push(kind);
        true
    }

    /// Ingredient kinds in the order they were added
    pub fn contents(&self) -> &[KindId] {
        &self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BREAD: KindId = KindId(1);
    const CHEESE: KindId = KindId(2);
    const TOMATO: KindId = KindId(3);

    #[test]
    fn test_plate_rejects_disallowed_kind() {
        let mut plate = Plate::new(vec![BREAD, CHEESE]);
        assert!(!plate.try_add(TOMATO));
        assert!(plate.is_empty());
    }

    #[test]
    fn test_plate_rejects_duplicates() {
        let mut plate = Plate::new(vec![BREAD, CHEESE]);
        assert!(plate.try_add(CHEESE));
        assert!(!plate.try_add(CHEESE));
        assert!(plate.try_add(BREAD));
        assert_eq!(plate.contents(), &[CHEESE, BREAD]);
    }

    #[test]
    fn test_plate_contents_stay_within_allowed() {
        let allowed = vec![BREAD, CHEESE];
        let mut plate = Plate::new(allowed.clone());
        for kind in [TOMATO, BREAD, TOMATO, CHEESE, BREAD, KindId(9), CHEESE] {
            plate.try_add(kind);
            assert!(plate.contents().iter().all(|k| allowed.contains(k)));
            let mut sorted = plate.contents().to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), plate.contents().len());
        }
        assert_eq!(plate.contents().len(), 2);
    }
}
