//! 連鎖刪除
//!
//! 刪除元件時，所有直接或間接掛在它下面的元件、材料與報廢記錄一併移除，
//! 避免留下孤兒子樹。這是給編輯層用的輔助，成本計算本身從不修改輸入。

use cost_core::{BomInput, CostError};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::store::NodeStore;

/// 連鎖刪除結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeRemoval {
    /// 被移除的節點ID（目標在最前）
    pub node_ids: Vec<String>,
    /// 被移除的報廢記錄ID
    pub scrap_ids: Vec<Uuid>,
}

impl CascadeRemoval {
    /// 移除的記錄總數
    pub fn len(&self) -> usize {
        self.node_ids.len() + self.scrap_ids.len()
    }

    /// 是否沒有移除任何記錄
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty() && self.scrap_ids.is_empty()
    }
}

/// 連鎖刪除
pub struct CascadeDelete;

impl CascadeDelete {
    /// 預覽刪除某節點會連帶移除哪些記錄（不修改輸入）
    pub fn plan(input: &BomInput, node_id: &str) -> cost_core::Result<CascadeRemoval> {
        let store = NodeStore::from_input(input);
        let target = store
            .index_of(node_id)
            .ok_or_else(|| CostError::NodeNotFound(node_id.to_string()))?;

        let node_ids: Vec<String> = std::iter::once(target)
            .chain(store.descendants(target))
            .filter_map(|idx| store.node(idx))
            .map(|node| node.id.clone())
            .collect();

        let removed: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
        let scrap_ids = input
            .scrap
            .iter()
            .filter(|entry| {
                entry
                    .parent_id
                    .as_deref()
                    .map_or(false, |parent| removed.contains(parent))
            })
            .map(|entry| entry.id)
            .collect();

        Ok(CascadeRemoval { node_ids, scrap_ids })
    }

    /// 刪除節點及其所有後代與關聯報廢記錄
    pub fn remove(input: &mut BomInput, node_id: &str) -> cost_core::Result<CascadeRemoval> {
        let removal = Self::plan(input, node_id)?;

        let node_ids: HashSet<&str> = removal.node_ids.iter().map(String::as_str).collect();
        let scrap_ids: HashSet<Uuid> = removal.scrap_ids.iter().copied().collect();

        input.components.retain(|node| !node_ids.contains(node.id.as_str()));
        input.materials.retain(|node| !node_ids.contains(node.id.as_str()));
        input.scrap.retain(|entry| !scrap_ids.contains(&entry.id));

        tracing::debug!(
            "連鎖刪除 {}: 節點 {} 筆，報廢記錄 {} 筆",
            node_id,
            removal.node_ids.len(),
            removal.scrap_ids.len()
        );

        Ok(removal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::IntegrityValidator;
    use cost_core::{BomNode, ScrapEntry};
    use rust_decimal::Decimal;

    fn bike() -> BomInput {
        BomInput::new(Decimal::ONE)
            .with_node(BomNode::component("BIKE", Decimal::ONE, Decimal::ZERO, Decimal::ZERO))
            .with_node(BomNode::component("FRAME", Decimal::ONE, Decimal::ZERO, Decimal::from(5)).with_parent("BIKE"))
            .with_node(BomNode::component("JOINT", Decimal::from(4), Decimal::ONE, Decimal::ZERO).with_parent("FRAME"))
            .with_node(BomNode::material("TUBE", Decimal::from(3), Decimal::from(2)).with_parent("FRAME"))
            .with_node(BomNode::material("WELD", Decimal::ONE, Decimal::ONE).with_parent("JOINT"))
            .with_node(BomNode::material("TIRE", Decimal::from(2), Decimal::from(8)).with_parent("BIKE"))
            .with_node(BomNode::material("GREASE", Decimal::ONE, Decimal::ONE))
            .with_scrap(ScrapEntry::new("TUBE-CUT", Decimal::from(10), Decimal::from(5), Decimal::ONE).with_parent("FRAME"))
            .with_scrap(ScrapEntry::new("WELD-SPATTER", Decimal::ONE, Decimal::from(2), Decimal::ONE).with_parent("JOINT"))
            .with_scrap(ScrapEntry::new("RUBBER", Decimal::ONE, Decimal::from(1), Decimal::ONE).with_parent("TIRE"))
            .with_scrap(ScrapEntry::new("MISC", Decimal::ONE, Decimal::from(1), Decimal::ONE))
    }

    #[test]
    fn test_remove_component_cascades() {
        let mut input = bike();
        let removal = CascadeDelete::remove(&mut input, "FRAME").unwrap();

        assert_eq!(removal.node_ids[0], "FRAME");
        let mut removed = removal.node_ids.clone();
        removed.sort();
        assert_eq!(removed, vec!["FRAME", "JOINT", "TUBE", "WELD"]);
        assert_eq!(removal.scrap_ids.len(), 2);
        assert_eq!(removal.len(), 6);

        let remaining: Vec<&str> = input.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(remaining, vec!["BIKE", "TIRE", "GREASE"]);
        let scrap: Vec<&str> = input.scrap.iter().map(|s| s.item_ref.as_str()).collect();
        assert_eq!(scrap, vec!["RUBBER", "MISC"]);
    }

    #[test]
    fn test_no_orphans_after_removal() {
        let mut input = bike();
        CascadeDelete::remove(&mut input, "FRAME").unwrap();

        let store = NodeStore::from_input(&input);
        assert!(store.dangling().is_empty());
        assert!(IntegrityValidator::validate(&store, &input.scrap).is_ok());
        assert!(input
            .scrap
            .iter()
            .filter_map(|s| s.parent_id.as_deref())
            .all(|parent| store.get(parent).is_some()));
    }

    #[test]
    fn test_remove_root_clears_tree() {
        let mut input = bike();
        CascadeDelete::remove(&mut input, "BIKE").unwrap();

        let remaining: Vec<&str> = input.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(remaining, vec!["GREASE"]);
        assert_eq!(input.scrap.len(), 1);
    }

    #[test]
    fn test_plan_does_not_modify() {
        let input = bike();
        let removal = CascadeDelete::plan(&input, "JOINT").unwrap();

        assert_eq!(removal.node_ids, vec!["JOINT", "WELD"]);
        assert_eq!(removal.scrap_ids.len(), 1);
        assert_eq!(input, bike_with_same_ids(&input));
    }

    #[test]
    fn test_unknown_node() {
        let mut input = bike();
        let err = CascadeDelete::remove(&mut input, "NOPE").unwrap_err();
        assert!(matches!(err, CostError::NodeNotFound(id) if id == "NOPE"));
        assert_eq!(input.node_count(), 7);
    }

    // ScrapEntry 的 ID 為隨機產生，比較時沿用原輸入
    fn bike_with_same_ids(original: &BomInput) -> BomInput {
        let mut fresh = bike();
        for (entry, source) in fresh.scrap.iter_mut().zip(&original.scrap) {
            entry.id = source.id;
        }
        fresh
    }
}
