//! 增量計算
//!
//! 編輯層每次修改都會觸發重算；輸入未變且未被標髒時直接回傳上次結果。

use cost_calc::{BomCostCalculator, CostResult};
use cost_core::BomInput;
use serde::Serialize;
use std::collections::HashMap;

use crate::dirty_tracking::DirtyTracker;

/// 快取統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// 命中率（無請求時為 0）
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    input: BomInput,
    result: CostResult,
}

/// 增量計算器
#[derive(Debug, Default)]
pub struct IncrementalCalculator {
    calculator: BomCostCalculator,
    entries: HashMap<String, CacheEntry>,
    tracker: DirtyTracker,
    stats: CacheStats,
}

impl IncrementalCalculator {
    /// 創建新的增量計算器
    pub fn new(calculator: BomCostCalculator) -> Self {
        Self {
            calculator,
            entries: HashMap::new(),
            tracker: DirtyTracker::new(),
            stats: CacheStats::default(),
        }
    }

    /// 計算（或重用）某份 BOM 的成本
    ///
    /// 計算失敗時移除舊結果，不回傳過期資料。
    pub fn calculate(&mut self, bom_id: &str, input: &BomInput) -> cost_core::Result<CostResult> {
        if !self.tracker.is_dirty(bom_id) {
            if let Some(entry) = self.entries.get(bom_id) {
                if entry.input.same_content(input) {
                    self.stats.hits += 1;
                    tracing::debug!("BOM {} 命中快取", bom_id);
                    return Ok(restamp(entry.result.clone(), input));
                }
            }
        }

        self.stats.misses += 1;
        tracing::debug!("BOM {} 重新計算", bom_id);

        match self.calculator.calculate(input) {
            Ok(result) => {
                self.entries.insert(
                    bom_id.to_string(),
                    CacheEntry {
                        input: input.clone(),
                        result: result.clone(),
                    },
                );
                self.tracker.mark_clean(bom_id);
                Ok(result)
            }
            Err(err) => {
                self.entries.remove(bom_id);
                Err(err)
            }
        }
    }

    /// 標記 BOM 需要重算
    pub fn invalidate(&mut self, bom_id: &str) {
        if self.entries.contains_key(bom_id) {
            self.tracker.mark_dirty(bom_id);
        }
    }

    /// 移除某份 BOM 的快取
    pub fn evict(&mut self, bom_id: &str) -> bool {
        self.tracker.mark_clean(bom_id);
        self.entries.remove(bom_id).is_some()
    }

    /// 取得仍有效的快取結果
    pub fn cached(&self, bom_id: &str) -> Option<&CostResult> {
        if self.tracker.is_dirty(bom_id) {
            return None;
        }
        self.entries.get(bom_id).map(|entry| &entry.result)
    }

    /// 需要重算的 BOM
    pub fn dirty_boms(&self) -> Vec<String> {
        self.tracker.dirty_boms()
    }

    /// 快取統計
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// 快取筆數
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 快取是否為空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 以本次輸入的工序/報廢記錄ID覆寫明細（明細順序與輸入一致）
fn restamp(mut result: CostResult, input: &BomInput) -> CostResult {
    for (line, entry) in result.operation_costs.iter_mut().zip(&input.operations) {
        line.entry_id = entry.id;
    }
    for (line, entry) in result.scrap_lines.iter_mut().zip(&input.scrap) {
        line.entry_id = entry.id;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use cost_core::{BomNode, CostingConfig, OperationEntry, ScrapEntry};
    use rust_decimal::Decimal;

    fn input(rate: i64) -> BomInput {
        BomInput::new(Decimal::from(2))
            .with_node(BomNode::component("ASSY", Decimal::ONE, Decimal::ZERO, Decimal::from(20)))
            .with_node(BomNode::material("PLATE", Decimal::ONE, Decimal::from(rate)).with_parent("ASSY"))
    }

    #[test]
    fn test_hit_on_unchanged_input() {
        let mut cache = IncrementalCalculator::default();
        let first = cache.calculate("BOM-1", &input(4)).unwrap();
        let second = cache.calculate("BOM-1", &input(4)).unwrap();

        assert_eq!(first.summary, second.summary);
        assert_eq!(first.summary.components_cost, Decimal::from(5));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.stats().hit_ratio(), 0.5);
    }

    #[test]
    fn test_changed_input_recomputes() {
        let mut cache = IncrementalCalculator::default();
        cache.calculate("BOM-1", &input(4)).unwrap();
        let updated = cache.calculate("BOM-1", &input(8)).unwrap();

        assert_eq!(updated.summary.components_cost, Decimal::from(10));
        assert_eq!(cache.stats().misses, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut cache = IncrementalCalculator::new(BomCostCalculator::new(CostingConfig::new()));
        cache.calculate("BOM-1", &input(4)).unwrap();

        cache.invalidate("BOM-1");
        assert!(cache.cached("BOM-1").is_none());
        assert_eq!(cache.dirty_boms(), vec!["BOM-1"]);

        cache.calculate("BOM-1", &input(4)).unwrap();
        assert_eq!(cache.stats().misses, 2);
        assert!(cache.cached("BOM-1").is_some());
        assert!(cache.dirty_boms().is_empty());
    }

    #[test]
    fn test_failure_drops_stale_result() {
        let mut cache = IncrementalCalculator::default();
        cache.calculate("BOM-1", &input(4)).unwrap();

        let mut broken = input(4);
        broken.batch_quantity = Decimal::ZERO;
        assert!(cache.calculate("BOM-1", &broken).is_err());
        assert!(cache.cached("BOM-1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evict() {
        let mut cache = IncrementalCalculator::default();
        cache.calculate("BOM-1", &input(4)).unwrap();

        assert!(cache.evict("BOM-1"));
        assert!(!cache.evict("BOM-1"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fresh_record_ids_still_hit() {
        let draft = || {
            input(4)
                .with_operation(OperationEntry::new("組裝", Decimal::from(30), Decimal::ZERO, Decimal::from(40)))
                .with_scrap(ScrapEntry::new("OFFCUT", Decimal::from(10), Decimal::TEN, Decimal::ONE))
        };
        let first_input = draft();
        let second_input = draft();
        assert_ne!(first_input.operations[0].id, second_input.operations[0].id);

        let mut cache = IncrementalCalculator::default();
        cache.calculate("BOM-1", &first_input).unwrap();
        let reused = cache.calculate("BOM-1", &second_input).unwrap();

        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(reused.operation_costs[0].entry_id, second_input.operations[0].id);
        assert_eq!(reused.scrap_lines[0].entry_id, second_input.scrap[0].id);
    }
}
