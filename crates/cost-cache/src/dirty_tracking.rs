//! 髒標記追蹤

use std::collections::BTreeSet;

/// 髒標記追蹤器（以 BOM ID 為鍵）
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_boms: BTreeSet<String>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記 BOM 為髒，回傳先前是否已是髒的
    pub fn mark_dirty(&mut self, bom_id: impl Into<String>) -> bool {
        !self.dirty_boms.insert(bom_id.into())
    }

    /// 檢查 BOM 是否為髒
    pub fn is_dirty(&self, bom_id: &str) -> bool {
        self.dirty_boms.contains(bom_id)
    }

    /// 清除單一 BOM 的髒標記
    pub fn mark_clean(&mut self, bom_id: &str) -> bool {
        self.dirty_boms.remove(bom_id)
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_boms.clear();
    }

    /// 獲取所有髒 BOM（依ID排序）
    pub fn dirty_boms(&self) -> Vec<String> {
        self.dirty_boms.iter().cloned().collect()
    }

    /// 髒 BOM 數量
    pub fn len(&self) -> usize {
        self.dirty_boms.len()
    }

    /// 是否沒有髒 BOM
    pub fn is_empty(&self) -> bool {
        self.dirty_boms.is_empty()
    }
}
