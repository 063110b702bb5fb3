//! 成本計算配置

use serde::{Deserialize, Serialize};

/// 成本計算參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostingConfig {
    /// 最大遍歷深度（`None` 表示以節點數為上限）
    pub max_depth: Option<usize>,

    /// 最大遍歷步數（`None` 表示 2 × 節點數 + 1）
    pub iteration_limit: Option<usize>,

    /// 輸出四捨五入的小數位數（只影響報表值，不影響中間計算）
    pub rounding_dp: Option<u32>,

    /// 是否回報資料缺口警告
    /// - true: 缺值欄位以 0 計算並附上提示（預設）
    /// - false: 靜默以 0 計算
    pub report_data_gaps: bool,

    /// 是否輸出逐節點/逐工序明細
    pub include_breakdown: bool,
}

impl CostingConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            max_depth: None,
            iteration_limit: None,
            rounding_dp: None,
            report_data_gaps: true,
            include_breakdown: true,
        }
    }

    /// 建構器模式：設置最大遍歷深度
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// 建構器模式：設置最大遍歷步數
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    /// 建構器模式：設置輸出小數位數
    ///
    /// # 範例
    /// ```
    /// # use cost_core::CostingConfig;
    /// let config = CostingConfig::new().with_rounding_dp(2); // 報表取到分
    /// assert_eq!(config.rounding_dp, Some(2));
    /// ```
    pub fn with_rounding_dp(mut self, dp: u32) -> Self {
        self.rounding_dp = Some(dp);
        self
    }

    /// 建構器模式：設置是否回報資料缺口
    pub fn with_report_data_gaps(mut self, report: bool) -> Self {
        self.report_data_gaps = report;
        self
    }

    /// 建構器模式：設置是否輸出明細
    pub fn with_breakdown(mut self, include: bool) -> Self {
        self.include_breakdown = include;
        self
    }

    /// 依節點數決定深度上限
    pub fn depth_limit(&self, node_count: usize) -> usize {
        self.max_depth.unwrap_or(node_count)
    }

    /// 依節點數決定步數上限（每個節點進出堆疊各一次）
    pub fn step_limit(&self, node_count: usize) -> usize {
        self.iteration_limit
            .unwrap_or_else(|| node_count.saturating_mul(2).saturating_add(1))
    }
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self::new()
    }
}
