//! # BOM Cost Calculation Engine
//!
//! 核心 BOM 成本彙總引擎

pub mod calculator;
pub mod cascade;
pub mod operations;
pub mod rollup;
pub mod scrap;
pub mod store;
pub mod summary;
pub mod validator;

use serde::Serialize;

// Re-export 主要類型
pub use calculator::BomCostCalculator;
pub use cascade::{CascadeDelete, CascadeRemoval};
pub use operations::{OperationCost, OperationsCalculator, OperationsCost};
pub use rollup::{CostRollup, NodeCost, RollupResult};
pub use scrap::{ScrapLine, ScrapRecovery, ScrapRecoveryCalculator};
pub use store::NodeStore;
pub use summary::SummaryBuilder;
pub use validator::IntegrityValidator;

/// BOM 成本計算結果
#[derive(Debug, Clone, Serialize)]
pub struct CostResult {
    /// 成本彙總
    pub summary: cost_core::CostSummary,

    /// 逐節點成本明細
    pub node_costs: Vec<NodeCost>,

    /// 逐工序成本明細
    pub operation_costs: Vec<OperationCost>,

    /// 逐筆報廢明細
    pub scrap_lines: Vec<ScrapLine>,

    /// 警告信息
    pub warnings: Vec<CostWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl CostResult {
    /// 以彙總創建結果（明細為空）
    pub fn new(summary: cost_core::CostSummary) -> Self {
        Self {
            summary,
            node_costs: Vec::new(),
            operation_costs: Vec::new(),
            scrap_lines: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 依ID查詢節點成本
    pub fn node_cost(&self, node_id: &str) -> Option<&NodeCost> {
        self.node_costs.iter().find(|entry| entry.node_id == node_id)
    }
}

/// 計算警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostWarning {
    /// 相關節點/工序/報廢品項
    pub subject_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl CostWarning {
    pub fn new(subject_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject_id,
            message,
            severity,
        }
    }

    pub fn info(subject_id: String, message: String) -> Self {
        Self::new(subject_id, message, WarningSeverity::Info)
    }

    pub fn warning(subject_id: String, message: String) -> Self {
        Self::new(subject_id, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
