//! # Cost Core
//!
//! BOM 成本計算的資料模型與類型定義

pub mod config;
pub mod input;
pub mod loss;
pub mod node;
pub mod numeric;
pub mod operation;
pub mod scrap;
pub mod summary;

use rust_decimal::Decimal;

// Re-export 主要類型
pub use config::CostingConfig;
pub use input::BomInput;
pub use loss::{BatchYield, LossPercent};
pub use node::{BomNode, KindTag, NodeKind, NodeRecord};
pub use operation::OperationEntry;
pub use scrap::ScrapEntry;
pub use summary::CostSummary;

/// 結構驗證問題
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("節點ID重複: {node_id}")]
    DuplicateNodeId { node_id: String },

    #[error("節點 {node_id} 的父節點 {parent_id} 不存在")]
    DanglingParent { node_id: String, parent_id: String },

    #[error("父子關係形成循環: {}", .node_ids.join(" → "))]
    Cycle { node_ids: Vec<String> },

    #[error("節點 {node_id} 的損耗率 {value}% 超出 [0, 100)")]
    InvalidLossPercent { node_id: String, value: Decimal },

    #[error("材料節點 {node_id} 不可有子節點: {}", .child_ids.join(", "))]
    MaterialHasChildren {
        node_id: String,
        child_ids: Vec<String>,
    },

    #[error("報廢記錄 {item_ref} 的報廢率 {value}% 超出 [0, 100]")]
    InvalidScrapLoss { item_ref: String, value: Decimal },

    #[error("節點 {node_id} 標記為 {kind}，卻放在 {listed_as} 清單")]
    KindMismatch {
        node_id: String,
        listed_as: String,
        kind: String,
    },
}

impl ValidationIssue {
    /// 問題涉及的節點ID
    pub fn node_ids(&self) -> Vec<&str> {
        match self {
            Self::DuplicateNodeId { node_id }
            | Self::InvalidLossPercent { node_id, .. } => vec![node_id.as_str()],
            Self::DanglingParent { node_id, .. } | Self::KindMismatch { node_id, .. } => {
                vec![node_id.as_str()]
            }
            Self::Cycle { node_ids } => node_ids.iter().map(String::as_str).collect(),
            Self::MaterialHasChildren { node_id, child_ids } => std::iter::once(node_id.as_str())
                .chain(child_ids.iter().map(String::as_str))
                .collect(),
            Self::InvalidScrapLoss { .. } => Vec::new(),
        }
    }
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// BOM 結構錯誤（循環、懸空父節點、損耗率 >= 100）
    Structural,
    /// 呼叫端參數錯誤（批量 <= 0、找不到節點）
    CallerMisuse,
    /// 內部計算錯誤（數值溢位）
    Internal,
}

/// 成本計算錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum CostError {
    #[error("BOM 結構驗證失敗（{} 項）: {}", .0.len(), format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("節點 {node_id} 的損耗率 {value}% 超出 [0, 100)")]
    InvalidLossPercent { node_id: String, value: Decimal },

    #[error("遍歷超出上限: {0}")]
    TraversalLimitExceeded(String),

    #[error("無效的批量: {0}（必須大於 0）")]
    InvalidBatchQuantity(Decimal),

    #[error("找不到節點: {0}")]
    NodeNotFound(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

impl CostError {
    /// 錯誤分類
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::InvalidLossPercent { .. } | Self::TraversalLimitExceeded(_) => {
                ErrorCategory::Structural
            }
            Self::InvalidBatchQuantity(_) | Self::NodeNotFound(_) => ErrorCategory::CallerMisuse,
            Self::CalculationError(_) => ErrorCategory::Internal,
        }
    }

    /// 造成錯誤的節點ID（去重，保留出現順序）
    pub fn offending_node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let mut push = |id: &str| {
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        };
        match self {
            Self::Validation(issues) => {
                for issue in issues {
                    for id in issue.node_ids() {
                        push(id);
                    }
                }
            }
            Self::InvalidLossPercent { node_id, .. } => push(node_id),
            Self::NodeNotFound(node_id) => push(node_id),
            _ => {}
        }
        ids
    }

    /// 驗證問題清單（非驗證錯誤回傳空）
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation(issues) => issues,
            _ => &[],
        }
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, CostError>;
