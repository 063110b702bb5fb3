//! # BOM Cost
//!
//! BOM 成本彙總引擎：驗證 BOM 結構、逐層累積損耗、扣除報廢回收、
//! 加上工序成本，產出單位成品的完整製造成本。
//!
//! ```
//! use bom_cost::{BomCostCalculator, BomInput, BomNode};
//! use rust_decimal::Decimal;
//!
//! let input = BomInput::new(Decimal::ONE)
//!     .with_node(BomNode::component("FRAME", Decimal::ONE, Decimal::from(5), Decimal::from(20)));
//!
//! let result = BomCostCalculator::default().calculate(&input).unwrap();
//! assert_eq!(result.summary.cost_per_unit, Decimal::new(625, 2));
//! ```

pub mod logging;

pub use rust_decimal::Decimal;

pub use cost_cache::{CacheStats, DirtyTracker, IncrementalCalculator};
pub use cost_calc::{
    BomCostCalculator, CascadeDelete, CascadeRemoval, CostResult, CostRollup, CostWarning,
    IntegrityValidator, NodeCost, NodeStore, OperationCost, ScrapLine, WarningSeverity,
};
pub use cost_core::{
    BatchYield, BomInput, BomNode, CostError, CostSummary, CostingConfig, ErrorCategory, KindTag,
    LossPercent, NodeKind, OperationEntry, ScrapEntry, ValidationIssue,
};

/// 從 JSON 載入輸入並計算
///
/// 數值欄位寬鬆解析（缺值或非數字視為 0），結構錯誤仍會回傳 `CostError`。
pub fn calculate_json(json: &str, config: CostingConfig) -> Result<CostResult, JsonCostError> {
    let input: BomInput = serde_json::from_str(json)?;
    tracing::debug!("JSON 輸入解析完成: 節點 {} 筆", input.node_count());
    Ok(BomCostCalculator::new(config).calculate(&input)?)
}

/// JSON 計算錯誤
#[derive(Debug, thiserror::Error)]
pub enum JsonCostError {
    #[error("JSON 解析錯誤: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Cost(#[from] CostError),
}
