//! 工序成本計算

use cost_core::{CostError, OperationEntry};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// 單筆工序成本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationCost {
    pub entry_id: Uuid,
    pub name: String,
    pub total_minutes: Decimal,
    pub cost: Decimal,
}

/// 工序成本結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationsCost {
    /// 工序成本合計（不按批量攤分）
    pub total: Decimal,
    pub lines: Vec<OperationCost>,
}

/// 工序成本計算器
pub struct OperationsCalculator;

impl OperationsCalculator {
    /// 計算工序成本：(週期 + 準備) / 60 × 時薪
    pub fn calculate(entries: &[OperationEntry]) -> cost_core::Result<OperationsCost> {
        let lines = entries
            .iter()
            .map(|entry| {
                Ok(OperationCost {
                    entry_id: entry.id,
                    name: entry.name.clone(),
                    total_minutes: entry.total_minutes()?,
                    cost: entry.cost()?,
                })
            })
            .collect::<cost_core::Result<Vec<_>>>()?;

        let total = lines.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.cost)
                .ok_or_else(|| CostError::CalculationError("工序成本合計溢位".to_string()))
        })?;

        Ok(OperationsCost { total, lines })
    }
}
