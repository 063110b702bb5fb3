//! 報廢回收計算

use cost_core::{BatchYield, CostError, ScrapEntry};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// 單筆報廢明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapLine {
    pub entry_id: Uuid,
    pub item_ref: String,
    /// 報廢數量（未攤分）
    pub scrap_quantity: Decimal,
    /// 回收價值（未攤分）
    pub recovered_value: Decimal,
}

/// 報廢回收結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapRecovery {
    /// 回收價值合計 / 批量
    pub scrap_loss: Decimal,
    /// 報廢數量合計 / 批量
    pub total_scrap_quantity: Decimal,
    pub lines: Vec<ScrapLine>,
}

/// 報廢回收計算器
///
/// 與 BOM 樹無關；`parent_id` 只是參考資訊，不參與計算。
pub struct ScrapRecoveryCalculator;

impl ScrapRecoveryCalculator {
    /// 計算報廢回收扣除額
    pub fn calculate(entries: &[ScrapEntry], batch: BatchYield) -> cost_core::Result<ScrapRecovery> {
        let lines = entries
            .iter()
            .map(|entry| {
                Ok(ScrapLine {
                    entry_id: entry.id,
                    item_ref: entry.item_ref.clone(),
                    scrap_quantity: entry.scrap_quantity()?,
                    recovered_value: entry.recovered_value()?,
                })
            })
            .collect::<cost_core::Result<Vec<_>>>()?;

        let mut total_value = Decimal::ZERO;
        let mut total_quantity = Decimal::ZERO;
        for line in &lines {
            total_value = total_value
                .checked_add(line.recovered_value)
                .ok_or_else(|| overflow("回收價值合計"))?;
            total_quantity = total_quantity
                .checked_add(line.scrap_quantity)
                .ok_or_else(|| overflow("報廢數量合計"))?;
        }

        Ok(ScrapRecovery {
            scrap_loss: batch.per_unit(total_value)?,
            total_scrap_quantity: batch.per_unit(total_quantity)?,
            lines,
        })
    }
}

fn overflow(field: &str) -> CostError {
    CostError::CalculationError(format!("{}溢位", field))
}
