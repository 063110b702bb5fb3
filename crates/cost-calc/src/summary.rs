//! 成本彙總建構

use cost_core::{BatchYield, CostError, CostSummary};
use rust_decimal::Decimal;

use crate::operations::OperationsCost;
use crate::rollup::RollupResult;
use crate::scrap::ScrapRecovery;

/// 彙總建構器
pub struct SummaryBuilder;

impl SummaryBuilder {
    /// 合併彙總、報廢、工序結果
    ///
    /// 元件/原物料成本與工序成本是單位成品的值，報廢回收已按批量攤分；
    /// 訂單總額另以單位成本 × 批量計算。
    pub fn build(
        rollup: &RollupResult,
        scrap: &ScrapRecovery,
        operations: &OperationsCost,
        batch: BatchYield,
    ) -> cost_core::Result<CostSummary> {
        let material_cost_after_scrap = rollup
            .components_cost
            .checked_add(rollup.raw_materials_cost)
            .and_then(|gross| gross.checked_sub(scrap.scrap_loss))
            .ok_or_else(|| overflow("扣除報廢後材料成本"))?;

        let total_bom_cost = material_cost_after_scrap
            .checked_add(operations.total)
            .ok_or_else(|| overflow("BOM 總成本"))?;

        let order_total = total_bom_cost
            .checked_mul(batch.quantity())
            .ok_or_else(|| overflow("訂單總額"))?;

        Ok(CostSummary {
            components_cost: rollup.components_cost,
            raw_materials_cost: rollup.raw_materials_cost,
            scrap_loss: scrap.scrap_loss,
            material_cost_after_scrap,
            operations_cost: operations.total,
            total_bom_cost,
            cost_per_unit: total_bom_cost,
            total_scrap_quantity: scrap.total_scrap_quantity,
            order_total,
        })
    }

    /// 依需要四捨五入
    pub fn finalize(summary: CostSummary, rounding_dp: Option<u32>) -> CostSummary {
        match rounding_dp {
            Some(dp) => summary.rounded(dp),
            None => summary,
        }
    }
}

fn overflow(field: &str) -> CostError {
    CostError::CalculationError(format!("{}溢位", field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rollup(components: i64, materials: i64) -> RollupResult {
        RollupResult {
            components_cost: Decimal::from(components),
            raw_materials_cost: Decimal::from(materials),
            node_costs: Vec::new(),
        }
    }

    fn scrap(loss: Decimal, quantity: Decimal) -> ScrapRecovery {
        ScrapRecovery {
            scrap_loss: loss,
            total_scrap_quantity: quantity,
            lines: Vec::new(),
        }
    }

    fn operations(total: i64) -> OperationsCost {
        OperationsCost {
            total: Decimal::from(total),
            lines: Vec::new(),
        }
    }

    #[test]
    fn test_build_summary() {
        let batch = BatchYield::try_new(Decimal::from(10)).unwrap();
        let summary = SummaryBuilder::build(
            &rollup(30, 20),
            &scrap(Decimal::ONE, Decimal::new(5, 1)),
            &operations(15),
            batch,
        )
        .unwrap();

        assert_eq!(summary.material_cost_after_scrap, Decimal::from(49));
        assert_eq!(summary.total_bom_cost, Decimal::from(64));
        assert_eq!(summary.cost_per_unit, Decimal::from(64));
        assert_eq!(summary.order_total, Decimal::from(640));
        assert_eq!(summary.total_scrap_quantity, Decimal::new(5, 1));
        assert_eq!(summary.operations_cost, Decimal::from(15));
    }

    #[test]
    fn test_scrap_can_exceed_material_cost() {
        let batch = BatchYield::try_new(Decimal::ONE).unwrap();
        let summary = SummaryBuilder::build(
            &rollup(0, 2),
            &scrap(Decimal::from(5), Decimal::ONE),
            &operations(0),
            batch,
        )
        .unwrap();

        assert_eq!(summary.material_cost_after_scrap, Decimal::from(-3));
    }

    #[test]
    fn test_finalize_rounding() {
        let mut summary = CostSummary::zero();
        summary.total_bom_cost = Decimal::new(123456, 4);

        assert_eq!(SummaryBuilder::finalize(summary.clone(), None), summary);
        assert_eq!(
            SummaryBuilder::finalize(summary, Some(2)).total_bom_cost,
            Decimal::new(1235, 2)
        );
    }
}
