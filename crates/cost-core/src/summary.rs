//! 成本彙總模型

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// BOM 成本彙總（單位成品）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    /// 頂層元件成本（含損耗放大）
    pub components_cost: Decimal,

    /// 頂層原物料成本
    pub raw_materials_cost: Decimal,

    /// 報廢回收扣除額（已按批量攤分）
    pub scrap_loss: Decimal,

    /// 扣除報廢後材料成本 = 元件 + 原物料 - 報廢回收
    pub material_cost_after_scrap: Decimal,

    /// 工序成本（不按批量攤分）
    pub operations_cost: Decimal,

    /// BOM 總成本 = 扣除報廢後材料成本 + 工序成本
    pub total_bom_cost: Decimal,

    /// 單位成本（等於 BOM 總成本）
    pub cost_per_unit: Decimal,

    /// 報廢總量（已按批量攤分）
    pub total_scrap_quantity: Decimal,

    /// 訂單總額 = 單位成本 × 批量
    pub order_total: Decimal,
}

impl CostSummary {
    /// 全為 0 的彙總
    pub fn zero() -> Self {
        Self {
            components_cost: Decimal::ZERO,
            raw_materials_cost: Decimal::ZERO,
            scrap_loss: Decimal::ZERO,
            material_cost_after_scrap: Decimal::ZERO,
            operations_cost: Decimal::ZERO,
            total_bom_cost: Decimal::ZERO,
            cost_per_unit: Decimal::ZERO,
            total_scrap_quantity: Decimal::ZERO,
            order_total: Decimal::ZERO,
        }
    }

    /// 材料成本（未扣報廢）
    pub fn gross_material_cost(&self) -> Decimal {
        self.components_cost + self.raw_materials_cost
    }

    /// 將所有報表值四捨五入到指定位數（中點遠離零）
    pub fn rounded(&self, dp: u32) -> Self {
        let round = |value: Decimal| value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        Self {
            components_cost: round(self.components_cost),
            raw_materials_cost: round(self.raw_materials_cost),
            scrap_loss: round(self.scrap_loss),
            material_cost_after_scrap: round(self.material_cost_after_scrap),
            operations_cost: round(self.operations_cost),
            total_bom_cost: round(self.total_bom_cost),
            cost_per_unit: round(self.cost_per_unit),
            total_scrap_quantity: round(self.total_scrap_quantity),
            order_total: round(self.order_total),
        }
    }
}
