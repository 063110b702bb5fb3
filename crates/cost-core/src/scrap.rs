//! 報廢回收模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::numeric::{lenient_decimal, or_zero};
use crate::{CostError, Result};

/// 報廢記錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapEntry {
    /// 記錄ID
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// 報廢品項
    pub item_ref: String,

    /// 投入數量
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub input_quantity: Option<Decimal>,

    /// 報廢率（%），範圍 [0, 100]
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub loss_percent: Option<Decimal>,

    /// 回收單價
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate: Option<Decimal>,

    /// 關聯元件（僅供參考，不參與計算）
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl ScrapEntry {
    /// 創建新的報廢記錄
    pub fn new(
        item_ref: impl Into<String>,
        input_quantity: Decimal,
        loss_percent: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_ref: item_ref.into(),
            input_quantity: Some(input_quantity),
            loss_percent: Some(loss_percent),
            rate: Some(rate),
            parent_id: None,
        }
    }

    /// 建構器模式：設置關聯元件
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// 報廢數量 = 投入 × 報廢率
    pub fn scrap_quantity(&self) -> Result<Decimal> {
        // 報廢率先換成比例，投入數量接近上限時才不會在 ×100 溢位
        or_zero(self.loss_percent)
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|ratio| or_zero(self.input_quantity).checked_mul(ratio))
            .ok_or_else(|| self.overflow("報廢數量"))
    }

    /// 回收價值 = 報廢數量 × 單價
    pub fn recovered_value(&self) -> Result<Decimal> {
        self.scrap_quantity()?
            .checked_mul(or_zero(self.rate))
            .ok_or_else(|| self.overflow("回收價值"))
    }

    /// 報廢率是否在 [0, 100]
    pub fn has_valid_loss(&self) -> bool {
        let loss = or_zero(self.loss_percent);
        loss >= Decimal::ZERO && loss <= Decimal::ONE_HUNDRED
    }

    /// 是否有未填欄位
    pub fn has_data_gap(&self) -> bool {
        self.input_quantity.is_none() || self.loss_percent.is_none() || self.rate.is_none()
    }

    /// 除記錄ID外內容是否相同
    pub fn same_content(&self, other: &Self) -> bool {
        self.item_ref == other.item_ref
            && self.input_quantity == other.input_quantity
            && self.loss_percent == other.loss_percent
            && self.rate == other.rate
            && self.parent_id == other.parent_id
    }

    fn overflow(&self, field: &str) -> CostError {
        CostError::CalculationError(format!("報廢記錄 {} 的{}溢位", self.item_ref, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrap_value() {
        let scrap = ScrapEntry::new("STEEL-OFFCUT", Decimal::from(100), Decimal::from(5), Decimal::from(2))
            .with_parent("FRAME");

        assert_eq!(scrap.scrap_quantity().unwrap(), Decimal::from(5));
        assert_eq!(scrap.recovered_value().unwrap(), Decimal::from(10));
        assert!(scrap.has_valid_loss());
        assert_eq!(scrap.parent_id.as_deref(), Some("FRAME"));
    }

    #[test]
    fn test_full_scrap_is_allowed() {
        let scrap = ScrapEntry::new("CHIPS", Decimal::from(4), Decimal::ONE_HUNDRED, Decimal::ONE);
        assert!(scrap.has_valid_loss());
        assert_eq!(scrap.scrap_quantity().unwrap(), Decimal::from(4));

        let bad = ScrapEntry::new("CHIPS", Decimal::from(4), Decimal::from(101), Decimal::ONE);
        assert!(!bad.has_valid_loss());
    }

    #[test]
    fn test_huge_quantity_overflows_into_error() {
        // 全數報廢時數量本身可表示，乘上單價才溢位
        let scrap = ScrapEntry::new("SLAG", Decimal::MAX, Decimal::ONE_HUNDRED, Decimal::from(2));
        assert_eq!(scrap.scrap_quantity().unwrap(), Decimal::MAX);

        let err = scrap.recovered_value().unwrap_err();
        assert!(matches!(err, CostError::CalculationError(ref msg) if msg.contains("SLAG")));
    }

    #[test]
    fn test_same_content_ignores_id() {
        let a = ScrapEntry::new("CHIPS", Decimal::from(4), Decimal::TEN, Decimal::ONE);
        let b = ScrapEntry::new("CHIPS", Decimal::from(4), Decimal::TEN, Decimal::ONE);
        assert_ne!(a.id, b.id);
        assert!(a.same_content(&b));
        assert!(!a.same_content(&b.with_parent("FRAME")));
    }
}
