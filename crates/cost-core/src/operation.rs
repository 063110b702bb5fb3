//! 工序模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::numeric::{lenient_decimal, or_zero};
use crate::{CostError, Result};

/// 工序（人工/機台）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEntry {
    /// 工序ID
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// 工序名稱
    pub name: String,

    /// 週期時間（分鐘）
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub cycle_time_minutes: Option<Decimal>,

    /// 準備時間（分鐘）
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub setup_time_minutes: Option<Decimal>,

    /// 每小時費率
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub hourly_rate: Option<Decimal>,
}

impl OperationEntry {
    /// 創建新的工序
    pub fn new(
        name: impl Into<String>,
        cycle_time_minutes: Decimal,
        setup_time_minutes: Decimal,
        hourly_rate: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cycle_time_minutes: Some(cycle_time_minutes),
            setup_time_minutes: Some(setup_time_minutes),
            hourly_rate: Some(hourly_rate),
        }
    }

    /// 總工時（分鐘）= 週期 + 準備
    pub fn total_minutes(&self) -> Result<Decimal> {
        or_zero(self.cycle_time_minutes)
            .checked_add(or_zero(self.setup_time_minutes))
            .ok_or_else(|| self.overflow("總工時"))
    }

    /// 工序成本 = 總工時 / 60 × 時薪
    pub fn cost(&self) -> Result<Decimal> {
        let minutes = self.total_minutes()?;
        let rate = or_zero(self.hourly_rate);
        let per_hour = Decimal::from(60);

        // 先乘後除，避免 1/60 的循環小數截斷；乘積溢位時改為先除
        minutes
            .checked_mul(rate)
            .and_then(|product| product.checked_div(per_hour))
            .or_else(|| minutes.checked_div(per_hour)?.checked_mul(rate))
            .ok_or_else(|| self.overflow("成本"))
    }

    /// 是否有未填欄位
    pub fn has_data_gap(&self) -> bool {
        self.cycle_time_minutes.is_none()
            || self.setup_time_minutes.is_none()
            || self.hourly_rate.is_none()
    }

    /// 除工序ID外內容是否相同
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.cycle_time_minutes == other.cycle_time_minutes
            && self.setup_time_minutes == other.setup_time_minutes
            && self.hourly_rate == other.hourly_rate
    }

    fn overflow(&self, field: &str) -> CostError {
        CostError::CalculationError(format!("工序 {} 的{}溢位", self.name, field))
    }
}
