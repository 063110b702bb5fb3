//! 損耗率與批量

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{CostError, Result};

/// 元件損耗率（百分比）
///
/// 只能以 `[0, 100)` 範圍內的值建立，因此良率因子 `1 - p/100` 恆大於 0，
/// 以此類型做除法不會出現除以零。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LossPercent(Decimal);

impl LossPercent {
    /// 無損耗
    pub const ZERO: LossPercent = LossPercent(Decimal::ZERO);

    /// 建立損耗率，範圍外回傳錯誤
    pub fn try_new(node_id: &str, value: Decimal) -> Result<Self> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(CostError::InvalidLossPercent {
                node_id: node_id.to_string(),
                value,
            })
        }
    }

    /// 檢查數值是否為合法損耗率
    pub fn is_valid(value: Decimal) -> bool {
        value >= Decimal::ZERO && value < Decimal::ONE_HUNDRED
    }

    /// 百分比數值
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// 良率因子：`1 - p/100`，範圍 `(0, 1]`
    pub fn yield_factor(&self) -> Decimal {
        Decimal::ONE - self.0 / Decimal::ONE_HUNDRED
    }

    /// 將原始成本按良率放大：`raw / (1 - p/100)`
    pub fn inflate(&self, raw: Decimal) -> Result<Decimal> {
        raw.checked_div(self.yield_factor()).ok_or_else(|| {
            CostError::CalculationError(format!("損耗放大溢位: {} / {}", raw, self.yield_factor()))
        })
    }
}

impl Default for LossPercent {
    fn default() -> Self {
        Self::ZERO
    }
}

/// 批量（一次生產的成品數量）
///
/// 必須大於 0，因為報廢損失以它為除數。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BatchYield(Decimal);

impl BatchYield {
    /// 建立批量，`<= 0` 回傳錯誤
    pub fn try_new(quantity: Decimal) -> Result<Self> {
        if quantity > Decimal::ZERO {
            Ok(Self(quantity))
        } else {
            Err(CostError::InvalidBatchQuantity(quantity))
        }
    }

    /// 批量數值
    pub fn quantity(&self) -> Decimal {
        self.0
    }

    /// 以批量攤分
    pub fn per_unit(&self, total: Decimal) -> Result<Decimal> {
        total.checked_div(self.0).ok_or_else(|| {
            CostError::CalculationError(format!("批量攤分溢位: {} / {}", total, self.0))
        })
    }
}
