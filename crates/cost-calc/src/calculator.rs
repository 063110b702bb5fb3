//! BOM 成本主計算器

use cost_core::{BomInput, CostingConfig, NodeKind};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::operations::OperationsCalculator;
use crate::rollup::CostRollup;
use crate::scrap::ScrapRecoveryCalculator;
use crate::store::NodeStore;
use crate::summary::SummaryBuilder;
use crate::validator::IntegrityValidator;
use crate::{CostResult, CostWarning};

/// BOM 成本計算器
///
/// 純計算，不保留任何狀態；相同輸入重複呼叫得到相同結果。
#[derive(Debug, Clone, Default)]
pub struct BomCostCalculator {
    config: CostingConfig,
}

impl BomCostCalculator {
    /// 創建新的成本計算器
    pub fn new(config: CostingConfig) -> Self {
        Self { config }
    }

    /// 主計算入口
    pub fn calculate(&self, input: &BomInput) -> cost_core::Result<CostResult> {
        tracing::info!(
            "開始 BOM 成本計算：元件 {} 筆，原物料 {} 筆，工序 {} 筆，報廢 {} 筆",
            input.components.len(),
            input.materials.len(),
            input.operations.len(),
            input.scrap.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 批量檢查（作為除數，必須 > 0）
        let batch = input.batch()?;

        // Step 2: 建立節點索引
        tracing::debug!("Step 2: 建立節點索引");
        let store = NodeStore::from_input(input);
        tracing::debug!("頂層節點: {}，節點總數: {}", store.roots().len(), store.len());

        // Step 3: 結構驗證（循環、懸空父節點、損耗率、清單類型）
        tracing::debug!("Step 3: 結構驗證");
        IntegrityValidator::validate_input(&store, input)?;

        // Step 4: 成本向上彙總
        tracing::debug!("Step 4: 成本向上彙總");
        let rollup = CostRollup::new(&store, &self.config).compute()?;

        // Step 5: 報廢回收與工序成本
        tracing::debug!("Step 5: 報廢回收與工序成本");
        let scrap = ScrapRecoveryCalculator::calculate(&input.scrap, batch)?;
        let operations = OperationsCalculator::calculate(&input.operations)?;

        // Step 6: 彙總
        tracing::debug!("Step 6: 彙總");
        let summary = SummaryBuilder::build(&rollup, &scrap, &operations, batch)?;

        let mut result = CostResult::new(SummaryBuilder::finalize(summary, self.config.rounding_dp));
        if self.config.include_breakdown {
            result.node_costs = rollup.node_costs;
            result.operation_costs = operations.lines;
            result.scrap_lines = scrap.lines;
        }
        if self.config.report_data_gaps {
            result.warnings = Self::collect_data_gaps(input);
        }
        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("BOM 成本計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "單位成本: {}，訂單總額: {}",
            result.summary.cost_per_unit,
            result.summary.order_total
        );

        Ok(result)
    }

    /// 平行計算多份互不相關的 BOM
    ///
    /// 每份結果獨立，某份失敗不影響其他份。
    pub fn calculate_many(&self, inputs: &[BomInput]) -> Vec<cost_core::Result<CostResult>> {
        tracing::info!("批次計算 {} 份 BOM", inputs.len());
        inputs.par_iter().map(|input| self.calculate(input)).collect()
    }

    /// 獲取配置引用
    pub fn config(&self) -> &CostingConfig {
        &self.config
    }

    /// 收集資料缺口（缺值以 0 計算，不中斷）
    fn collect_data_gaps(input: &BomInput) -> Vec<CostWarning> {
        let mut warnings = Vec::new();

        for node in input.nodes() {
            if node.quantity.is_none() {
                warnings.push(CostWarning::info(node.id.clone(), "用量未填，以 0 計算".to_string()));
            }
            if node.rate.is_none() {
                warnings.push(CostWarning::info(node.id.clone(), "單價未填，以 0 計算".to_string()));
            }
            if let NodeKind::Component { loss_percent: None } = node.kind {
                warnings.push(CostWarning::info(node.id.clone(), "損耗率未填，以 0 計算".to_string()));
            }
            if node.quantity_or_zero() < Decimal::ZERO || node.rate_or_zero() < Decimal::ZERO {
                warnings.push(CostWarning::warning(
                    node.id.clone(),
                    format!(
                        "用量或單價為負值（用量 {}，單價 {}）",
                        node.quantity_or_zero(),
                        node.rate_or_zero()
                    ),
                ));
            }
        }

        for op in &input.operations {
            if op.has_data_gap() {
                warnings.push(CostWarning::info(op.name.clone(), "工序時間或費率未填，以 0 計算".to_string()));
            }
        }

        for entry in &input.scrap {
            if entry.has_data_gap() {
                warnings.push(CostWarning::info(
                    entry.item_ref.clone(),
                    "報廢數量、報廢率或單價未填，以 0 計算".to_string(),
                ));
            }
        }

        warnings
    }
}
