//! 批次分析：對每張途程表執行品質判定、完工比對與在製品快照

use chrono::NaiveDate;
use routing_core::{
    ConfirmationLookup, EngineConfig, EnrichmentLookup, NoMatchReason, QualityVerdict,
    Resolution, RoutingTable, WipRow, YieldCompletion, YieldMatch,
};

use crate::{BatchWarning, QualityClassifier, WipSnapshot, YieldMatcher};

/// 單一工單的抓取結果
#[derive(Debug)]
pub struct FetchOutcome {
    pub work_order: String,
    pub table: routing_core::Result<RoutingTable>,
}

impl FetchOutcome {
    pub fn new(work_order: String, table: routing_core::Result<RoutingTable>) -> Self {
        Self { work_order, table }
    }
}

/// 品質表的一列
#[derive(Debug, Clone, PartialEq)]
pub struct QualityRow {
    pub work_order: String,
    pub part_number: String,
    pub description: String,
    pub verdict: QualityVerdict,
}

/// 完工表的一列
#[derive(Debug, Clone, PartialEq)]
pub struct YieldRow {
    pub part_number: String,
    pub description: String,
    pub completion: YieldCompletion,
}

/// 批次分析結果
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub quality: Vec<QualityRow>,
    pub yields: Vec<YieldRow>,
    pub wip: Vec<WipRow>,
    pub warnings: Vec<BatchWarning>,

    /// 分析耗時（毫秒）
    pub elapsed_ms: Option<u128>,
}

impl BatchResult {
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == crate::WarningSeverity::Error)
    }
}

/// 批次分析器
pub struct BatchAnalyzer {
    config: EngineConfig,
}

impl BatchAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 依序分析所有途程表
    ///
    /// 抓取失敗的工單只記錄警告並略過，不會中斷整批。
    pub fn analyze<C, E>(
        &self,
        outcomes: Vec<FetchOutcome>,
        target_date: NaiveDate,
        confirmations: &C,
        enrichment: &E,
    ) -> BatchResult
    where
        C: ConfirmationLookup + ?Sized,
        E: EnrichmentLookup + ?Sized,
    {
        tracing::info!(
            "開始批次分析：途程表 {} 張，完工日期 {}",
            outcomes.len(),
            target_date
        );
        let start_time = std::time::Instant::now();

        let mut result = BatchResult::default();

        for outcome in outcomes {
            let table = match outcome.table {
                Ok(table) => table,
                Err(e) => {
                    tracing::warn!(work_order = %outcome.work_order, error = %e, "途程表抓取失敗，略過");
                    result.warnings.push(BatchWarning::error(
                        outcome.work_order,
                        format!("途程表抓取失敗: {}", e),
                    ));
                    continue;
                }
            };

            tracing::debug!(
                work_order = %table.work_order(),
                operations = table.operation_count(),
                "分析途程表"
            );
            let header = table.header();

            // Step 1: 品質判定
            let verdict = QualityClassifier::classify(&table, &self.config, confirmations);
            Self::collect_resolution_warnings(&mut result.warnings, &table, &verdict);
            result.quality.push(QualityRow {
                work_order: header.order_id.clone(),
                part_number: header.product_code.clone(),
                description: header.description.clone(),
                verdict,
            });

            // Step 2: 完工比對
            match YieldMatcher::match_date(&table, target_date, &self.config, confirmations) {
                YieldMatch::Matched(completion) => result.yields.push(YieldRow {
                    part_number: header.product_code.clone(),
                    description: header.description.clone(),
                    completion,
                }),
                YieldMatch::NotMatched(reason) => {
                    if let Some(warning) = Self::no_match_warning(&table, &reason) {
                        result.warnings.push(warning);
                    }
                }
            }

            // Step 3: 在製品快照
            let wip = WipSnapshot::from_table(&table, enrichment);
            if let Resolution::Failed(message) = &wip.customer {
                result.warnings.push(BatchWarning::warning(
                    table.work_order().to_string(),
                    format!("客戶名稱查詢失敗: {}", message),
                ));
            }
            result.wip.push(wip);
        }

        result.elapsed_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("批次分析完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "品質 {} 筆，完工 {} 筆，警告 {} 筆",
            result.quality.len(),
            result.yields.len(),
            result.warnings.len()
        );

        result
    }

    fn collect_resolution_warnings(
        warnings: &mut Vec<BatchWarning>,
        table: &RoutingTable,
        verdict: &QualityVerdict,
    ) {
        if let Some(Resolution::Failed(message)) = &verdict.entry_date {
            warnings.push(BatchWarning::warning(
                table.work_order().to_string(),
                format!("檢驗日期查詢失敗: {}", message),
            ));
        }
        if let Some(Resolution::Failed(message)) = &verdict.mrb_date {
            warnings.push(BatchWarning::warning(
                table.work_order().to_string(),
                format!("MRB 日期查詢失敗: {}", message),
            ));
        }
    }

    fn no_match_warning(table: &RoutingTable, reason: &NoMatchReason) -> Option<BatchWarning> {
        let work_order = table.work_order().to_string();
        match reason {
            NoMatchReason::LookupFailed { step, message } => Some(BatchWarning::warning(
                work_order,
                format!("工序 {} 報工查詢失敗: {}", step, message),
            )),
            NoMatchReason::Unbalanced { step, work_slip } => Some(BatchWarning::info(
                work_order,
                format!("工序 {} 的報工加總無法對上（工作單 {}）", step, work_slip),
            )),
            _ => None,
        }
    }
}
