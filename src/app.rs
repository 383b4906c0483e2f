//! 單次執行流程：抓取、分析、輸出

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use routing_cache::{HistoryIndex, PrefetchPlan};
use routing_calc::{
    BatchAnalyzer, BatchResult, FetchOutcome, JournalAssembler, MaterialReceipt,
    ProcessingReceipt,
};
use routing_client::{fetch_open_tables, ErpClient, ProductionCenterClient};
use routing_core::{
    ConfirmationLookup, EngineConfig, EnrichmentLookup, RoutingTable, StockMovement,
};
use routing_report as report;

use crate::config::{AppConfig, OutputPaths};

/// 收貨報表內容
#[derive(Debug, Clone, Default)]
pub struct JournalReport {
    pub processing: Vec<ProcessingReceipt>,
    pub materials: Vec<MaterialReceipt>,
}

/// 更新流程：抓取所有開立中工單並輸出品質、完工、在製品三張表
pub fn run_update(config: &AppConfig, target_date: NaiveDate) -> Result<BatchResult> {
    tracing::info!("開始更新，完工日期 {}", target_date);
    let service = Arc::new(config.service.clone());

    // Step 1: 單執行緒非同步抓取途程表
    let fetcher = ProductionCenterClient::new(service.clone(), config.engine.number_format)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("無法建立非同步執行環境")?;
    let outcomes = runtime
        .block_on(fetch_open_tables(
            &fetcher,
            service.effective_connection_limit(),
        ))
        .context("無法取得開立中工單")?;
    drop(runtime);

    // Step 2: 預取報工歷史並分析
    let erp = ErpClient::new(service, config.engine.clone())?;
    let result = analyze_outcomes(outcomes, target_date, &config.engine, &erp, &erp);

    // Step 3: 輸出報表
    let run_timestamp = chrono::Local::now().naive_local();
    write_update_reports(&result, &config.output, run_timestamp)?;

    if result.has_errors() {
        tracing::warn!("更新完成，但有 {} 則警告", result.warnings.len());
    }
    Ok(result)
}

/// 收貨報表流程
pub fn run_journal(config: &AppConfig, date: NaiveDate) -> Result<JournalReport> {
    tracing::info!("開始產生收貨報表，日期 {}", date);
    let erp = ErpClient::new(Arc::new(config.service.clone()), config.engine.clone())?;

    let movements = erp
        .stock_journal(date)
        .with_context(|| format!("無法取得 {} 的庫存異動日誌", date))?;
    let journal = assemble_journal(&movements, &erp)?;

    write_journal_reports(&journal, &config.output)?;
    Ok(journal)
}

/// 依抓取結果預取報工歷史，再執行批次分析
///
/// `source` 只在預取時查詢，分析階段讀取預取好的索引。
pub fn analyze_outcomes<S, E>(
    outcomes: Vec<FetchOutcome>,
    target_date: NaiveDate,
    engine: &EngineConfig,
    source: &S,
    enrichment: &E,
) -> BatchResult
where
    S: ConfirmationLookup + ?Sized,
    E: EnrichmentLookup + ?Sized,
{
    let tables: Vec<RoutingTable> = outcomes
        .iter()
        .filter_map(|o| o.table.as_ref().ok().cloned())
        .collect();
    let plan = PrefetchPlan::from_tables(&tables, engine);
    let index = HistoryIndex::prefetch(&plan, source);

    BatchAnalyzer::new(engine.clone()).analyze(outcomes, target_date, &index, enrichment)
}

pub fn assemble_journal<E>(movements: &[StockMovement], lookup: &E) -> Result<JournalReport>
where
    E: EnrichmentLookup + ?Sized,
{
    let processing = JournalAssembler::processing_receipts(movements, lookup)
        .context("委外加工收貨表組裝失敗")?;
    let materials =
        JournalAssembler::material_receipts(movements, lookup).context("物料收貨表組裝失敗")?;

    tracing::info!(
        "收貨報表：委外加工 {} 列，物料 {} 列",
        processing.len(),
        materials.len()
    );
    Ok(JournalReport {
        processing,
        materials,
    })
}

pub fn write_update_reports(
    result: &BatchResult,
    output: &OutputPaths,
    run_timestamp: NaiveDateTime,
) -> Result<()> {
    report::write_quality(open(&output.quality)?, &result.quality, run_timestamp)?;
    report::write_yields(open(&output.yields)?, &result.yields)?;
    report::write_wip(open(&output.wip)?, &result.wip, run_timestamp)?;

    tracing::info!(
        quality = result.quality.len(),
        yields = result.yields.len(),
        wip = result.wip.len(),
        "報表已輸出"
    );
    Ok(())
}

pub fn write_journal_reports(journal: &JournalReport, output: &OutputPaths) -> Result<()> {
    report::write_processing(open(&output.processing)?, &journal.processing)?;
    report::write_materials(open(&output.materials)?, &journal.materials)?;
    Ok(())
}

fn open(path: &Path) -> Result<std::fs::File> {
    report::create_file(path).with_context(|| format!("無法建立報表 {}", path.display()))
}
