//! CSV 報表輸出

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::Writer;
use routing_calc::{MaterialReceipt, ProcessingReceipt, QualityRow, YieldRow};
use routing_core::{Result, RoutingError, WipRow};

use crate::text;

pub const QUALITY_HEADERS: [&str; 11] = [
    "wo_num",
    "in_quality",
    "part_num",
    "description",
    "qty",
    "date",
    "progress",
    "mrb",
    "mrb_qty",
    "mrb_date",
    "timestamp",
];

pub const YIELD_HEADERS: [&str; 7] = [
    "Completed Process",
    "Work Slip",
    "Description",
    "P/N",
    "QTY Yield",
    "Next Process",
    "Completion Time",
];

pub const WIP_HEADERS: [&str; 11] = [
    "wo_num",
    "part_num",
    "description",
    "customer",
    "qty_tbr",
    "yield",
    "mrb",
    "scrap",
    "due",
    "process",
    "timestamp",
];

pub const PROCESSING_HEADERS: [&str; 9] = [
    "Item",
    "PO",
    "Supplier/Processor",
    "Description",
    "Process",
    "Work Order(s)",
    "Receipt Location",
    "QTY",
    "Next Process",
];

pub const MATERIAL_HEADERS: [&str; 8] = [
    "Item",
    "PO",
    "Supplier/Processor",
    "Description",
    "Part/Material Number",
    "Item Text",
    "Receipt Location",
    "QTY",
];

fn report_error(e: impl std::fmt::Display) -> RoutingError {
    RoutingError::Report(e.to_string())
}

/// 建立輸出檔（必要時建立上層目錄）
pub fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(report_error)?;
    }
    File::create(path).map_err(|e| RoutingError::Report(format!("{}: {}", path.display(), e)))
}

fn finish<W: Write>(mut wtr: Writer<W>, table: &str, rows: usize) -> Result<()> {
    wtr.flush().map_err(report_error)?;
    tracing::debug!(table = table, rows = rows, "報表輸出完成");
    Ok(())
}

/// 品質表
pub fn write_quality<W: Write>(
    writer: W,
    rows: &[QualityRow],
    run_timestamp: NaiveDateTime,
) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(QUALITY_HEADERS).map_err(report_error)?;

    let stamp = text::timestamp(run_timestamp);
    for row in rows {
        let verdict = &row.verdict;
        wtr.write_record([
            row.work_order.clone(),
            verdict.status.code().to_string(),
            row.part_number.clone(),
            row.description.clone(),
            text::optional_quantity(verdict.quantity),
            text::confirmation_date(verdict.entry_date.as_ref()),
            text::progress(verdict.progress),
            text::flag(verdict.has_mrb).to_string(),
            text::quantity(verdict.mrb_quantity),
            text::confirmation_date(verdict.mrb_date.as_ref()),
            stamp.clone(),
        ])
        .map_err(report_error)?;
    }

    finish(wtr, "quality", rows.len())
}

/// 完工表
pub fn write_yields<W: Write>(writer: W, rows: &[YieldRow]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(YIELD_HEADERS).map_err(report_error)?;

    for row in rows {
        let completion = &row.completion;
        wtr.write_record([
            completion.process.clone(),
            completion.work_slip.clone(),
            row.description.clone(),
            row.part_number.clone(),
            text::quantity(completion.quantity),
            text::next_process(&completion.next_process),
            text::completion_time(completion.completion_timestamp),
        ])
        .map_err(report_error)?;
    }

    finish(wtr, "yield", rows.len())
}

/// 在製品表
pub fn write_wip<W: Write>(writer: W, rows: &[WipRow], run_timestamp: NaiveDateTime) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(WIP_HEADERS).map_err(report_error)?;

    let stamp = text::timestamp(run_timestamp);
    for row in rows {
        wtr.write_record([
            row.work_order.clone(),
            row.part_number.clone(),
            row.description.clone(),
            text::customer(&row.customer),
            text::quantity(row.released_qty),
            text::quantity(row.completed_qty),
            text::quantity(row.mrb_qty),
            text::quantity(row.scrap_qty),
            text::quantity(row.due_qty),
            row.process.clone(),
            stamp.clone(),
        ])
        .map_err(report_error)?;
    }

    finish(wtr, "wip", rows.len())
}

/// 委外加工收貨表
pub fn write_processing<W: Write>(writer: W, rows: &[ProcessingReceipt]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(PROCESSING_HEADERS).map_err(report_error)?;

    for row in rows {
        wtr.write_record([
            row.item.to_string(),
            row.purchase_order.clone(),
            row.supplier.clone(),
            row.description.clone(),
            row.process.clone(),
            text::work_orders(&row.work_orders),
            row.location.clone(),
            text::quantity(row.quantity),
            text::next_process(&row.next_process),
        ])
        .map_err(report_error)?;
    }

    finish(wtr, "processing", rows.len())
}

/// 物料收貨表
pub fn write_materials<W: Write>(writer: W, rows: &[MaterialReceipt]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(MATERIAL_HEADERS).map_err(report_error)?;

    for row in rows {
        wtr.write_record([
            row.item.to_string(),
            row.purchase_order.clone(),
            row.supplier.clone(),
            row.description.clone(),
            row.part_number.clone(),
            row.item_text.clone(),
            row.location.clone(),
            text::quantity(row.quantity),
        ])
        .map_err(report_error)?;
    }

    finish(wtr, "materials", rows.len())
}
