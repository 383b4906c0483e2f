//! 報表欄位文字
//!
//! 解析結果只在這裡轉成下游讀取的固定字串。

use chrono::{NaiveDate, NaiveDateTime};
use routing_core::{NextProcess, Progress, Resolution};
use rust_decimal::Decimal;

pub const NOT_APPLICABLE: &str = "N/A";
pub const NO_CONFIRMATION: &str = "No Completion Confirmation";
pub const NO_DATE: &str = "No Date";
pub const ERROR: &str = "ERROR";
pub const LAST_PROCESS: &str = "None";
pub const NOT_FOUND: &str = "Not Found";
pub const PLACEHOLDER: &str = "-";

/// 報表日期格式
pub const DATE_FORMAT: &str = "%m/%d/%y";

/// 執行時間戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// 數量：去掉多餘的小數零
pub fn quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn optional_quantity(value: Option<Decimal>) -> String {
    value.map(quantity).unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// 報工日期：未查詢為 N/A，查無紀錄與查詢失敗各有固定字串
pub fn confirmation_date(value: Option<&Resolution<NaiveDate>>) -> String {
    match value {
        None => NOT_APPLICABLE.to_string(),
        Some(Resolution::Found(d)) => date(*d),
        Some(Resolution::Missing) => NO_CONFIRMATION.to_string(),
        Some(Resolution::Failed(_)) => NO_DATE.to_string(),
    }
}

pub fn progress(value: Option<Progress>) -> String {
    value
        .map(|p| p.to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

pub fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub fn next_process(value: &NextProcess) -> String {
    match value {
        NextProcess::Operation(name) => name.clone(),
        NextProcess::Last => LAST_PROCESS.to_string(),
        NextProcess::NotFound => NOT_FOUND.to_string(),
    }
}

/// 完工時間（時:分）
pub fn completion_time(value: Option<NaiveDateTime>) -> String {
    value
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

pub fn customer(value: &Resolution<String>) -> String {
    match value {
        Resolution::Found(name) => name.clone(),
        Resolution::Missing => PLACEHOLDER.to_string(),
        Resolution::Failed(_) => ERROR.to_string(),
    }
}

pub fn work_orders(value: &[String]) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.join(", ")
    }
}
