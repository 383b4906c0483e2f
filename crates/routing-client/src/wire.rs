//! 服務端 JSON 格式與核心模型之間的轉換
//!
//! 查詢端點（infosystem）回傳 `content.data.table[].fields.<欄位>.{text,value}`；
//! 資料庫物件回傳 `content.data.{head,table}` 或 `content.data.erpDataObjects[]`。

use std::collections::HashMap;

use chrono::NaiveDate;
use routing_core::parse::{parse_date, parse_optional_quantity, parse_timestamp};
use routing_core::{
    ConfirmationRecord, NumberFormat, OperationStep, Result, RoutingError, RoutingTable,
    StockMovement,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 回應外層
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub content: Content<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content<T> {
    pub data: T,
}

/// 表格資料（查詢端點或單一資料庫物件）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub head: Option<Row>,
    #[serde(default)]
    pub table: Vec<Row>,
}

/// 依條件查詢的資料庫物件清單
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectList {
    #[serde(rename = "erpDataObjects", default)]
    pub objects: Vec<TableData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub fields: HashMap<String, Field>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Field {
    /// `value` 轉為文字（字串原樣、數字與布林轉字串、null 為空字串）
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl Row {
    /// 欄位的 `text`，欄位不存在時為空字串
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(|f| f.text.as_str()).unwrap_or("")
    }

    /// 欄位的 `value` 文字
    pub fn value(&self, name: &str) -> String {
        self.fields.get(name).map(Field::value_text).unwrap_or_default()
    }

    fn quantity(&self, name: &str, format: NumberFormat) -> Result<Decimal> {
        Ok(parse_optional_quantity(self.text(name), format)?.unwrap_or(Decimal::ZERO))
    }
}

/// 查詢端點的請求內容
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfosystemRequest {
    pub actions: Vec<Action>,
    pub head_fields: String,
    pub table_fields: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "_type")]
pub enum Action {
    SetFieldValue {
        #[serde(rename = "fieldName")]
        field_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<serde_json::Value>,
    },
}

impl InfosystemRequest {
    pub fn new(table_fields: &str) -> Self {
        Self {
            actions: Vec::new(),
            head_fields: "-".to_string(),
            table_fields: table_fields.to_string(),
        }
    }

    /// 建構器模式：設定查詢欄位
    pub fn with_field(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.actions.push(Action::SetFieldValue {
            field_name: name.to_string(),
            value: Some(value.into()),
        });
        self
    }

    /// 加上執行查詢的動作
    pub fn start(mut self) -> Self {
        self.actions.push(Action::SetFieldValue {
            field_name: "bstart".to_string(),
            value: None,
        });
        self
    }
}

/// 途程表欄位
pub const ROUTING_FIELDS: &str = "order,art,artbez,frgmge,ycomplete,mrbqty,rverlust,twterm,vorgang,netmge";

/// 庫存異動日誌欄位
pub const JOURNAL_FIELDS: &str =
    "budat,ysuch,namebspr,nplatz,zmge,amge,yworkorder,ypurchaseorder,ncharge,ypurchasepackslip";

/// 工單報工日誌欄位
pub const ORDER_JOURNAL_FIELDS: &str = "twonum,tdate";

/// 途程表列轉為工序
pub fn routing_table(rows: &[Row], format: NumberFormat) -> Result<RoutingTable> {
    let steps = rows
        .iter()
        .map(|row| operation_step(row, format))
        .collect::<Result<Vec<_>>>()?;
    RoutingTable::new(steps)
}

fn operation_step(row: &Row, format: NumberFormat) -> Result<OperationStep> {
    Ok(OperationStep::new(
        row.text("artbez").to_string(),
        row.text("art").to_string(),
        row.text("order").trim().to_string(),
    )
    .with_released(row.quantity("frgmge", format)?)
    .with_completed(row.quantity("ycomplete", format)?)
    .with_mrb(row.quantity("mrbqty", format)?)
    .with_scrap(row.quantity("rverlust", format)?)
    .with_due(row.quantity("netmge", format)?)
    .with_order_ref(row.value("vorgang"))
    .with_product_ref(row.value("art")))
}

/// 報工明細（單一資料庫物件）轉為報工紀錄
///
/// 數量為良品、MRB、報廢三欄加總。
pub fn confirmation_record(
    id: &str,
    work_slip: &str,
    data: &TableData,
    format: NumberFormat,
) -> Result<ConfirmationRecord> {
    let head = data
        .head
        .as_ref()
        .ok_or_else(|| RoutingError::Payload(format!("報工紀錄 {} 缺少表頭", id)))?;
    let line = data
        .table
        .first()
        .ok_or_else(|| RoutingError::Payload(format!("報工紀錄 {} 缺少明細", id)))?;

    let yield_qty = line.quantity("bumge", format)?;
    let mrb_qty = line.quantity("ymrbqty", format)?;
    let scrap_qty = line.quantity("verlust", format)?;
    let date = parse_date(head.text("abldat"))?;

    let mut record = ConfirmationRecord::new(
        id.to_string(),
        work_slip.to_string(),
        yield_qty + mrb_qty + scrap_qty,
        date,
    )
    .with_mrb(mrb_qty);
    if let Ok(timestamp) = parse_timestamp(head.text("stand")) {
        record = record.with_timestamp(timestamp);
    }
    Ok(record)
}

/// 依條件查詢結果中的報工紀錄 ID（依服務順序，最舊在前）
pub fn object_ids(list: &ObjectList) -> Vec<String> {
    list.objects
        .iter()
        .filter_map(|object| object.head.as_ref())
        .map(|head| head.text("id").to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// 工單報工日誌列轉為報工紀錄（只含工作單與日期）
pub fn order_journal(rows: &[Row]) -> Result<Vec<ConfirmationRecord>> {
    rows.iter()
        .map(|row| {
            let date = parse_date(&row.value("tdate"))?;
            Ok(ConfirmationRecord::new(
                String::new(),
                row.value("twonum"),
                Decimal::ZERO,
                date,
            ))
        })
        .collect()
}

/// 庫存異動日誌列
pub fn stock_movements(rows: &[Row], format: NumberFormat) -> Result<Vec<StockMovement>> {
    rows.iter()
        .map(|row| {
            Ok(StockMovement {
                booking_date: parse_date(row.text("budat"))?,
                search_word: row.text("ysuch").to_string(),
                description: row.text("namebspr").to_string(),
                location: row.text("nplatz").to_string(),
                received_qty: parse_optional_quantity(row.text("zmge"), format)?,
                issued_qty: parse_optional_quantity(row.text("amge"), format)?,
                purchase_order: row.text("ypurchaseorder").replace('+', ""),
                purchase_order_ref: row.value("ypurchaseorder"),
                packing_slip_ref: row.value("ypurchasepackslip"),
            })
        })
        .collect()
}

/// 開立中工單清單
pub fn open_work_orders(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|row| row.text("banummer").trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// 採購單明細中，品項為 `process` 且說明含 "WO" 的工單號
pub fn purchase_order_work_orders(rows: &[Row], process: &str) -> Vec<String> {
    rows.iter()
        .filter(|row| row.text("artikel") == process)
        .map(|row| row.value("ptext"))
        .filter(|text| text.contains("WO"))
        .map(|text| text.replace("WO ", ""))
        .collect()
}

/// 查詢日期參數（月/日/四位年份）
pub fn query_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// 反序列化回應本文
pub fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| RoutingError::Payload(e.to_string()))?;
    Ok(envelope.content.data)
}
