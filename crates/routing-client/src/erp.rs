//! 報工與補充資料的同步查詢客戶端

use std::sync::Arc;

use chrono::NaiveDate;
use routing_calc::YieldMatcher;
use routing_core::{
    ConfirmationLookup, ConfirmationRecord, EngineConfig, EnrichmentLookup, NextProcess,
    PackingSlipInfo, Result, RoutingError, StockMovement,
};
use serde::de::DeserializeOwned;

use crate::config::{object_url, ServiceConfig};
use crate::wire::{
    self, InfosystemRequest, ObjectList, TableData, JOURNAL_FIELDS, ORDER_JOURNAL_FIELDS,
    ROUTING_FIELDS,
};

/// 報工紀錄條件查詢的筆數上限
const OBJECT_LIMIT: usize = 1000;

/// ERP 查詢客戶端（阻塞式）
///
/// 不可在非同步執行環境內建立或使用。
pub struct ErpClient {
    http_client: reqwest::blocking::Client,
    config: Arc<ServiceConfig>,
    engine: EngineConfig,
}

impl ErpClient {
    pub fn new(config: Arc<ServiceConfig>, engine: EngineConfig) -> Result<Self> {
        // 阻塞式客戶端預設 30 秒逾時，未設定時改為不逾時
        let http_client = reqwest::blocking::Client::builder()
            .default_headers(config.default_headers()?)
            .timeout(config.timeout())
            .build()
            .map_err(|e| RoutingError::Service(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            engine,
        })
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .http_client
            .get(url)
            .send()
            .map_err(|e| RoutingError::Service(e.to_string()))?;
        Self::read(response)
    }

    fn post<T: DeserializeOwned>(&self, url: &str, request: &InfosystemRequest) -> Result<T> {
        tracing::debug!(url = %url, "POST");
        let response = self
            .http_client
            .post(url)
            .json(request)
            .send()
            .map_err(|e| RoutingError::Service(e.to_string()))?;
        Self::read(response)
    }

    fn read<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RoutingError::NotFound(response.url().to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(RoutingError::Service(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let body = response
            .text()
            .map_err(|e| RoutingError::Service(e.to_string()))?;
        wire::decode(&body)
    }

    fn head_text(data: &TableData, field: &str, what: &str) -> Result<String> {
        data.head
            .as_ref()
            .map(|head| head.text(field).to_string())
            .ok_or_else(|| RoutingError::Payload(format!("{} 缺少表頭", what)))
    }

    /// 指定日期的庫存異動日誌（收貨）
    pub fn stock_journal(&self, date: NaiveDate) -> Result<Vec<StockMovement>> {
        let day = wire::query_date(date);
        let request = InfosystemRequest::new(JOURNAL_FIELDS)
            .with_field("adatum", day.as_str())
            .with_field("edatum", day.as_str())
            .with_field("zugang", true)
            .start();

        let data: TableData = self.post(&self.config.stock_journal_url, &request)?;
        let movements = wire::stock_movements(&data.table, self.engine.number_format)?;
        tracing::info!(date = %date, rows = movements.len(), "取得庫存異動日誌");
        Ok(movements)
    }
}

impl ConfirmationLookup for ErpClient {
    fn history(&self, work_slip: &str) -> Result<Vec<ConfirmationRecord>> {
        let url = format!(
            "{}?criteria=@filingmode=(Filed);nummer={}&limit={}",
            self.config.work_order_db_url, work_slip, OBJECT_LIMIT
        );
        let list: ObjectList = self.get(&url)?;

        wire::object_ids(&list)
            .iter()
            .map(|id| {
                let data: TableData = self.get(&object_url(&self.config.work_order_db_url, id))?;
                wire::confirmation_record(id, work_slip, &data, self.engine.number_format)
            })
            .collect()
    }

    fn by_id(&self, confirmation_id: &str) -> Result<ConfirmationRecord> {
        let data: TableData =
            self.get(&object_url(&self.config.work_order_db_url, confirmation_id))?;
        let work_slip = Self::head_text(&data, "nummer", "報工紀錄")?;
        wire::confirmation_record(confirmation_id, &work_slip, &data, self.engine.number_format)
    }

    fn order_confirmations(&self, order_ref: &str) -> Result<Vec<ConfirmationRecord>> {
        let request = InfosystemRequest::new(ORDER_JOURNAL_FIELDS)
            .with_field("nows", order_ref)
            .start();
        let data: TableData = self.post(&self.config.confirmations_url, &request)?;
        wire::order_journal(&data.table)
    }
}

impl EnrichmentLookup for ErpClient {
    fn supplier_name(&self, purchase_order_ref: &str) -> Result<String> {
        let data: TableData =
            self.get(&object_url(&self.config.purchase_order_url, purchase_order_ref))?;
        Self::head_text(&data, "liefname", "採購單")
    }

    fn packing_slip(&self, packing_slip_ref: &str) -> Result<PackingSlipInfo> {
        let data: TableData =
            self.get(&object_url(&self.config.packing_slip_url, packing_slip_ref))?;
        let supplier = Self::head_text(&data, "liefname", "採購裝箱單")?;
        let item_text = data
            .table
            .first()
            .map(|line| line.value("ptext"))
            .unwrap_or_default();
        Ok(PackingSlipInfo {
            supplier,
            item_text,
        })
    }

    fn work_orders_for(&self, purchase_order_ref: &str, process: &str) -> Result<Vec<String>> {
        let data: TableData =
            self.get(&object_url(&self.config.purchase_order_url, purchase_order_ref))?;
        Ok(wire::purchase_order_work_orders(&data.table, process))
    }

    fn next_operation(&self, work_order: &str, process: &str) -> Result<NextProcess> {
        let request = InfosystemRequest::new(ROUTING_FIELDS)
            .with_field("yclosedwo", work_order)
            .with_field("klgruppe", self.config.work_center_group.as_str())
            .start();
        let data: TableData = self.post(&self.config.prod_center_url, &request)?;
        let table = wire::routing_table(&data.table, self.engine.number_format)?;
        Ok(YieldMatcher::next_operation_after(&table, process, &self.engine))
    }

    fn customer_name(&self, product_ref: &str) -> Result<String> {
        let data: TableData = self.get(&object_url(&self.config.product_db_url, product_ref))?;
        Self::head_text(&data, "ycustomername", "產品")
    }
}
