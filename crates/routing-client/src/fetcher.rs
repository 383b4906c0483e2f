//! 途程表非同步抓取

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use routing_calc::FetchOutcome;
use routing_core::{NumberFormat, Result, RoutingError, RoutingTable, RoutingTableFetcher};

use crate::config::ServiceConfig;
use crate::wire::{self, InfosystemRequest, TableData, ROUTING_FIELDS};

/// 生產中心查詢客戶端（非同步）
pub struct ProductionCenterClient {
    http_client: reqwest::Client,
    config: Arc<ServiceConfig>,
    number_format: NumberFormat,
}

impl ProductionCenterClient {
    pub fn new(config: Arc<ServiceConfig>, number_format: NumberFormat) -> Result<Self> {
        let mut builder = reqwest::Client::builder().default_headers(config.default_headers()?);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| RoutingError::Service(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            number_format,
        })
    }

    async fn post(&self, url: &str, body: reqwest::Body) -> Result<String> {
        let response = self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RoutingError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RoutingError::Service(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RoutingError::Service(e.to_string()))
    }
}

#[async_trait]
impl RoutingTableFetcher for ProductionCenterClient {
    async fn fetch_open_ids(&self) -> Result<Vec<String>> {
        let body = self
            .post(
                &self.config.open_work_orders_url,
                self.config.open_work_orders_payload.clone().into(),
            )
            .await?;
        let data: TableData = wire::decode(&body)?;
        Ok(wire::open_work_orders(&data.table))
    }

    async fn fetch(&self, work_order: &str) -> Result<RoutingTable> {
        let request = InfosystemRequest::new(ROUTING_FIELDS)
            .with_field("yclosedwo", work_order)
            .with_field("klgruppe", self.config.work_center_group.as_str())
            .start();
        let payload =
            serde_json::to_vec(&request).map_err(|e| RoutingError::Payload(e.to_string()))?;

        let body = self.post(&self.config.prod_center_url, payload.into()).await?;
        let data: TableData = wire::decode(&body)?;
        let table = wire::routing_table(&data.table, self.number_format)?;

        tracing::debug!(work_order = %table.work_order(), rows = table.len(), "取得途程表");
        Ok(table)
    }
}

/// 以有限並行度抓取多張途程表
///
/// 結果順序與 `work_orders` 相同；個別失敗保留在對應的 `FetchOutcome` 中。
pub async fn fetch_all<F>(fetcher: &F, work_orders: Vec<String>, limit: usize) -> Vec<FetchOutcome>
where
    F: RoutingTableFetcher + ?Sized,
{
    tracing::info!("抓取途程表：{} 張，同時連線 {}", work_orders.len(), limit.max(1));
    let start_time = std::time::Instant::now();

    let outcomes: Vec<FetchOutcome> = stream::iter(work_orders)
        .map(|work_order| async move {
            let table = fetcher.fetch(&work_order).await;
            FetchOutcome::new(work_order, table)
        })
        .buffered(limit.max(1))
        .collect()
        .await;

    let failures = outcomes.iter().filter(|o| o.table.is_err()).count();
    tracing::info!(
        "途程表抓取完成，耗時 {:?}，失敗 {} 張",
        start_time.elapsed(),
        failures
    );
    outcomes
}

/// 取得所有開立中工單的途程表
pub async fn fetch_open_tables<F>(fetcher: &F, limit: usize) -> Result<Vec<FetchOutcome>>
where
    F: RoutingTableFetcher + ?Sized,
{
    let work_orders = fetcher.fetch_open_ids().await?;
    tracing::info!("開立中工單 {} 張", work_orders.len());
    Ok(fetch_all(fetcher, work_orders, limit).await)
}
