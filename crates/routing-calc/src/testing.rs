//! 測試用假服務與途程表建構輔助

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use routing_core::{
    ConfirmationLookup, ConfirmationRecord, EngineConfig, EnrichmentLookup, NextProcess,
    OperationStep, PackingSlipInfo, Result, RoutingError, RoutingTable,
};
use rust_decimal::Decimal;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn config() -> EngineConfig {
    EngineConfig::new(vec!["AB".to_string()])
}

pub fn header(work_order: &str) -> OperationStep {
    OperationStep::new("Bracket".to_string(), "AB-100".to_string(), work_order.to_string())
        .with_order_ref(format!("REF-{}", work_order))
        .with_product_ref(format!("PROD-{}", work_order))
}

/// 工序：名稱、完工數量，工作單號以名稱推導
pub fn step(description: &str, completed: i64) -> OperationStep {
    OperationStep::new(
        description.to_string(),
        "AB-100".to_string(),
        format!("WS-{}", description.replace(' ', "-")),
    )
    .with_completed(Decimal::from(completed))
    .with_released(Decimal::from(1))
}

pub fn table(steps: Vec<OperationStep>) -> RoutingTable {
    let mut rows = vec![header("WO-1")];
    rows.extend(steps);
    RoutingTable::new(rows).unwrap()
}

pub fn record(id: &str, work_slip: &str, quantity: i64, day: NaiveDate) -> ConfirmationRecord {
    ConfirmationRecord::new(
        id.to_string(),
        work_slip.to_string(),
        Decimal::from(quantity),
        day,
    )
}

/// 記憶體內的假服務，記錄每次查詢
#[derive(Default)]
pub struct FakeService {
    pub histories: HashMap<String, Vec<ConfirmationRecord>>,
    pub order_journals: HashMap<String, Vec<ConfirmationRecord>>,
    pub failing: HashSet<String>,
    pub suppliers: HashMap<String, String>,
    pub packing_slips: HashMap<String, PackingSlipInfo>,
    pub purchase_order_lines: HashMap<String, Vec<(String, String)>>,
    pub next_operations: HashMap<(String, String), NextProcess>,
    pub customers: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, work_slip: &str, records: Vec<ConfirmationRecord>) -> Self {
        self.histories.insert(work_slip.to_string(), records);
        self
    }

    pub fn with_order_journal(mut self, order_ref: &str, records: Vec<ConfirmationRecord>) -> Self {
        self.order_journals.insert(order_ref.to_string(), records);
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record_call(&self, key: &str) -> Result<()> {
        self.calls.borrow_mut().push(key.to_string());
        if self.failing.contains(key) {
            return Err(RoutingError::Service(format!("connection reset: {}", key)));
        }
        Ok(())
    }
}

impl ConfirmationLookup for FakeService {
    fn history(&self, work_slip: &str) -> Result<Vec<ConfirmationRecord>> {
        self.record_call(work_slip)?;
        Ok(self.histories.get(work_slip).cloned().unwrap_or_default())
    }

    fn by_id(&self, confirmation_id: &str) -> Result<ConfirmationRecord> {
        self.record_call(confirmation_id)?;
        self.histories
            .values()
            .flatten()
            .find(|r| r.id == confirmation_id)
            .cloned()
            .ok_or_else(|| RoutingError::NotFound(confirmation_id.to_string()))
    }

    fn order_confirmations(&self, order_ref: &str) -> Result<Vec<ConfirmationRecord>> {
        self.record_call(order_ref)?;
        Ok(self.order_journals.get(order_ref).cloned().unwrap_or_default())
    }
}

impl EnrichmentLookup for FakeService {
    fn supplier_name(&self, purchase_order_ref: &str) -> Result<String> {
        self.record_call(purchase_order_ref)?;
        self.suppliers
            .get(purchase_order_ref)
            .cloned()
            .ok_or_else(|| RoutingError::NotFound(purchase_order_ref.to_string()))
    }

    fn packing_slip(&self, packing_slip_ref: &str) -> Result<PackingSlipInfo> {
        self.record_call(packing_slip_ref)?;
        self.packing_slips
            .get(packing_slip_ref)
            .cloned()
            .ok_or_else(|| RoutingError::NotFound(packing_slip_ref.to_string()))
    }

    fn work_orders_for(&self, purchase_order_ref: &str, process: &str) -> Result<Vec<String>> {
        self.record_call(&format!("lines:{}", purchase_order_ref))?;
        Ok(self
            .purchase_order_lines
            .get(purchase_order_ref)
            .map(|lines| {
                lines
                    .iter()
                    .filter(|(item, text)| item == process && text.contains("WO"))
                    .map(|(_, text)| text.replace("WO ", ""))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn next_operation(&self, work_order: &str, process: &str) -> Result<NextProcess> {
        self.record_call(&format!("next:{}", work_order))?;
        Ok(self
            .next_operations
            .get(&(work_order.to_string(), process.to_string()))
            .cloned()
            .unwrap_or(NextProcess::NotFound))
    }

    fn customer_name(&self, product_ref: &str) -> Result<String> {
        self.record_call(product_ref)?;
        self.customers
            .get(product_ref)
            .cloned()
            .ok_or_else(|| RoutingError::NotFound(product_ref.to_string()))
    }
}
