//! 報工歷史索引

use std::collections::{BTreeSet, HashMap};

use routing_core::{
    ConfirmationLookup, ConfirmationRecord, EngineConfig, Result, RoutingError, RoutingTable,
};

/// 預取清單：引擎會查詢的工作單與工單報工日誌
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefetchPlan {
    pub work_slips: BTreeSet<String>,
    pub order_refs: BTreeSet<String>,
}

impl PrefetchPlan {
    /// 由途程表收集查詢鍵
    ///
    /// - 有 MRB 數量的工序（MRB 日期）
    /// - 最後一道已全部投放的工序（完工比對）
    /// - 含檢驗工序的工單報工日誌（檢驗日期）
    pub fn from_tables(tables: &[RoutingTable], config: &EngineConfig) -> Self {
        let mut plan = Self::default();

        for table in tables {
            for (_, step) in table.operations() {
                if step.has_mrb() {
                    plan.add_work_slip(&step.order_id);
                }
            }

            if let Some((_, step)) = table
                .operations()
                .rev()
                .find(|(_, step)| step.is_fully_released())
            {
                plan.add_work_slip(&step.order_id);
            }

            let has_inspection = table
                .operations()
                .any(|(_, step)| config.is_inspection(&step.description));
            let order_ref = table.header().order_ref.trim();
            if has_inspection && !order_ref.is_empty() {
                plan.order_refs.insert(order_ref.to_string());
            }
        }

        plan
    }

    fn add_work_slip(&mut self, work_slip: &str) {
        let work_slip = work_slip.trim();
        if !work_slip.is_empty() {
            self.work_slips.insert(work_slip.to_string());
        }
    }

    /// 查詢總數
    pub fn len(&self) -> usize {
        self.work_slips.len() + self.order_refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Entry = std::result::Result<Vec<ConfirmationRecord>, String>;

/// 不可變的報工歷史索引
///
/// 預取時的查詢失敗也會保存，之後對同一個鍵的查詢重播同樣的錯誤。
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    histories: HashMap<String, Entry>,
    order_journals: HashMap<String, Entry>,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 依預取清單向 `source` 查詢一次，建立索引
    pub fn prefetch<L>(plan: &PrefetchPlan, source: &L) -> Self
    where
        L: ConfirmationLookup + ?Sized,
    {
        tracing::info!(
            "開始預取報工歷史：工作單 {} 張，工單日誌 {} 張",
            plan.work_slips.len(),
            plan.order_refs.len()
        );
        let start_time = std::time::Instant::now();

        let mut index = Self::new();
        let mut failures = 0usize;

        for work_slip in &plan.work_slips {
            let entry = source.history(work_slip).map_err(|e| e.to_string());
            if entry.is_err() {
                failures += 1;
            }
            index.histories.insert(work_slip.clone(), entry);
        }

        for order_ref in &plan.order_refs {
            let entry = source
                .order_confirmations(order_ref)
                .map_err(|e| e.to_string());
            if entry.is_err() {
                failures += 1;
            }
            index.order_journals.insert(order_ref.clone(), entry);
        }

        if failures > 0 {
            tracing::warn!("預取時 {} 筆查詢失敗", failures);
        }
        tracing::info!("報工歷史預取完成，耗時 {:?}", start_time.elapsed());

        index
    }

    /// 建構器模式：直接放入工作單歷史
    pub fn with_history(mut self, work_slip: &str, records: Vec<ConfirmationRecord>) -> Self {
        self.histories.insert(work_slip.to_string(), Ok(records));
        self
    }

    /// 建構器模式：直接放入工單報工日誌
    pub fn with_order_journal(mut self, order_ref: &str, records: Vec<ConfirmationRecord>) -> Self {
        self.order_journals.insert(order_ref.to_string(), Ok(records));
        self
    }

    /// 已索引的工作單數量
    pub fn work_slip_count(&self) -> usize {
        self.histories.len()
    }

    fn replay(entries: &HashMap<String, Entry>, key: &str) -> Result<Vec<ConfirmationRecord>> {
        match entries.get(key) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(message)) => Err(RoutingError::Service(message.clone())),
            // 空白鍵不會預取，也查不到任何紀錄
            None if key.trim().is_empty() => Ok(Vec::new()),
            None => Err(RoutingError::NotFound(format!("未預取: {}", key))),
        }
    }
}

impl ConfirmationLookup for HistoryIndex {
    fn history(&self, work_slip: &str) -> Result<Vec<ConfirmationRecord>> {
        Self::replay(&self.histories, work_slip)
    }

    fn by_id(&self, confirmation_id: &str) -> Result<ConfirmationRecord> {
        self.histories
            .values()
            .chain(self.order_journals.values())
            .filter_map(|entry| entry.as_ref().ok())
            .flatten()
            .find(|record| record.id == confirmation_id)
            .cloned()
            .ok_or_else(|| RoutingError::NotFound(confirmation_id.to_string()))
    }

    fn order_confirmations(&self, order_ref: &str) -> Result<Vec<ConfirmationRecord>> {
        Self::replay(&self.order_journals, order_ref)
    }
}
