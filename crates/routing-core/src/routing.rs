//! 工單途程表模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, RoutingError};

/// 途程工序（途程表中的一列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationStep {
    /// 工序名稱（如 "Inspection"、"1st Off"）
    pub description: String,

    /// 產品代碼
    pub product_code: String,

    /// 尚待投放數量
    pub released_qty: Decimal,

    /// 完工數量（良品）
    pub completed_qty: Decimal,

    /// MRB 數量
    pub mrb_qty: Decimal,

    /// 報廢數量
    pub scrap_qty: Decimal,

    /// 應交數量
    pub due_qty: Decimal,

    /// 工作單號（用於對照報工紀錄）
    pub order_id: String,

    /// 工單資料庫 ID
    pub order_ref: String,

    /// 產品資料庫 ID
    pub product_ref: String,
}

impl OperationStep {
    /// 創建新的工序，數量皆為零
    pub fn new(description: String, product_code: String, order_id: String) -> Self {
        Self {
            description,
            product_code,
            released_qty: Decimal::ZERO,
            completed_qty: Decimal::ZERO,
            mrb_qty: Decimal::ZERO,
            scrap_qty: Decimal::ZERO,
            due_qty: Decimal::ZERO,
            order_id,
            order_ref: String::new(),
            product_ref: String::new(),
        }
    }

    /// 建構器模式：設置待投放數量
    pub fn with_released(mut self, qty: Decimal) -> Self {
        self.released_qty = qty;
        self
    }

    /// 建構器模式：設置完工數量
    pub fn with_completed(mut self, qty: Decimal) -> Self {
        self.completed_qty = qty;
        self
    }

    /// 建構器模式：設置 MRB 數量
    pub fn with_mrb(mut self, qty: Decimal) -> Self {
        self.mrb_qty = qty;
        self
    }

    /// 建構器模式：設置報廢數量
    pub fn with_scrap(mut self, qty: Decimal) -> Self {
        self.scrap_qty = qty;
        self
    }

    /// 建構器模式：設置應交數量
    pub fn with_due(mut self, qty: Decimal) -> Self {
        self.due_qty = qty;
        self
    }

    /// 建構器模式：設置工單資料庫 ID
    pub fn with_order_ref(mut self, order_ref: String) -> Self {
        self.order_ref = order_ref;
        self
    }

    /// 建構器模式：設置產品資料庫 ID
    pub fn with_product_ref(mut self, product_ref: String) -> Self {
        self.product_ref = product_ref;
        self
    }

    /// 已處理數量（完工 + MRB + 報廢）
    pub fn processed_qty(&self) -> Decimal {
        self.completed_qty + self.mrb_qty + self.scrap_qty
    }

    /// 是否已全部投放
    pub fn is_fully_released(&self) -> bool {
        self.released_qty <= Decimal::ZERO
    }

    /// 是否有 MRB 數量
    pub fn has_mrb(&self) -> bool {
        self.mrb_qty > Decimal::ZERO
    }
}

/// 工單途程表
///
/// 索引 0 是表頭（工單號、產品代碼等識別欄位），不是工序；
/// 索引 1..n-1 依執行順序排列，引擎不會重新排序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OperationStep>", into = "Vec<OperationStep>")]
pub struct RoutingTable {
    steps: Vec<OperationStep>,
}

impl RoutingTable {
    /// 由服務回傳的列建立途程表
    pub fn new(steps: Vec<OperationStep>) -> Result<Self> {
        if steps.is_empty() {
            return Err(RoutingError::EmptyRoutingTable(
                "缺少表頭列".to_string(),
            ));
        }
        Ok(Self { steps })
    }

    /// 表頭列
    pub fn header(&self) -> &OperationStep {
        &self.steps[0]
    }

    /// 工單號
    pub fn work_order(&self) -> &str {
        &self.header().order_id
    }

    /// 總列數（含表頭）
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// 是否沒有任何工序
    pub fn is_empty(&self) -> bool {
        self.steps.len() <= 1
    }

    /// 工序數量（不含表頭）
    pub fn operation_count(&self) -> usize {
        self.steps.len() - 1
    }

    /// 依索引取得列（0 為表頭）
    pub fn step(&self, index: usize) -> Option<&OperationStep> {
        self.steps.get(index)
    }

    /// 全部列（含表頭）
    pub fn rows(&self) -> &[OperationStep] {
        &self.steps
    }

    /// 依執行順序列出工序（索引, 工序）
    pub fn operations(&self) -> impl DoubleEndedIterator<Item = (usize, &OperationStep)> {
        self.steps.iter().enumerate().skip(1)
    }
}

impl TryFrom<Vec<OperationStep>> for RoutingTable {
    type Error = RoutingError;

    fn try_from(steps: Vec<OperationStep>) -> Result<Self> {
        Self::new(steps)
    }
}

impl From<RoutingTable> for Vec<OperationStep> {
    fn from(table: RoutingTable) -> Self {
        table.steps
    }
}
