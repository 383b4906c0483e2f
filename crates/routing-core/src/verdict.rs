//! 推論結果模型（品質判定、完工比對）

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Resolution;

/// 品質狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityStatus {
    /// 不在品質檢驗中
    NotInQuality,
    /// 在檢驗中，但後續工序已回報更多完工數量，結果可能被取代
    Tentative,
    /// 確定在檢驗中
    Confirmed,
}

impl QualityStatus {
    /// 報表使用的狀態代碼
    pub fn code(&self) -> u8 {
        match self {
            QualityStatus::NotInQuality => 0,
            QualityStatus::Tentative => 1,
            QualityStatus::Confirmed => 2,
        }
    }
}

/// 途程進度（第 i 道 / 共 n 道）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub step: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.step, self.total)
    }
}

/// 正向掃描的結束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassExit {
    /// 掃描完所有工序
    Completed,
    /// 在某工序遇到 MRB 數量而終止
    TerminatedByMrb { step: usize },
}

/// 品質判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub status: QualityStatus,

    /// 等待檢驗的數量
    pub quantity: Option<Decimal>,

    /// 進入檢驗的日期
    pub entry_date: Option<Resolution<NaiveDate>>,

    /// 檢驗工序所在進度
    pub progress: Option<Progress>,

    pub has_mrb: bool,

    pub mrb_quantity: Decimal,

    /// 最近一次 MRB 報工日期
    pub mrb_date: Option<Resolution<NaiveDate>>,

    pub exit: PassExit,
}

impl QualityVerdict {
    /// 不在檢驗中、沒有 MRB 的預設結果
    pub fn not_in_quality() -> Self {
        Self {
            status: QualityStatus::NotInQuality,
            quantity: None,
            entry_date: None,
            progress: None,
            has_mrb: false,
            mrb_quantity: Decimal::ZERO,
            mrb_date: None,
            exit: PassExit::Completed,
        }
    }

    /// 是否在檢驗中（含暫定）
    pub fn in_quality(&self) -> bool {
        self.status != QualityStatus::NotInQuality
    }
}

/// 下一道工序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextProcess {
    /// 後續工序名稱
    Operation(String),
    /// 已是最後一道工序
    Last,
    /// 途程中找不到該工序
    NotFound,
}

/// 某工序在目標日期完工的資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldCompletion {
    /// 途程表中的索引
    pub step: usize,
    pub work_slip: String,
    pub process: String,
    pub quantity: Decimal,
    pub next_process: NextProcess,
    pub completion_date: NaiveDate,
    pub completion_timestamp: Option<NaiveDateTime>,
}

/// 未比對成功的原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoMatchReason {
    /// 沒有任何全部投放的工序
    NoReleasedStep,
    /// 工序沒有工作單號，無法查詢報工紀錄
    MissingWorkSlip { step: usize },
    /// 報工紀錄加總吻合，但沒有任何非零紀錄
    NoQuantityRecorded { step: usize },
    /// 報工紀錄加總無法對上工序數量
    Unbalanced { step: usize, work_slip: String },
    /// 最近完工日期不是目標日期
    CompletedOnOtherDate { step: usize, date: NaiveDate },
    /// 查詢報工紀錄失敗
    LookupFailed { step: usize, message: String },
}

/// 完工比對結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum YieldMatch {
    Matched(YieldCompletion),
    NotMatched(NoMatchReason),
}

impl YieldMatch {
    /// 是否比對成功
    pub fn is_matched(&self) -> bool {
        matches!(self, YieldMatch::Matched(_))
    }

    /// 取得完工資料
    pub fn completion(&self) -> Option<&YieldCompletion> {
        match self {
            YieldMatch::Matched(completion) => Some(completion),
            YieldMatch::NotMatched(_) => None,
        }
    }
}
