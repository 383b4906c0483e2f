//! 報工歷史掃描
//!
//! 品質判定與完工比對共用的日期解析：全部依賴 `ConfirmationLookup`，
//! 查詢失敗時以 `Resolution::Failed` 回報而不中斷呼叫端。

use chrono::{NaiveDate, NaiveDateTime};
use routing_core::{ConfirmationLookup, Resolution};
use rust_decimal::Decimal;

/// 由報工歷史回推的完工點
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionPoint {
    /// 最近一筆非零報工的日期與時間
    Completed {
        date: NaiveDate,
        timestamp: Option<NaiveDateTime>,
    },
    /// 加總吻合，但所有紀錄數量皆為零
    NoQuantity,
    /// 掃完歷史仍無法對上目標數量
    Unbalanced,
}

/// 工作單最近一次含 MRB 數量的報工日期（由新到舊掃描）
pub fn latest_mrb_date<L>(lookup: &L, work_slip: &str) -> Resolution<NaiveDate>
where
    L: ConfirmationLookup + ?Sized,
{
    let result = lookup.history(work_slip).map(|records| {
        records
            .iter()
            .rev()
            .find(|record| record.is_mrb())
            .map(|record| record.date)
    });

    if let Err(e) = &result {
        tracing::warn!(work_slip = %work_slip, error = %e, "查詢 MRB 日期失敗");
    }
    Resolution::from_lookup(result)
}

/// 工作單進入檢驗的日期
///
/// 在工單報工日誌中找第一段連續屬於該工作單的紀錄，取該段最後一筆的日期。
pub fn entry_date<L>(lookup: &L, order_ref: &str, work_slip: &str) -> Resolution<NaiveDate>
where
    L: ConfirmationLookup + ?Sized,
{
    let result = lookup.order_confirmations(order_ref).map(|records| {
        let mut date = None;
        for record in &records {
            if record.work_slip == work_slip {
                date = Some(record.date);
            } else if date.is_some() {
                break;
            }
        }
        date
    });

    if let Err(e) = &result {
        tracing::warn!(
            order_ref = %order_ref,
            work_slip = %work_slip,
            error = %e,
            "查詢檢驗日期失敗"
        );
    }
    Resolution::from_lookup(result)
}

/// 由新到舊累加報工數量，直到等於工序已處理數量
///
/// 掃描中遇到的第一筆非零紀錄提供完工日期。
pub fn completion_point<L>(
    lookup: &L,
    work_slip: &str,
    processed_qty: Decimal,
) -> routing_core::Result<CompletionPoint>
where
    L: ConfirmationLookup + ?Sized,
{
    let records = lookup.history(work_slip)?;

    let mut total = Decimal::ZERO;
    let mut latest = None;
    for record in records.iter().rev() {
        total += record.quantity;
        if latest.is_none() && record.has_quantity() {
            latest = Some((record.date, record.timestamp));
        }
        if total == processed_qty {
            return Ok(match latest {
                Some((date, timestamp)) => CompletionPoint::Completed { date, timestamp },
                None => CompletionPoint::NoQuantity,
            });
        }
    }

    tracing::debug!(
        work_slip = %work_slip,
        total = %total,
        expected = %processed_qty,
        "報工加總無法對上工序數量"
    );
    Ok(CompletionPoint::Unbalanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, record, FakeService};

    #[test]
    fn test_latest_mrb_date_scans_backward() {
        let service = FakeService::new().with_history(
            "WS-1",
            vec![
                record("1", "WS-1", 10, date(2025, 11, 1)).with_mrb(Decimal::from(2)),
                record("2", "WS-1", 10, date(2025, 11, 2)).with_mrb(Decimal::from(1)),
                record("3", "WS-1", 10, date(2025, 11, 3)),
            ],
        );

        assert_eq!(
            latest_mrb_date(&service, "WS-1"),
            Resolution::Found(date(2025, 11, 2))
        );
    }

    #[test]
    fn test_latest_mrb_date_missing_and_failed() {
        let service = FakeService::new()
            .with_history("WS-1", vec![record("1", "WS-1", 10, date(2025, 11, 1))])
            .failing_on("WS-2");

        assert_eq!(latest_mrb_date(&service, "WS-1"), Resolution::Missing);
        assert!(matches!(latest_mrb_date(&service, "WS-2"), Resolution::Failed(_)));
    }

    #[test]
    fn test_entry_date_takes_first_contiguous_run() {
        let service = FakeService::new().with_order_journal(
            "REF-1",
            vec![
                record("1", "WS-A", 5, date(2025, 11, 1)),
                record("2", "WS-B", 5, date(2025, 11, 2)),
                record("3", "WS-B", 5, date(2025, 11, 4)),
                record("4", "WS-C", 5, date(2025, 11, 5)),
                record("5", "WS-B", 5, date(2025, 11, 9)),
            ],
        );

        assert_eq!(
            entry_date(&service, "REF-1", "WS-B"),
            Resolution::Found(date(2025, 11, 4))
        );
        assert_eq!(entry_date(&service, "REF-1", "WS-Z"), Resolution::Missing);
    }

    #[test]
    fn test_completion_point_balances_backward() {
        let service = FakeService::new().with_history(
            "WS-1",
            vec![
                record("1", "WS-1", 30, date(2025, 11, 1)),
                record("2", "WS-1", 20, date(2025, 11, 2)),
                record("3", "WS-1", 0, date(2025, 11, 3)),
            ],
        );

        // 最新一筆數量為零，日期取自第二新的紀錄
        assert_eq!(
            completion_point(&service, "WS-1", Decimal::from(50)).unwrap(),
            CompletionPoint::Completed {
                date: date(2025, 11, 2),
                timestamp: None
            }
        );
        // 只需最新兩筆就能對上 20
        assert_eq!(
            completion_point(&service, "WS-1", Decimal::from(20)).unwrap(),
            CompletionPoint::Completed {
                date: date(2025, 11, 2),
                timestamp: None
            }
        );
    }

    #[test]
    fn test_completion_point_unbalanced_and_zero() {
        let service = FakeService::new()
            .with_history("WS-1", vec![record("1", "WS-1", 30, date(2025, 11, 1))])
            .with_history("WS-2", vec![record("1", "WS-2", 0, date(2025, 11, 1))]);

        assert_eq!(
            completion_point(&service, "WS-1", Decimal::from(45)).unwrap(),
            CompletionPoint::Unbalanced
        );
        assert_eq!(
            completion_point(&service, "WS-2", Decimal::ZERO).unwrap(),
            CompletionPoint::NoQuantity
        );
        // 沒有任何紀錄時無法對上，即使目標為零
        assert_eq!(
            completion_point(&service, "WS-3", Decimal::ZERO).unwrap(),
            CompletionPoint::Unbalanced
        );
    }
}
