//! 報表列合併
//!
//! 已排序的原始列依分組鍵合併：數量加總、每組只做一次附加資訊查詢，
//! 輸出列由 1 開始編號。

use std::collections::HashSet;
use std::hash::Hash;

use routing_core::{Result, RoutingError};
use rust_decimal::Decimal;

/// 合併後的報表列
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow<R, E> {
    /// 項次（從 1 開始）
    pub item: usize,

    /// 該組的第一列
    pub row: R,

    /// 組內數量加總
    pub quantity: Decimal,

    /// 以第一列查得的附加資訊
    pub enrichment: E,

    /// 組內原始列數
    pub merged_count: usize,
}

/// 報表列合併器
pub struct ReportRowReconciler;

impl ReportRowReconciler {
    /// 合併相鄰且分組鍵相同的列
    ///
    /// 輸入必須已排序，使相同的鍵相鄰；某個鍵在其分組結束後再次出現時回傳
    /// `UnsortedReportRows`，且不再呼叫 `enrich`。`enrich` 的錯誤直接往上傳遞。
    pub fn reconcile<R, K, E>(
        rows: Vec<R>,
        grouping_key: impl Fn(&R) -> K,
        quantity: impl Fn(&R) -> Decimal,
        mut enrich: impl FnMut(&R) -> Result<E>,
    ) -> Result<Vec<MergedRow<R, E>>>
    where
        K: Eq + Hash,
    {
        let mut merged: Vec<MergedRow<R, E>> = Vec::new();
        let mut closed: HashSet<K> = HashSet::new();
        let mut current: Option<(K, MergedRow<R, E>)> = None;

        for (index, row) in rows.into_iter().enumerate() {
            let key = grouping_key(&row);
            let qty = quantity(&row);

            if let Some((current_key, group)) = current.as_mut() {
                if *current_key == key {
                    group.quantity += qty;
                    group.merged_count += 1;
                    continue;
                }
            }

            if closed.contains(&key) {
                return Err(RoutingError::UnsortedReportRows { row: index });
            }

            if let Some((done_key, group)) = current.take() {
                closed.insert(done_key);
                merged.push(group);
            }

            let enrichment = enrich(&row)?;
            current = Some((
                key,
                MergedRow {
                    item: merged.len() + 1,
                    row,
                    quantity: qty,
                    enrichment,
                    merged_count: 1,
                },
            ));
        }

        if let Some((_, group)) = current {
            merged.push(group);
        }

        tracing::debug!(groups = merged.len(), "報表列合併完成");
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Row = (&'static str, u32, i64);

    fn key(row: &Row) -> (&'static str, u32) {
        (row.0, row.1)
    }

    fn qty(row: &Row) -> Decimal {
        Decimal::from(row.2)
    }

    #[test]
    fn test_adjacent_rows_merged() {
        let rows: Vec<Row> = vec![("A", 1, 10), ("A", 1, 5), ("B", 2, 3)];
        let mut enriched = Vec::new();

        let merged = ReportRowReconciler::reconcile(rows, key, qty, |row| {
            enriched.push(*row);
            Ok(format!("supplier-{}", row.0))
        })
        .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].item, 1);
        assert_eq!(merged[0].row, ("A", 1, 10));
        assert_eq!(merged[0].quantity, Decimal::from(15));
        assert_eq!(merged[0].merged_count, 2);
        assert_eq!(merged[0].enrichment, "supplier-A");
        assert_eq!(merged[1].item, 2);
        assert_eq!(merged[1].quantity, Decimal::from(3));
        assert_eq!(enriched, vec![("A", 1, 10), ("B", 2, 3)]);
    }

    #[test]
    fn test_all_equal_keys() {
        let rows: Vec<Row> = vec![("A", 1, 1), ("A", 1, 2), ("A", 1, 3), ("A", 1, 4)];
        let mut calls = 0;

        let merged = ReportRowReconciler::reconcile(rows, key, qty, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, Decimal::from(10));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_all_distinct_keys() {
        let rows: Vec<Row> = vec![("A", 1, 1), ("A", 2, 2), ("B", 1, 3)];
        let mut calls = 0;

        let merged = ReportRowReconciler::reconcile(rows.clone(), key, qty, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(calls, 3);
        let items: Vec<usize> = merged.iter().map(|m| m.item).collect();
        let quantities: Vec<Decimal> = merged.iter().map(|m| m.quantity).collect();
        let originals: Vec<Row> = merged.into_iter().map(|m| m.row).collect();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(quantities, rows.iter().map(qty).collect::<Vec<_>>());
        assert_eq!(originals, rows);
    }

    #[test]
    fn test_empty_input() {
        let merged =
            ReportRowReconciler::reconcile(Vec::<Row>::new(), key, qty, |_| Ok(())).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_enrich_failure_propagates() {
        let rows: Vec<Row> = vec![("A", 1, 10), ("B", 2, 3)];

        let result = ReportRowReconciler::reconcile(rows, key, qty, |row| {
            if row.0 == "B" {
                Err(RoutingError::Service("timeout".to_string()))
            } else {
                Ok(())
            }
        });

        assert!(matches!(result, Err(RoutingError::Service(_))));
    }

    #[test]
    fn test_unsorted_input_rejected() {
        let rows: Vec<Row> = vec![("A", 1, 10), ("B", 2, 3), ("A", 1, 5)];
        let mut calls = 0;

        let result = ReportRowReconciler::reconcile(rows, key, qty, |_| {
            calls += 1;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(RoutingError::UnsortedReportRows { row: 2 })
        ));
        assert_eq!(calls, 2);
    }

    proptest! {
        #[test]
        fn prop_quantity_sum_preserved(
            mut rows in prop::collection::vec((0u8..5, 0i64..1000), 0..40)
        ) {
            rows.sort_by_key(|row| row.0);
            let total: i64 = rows.iter().map(|row| row.1).sum();
            let distinct = rows
                .iter()
                .map(|row| row.0)
                .collect::<HashSet<_>>()
                .len();

            let merged = ReportRowReconciler::reconcile(
                rows,
                |row| row.0,
                |row| Decimal::from(row.1),
                |_| Ok(()),
            )
            .unwrap();

            let merged_total: Decimal = merged.iter().map(|m| m.quantity).sum();
            prop_assert_eq!(merged_total, Decimal::from(total));
            prop_assert_eq!(merged.len(), distinct);
        }
    }
}
