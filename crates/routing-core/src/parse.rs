//! 服務端文字欄位解析
//!
//! 服務回傳的數量與日期都是依地區格式化的文字，所有轉換集中在這裡，
//! 核心演算法只處理 `Decimal` 與 `chrono` 類型。

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{NumberFormat, Result, RoutingError};

/// 日期文字格式（短年份優先，與服務的顯示格式一致）
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%Y%m%d"];

/// 時間戳文字格式
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// 解析地區格式的數量文字（例如 `1,234.5`）
///
/// 空白文字視為錯誤，呼叫端需自行判斷欄位是否允許為空。
pub fn parse_quantity(text: &str, format: NumberFormat) -> Result<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RoutingError::InvalidQuantity(text.to_string()));
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != format.thousands_separator && !c.is_whitespace())
        .map(|c| if c == format.decimal_separator { '.' } else { c })
        .collect();

    Decimal::from_str(&normalized).map_err(|_| RoutingError::InvalidQuantity(text.to_string()))
}

/// 解析可為空的數量文字，空白時回傳 `None`
pub fn parse_optional_quantity(text: &str, format: NumberFormat) -> Result<Option<Decimal>> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_quantity(text, format).map(Some)
    }
}

/// 解析日期文字
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| RoutingError::InvalidDate(text.to_string()))
}

/// 解析時間戳文字
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| RoutingError::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Decimal::ZERO)]
    #[case("40", Decimal::from(40))]
    #[case("1,234", Decimal::from(1234))]
    #[case(" 12,345.5 ", Decimal::new(123455, 1))]
    #[case("-5", Decimal::from(-5))]
    fn test_parse_quantity(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(parse_quantity(text, NumberFormat::default()).unwrap(), expected);
    }

    #[test]
    fn test_parse_quantity_european_format() {
        let format = NumberFormat {
            thousands_separator: '.',
            decimal_separator: ',',
        };
        assert_eq!(parse_quantity("1.234,5", format).unwrap(), Decimal::new(12345, 1));
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert!(matches!(
            parse_quantity("", NumberFormat::default()),
            Err(RoutingError::InvalidQuantity(_))
        ));
        assert!(parse_quantity("abc", NumberFormat::default()).is_err());
        assert_eq!(parse_optional_quantity("  ", NumberFormat::default()).unwrap(), None);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        assert_eq!(parse_date("11/03/25").unwrap(), expected);
        assert_eq!(parse_date("11/03/2025").unwrap(), expected);
        assert_eq!(parse_date("2025-11-03").unwrap(), expected);
        assert!(parse_date("N/A").is_err());
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("11/03/25 14:32:05").unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "14:32");
        assert!(parse_timestamp("").is_err());
    }
}
