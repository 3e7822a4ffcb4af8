// ==========================================
// Excel 迁移工具 - 单元格类型转换
// ==========================================
// 职责: 按列类型逐单元格转换
// 红线: 转换永不报错，无法解析的值置为 Null（保留该行）
// Unknown 类型: 原样透传
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::types::ColumnType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

/// 布尔真值标记（小写比较）
const TRUE_TOKENS: [&str; 7] = ["true", "t", "yes", "y", "1", "on", "是"];
/// 布尔假值标记（小写比较）
const FALSE_TOKENS: [&str; 7] = ["false", "f", "no", "n", "0", "off", "否"];

/// 带时间的文本格式
const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y%m%d%H%M%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// 纯日期文本格式
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Excel 序列日期上限（9999-12-31 之后）
const EXCEL_SERIAL_MAX: f64 = 2_958_466.0;

/// 按列类型转换单个值
pub fn coerce_value(value: &CellValue, column_type: ColumnType) -> CellValue {
    match column_type {
        ColumnType::Integer => to_integer(value),
        ColumnType::Float => to_float(value),
        ColumnType::String => to_text(value),
        ColumnType::Boolean => to_boolean(value),
        ColumnType::Date => to_datetime(value),
        ColumnType::Category => to_category(value),
        ColumnType::Unknown => value.clone(),
    }
}

/// 转换是否把非空值变成了空值（脏数据计数用）
pub fn is_coercion_anomaly(original: &CellValue, coerced: &CellValue) -> bool {
    !original.is_blank() && coerced.is_null()
}

fn to_integer(value: &CellValue) -> CellValue {
    match value {
        CellValue::Integer(i) => CellValue::Integer(*i),
        CellValue::Float(f) => whole_number(*f),
        CellValue::Boolean(b) => CellValue::Integer(i64::from(*b)),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(i) => CellValue::Integer(i),
                Err(_) => trimmed
                    .parse::<f64>()
                    .map(whole_number)
                    .unwrap_or(CellValue::Null),
            }
        }
        CellValue::DateTime(_) | CellValue::Null => CellValue::Null,
    }
}

/// 整数值浮点 → 整数；有小数部分或越界 → Null
fn whole_number(f: f64) -> CellValue {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Null
    }
}

fn to_float(value: &CellValue) -> CellValue {
    let parsed = match value {
        CellValue::Integer(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::DateTime(_) | CellValue::Null => None,
    };

    match parsed {
        Some(f) if !f.is_nan() => CellValue::Float(f),
        _ => CellValue::Null,
    }
}

fn to_text(value: &CellValue) -> CellValue {
    match value {
        CellValue::Null => CellValue::Null,
        CellValue::Text(s) => CellValue::Text(s.trim().to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

fn to_boolean(value: &CellValue) -> CellValue {
    match value {
        CellValue::Boolean(b) => CellValue::Boolean(*b),
        CellValue::Integer(1) => CellValue::Boolean(true),
        CellValue::Integer(0) => CellValue::Boolean(false),
        CellValue::Float(f) if *f == 1.0 => CellValue::Boolean(true),
        CellValue::Float(f) if *f == 0.0 => CellValue::Boolean(false),
        CellValue::Text(s) => {
            let token = s.trim().to_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                CellValue::Boolean(true)
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                CellValue::Boolean(false)
            } else {
                CellValue::Null
            }
        }
        _ => CellValue::Null,
    }
}

fn to_datetime(value: &CellValue) -> CellValue {
    let parsed = match value {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(s) => parse_datetime_text(s.trim()),
        CellValue::Integer(i) => compact_date(*i).or_else(|| excel_serial_to_datetime(*i as f64)),
        CellValue::Float(f) => excel_serial_to_datetime(*f),
        CellValue::Boolean(_) | CellValue::Null => None,
    };

    parsed.map(CellValue::DateTime).unwrap_or(CellValue::Null)
}

fn to_category(value: &CellValue) -> CellValue {
    match value {
        CellValue::Null => CellValue::Null,
        CellValue::Text(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

/// 解析日期 / 日期时间文本
pub fn parse_datetime_text(value: &str) -> Option<NaiveDateTime> {
    if value.is_empty() {
        return None;
    }

    // 带时区偏移的时间保留墙上时间，丢弃偏移
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// YYYYMMDD 形式的整数日期
fn compact_date(value: i64) -> Option<NaiveDateTime> {
    if !(10_000_101..=99_991_231).contains(&value) {
        return None;
    }
    let year = i32::try_from(value / 10_000).ok()?;
    let month = u32::try_from((value / 100) % 100).ok()?;
    let day = u32::try_from(value % 100).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Excel 序列日期（1900 日期系统）→ 日期时间
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial >= EXCEL_SERIAL_MAX {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::DateTime(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn test_integer_coercion() {
        let t = ColumnType::Integer;
        assert_eq!(coerce_value(&CellValue::Float(1.0), t), CellValue::Integer(1));
        assert_eq!(coerce_value(&CellValue::from(" 42 "), t), CellValue::Integer(42));
        assert_eq!(coerce_value(&CellValue::from("4.0"), t), CellValue::Integer(4));
        assert_eq!(coerce_value(&CellValue::from("1e3"), t), CellValue::Integer(1000));
        assert_eq!(coerce_value(&CellValue::Boolean(true), t), CellValue::Integer(1));
    }

    #[test]
    fn test_integer_unparsable_becomes_null() {
        let t = ColumnType::Integer;
        assert_eq!(coerce_value(&CellValue::from("abc"), t), CellValue::Null);
        assert_eq!(coerce_value(&CellValue::Float(1.5), t), CellValue::Null);
        assert_eq!(coerce_value(&CellValue::Float(f64::NAN), t), CellValue::Null);
        assert_eq!(coerce_value(&CellValue::Null, t), CellValue::Null);
    }

    #[test]
    fn test_float_coercion() {
        let t = ColumnType::Float;
        assert_eq!(coerce_value(&CellValue::Integer(3), t), CellValue::Float(3.0));
        assert_eq!(coerce_value(&CellValue::from(" 2.5"), t), CellValue::Float(2.5));
        assert_eq!(coerce_value(&CellValue::from("n/a"), t), CellValue::Null);
        assert_eq!(coerce_value(&CellValue::from("NaN"), t), CellValue::Null);
    }

    #[test]
    fn test_string_coercion() {
        let t = ColumnType::String;
        assert_eq!(coerce_value(&CellValue::from(" Alice "), t), CellValue::from("Alice"));
        assert_eq!(coerce_value(&CellValue::Integer(7), t), CellValue::from("7"));
        assert_eq!(coerce_value(&CellValue::Float(2.5), t), CellValue::from("2.5"));
        assert_eq!(coerce_value(&CellValue::Null, t), CellValue::Null);
    }

    #[test]
    fn test_boolean_coercion() {
        let t = ColumnType::Boolean;
        assert_eq!(coerce_value(&CellValue::from("Yes"), t), CellValue::Boolean(true));
        assert_eq!(coerce_value(&CellValue::from(" N "), t), CellValue::Boolean(false));
        assert_eq!(coerce_value(&CellValue::from("是"), t), CellValue::Boolean(true));
        assert_eq!(coerce_value(&CellValue::Float(0.0), t), CellValue::Boolean(false));
        assert_eq!(coerce_value(&CellValue::Integer(2), t), CellValue::Null);
        assert_eq!(coerce_value(&CellValue::from("maybe"), t), CellValue::Null);
    }

    #[test]
    fn test_date_coercion() {
        let t = ColumnType::Date;
        assert_eq!(coerce_value(&CellValue::from("2025-01-20"), t), date(2025, 1, 20));
        assert_eq!(coerce_value(&CellValue::from("20250120"), t), date(2025, 1, 20));
        assert_eq!(coerce_value(&CellValue::from("2025/01/20"), t), date(2025, 1, 20));
        assert_eq!(coerce_value(&CellValue::Integer(20250120), t), date(2025, 1, 20));
        // Excel 序列日期 45677 = 2025-01-20
        assert_eq!(coerce_value(&CellValue::Float(45677.0), t), date(2025, 1, 20));
        assert_eq!(coerce_value(&CellValue::from("not a date"), t), CellValue::Null);
        assert_eq!(coerce_value(&CellValue::Boolean(true), t), CellValue::Null);
    }

    #[test]
    fn test_datetime_text_with_time() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 20)
            .unwrap()
            .and_hms_opt(8, 30, 15)
            .unwrap();
        assert_eq!(parse_datetime_text("2025-01-20 08:30:15"), Some(expected));
        assert_eq!(parse_datetime_text("2025-01-20T08:30:15Z"), Some(expected));
        assert_eq!(parse_datetime_text("20250120083015"), Some(expected));
    }

    #[test]
    fn test_offset_datetime_keeps_wall_clock() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 20)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime_text("2025-01-20T08:30:00+02:00"), Some(expected));
        assert_eq!(parse_datetime_text("2025-01-20T08:30:00-05:00"), Some(expected));
    }

    #[test]
    fn test_category_and_unknown() {
        assert_eq!(
            coerce_value(&CellValue::Integer(3), ColumnType::Category),
            CellValue::from("3")
        );
        let raw = CellValue::from("  keep me  ");
        assert_eq!(coerce_value(&raw, ColumnType::Unknown), raw);
    }

    #[test]
    fn test_anomaly_detection() {
        let raw = CellValue::from("abc");
        let coerced = coerce_value(&raw, ColumnType::Integer);
        assert!(is_coercion_anomaly(&raw, &coerced));
        assert!(!is_coercion_anomaly(&CellValue::Null, &CellValue::Null));
    }
}
