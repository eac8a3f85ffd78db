// ==========================================
// 采购全流程跟踪系统 - 日期解码器
// ==========================================
// 支持三种字面形式（按顺序尝试）:
// 1. 构造函数形式: Date(年,月,日[,时[,分[,秒]]])，月份为零基
// 2. 序列日数: 自 1899-12-30 起的天数（可带小数表示时刻）
// 3. 常规日历字符串: 15/01/2024 10:30:00、2024-01-15 等
// 红线: 全部失败时原样返回输入字符串,不报错
// ==========================================

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 序列日数的下限（约 1954-10-03），小于该值的纯数字不视为日期
pub const SERIAL_MIN_DAYS: f64 = 20_000.0;

/// 序列日数的上限（9999-12-31）
pub const SERIAL_MAX_DAYS: f64 = 2_958_465.0;

/// 日期时间类格式（优先）
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// 纯日期格式
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%Y%m%d"];

/// 显示格式
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

// ==========================================
// DecodedDate - 解码结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecodedDate {
    Timestamp(NaiveDateTime), // 解码成功
    Unparsed(String),         // 无法解码，保留原文
}

impl DecodedDate {
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            DecodedDate::Timestamp(ts) => Some(*ts),
            DecodedDate::Unparsed(_) => None,
        }
    }
}

impl fmt::Display for DecodedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedDate::Timestamp(ts) => write!(f, "{}", ts.format(DISPLAY_FORMAT)),
            DecodedDate::Unparsed(raw) => write!(f, "{}", raw),
        }
    }
}

// ==========================================
// DateDecoder - 纯函数工具类
// ==========================================
pub struct DateDecoder;

impl DateDecoder {
    /// 解码日期字面量
    pub fn decode(value: &str) -> DecodedDate {
        let trimmed = value.trim();
        Self::decode_constructor(trimmed)
            .or_else(|| Self::decode_serial(trimmed))
            .or_else(|| Self::decode_calendar(trimmed))
            .map(DecodedDate::Timestamp)
            .unwrap_or_else(|| DecodedDate::Unparsed(value.to_string()))
    }

    /// 构造函数形式: Date(2024,0,15,10,30,0)
    ///
    /// 接受 3~6 个整数；月份零基（0 = 一月）
    pub fn decode_constructor(value: &str) -> Option<NaiveDateTime> {
        let inner = value.strip_prefix("Date(")?.strip_suffix(')')?;
        let parts: Vec<i64> = inner
            .split(',')
            .map(|p| p.trim().parse::<i64>().ok())
            .collect::<Option<Vec<_>>>()?;

        if !(3..=6).contains(&parts.len()) {
            return None;
        }

        let part = |idx: usize| parts.get(idx).copied().unwrap_or(0);
        let year = i32::try_from(part(0)).ok()?;
        let month = u32::try_from(part(1)).ok()?.checked_add(1)?;
        let day = u32::try_from(part(2)).ok()?;
        let hour = u32::try_from(part(3)).ok()?;
        let minute = u32::try_from(part(4)).ok()?;
        let second = u32::try_from(part(5)).ok()?;

        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
    }

    /// 序列日数: 45306.5 → 2024-01-15 12:00:00
    pub fn decode_serial(value: &str) -> Option<NaiveDateTime> {
        let serial = value.parse::<f64>().ok()?;
        if !(SERIAL_MIN_DAYS..=SERIAL_MAX_DAYS).contains(&serial) {
            return None;
        }

        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let seconds = (serial * 86_400.0).round() as i64;
        epoch.checked_add_signed(Duration::seconds(seconds))
    }

    /// 常规日历字符串
    pub fn decode_calendar(value: &str) -> Option<NaiveDateTime> {
        if value.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_local());
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(dt);
            }
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
