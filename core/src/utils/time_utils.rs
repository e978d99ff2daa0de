use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};

/// 阿拉戈斯州时区偏移 (UTC-03:00,无夏令时)
const MACEIO_OFFSET_SECONDS: i32 = -3 * 3600;

/// 无时区的时间格式 (价格API历史数据中出现过)
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// 解析价格API的销售时间
///
/// 优先按 RFC 3339 解析 (例: "2025-10-07T12:34:56.000Z");
/// 不带时区的时间视为当地时间 (UTC-03:00)。
pub fn parse_sale_time(time_str: &str) -> Option<DateTime<Utc>> {
    let trimmed = time_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset = FixedOffset::east_opt(MACEIO_OFFSET_SECONDS)?;
    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .and_then(|naive| naive.and_local_timezone(offset).single())
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// 时间点是否落在 `[now - window, now]` 区间内
pub fn within_window(ts: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    ts <= now && ts >= now - window
}

/// 距离上次发生是否已超过预期间隔
///
/// 恰好等于间隔时不算超时。
pub fn is_overdue(last: DateTime<Utc>, now: DateTime<Utc>, interval: Duration) -> bool {
    now - last > interval
}
