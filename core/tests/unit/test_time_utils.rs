use chrono::{Duration, TimeZone, Timelike, Utc};
use preco_monitor::utils::time_utils::{is_overdue, parse_sale_time, within_window};

// ============================================================================
// parse_sale_time 测试
// ============================================================================

#[test]
fn test_parse_sale_time_rfc3339_utc() {
    let dt = parse_sale_time("2025-10-07T12:34:56.000Z").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2025, 10, 7, 12, 34, 56).unwrap());
}

#[test]
fn test_parse_sale_time_rfc3339_带偏移() {
    let dt = parse_sale_time("2025-10-07T09:34:56-03:00").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2025, 10, 7, 12, 34, 56).unwrap());
}

#[test]
fn test_parse_sale_time_无时区按当地时间() {
    let dt = parse_sale_time("2025-10-07 21:30:00").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2025, 10, 8, 0, 30, 0).unwrap());

    let dt = parse_sale_time("2025-10-07T09:00:00.123").unwrap();
    assert_eq!(dt.hour(), 12);
}

#[test]
fn test_parse_sale_time_首尾空白() {
    assert!(parse_sale_time("  2025-10-07T12:00:00Z  ").is_some());
}

#[test]
fn test_parse_sale_time_无法解析() {
    for input in ["", "07/10/2025", "2025-13-01T00:00:00Z", "hoje"] {
        assert!(parse_sale_time(input).is_none(), "input = {}", input);
    }
}

// ============================================================================
// within_window / is_overdue 测试
// ============================================================================

#[test]
fn test_within_window_闭区间() {
    let now = Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0).unwrap();
    let window = Duration::hours(24);

    assert!(within_window(now, now, window));
    assert!(within_window(now - window, now, window));
    assert!(!within_window(now - window - Duration::milliseconds(1), now, window));
}

#[test]
fn test_within_window_未来时间不计入() {
    let now = Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0).unwrap();
    assert!(!within_window(now + Duration::minutes(5), now, Duration::hours(24)));
}

#[test]
fn test_is_overdue_边界() {
    let now = Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0).unwrap();
    let interval = Duration::hours(24);

    assert!(!is_overdue(now, now, interval));
    assert!(!is_overdue(now - interval, now, interval));
    assert!(is_overdue(now - interval - Duration::seconds(1), now, interval));
}
