use chrono::{DateTime, Duration, TimeZone, Utc};
use preco_monitor::models::{
    CronJob, ExecutionLog, ExecutionStatus, SyncStatusLabel, SystemHealth, SystemHealthSnapshot,
};
use preco_monitor::services::sync_health::{
    evaluate_sync_status, evaluate_system_health, CRITICAL_ERROR_THRESHOLD,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0).unwrap()
}

fn interval() -> Duration {
    Duration::hours(24)
}

fn active_job() -> Vec<CronJob> {
    vec![CronJob::new("0 6 * * *", true)]
}

fn error_log(hours_ago: i64) -> ExecutionLog {
    ExecutionLog::failure(
        ExecutionStatus::Error,
        now() - Duration::hours(hours_ago),
        1200,
        "1 de 3 itens falharam",
    )
}

// ============================================================================
// 用户同步状态
// ============================================================================

#[test]
fn test_没有定时任务_disabled() {
    assert_eq!(evaluate_sync_status(&[], &[]), SyncStatusLabel::Disabled);

    let logs = vec![ExecutionLog::success(now(), 100)];
    assert_eq!(evaluate_sync_status(&[], &logs), SyncStatusLabel::Disabled);
}

#[test]
fn test_定时任务停用_paused_不看日志() {
    let jobs = vec![CronJob::new("0 6 * * *", false)];

    for logs in [
        vec![],
        vec![ExecutionLog::success(now(), 100)],
        vec![error_log(1)],
    ] {
        assert_eq!(evaluate_sync_status(&jobs, &logs), SyncStatusLabel::Paused);
    }
}

#[test]
fn test_启用但无日志_pending() {
    assert_eq!(evaluate_sync_status(&active_job(), &[]), SyncStatusLabel::Pending);
}

#[test]
fn test_最近一次成功_active() {
    let logs = vec![ExecutionLog::success(now(), 100), error_log(24)];
    assert_eq!(evaluate_sync_status(&active_job(), &logs), SyncStatusLabel::Active);
}

#[test]
fn test_最近一次失败_error() {
    let logs = vec![error_log(0)];
    assert_eq!(evaluate_sync_status(&active_job(), &logs), SyncStatusLabel::Error);

    let logs = vec![ExecutionLog::failure(
        ExecutionStatus::ExecutionError,
        now(),
        0,
        "storage unavailable",
    )];
    assert_eq!(evaluate_sync_status(&active_job(), &logs), SyncStatusLabel::Error);
}

#[test]
fn test_旧版本记录_unknown() {
    let logs: Vec<ExecutionLog> =
        serde_json::from_str(r#"[{"status":"em_andamento"},{"status":"success"}]"#).unwrap();
    assert_eq!(evaluate_sync_status(&active_job(), &logs), SyncStatusLabel::Unknown);

    let logs: Vec<ExecutionLog> = serde_json::from_str(r#"[{}]"#).unwrap();
    assert_eq!(evaluate_sync_status(&active_job(), &logs), SyncStatusLabel::Unknown);
}

#[test]
fn test_多条定时任务只看第一条() {
    let jobs = vec![
        CronJob::new("0 6 * * *", false),
        CronJob::new("0 18 * * *", true),
    ];
    assert_eq!(evaluate_sync_status(&jobs, &[]), SyncStatusLabel::Paused);
}

// ============================================================================
// 系统健康
// ============================================================================

fn snapshot(errors: u32, last_success_hours_ago: Option<i64>) -> SystemHealthSnapshot {
    SystemHealthSnapshot {
        recent_errors_24h: errors,
        recent_unrecognized_24h: 0,
        last_success_at: last_success_hours_ago.map(|h| now() - Duration::hours(h)),
        active_tracked_items: 4,
    }
}

#[test]
fn test_失败6次_critical() {
    assert_eq!(
        evaluate_system_health(&snapshot(6, Some(1)), now(), interval()),
        SystemHealth::Critical
    );
    assert_eq!(CRITICAL_ERROR_THRESHOLD, 5);
}

#[test]
fn test_失败5次且最近成功_healthy() {
    assert_eq!(
        evaluate_system_health(&snapshot(5, Some(1)), now(), interval()),
        SystemHealth::Healthy
    );
}

#[test]
fn test_成功过期_warning() {
    assert_eq!(
        evaluate_system_health(&snapshot(0, Some(25)), now(), interval()),
        SystemHealth::Warning
    );
}

#[test]
fn test_恰好等于间隔不算过期() {
    assert_eq!(
        evaluate_system_health(&snapshot(0, Some(24)), now(), interval()),
        SystemHealth::Healthy
    );
}

#[test]
fn test_critical优先于过期() {
    assert_eq!(
        evaluate_system_health(&snapshot(10, Some(48)), now(), interval()),
        SystemHealth::Critical
    );
}

#[test]
fn test_最近日志无法识别_warning() {
    let logs: Vec<ExecutionLog> = serde_json::from_str(
        r#"[
            {"status": "em_andamento", "executedAt": "2025-10-07T11:59:00Z"},
            {"status": "success", "executedAt": "2025-10-07T11:00:00Z"}
        ]"#,
    )
    .unwrap();

    let snapshot = SystemHealthSnapshot::from_logs(&logs, 1, now());
    assert_eq!(snapshot.recent_unrecognized_24h, 1);
    assert_eq!(
        evaluate_system_health(&snapshot, now(), interval()),
        SystemHealth::Warning
    );
}

#[test]
fn test_快照统计_24小时窗口() {
    let mut logs: Vec<ExecutionLog> = (0..6).map(error_log).collect();
    logs.push(error_log(30));
    logs.push(ExecutionLog::success(now() - Duration::hours(3), 800));

    let snapshot = SystemHealthSnapshot::from_logs(&logs, 2, now());
    assert_eq!(snapshot.recent_errors_24h, 6);
    assert_eq!(snapshot.last_success_at, Some(now() - Duration::hours(3)));
    assert_eq!(
        evaluate_system_health(&snapshot, now(), interval()),
        SystemHealth::Critical
    );

    logs.remove(0);
    let snapshot = SystemHealthSnapshot::from_logs(&logs, 2, now());
    assert_eq!(snapshot.recent_errors_24h, 5);
    assert_eq!(
        evaluate_system_health(&snapshot, now(), interval()),
        SystemHealth::Healthy
    );
}
