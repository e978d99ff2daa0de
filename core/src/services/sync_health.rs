//! 同步健康评估
//!
//! 两个纯函数评估器,每次调用从快照重新计算:
//! - `evaluate_sync_status`: 单个用户的同步状态标签
//! - `evaluate_system_health`: 系统级健康等级
//!
//! 输入可能来自旧版本或写到一半的记录,评估器对任何输入都给出结果,不会失败。

use chrono::{DateTime, Duration, Utc};

use crate::models::sync_signal::{
    CronJob, ExecutionLog, ExecutionStatus, SyncStatusLabel, SystemHealth, SystemHealthSnapshot,
};
use crate::utils::time_utils::{is_overdue, within_window};

/// 错误统计窗口 (小时)
pub const ERROR_WINDOW_HOURS: i64 = 24;

/// 窗口内失败次数超过该值即为 Critical
pub const CRITICAL_ERROR_THRESHOLD: u32 = 5;

/// 评估用户同步状态
///
/// 按顺序匹配,命中即返回:
/// 1. 没有定时任务 → Disabled
/// 2. 定时任务已停用 → Paused
/// 3. 没有执行日志 → Pending
/// 4. 最近一次执行成功 → Active
/// 5. 最近一次执行失败 → Error
/// 6. 其他 → Unknown
///
/// 有多条定时任务时只看第一条;日志按时间倒序,第一条即最近一次。
pub fn evaluate_sync_status(cron_jobs: &[CronJob], logs: &[ExecutionLog]) -> SyncStatusLabel {
    let Some(job) = cron_jobs.first() else {
        return SyncStatusLabel::Disabled;
    };

    if !job.active {
        return SyncStatusLabel::Paused;
    }

    let Some(latest) = logs.first() else {
        return SyncStatusLabel::Pending;
    };

    match &latest.status {
        ExecutionStatus::Success => SyncStatusLabel::Active,
        ExecutionStatus::Error | ExecutionStatus::ExecutionError => SyncStatusLabel::Error,
        ExecutionStatus::Unknown(raw) => {
            tracing::debug!(status = %raw, "执行日志状态无法识别");
            SyncStatusLabel::Unknown
        }
    }
}

/// 评估系统健康
///
/// - 24小时内失败次数 > 5 → Critical
/// - 24小时内有无法识别状态的日志 → Warning
/// - 最近一次成功距今超过预期间隔 → Warning
/// - 从未成功: 有启用的监控项 → Warning,否则 Healthy
/// - 其他 → Healthy
pub fn evaluate_system_health(
    snapshot: &SystemHealthSnapshot,
    now: DateTime<Utc>,
    expected_interval: Duration,
) -> SystemHealth {
    if snapshot.recent_errors_24h > CRITICAL_ERROR_THRESHOLD {
        return SystemHealth::Critical;
    }

    if snapshot.recent_unrecognized_24h > 0 {
        return SystemHealth::Warning;
    }

    match snapshot.last_success_at {
        Some(last) if is_overdue(last, now, expected_interval) => SystemHealth::Warning,
        Some(_) => SystemHealth::Healthy,
        None if snapshot.active_tracked_items > 0 => SystemHealth::Warning,
        None => SystemHealth::Healthy,
    }
}

impl SystemHealthSnapshot {
    /// 从执行日志汇总系统健康快照
    ///
    /// 没有执行时间的日志不参与统计;无法识别的状态既不算失败也不算成功,单独计数。
    /// 时钟偏差导致略晚于 `now` 的成功时间按 `now` 计。
    pub fn from_logs(logs: &[ExecutionLog], active_tracked_items: u32, now: DateTime<Utc>) -> Self {
        let window = Duration::hours(ERROR_WINDOW_HOURS);

        let count_recent = |is_kind: fn(&ExecutionStatus) -> bool| {
            let count = logs
                .iter()
                .filter(|log| is_kind(&log.status))
                .filter_map(|log| log.executed_at)
                .filter(|at| within_window(*at, now, window))
                .count();
            u32::try_from(count).unwrap_or(u32::MAX)
        };

        let recent_errors_24h = count_recent(ExecutionStatus::is_failure);
        let recent_unrecognized_24h =
            count_recent(|status| matches!(status, ExecutionStatus::Unknown(_)));

        let last_success_at = logs
            .iter()
            .filter(|log| log.status == ExecutionStatus::Success)
            .filter_map(|log| log.executed_at)
            .max()
            .map(|at| at.min(now));

        if recent_unrecognized_24h > 0 {
            tracing::debug!(count = recent_unrecognized_24h, "执行日志中有无法识别的状态");
        }

        Self {
            recent_errors_24h,
            recent_unrecognized_24h,
            last_success_at,
            active_tracked_items,
        }
    }
}
