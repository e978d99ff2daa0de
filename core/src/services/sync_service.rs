//! 同步服务
//!
//! 核心职责:
//! - 逐个重新查询用户启用的监控项,保存价格记录和汇总
//! - 每次运行追加一条执行日志,供健康评估使用
//! - 管理运行中的同步 (同一用户同时只允许一个)
//! - 读取同步信号,给出用户状态标签和系统健康等级

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::models::{
    CronJob, ExecutionLog, ExecutionStatus, PriceApiConfig, PriceRecord, PriceSummary,
    StorageError, SyncError, SyncStatusLabel, SystemHealth, SystemHealthSnapshot, TrackedItem,
};
use crate::services::price_api::PriceQueryExecutor;
use crate::services::query_builder::prepare_tracked_item;
use crate::services::sync_health::{evaluate_sync_status, evaluate_system_health};

/// 评估用户状态时读取的日志条数 (只用到最近一条,多读几条便于排查)
const USER_LOG_LIMIT: usize = 10;

/// 评估系统健康时读取的日志条数
const SYSTEM_LOG_LIMIT: usize = 500;

/// 存储协作方
///
/// 执行日志按时间倒序返回
#[async_trait]
pub trait SyncStore: Send + Sync {
    async fn list_tracked_items(&self, user_id: &str) -> Result<Vec<TrackedItem>, StorageError>;

    async fn save_tracked_item(&self, item: &TrackedItem) -> Result<(), StorageError>;

    async fn save_price_records(
        &self,
        item_id: &str,
        records: &[PriceRecord],
    ) -> Result<(), StorageError>;

    async fn append_execution_log(
        &self,
        user_id: &str,
        log: &ExecutionLog,
    ) -> Result<(), StorageError>;

    async fn load_cron_jobs(&self, user_id: &str) -> Result<Vec<CronJob>, StorageError>;

    async fn load_execution_logs(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ExecutionLog>, StorageError>;

    /// 所有用户的执行日志
    async fn load_system_logs(&self, limit: usize) -> Result<Vec<ExecutionLog>, StorageError>;

    /// 所有用户启用的监控项数量
    async fn count_active_items(&self) -> Result<u32, StorageError>;
}

/// 单个监控项同步失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub item_id: String,
    pub name: String,
    pub reason: String,
}

/// 最低价变化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub item_id: String,
    pub name: String,
    pub previous_min_price: f64,
    pub current_min_price: f64,
}

impl PriceChange {
    pub fn delta(&self) -> f64 {
        self.current_min_price - self.previous_min_price
    }
}

/// 一次同步的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: i64,
    /// 本次处理的启用监控项数
    pub total_items: usize,
    pub synced_items: usize,
    pub records_saved: usize,
    pub failures: Vec<ItemFailure>,
    pub price_changes: Vec<PriceChange>,
    pub status: ExecutionStatus,
}

/// 系统健康报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealthReport {
    pub health: SystemHealth,
    pub snapshot: SystemHealthSnapshot,
    pub evaluated_at: DateTime<Utc>,
}

/// 运行中的统计
#[derive(Default)]
struct RunProgress {
    synced_items: usize,
    records_saved: usize,
    failures: Vec<ItemFailure>,
    price_changes: Vec<PriceChange>,
}

pub struct SyncService {
    store: Arc<dyn SyncStore>,
    executor: Arc<dyn PriceQueryExecutor>,

    /// 相邻两次请求的基础间隔
    request_spacing: Duration,

    /// 预期的同步间隔,超过即系统健康降级
    expected_interval: chrono::Duration,

    /// 运行中的同步 (user_id → 取消令牌)
    ///
    /// 锁只在同步代码段内持有,不跨越 await
    active_runs: Mutex<HashMap<String, CancellationToken>>,
}

/// 运行登记
///
/// drop 时移除登记,调用方中途丢弃 `run` 的 future 也不会残留
struct RunRegistration<'a> {
    active_runs: &'a Mutex<HashMap<String, CancellationToken>>,
    user_id: String,
}

impl Drop for RunRegistration<'_> {
    fn drop(&mut self) {
        lock_runs(self.active_runs).remove(&self.user_id);
    }
}

fn lock_runs(
    runs: &Mutex<HashMap<String, CancellationToken>>,
) -> MutexGuard<'_, HashMap<String, CancellationToken>> {
    runs.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SyncService {
    pub fn new(store: Arc<dyn SyncStore>, executor: Arc<dyn PriceQueryExecutor>) -> Self {
        Self {
            store,
            executor,
            request_spacing: Duration::from_millis(1500),
            expected_interval: chrono::Duration::hours(24),
            active_runs: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(
        store: Arc<dyn SyncStore>,
        executor: Arc<dyn PriceQueryExecutor>,
        config: &PriceApiConfig,
    ) -> Self {
        Self::new(store, executor)
            .with_request_spacing(Duration::from_millis(config.sync_request_spacing_ms))
            .with_expected_interval(config.expected_sync_interval())
    }

    pub fn with_request_spacing(mut self, spacing: Duration) -> Self {
        self.request_spacing = spacing;
        self
    }

    pub fn with_expected_interval(mut self, interval: chrono::Duration) -> Self {
        self.expected_interval = interval;
        self
    }

    /// 同步用户的全部启用监控项
    ///
    /// 监控项逐个顺序处理。单个监控项失败(条件无效、上游错误)只记入失败列表;
    /// 存储失败或取消会中止整次运行。
    ///
    /// 执行日志状态:
    /// - 全部成功 → Success
    /// - 部分失败 → Error
    /// - 中止 → ExecutionError
    pub async fn run(
        &self,
        user_id: &str,
        cancel_token: CancellationToken,
    ) -> Result<SyncOutcome, SyncError> {
        let registration = self.register_run(user_id, cancel_token.clone())?;

        let started_at = Utc::now();
        let clock = tokio::time::Instant::now();
        let result = self.run_items(user_id, &cancel_token).await;
        let duration_ms = clock.elapsed().as_millis() as i64;

        drop(registration);

        match result {
            Ok((total_items, progress)) => {
                let log = if progress.failures.is_empty() {
                    ExecutionLog::success(started_at, duration_ms)
                } else {
                    ExecutionLog::failure(
                        ExecutionStatus::Error,
                        started_at,
                        duration_ms,
                        format!(
                            "{} de {} itens falharam",
                            progress.failures.len(),
                            total_items
                        ),
                    )
                };
                self.store.append_execution_log(user_id, &log).await?;
                let status = log.status;

                crate::log_event!(
                    "SyncCompleted",
                    user_id = user_id,
                    status = status.as_str(),
                    total_items = total_items as u64,
                    synced_items = progress.synced_items as u64,
                    failed_items = progress.failures.len() as u64,
                    duration_ms = duration_ms
                );

                Ok(SyncOutcome {
                    user_id: user_id.to_string(),
                    started_at,
                    duration_ms,
                    total_items,
                    synced_items: progress.synced_items,
                    records_saved: progress.records_saved,
                    failures: progress.failures,
                    price_changes: progress.price_changes,
                    status,
                })
            }
            Err(err) => {
                let log = ExecutionLog::failure(
                    ExecutionStatus::ExecutionError,
                    started_at,
                    duration_ms,
                    err.to_string(),
                );
                if let Err(log_err) = self.store.append_execution_log(user_id, &log).await {
                    tracing::error!(
                        用户ID = %user_id,
                        错误 = %log_err,
                        "执行日志写入失败"
                    );
                }

                crate::log_error!(
                    "SyncAborted",
                    user_id = user_id,
                    error = err.to_string().as_str(),
                    duration_ms = duration_ms
                );
                Err(err)
            }
        }
    }

    /// 取消用户正在运行的同步
    ///
    /// 返回是否存在运行中的同步
    pub async fn cancel_run(&self, user_id: &str) -> bool {
        let guard = lock_runs(&self.active_runs);
        match guard.get(user_id) {
            Some(token) => {
                tracing::info!(用户ID = %user_id, "取消同步");
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self, user_id: &str) -> bool {
        lock_runs(&self.active_runs).contains_key(user_id)
    }

    /// 用户同步状态
    pub async fn current_status(&self, user_id: &str) -> Result<SyncStatusLabel, StorageError> {
        let cron_jobs = self.store.load_cron_jobs(user_id).await?;
        let logs = self.store.load_execution_logs(user_id, USER_LOG_LIMIT).await?;

        let label = evaluate_sync_status(&cron_jobs, &logs);
        tracing::debug!(
            用户ID = %user_id,
            状态 = label.as_str(),
            "已评估同步状态"
        );
        Ok(label)
    }

    /// 系统健康
    pub async fn system_health(&self, now: DateTime<Utc>) -> Result<SystemHealthReport, StorageError> {
        let logs = self.store.load_system_logs(SYSTEM_LOG_LIMIT).await?;
        let active_items = self.store.count_active_items().await?;

        let snapshot = SystemHealthSnapshot::from_logs(&logs, active_items, now);
        let health = evaluate_system_health(&snapshot, now, self.expected_interval);

        if health != SystemHealth::Healthy {
            tracing::warn!(
                health = health.as_str(),
                recent_errors = snapshot.recent_errors_24h,
                active_items = snapshot.active_tracked_items,
                "系统健康降级"
            );
        }

        Ok(SystemHealthReport {
            health,
            snapshot,
            evaluated_at: now,
        })
    }

    fn register_run(
        &self,
        user_id: &str,
        token: CancellationToken,
    ) -> Result<RunRegistration<'_>, SyncError> {
        let mut guard = lock_runs(&self.active_runs);
        if guard.contains_key(user_id) {
            tracing::warn!(用户ID = %user_id, "已有同步正在运行");
            return Err(SyncError::AlreadyRunning(user_id.to_string()));
        }
        guard.insert(user_id.to_string(), token);
        Ok(RunRegistration {
            active_runs: &self.active_runs,
            user_id: user_id.to_string(),
        })
    }

    async fn run_items(
        &self,
        user_id: &str,
        cancel_token: &CancellationToken,
    ) -> Result<(usize, RunProgress), SyncError> {
        let items: Vec<TrackedItem> = self
            .store
            .list_tracked_items(user_id)
            .await?
            .into_iter()
            .filter(|item| item.active)
            .collect();

        tracing::info!(
            用户ID = %user_id,
            监控项数量 = items.len(),
            "开始同步"
        );

        let total_items = items.len();
        let mut progress = RunProgress::default();

        for (index, mut item) in items.into_iter().enumerate() {
            if index > 0 {
                self.pause_between_requests(cancel_token).await?;
            }
            if cancel_token.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            self.sync_item(&mut item, &mut progress).await?;
        }

        Ok((total_items, progress))
    }

    /// 同步单个监控项
    ///
    /// 只有存储错误会向上传播
    async fn sync_item(
        &self,
        item: &mut TrackedItem,
        progress: &mut RunProgress,
    ) -> Result<(), StorageError> {
        let query = match prepare_tracked_item(item) {
            Ok(query) => query,
            Err(err) => {
                let reason = err.violations().join("; ");
                return self.record_failure(item, reason, progress).await;
            }
        };

        let page = match self
            .executor
            .execute(query.endpoint(), &query.to_request_body())
            .await
        {
            Ok(page) => page,
            Err(err) => return self.record_failure(item, err.to_string(), progress).await,
        };

        let synced_at = Utc::now();
        let (records, skipped) = page.into_records(synced_at);
        if !records.is_empty() {
            self.store.save_price_records(&item.id, &records).await?;
        }

        let summary = PriceSummary::from_records(&records);
        if let Some(summary) = &summary {
            if let (Some(previous), Some(delta)) = (item.last_min_price, item.price_change(summary)) {
                if delta != 0.0 {
                    progress.price_changes.push(PriceChange {
                        item_id: item.id.clone(),
                        name: item.name.clone(),
                        previous_min_price: previous,
                        current_min_price: summary.min_price,
                    });
                }
            }
        }

        item.record_sync(summary.as_ref(), synced_at);
        self.store.save_tracked_item(item).await?;

        tracing::info!(
            监控项ID = %item.id,
            记录数 = records.len(),
            跳过 = skipped,
            "监控项同步完成"
        );

        progress.synced_items += 1;
        progress.records_saved += records.len();
        Ok(())
    }

    async fn record_failure(
        &self,
        item: &mut TrackedItem,
        reason: String,
        progress: &mut RunProgress,
    ) -> Result<(), StorageError> {
        tracing::warn!(
            监控项ID = %item.id,
            原因 = %reason,
            "监控项同步失败"
        );

        item.mark_failed(reason.clone());
        self.store.save_tracked_item(item).await?;

        progress.failures.push(ItemFailure {
            item_id: item.id.clone(),
            name: item.name.clone(),
            reason,
        });
        Ok(())
    }

    /// 请求间隔 + 随机抖动,期间可被取消
    async fn pause_between_requests(&self, cancel_token: &CancellationToken) -> Result<(), SyncError> {
        let delay = self.spacing_with_jitter();
        if delay.is_zero() {
            return Ok(());
        }

        tokio::select! {
            _ = cancel_token.cancelled() => Err(SyncError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    /// 基础间隔加上 0~50% 的随机抖动
    fn spacing_with_jitter(&self) -> Duration {
        let base_ms = self.request_spacing.as_millis() as u64;
        if base_ms == 0 {
            return Duration::ZERO;
        }
        let jitter_ms = rand::thread_rng().gen_range(0..=base_ms / 2);
        Duration::from_millis(base_ms + jitter_ms)
    }
}
