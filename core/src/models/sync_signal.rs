//! 同步信号模型
//!
//! 存储协作方读出的快照: 定时任务记录与执行日志。
//! 评估器只读这些快照,每次调用重新计算,不持有状态。
//! 记录可能来自旧版本或写到一半,所有字段都允许缺失。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::lenient;

/// 定时同步任务记录
///
/// 每个用户预期0或1条
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CronJob {
    #[serde(deserialize_with = "lenient::flag")]
    pub active: bool,
    /// cron表达式,如 "0 6 * * *"
    #[serde(deserialize_with = "lenient::text")]
    pub schedule: String,
    #[serde(alias = "lastRun", deserialize_with = "lenient::opt_datetime")]
    pub last_run: Option<DateTime<Utc>>,
}

impl CronJob {
    pub fn new(schedule: impl Into<String>, active: bool) -> Self {
        Self {
            active,
            schedule: schedule.into(),
            last_run: None,
        }
    }
}

/// 执行结果
///
/// 存储中的原始值应为字符串;未知取值或其他形状保留原文而不是解析失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum ExecutionStatus {
    Success,
    Error,
    ExecutionError,
    Unknown(String),
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::ExecutionError => "execution_error",
            Self::Unknown(raw) => raw,
        }
    }

    /// Error 与 ExecutionError 都算失败
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::ExecutionError)
    }
}

impl Default for ExecutionStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for ExecutionStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "execution_error" | "executionerror" => Self::ExecutionError,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Value> for ExecutionStatus {
    fn from(raw: Value) -> Self {
        match raw {
            Value::Null => Self::default(),
            Value::String(s) => Self::from(s),
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// 执行日志 (按时间倒序提供)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionLog {
    pub status: ExecutionStatus,
    #[serde(alias = "executedAt", deserialize_with = "lenient::opt_datetime")]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(alias = "durationMs", deserialize_with = "lenient::opt_integer")]
    pub duration_ms: Option<i64>,
    #[serde(alias = "errorMessage", deserialize_with = "lenient::opt_string")]
    pub error_message: Option<String>,
}

impl ExecutionLog {
    pub fn success(executed_at: DateTime<Utc>, duration_ms: i64) -> Self {
        Self {
            status: ExecutionStatus::Success,
            executed_at: Some(executed_at),
            duration_ms: Some(duration_ms),
            error_message: None,
        }
    }

    pub fn failure(
        status: ExecutionStatus,
        executed_at: DateTime<Utc>,
        duration_ms: i64,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            executed_at: Some(executed_at),
            duration_ms: Some(duration_ms),
            error_message: Some(error_message.into()),
        }
    }
}

/// 用户同步状态标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatusLabel {
    /// 定时任务启用,最近一次执行成功
    Active,
    /// 定时任务存在但已停用
    Paused,
    /// 没有定时任务
    Disabled,
    /// 最近一次执行失败
    Error,
    /// 定时任务启用,尚无执行记录
    Pending,
    /// 最近一次执行结果无法识别
    Unknown,
}

impl SyncStatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Disabled => "Disabled",
            Self::Error => "Error",
            Self::Pending => "Pending",
            Self::Unknown => "Unknown",
        }
    }

    /// 界面展示文字
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Active => "Ativo",
            Self::Paused => "Pausado",
            Self::Disabled => "Desativado",
            Self::Error => "Erro",
            Self::Pending => "Aguardando primeira execução",
            Self::Unknown => "Desconhecido",
        }
    }
}

/// 系统健康等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemHealth {
    Healthy,
    Warning,
    Critical,
}

impl SystemHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// 系统级健康评估输入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemHealthSnapshot {
    /// 最近24小时内的失败次数
    pub recent_errors_24h: u32,
    /// 最近24小时内状态无法识别的日志数
    #[serde(default)]
    pub recent_unrecognized_24h: u32,
    /// 最近一次成功执行时间
    pub last_success_at: Option<DateTime<Utc>>,
    /// 当前启用的监控项数量
    pub active_tracked_items: u32,
}
