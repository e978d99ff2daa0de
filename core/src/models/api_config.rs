use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// 默认价格API根地址 (SEFAZ/AL 公开接口)
pub const DEFAULT_BASE_URL: &str = "https://api.sefaz.al.gov.br/sfz-economiza-alagoas-api/api/public";

/// 配置错误
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ConfigError {
    /// 缺少必需的环境变量
    #[error("缺少必需的配置项: {0}")]
    MissingVar(String),

    /// 配置值格式错误
    #[error("配置项 {key} 的值无效: {value}")]
    InvalidValue { key: String, value: String },
}

/// 价格API与同步配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceApiConfig {
    /// API根地址,不含末尾斜杠
    pub base_url: String,

    /// AppToken请求头
    pub app_token: String,

    /// 单次请求超时 (秒)
    pub timeout_secs: u64,

    /// 同一用户两次查询的最小间隔 (秒)
    pub cooldown_secs: u64,

    /// 同步预期间隔 (小时),超过则系统健康降级为 Warning
    pub expected_sync_interval_hours: i64,

    /// 同步时相邻两次请求的基础间隔 (毫秒)
    pub sync_request_spacing_ms: u64,
}

impl PriceApiConfig {
    /// 创建配置,其余字段使用默认值
    ///
    /// # 示例
    /// ```
    /// use preco_monitor::models::PriceApiConfig;
    ///
    /// let config = PriceApiConfig::new("token-123".to_string());
    /// assert_eq!(config.cooldown_secs, 60);
    /// ```
    pub fn new(app_token: String) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_token,
            timeout_secs: 30,
            cooldown_secs: 60,
            expected_sync_interval_hours: 24,
            sync_request_spacing_ms: 1500,
        }
    }

    /// 设置API根地址 (构建器模式)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_cooldown_secs(mut self, cooldown_secs: u64) -> Self {
        self.cooldown_secs = cooldown_secs;
        self
    }

    pub fn with_sync_request_spacing_ms(mut self, spacing_ms: u64) -> Self {
        self.sync_request_spacing_ms = spacing_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn expected_sync_interval(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expected_sync_interval_hours)
    }

    /// 从环境变量加载配置
    ///
    /// 先尝试加载当前目录的 `.env`,文件不存在不报错。
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "未加载 .env 文件,仅使用进程环境变量");
        }

        let vars: HashMap<String, String> = std::env::vars().collect();
        let config = Self::from_vars(&vars)?;

        tracing::info!(config = %config.summary_for_logging(), "已加载价格API配置");
        Ok(config)
    }

    /// 从键值表解析配置
    ///
    /// 读取:
    /// - PRICE_API_APP_TOKEN: 必需
    /// - PRICE_API_BASE_URL: 默认 SEFAZ/AL 公开接口
    /// - PRICE_API_TIMEOUT_SECS: 默认 30
    /// - PRICE_API_COOLDOWN_SECS: 默认 60
    /// - SYNC_EXPECTED_INTERVAL_HOURS: 默认 24,必须为正数
    /// - SYNC_REQUEST_SPACING_MS: 默认 1500
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let app_token = vars
            .get("PRICE_API_APP_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("PRICE_API_APP_TOKEN".to_string()))?;

        let mut config = Self::new(app_token);

        if let Some(base_url) = vars.get("PRICE_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }
        if let Some(timeout) = parse_var::<u64>(vars, "PRICE_API_TIMEOUT_SECS")? {
            config.timeout_secs = timeout;
        }
        if let Some(cooldown) = parse_var::<u64>(vars, "PRICE_API_COOLDOWN_SECS")? {
            config.cooldown_secs = cooldown;
        }
        if let Some(hours) = parse_var::<i64>(vars, "SYNC_EXPECTED_INTERVAL_HOURS")? {
            if hours <= 0 {
                return Err(ConfigError::InvalidValue {
                    key: "SYNC_EXPECTED_INTERVAL_HOURS".to_string(),
                    value: hours.to_string(),
                });
            }
            config.expected_sync_interval_hours = hours;
        }
        if let Some(spacing) = parse_var::<u64>(vars, "SYNC_REQUEST_SPACING_MS")? {
            config.sync_request_spacing_ms = spacing;
        }

        Ok(config)
    }

    /// 日志用配置摘要 (隐藏AppToken)
    pub fn summary_for_logging(&self) -> String {
        format!(
            "{} (token: ***, timeout: {}s, cooldown: {}s, sync interval: {}h)",
            self.base_url, self.timeout_secs, self.cooldown_secs, self.expected_sync_interval_hours
        )
    }
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            }),
    }
}
