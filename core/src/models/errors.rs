use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 价格API调用相关错误
///
/// 网络、上游拒绝和响应解析失败。
/// 这些错误都发生在本地校验通过之后。
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ApiError {
    /// 网络请求失败
    ///
    /// 可能原因:
    /// - 网络连接中断
    /// - 价格API服务器不可达
    /// - 请求超时
    #[error("网络请求失败: {0}")]
    NetworkFailed(String),

    /// 上游拒绝了已通过本地校验的请求 (HTTP 400/422)
    ///
    /// 与本地校验错误区分: 说明本地规则与上游规则出现了偏差
    #[error("价格API拒绝请求 (状态码 {status}): {message}")]
    RejectedByUpstream { status: u16, message: String },

    /// AppToken无效或无权限 (HTTP 401/403)
    #[error("价格API认证失败 (状态码 {status})")]
    Unauthorized { status: u16 },

    /// 触发速率限制
    ///
    /// 价格API返回429
    #[error("请求过于频繁,已被限流")]
    RateLimitExceeded { retry_after: Option<u64> },

    /// HTTP状态码错误
    ///
    /// 其他非2xx状态码
    #[error("HTTP错误 {status}: {message}")]
    HttpStatusError { status: u16, message: String },

    /// JSON解析失败
    ///
    /// 价格API返回的数据格式不符合预期
    #[error("响应数据解析失败: {0}")]
    JsonParseFailed(String),
}

/// 查询参数校验错误
///
/// 携带全部违规信息,调用方可以一次性高亮所有问题。
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ValidationError {
    /// 查询参数不符合价格API规则
    #[error("查询参数无效: {}", .0.join("; "))]
    InvalidQuery(Vec<String>),
}

impl ValidationError {
    /// 全部违规信息
    pub fn violations(&self) -> &[String] {
        match self {
            Self::InvalidQuery(violations) => violations,
        }
    }
}

/// 存储协作方错误
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum StorageError {
    /// 存储连接失败
    #[error("存储连接失败: {0}")]
    ConnectionFailed(String),

    /// 记录未找到
    #[error("记录未找到: {0}")]
    NotFound(String),

    /// 序列化/反序列化失败
    #[error("数据序列化失败: {0}")]
    SerializationError(String),

    /// 读写操作失败
    #[error("存储操作失败: {0}")]
    OperationFailed(String),
}

/// 查询服务错误
///
/// 区分三类失败: 本地校验未通过、冷却期内、上游/网络失败
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// 同一用户两次查询间隔过短
    #[error("查询过于频繁,请 {remaining_secs} 秒后重试")]
    CooldownActive { remaining_secs: u64 },
}

/// 同步执行错误
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// 同步被调用方取消
    #[error("同步已取消")]
    Cancelled,

    /// 该用户已有同步在运行
    #[error("用户 {0} 已有同步正在运行")]
    AlreadyRunning(String),
}

/// 实现从reqwest::Error到ApiError的转换
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::NetworkFailed("请求超时".to_string())
        } else if err.is_connect() {
            ApiError::NetworkFailed("无法连接到服务器".to_string())
        } else if err.is_decode() {
            ApiError::JsonParseFailed(err.to_string())
        } else {
            ApiError::NetworkFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonParseFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}
