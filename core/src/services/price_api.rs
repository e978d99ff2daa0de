use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;

use crate::models::{ApiError, PriceApiConfig, PriceQueryPage, QueryEndpoint};

/// 价格API调用边界
///
/// 只接收已校验的请求体。测试中以内存实现替换。
#[async_trait]
pub trait PriceQueryExecutor: Send + Sync {
    async fn execute(&self, endpoint: QueryEndpoint, body: &Value)
        -> Result<PriceQueryPage, ApiError>;
}

/// 价格API客户端 (reqwest实现)
///
/// 职责:
/// - POST `{base_url}/{endpoint}/pesquisa`,携带 AppToken 请求头
/// - 按状态码区分上游拒绝、认证失败、限流和其他错误
/// - 解析分页响应
pub struct PriceApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// 上游错误响应
///
/// 字段名在不同版本间不一致,两个都尝试
#[derive(Debug, Deserialize)]
struct UpstreamErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    mensagem: Option<String>,
}

/// 错误信息中保留的响应正文最大长度
const MAX_ERROR_BODY_CHARS: usize = 300;

impl PriceApiClient {
    /// 创建新的客户端
    ///
    /// # 错误
    /// - `ApiError::NetworkFailed`: AppToken含非法字符或HTTP客户端构建失败
    pub fn new(config: &PriceApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&config.app_token)
            .map_err(|_| ApiError::NetworkFailed("AppToken 含有非法字符".to_string()))?;
        headers.insert("AppToken", token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        tracing::info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "Price API client initialized"
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint_url(&self, endpoint: QueryEndpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl PriceQueryExecutor for PriceApiClient {
    /// 执行查询
    ///
    /// # 错误
    /// - `ApiError::NetworkFailed`: 超时或连接失败
    /// - `ApiError::RejectedByUpstream`: 400/422
    /// - `ApiError::Unauthorized`: 401/403
    /// - `ApiError::RateLimitExceeded`: 429
    /// - `ApiError::HttpStatusError`: 其他非2xx
    /// - `ApiError::JsonParseFailed`: 响应格式不符合预期
    async fn execute(
        &self,
        endpoint: QueryEndpoint,
        body: &Value,
    ) -> Result<PriceQueryPage, ApiError> {
        let url = self.endpoint_url(endpoint);
        let started = Instant::now();

        tracing::debug!(url = %url, "Calling price API");

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            tracing::error!(endpoint = endpoint.as_str(), error = %e, "Price API request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();
            let err = map_error_status(status, &text, retry_after);

            tracing::warn!(
                endpoint = endpoint.as_str(),
                status = status.as_u16(),
                error = %err,
                "Price API returned error status"
            );
            return Err(err);
        }

        let bytes = response.bytes().await?;
        let page: PriceQueryPage = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(
                endpoint = endpoint.as_str(),
                error = %e,
                body = %truncate(&String::from_utf8_lossy(&bytes)),
                "Failed to parse price API response"
            );
            ApiError::JsonParseFailed(e.to_string())
        })?;

        tracing::info!(
            endpoint = endpoint.as_str(),
            records = page.conteudo.len(),
            total = page.total_registros,
            duration_ms = started.elapsed().as_millis() as u64,
            "Price query executed"
        );

        Ok(page)
    }
}

/// 非2xx状态码映射为 `ApiError`
pub fn map_error_status(status: StatusCode, body: &str, retry_after: Option<u64>) -> ApiError {
    let message = upstream_message(body);
    let code = status.as_u16();

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::RejectedByUpstream {
            status: code,
            message,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized { status: code },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimitExceeded { retry_after },
        _ => ApiError::HttpStatusError {
            status: code,
            message,
        },
    }
}

fn upstream_message(body: &str) -> String {
    serde_json::from_str::<UpstreamErrorResponse>(body)
        .ok()
        .and_then(|r| r.message.or(r.mensagem))
        .unwrap_or_else(|| truncate(body.trim()))
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_BODY_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", head)
    }
}
