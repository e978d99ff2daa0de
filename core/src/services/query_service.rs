//! 价格查询服务
//!
//! 宽松输入 → 准备查询 → 冷却检查 → 执行 → 价格记录

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{
    ApiError, FuelSearchInput, PriceApiConfig, PriceRecord, PriceSummary, ProductSearchInput,
    QueryError,
};
use crate::services::cooldown::{remaining_secs, QueryCooldown};
use crate::services::price_api::{PriceApiClient, PriceQueryExecutor};
use crate::services::query_builder::{prepare_fuel_query, prepare_product_query, PreparedQuery};

/// 一次查询的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub records: Vec<PriceRecord>,
    /// 因销售时间无法解析而跳过的条目数
    pub skipped: usize,
    /// 上游报告的总记录数 (所有分页)
    pub total_records: u64,
    pub page: u32,
    pub total_pages: u32,
    pub summary: Option<PriceSummary>,
}

pub struct PriceQueryService {
    executor: Arc<dyn PriceQueryExecutor>,
    cooldown: QueryCooldown,
}

impl PriceQueryService {
    pub fn new(executor: Arc<dyn PriceQueryExecutor>, cooldown: Duration) -> Self {
        Self {
            executor,
            cooldown: QueryCooldown::new(cooldown),
        }
    }

    /// 使用真实价格API客户端
    pub fn from_config(config: &PriceApiConfig) -> Result<Self, ApiError> {
        let client = PriceApiClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.cooldown()))
    }

    /// 查询商品价格
    ///
    /// # 错误
    /// - `QueryError::Validation`: 本地校验未通过 (不占用冷却)
    /// - `QueryError::CooldownActive`: 冷却中
    /// - `QueryError::Api`: 网络或上游错误
    pub async fn search_products(
        &self,
        user_id: &str,
        input: &ProductSearchInput,
    ) -> Result<QueryOutcome, QueryError> {
        let query = prepare_product_query(input).map_err(|e| {
            tracing::info!(
                user_id = %user_id,
                violations = e.violations().len(),
                "商品查询参数未通过校验"
            );
            e
        })?;
        self.execute_prepared(user_id, &PreparedQuery::Produto(query))
            .await
    }

    /// 查询燃料价格
    pub async fn search_fuels(
        &self,
        user_id: &str,
        input: &FuelSearchInput,
    ) -> Result<QueryOutcome, QueryError> {
        let query = prepare_fuel_query(input).map_err(|e| {
            tracing::info!(
                user_id = %user_id,
                violations = e.violations().len(),
                "燃料查询参数未通过校验"
            );
            e
        })?;
        self.execute_prepared(user_id, &PreparedQuery::Combustivel(query))
            .await
    }

    /// 执行已准备好的查询 (经过冷却检查)
    pub async fn execute_prepared(
        &self,
        user_id: &str,
        query: &PreparedQuery,
    ) -> Result<QueryOutcome, QueryError> {
        if let Err(remaining) = self.cooldown.try_acquire(user_id).await {
            let remaining_secs = remaining_secs(remaining);
            tracing::warn!(
                user_id = %user_id,
                endpoint = query.endpoint().as_str(),
                remaining_secs,
                "查询被冷却拒绝"
            );
            return Err(QueryError::CooldownActive { remaining_secs });
        }

        let endpoint = query.endpoint();
        let page = self
            .executor
            .execute(endpoint, &query.to_request_body())
            .await?;

        let total_records = page.total_registros;
        let current_page = page.pagina;
        let total_pages = page.total_paginas;
        let (records, skipped) = page.into_records(Utc::now());
        let summary = PriceSummary::from_records(&records);

        tracing::info!(
            user_id = %user_id,
            endpoint = endpoint.as_str(),
            records = records.len(),
            skipped,
            "查询完成"
        );

        Ok(QueryOutcome {
            records,
            skipped,
            total_records,
            page: current_page,
            total_pages,
            summary,
        })
    }
}
