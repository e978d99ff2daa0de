//! 监控项模型
//!
//! 用户保存的商品/燃料查询,同步时逐个重新查询价格API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::price_query::QueryEndpoint;
use crate::models::price_record::PriceSummary;

/// 监控项
///
/// - criteria: 保存时的原始查询条件,与价格API报文同形,未经校验
/// - last_min_price: 最近一次同步得到的最低价,用于价格变化提示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedItem {
    /// 监控项ID (UUID v4)
    pub id: String,

    pub user_id: String,

    pub kind: TrackedItemKind,

    /// 用户起的名字
    pub name: String,

    /// 保存的查询条件
    pub criteria: Value,

    /// 是否参与定时同步
    pub active: bool,

    pub created_at: DateTime<Utc>,

    /// 最后更新时间 (同步或状态变化时刷新)
    pub updated_at: DateTime<Utc>,

    /// 最近一次成功同步时间
    pub last_synced_at: Option<DateTime<Utc>>,

    pub last_min_price: Option<f64>,

    /// 最近一次同步失败原因,成功后清空
    pub failure_reason: Option<String>,
}

/// 监控项类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedItemKind {
    Produto,
    Combustivel,
}

impl TrackedItemKind {
    pub fn endpoint(&self) -> QueryEndpoint {
        match self {
            Self::Produto => QueryEndpoint::Produto,
            Self::Combustivel => QueryEndpoint::Combustivel,
        }
    }
}

impl TrackedItem {
    /// 创建新监控项 (默认启用)
    pub fn new(user_id: String, kind: TrackedItemKind, name: String, criteria: Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            kind,
            name,
            criteria,
            active: true,
            created_at: now,
            updated_at: now,
            last_synced_at: None,
            last_min_price: None,
            failure_reason: None,
        }
    }

    /// 记录一次成功同步
    ///
    /// 没有价格记录时保留上一次的最低价
    pub fn record_sync(&mut self, summary: Option<&PriceSummary>, synced_at: DateTime<Utc>) {
        if let Some(summary) = summary {
            self.last_min_price = Some(summary.min_price);
        }
        self.last_synced_at = Some(synced_at);
        self.failure_reason = None;
        self.updated_at = synced_at;
    }

    /// 记录一次同步失败
    pub fn mark_failed(&mut self, reason: String) {
        self.failure_reason = Some(reason);
        self.updated_at = Utc::now();
    }

    /// 本次最低价相对上次的变化
    ///
    /// 负数表示降价;没有历史价格时返回 None
    pub fn price_change(&self, summary: &PriceSummary) -> Option<f64> {
        self.last_min_price.map(|last| summary.min_price - last)
    }
}
