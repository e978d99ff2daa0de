//! 服务层模块
//!
//! - `validation_service`: 查询参数校验,返回全部违规信息
//! - `query_builder`: 规范化 + 校验 + 转换为类型化查询
//! - `price_api`: 价格API调用边界与reqwest客户端
//! - `cooldown`: 按用户的查询冷却
//! - `query_service`: 单次查询流程 (准备 → 冷却 → 执行)
//! - `sync_health`: 用户同步状态与系统健康评估
//! - `sync_service`: 监控项同步执行
//!
//! # 服务架构
//!
//! ```text
//!   宽松输入 (表单 / 已保存条件)
//!          │
//!          ▼
//! ┌──────────────────┐      ┌──────────────────┐
//! │  query_builder   │─────▶│ validation_svc   │
//! └────────┬─────────┘      └──────────────────┘
//!          │ ProductQuery / FuelQuery
//!          ▼
//! ┌──────────────────┐      ┌──────────────────┐
//! │ PriceQueryService│      │   SyncService    │
//! │   + cooldown     │      │  + SyncStore     │
//! └────────┬─────────┘      └───┬──────────┬───┘
//!          │                    │          │
//!          ▼                    ▼          ▼
//!     PriceQueryExecutor ◀──────┘     sync_health
//!          │
//!          ▼
//!      价格API
//! ```
//!
//! # 使用示例
//!
//! ```no_run
//! use preco_monitor::models::{PriceApiConfig, ProductSearchInput};
//! use preco_monitor::services::PriceQueryService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PriceApiConfig::from_env()?;
//! let service = PriceQueryService::from_config(&config)?;
//!
//! let input = ProductSearchInput::from_json(
//!     r#"{"produto":{"gtin":"7891000325858"},
//!         "estabelecimento":{"individual":{"cnpj":"59008895000234"}},
//!         "dias":1}"#,
//! )?;
//! let outcome = service.search_products("user-1", &input).await?;
//! println!("{} registros", outcome.records.len());
//! # Ok(())
//! # }
//! ```

pub mod cooldown;
pub mod price_api;
pub mod query_builder;
pub mod query_service;
pub mod sync_health;
pub mod sync_service;
pub mod validation_service;

// 重导出常用类型,简化外部引用
pub use cooldown::QueryCooldown;
pub use price_api::{PriceApiClient, PriceQueryExecutor};
pub use query_builder::{prepare_fuel_query, prepare_product_query, prepare_tracked_item, PreparedQuery};
pub use query_service::{PriceQueryService, QueryOutcome};
pub use sync_health::{evaluate_sync_status, evaluate_system_health};
pub use sync_service::{
    ItemFailure, PriceChange, SyncOutcome, SyncService, SyncStore, SystemHealthReport,
};
pub use validation_service::{validate_fuel_query, validate_product_query, ValidationReport};
