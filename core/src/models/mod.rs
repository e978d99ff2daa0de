//! 数据模型模块
//!
//! 包含所有核心数据结构:
//! - errors: 错误类型定义 (API、校验、存储、查询、同步)
//! - api_config: 价格API与同步配置
//! - price_query: 查询参数 (宽松输入与类型化查询)
//! - price_record: 价格API响应与价格记录
//! - sync_signal: 定时任务、执行日志与状态标签
//! - tracked_item: 用户监控项

pub mod api_config;
pub mod errors;
pub mod price_query;
pub mod price_record;
pub mod sync_signal;
pub mod tracked_item;

// 重导出常用类型,简化外部引用
pub use api_config::{ConfigError, PriceApiConfig};
pub use errors::{ApiError, QueryError, StorageError, SyncError, ValidationError};
pub use price_query::{
    EstablishmentInput, EstablishmentSelector, FuelInput, FuelQuery, FuelSearchInput, FuelType,
    GeolocationInput, IndividualInput, MunicipalityInput, Paging, ProductInput, ProductQuery,
    ProductSearchInput, ProductSelector, QueryEndpoint,
};
pub use price_record::{PriceQueryPage, PriceRecord, PriceSummary};
pub use sync_signal::{
    CronJob, ExecutionLog, ExecutionStatus, SyncStatusLabel, SystemHealth, SystemHealthSnapshot,
};
pub use tracked_item::{TrackedItem, TrackedItemKind};
