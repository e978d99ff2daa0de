//! 价格监控核心库
//!
//! 面向 SEFAZ/AL 价格公开API的查询校验、请求构建与同步状态评估:
//! - models: 查询参数、价格记录、同步信号、错误与配置
//! - services: 参数校验、API客户端、冷却闸门、同步执行、健康评估
//! - utils: 规范化、代码目录、宽松反序列化、时间工具、日志

pub mod models;
pub mod services;
pub mod utils;
