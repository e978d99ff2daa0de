use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 应用目录名
const APP_DIR_NAME: &str = "preco-monitor";

/// 默认日志目录
///
/// 平台数据目录下的 `preco-monitor/logs`,获取失败时回退到 `./logs`:
/// - Linux: `~/.local/share/preco-monitor/logs/`
/// - macOS: `~/Library/Application Support/preco-monitor/logs/`
/// - Windows: `C:\Users\<user>\AppData\Local\preco-monitor\logs\`
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR_NAME).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// 初始化日志系统
///
/// - JSON格式文件层: 按天轮转,便于日志分析
/// - 控制台层: 人类可读格式
/// - 环境变量控制: RUST_LOG=debug 可调整日志级别,默认 info
///
/// 返回的guard必须保存到应用退出,drop后文件写入器关闭。
///
/// # 示例日志
/// ```json
/// {
///   "timestamp": "2025-10-05T10:30:45.123Z",
///   "level": "INFO",
///   "target": "preco_monitor::services::price_api",
///   "fields": {
///     "endpoint": "produto",
///     "records": 42,
///     "message": "Price query executed"
///   }
/// }
/// ```
pub fn init() -> Result<WorkerGuard, io::Error> {
    init_with_dir(&default_log_dir())
}

/// 使用指定目录初始化日志系统
pub fn init_with_dir(log_dir: &Path) -> Result<WorkerGuard, io::Error> {
    std::fs::create_dir_all(log_dir)?;

    // 文件命名格式: preco-monitor.2025-10-05.log
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(APP_DIR_NAME)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    let console_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    Ok(guard)
}

/// 日志宏辅助模块
///
/// 提供结构化业务事件日志的便捷宏
pub mod macros {
    /// 记录业务事件
    ///
    /// 使用示例:
    /// ```no_run
    /// use preco_monitor::log_event;
    /// log_event!(
    ///     "SyncCompleted",
    ///     user_id = "user-1",
    ///     items = 3
    /// );
    /// ```
    #[macro_export]
    macro_rules! log_event {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::info!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }

    /// 记录错误事件
    ///
    /// 使用示例:
    /// ```no_run
    /// use preco_monitor::log_error;
    /// log_error!(
    ///     "SyncAborted",
    ///     user_id = "user-1",
    ///     error = "storage unavailable"
    /// );
    /// ```
    #[macro_export]
    macro_rules! log_error {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::error!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }
}
