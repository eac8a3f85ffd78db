// ==========================================
// 采购全流程跟踪系统 - 日志初始化
// ==========================================
// 输出一律走 stderr,stdout 留给报表 / JSON 刷新结果
// RUST_LOG 控制级别（默认 info）
// PROCUREMENT_TRACKER_LOG_FORMAT=json 切换为 JSON 行（供日志采集）
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "PROCUREMENT_TRACKER_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// 无法识别的取值返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    /// 读取 PROCUREMENT_TRACKER_LOG_FORMAT,未设置或取值无效时为 Text
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// 命令行入口使用: 格式取自环境变量
///
/// ```no_run
/// // RUST_LOG=procurement_tracker::pipeline=debug
/// procurement_tracker::logging::init();
/// ```
pub fn init() {
    init_with(LogFormat::from_env());
}

/// 以指定格式初始化（重复调用时保留首次的订阅者）
pub fn init_with(format: LogFormat) {
    let builder = fmt().with_env_filter(env_filter()).with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.with_target(true).with_line_number(true).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// 测试用: debug 级别,输出交给测试框架捕获
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" JSON "), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse(""), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("yaml"), None);
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_test();
        init_with(LogFormat::Json);
        init_with(LogFormat::Text);
        tracing::info!("日志已初始化");
    }
}
