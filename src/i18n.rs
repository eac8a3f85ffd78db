// ==========================================
// 采购全流程跟踪系统 - 报表文案国际化
// ==========================================
// 文案来自 locales/*.yml（rust_i18n::i18n! 宏在 lib.rs 中初始化）
// 支持 zh-CN（默认）与 en; 引擎本身只产出纯数据,文案只用于命令行报表
// ==========================================

use crate::domain::types::MismatchCategory;

pub const DEFAULT_LOCALE: &str = "zh-CN";
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 把用户输入的语言代码归一为受支持的 locale
///
/// "zh" / "zh_cn" / "ZH-CN" → "zh-CN"; "en" / "en-US" / "en_GB" → "en"
pub fn resolve_locale(input: &str) -> Option<&'static str> {
    let normalized = input.trim().replace('_', "-").to_ascii_lowercase();
    let language = normalized.split('-').next().unwrap_or_default();
    match language {
        "zh" => Some("zh-CN"),
        "en" => Some("en"),
        _ => None,
    }
}

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换报表语言
///
/// # 返回
/// - false: 不支持的语言,当前语言保持不变
pub fn set_locale(locale: &str) -> bool {
    match resolve_locale(locale) {
        Some(resolved) => {
            rust_i18n::set_locale(resolved);
            true
        }
        None => false,
    }
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 带占位符的文案,占位符写作 `%{name}`
///
/// ```no_run
/// use procurement_tracker::i18n::t_with_args;
/// let line = t_with_args("report.records", &[("count", "12")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(key);
    for (k, v) in args {
        result = result.replace(&format!("%{{{}}}", k), v);
    }
    result
}

/// 对账差异类别的显示名称
pub fn mismatch_label(category: MismatchCategory) -> String {
    t(category.i18n_key())
}
