// ==========================================
// 采购全流程跟踪系统 - 数值解析
// ==========================================
// 规则: 取前导数值前缀解析（"12.5 MT" → 12.5）,无数值前缀返回 None
// 注: 千分位逗号视为终止符（"1,200" → 1）,与数据源既有口径一致
// ==========================================

/// 解析前导数值前缀
///
/// # 返回
/// - Some(f64): 有限数值
/// - None: 无数值前缀（调用方按 0.0 处理）
pub fn parse_float(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if end < len && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            digits += j - frac_start;
            end = j;
        }
    }

    if digits == 0 {
        return None;
    }

    // 指数部分必须带数字才计入
    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}
