// ==========================================
// 采购全流程跟踪系统 - 键匹配器
// ==========================================
// 职责: 把自由录入的松散键匹配到参考表中的规范键
// 规则（按顺序尝试,首个成功即返回）:
// 1. trim + 忽略大小写 后完全相等
// 2. 去掉字母前缀与分隔符后相等（RL-007 ≡ rl_007）
// 3. 最长连续数字串相等（RL-007 ≡ 007,但 ≠ RL-070）
// 同一规则命中多个时返回参考表中的第一个
// ==========================================

use serde::{Deserialize, Serialize};

/// 规则 2 视为分隔符的字符
const SEPARATORS: &[char] = &['-', '_', '/', '.', '#', ':', ' '];

// ==========================================
// MatchRule - 命中的规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchRule {
    Exact,
    PrefixInsensitive,
    NumericSuffix,
}

/// 匹配结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch {
    pub index: usize, // 在参考表中的下标
    pub rule: MatchRule,
}

// ==========================================
// KeyMatcher
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct KeyMatcher {
    known_prefixes: Vec<String>, // 额外的字面前缀（已小写）
}

impl KeyMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定额外的已知前缀（如 "indent"、"po"），在字母前缀之前剥离
    pub fn with_known_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known_prefixes: Vec<String> = prefixes
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        // 长前缀优先
        known_prefixes.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { known_prefixes }
    }

    // ==========================================
    // 规范化
    // ==========================================

    /// 规则 1: trim + 小写
    pub fn normalize(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// 规则 2: 剥离已知前缀、字母前缀与分隔符
    pub fn strip_prefix(&self, key: &str) -> String {
        let normalized = Self::normalize(key);
        let mut rest = normalized.as_str();

        if let Some(prefix) = self
            .known_prefixes
            .iter()
            .find(|p| rest.starts_with(p.as_str()))
        {
            rest = &rest[prefix.len()..];
        }

        rest = rest.trim_start_matches(|c: char| c.is_alphabetic() || SEPARATORS.contains(&c));
        rest.chars().filter(|c| !SEPARATORS.contains(c)).collect()
    }

    /// 规则 3: 最长连续数字串（等长取第一个）
    pub fn longest_digit_run(key: &str) -> Option<&str> {
        let mut best: Option<&str> = None;
        let mut start: Option<usize> = None;

        let mut consider = |from: usize, to: usize| {
            let run = &key[from..to];
            if best.map_or(true, |b| run.len() > b.len()) {
                best = Some(run);
            }
        };

        for (idx, ch) in key.char_indices() {
            match (ch.is_ascii_digit(), start) {
                (true, None) => start = Some(idx),
                (false, Some(from)) => {
                    consider(from, idx);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(from) = start {
            consider(from, key.len());
        }

        best
    }

    // ==========================================
    // 匹配
    // ==========================================

    /// 为参考键集合建立索引（一次对账内复用）
    pub fn index<S: AsRef<str>>(&self, canonical_keys: &[S]) -> KeyIndex {
        let entries = canonical_keys
            .iter()
            .map(|k| {
                let key = k.as_ref();
                IndexedKey {
                    normalized: Self::normalize(key),
                    stripped: self.strip_prefix(key),
                    digits: Self::longest_digit_run(key).map(str::to_string),
                }
            })
            .collect();

        KeyIndex {
            matcher: self.clone(),
            entries,
        }
    }

    /// 三规则匹配（一次性调用）
    pub fn find<S: AsRef<str>>(&self, key: &str, canonical_keys: &[S]) -> Option<KeyMatch> {
        self.index(canonical_keys).find(key)
    }

    /// 仅规则 1 匹配（物料名称等不适用前缀/数字规则的键）
    pub fn find_exact<S: AsRef<str>>(key: &str, canonical_keys: &[S]) -> Option<usize> {
        let target = Self::normalize(key);
        if target.is_empty() {
            return None;
        }
        canonical_keys
            .iter()
            .position(|k| Self::normalize(k.as_ref()) == target)
    }
}

// ==========================================
// KeyIndex - 预计算的参考键
// ==========================================
#[derive(Debug, Clone)]
struct IndexedKey {
    normalized: String,
    stripped: String,
    digits: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KeyIndex {
    matcher: KeyMatcher,
    entries: Vec<IndexedKey>,
}

impl KeyIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<KeyMatch> {
        let normalized = KeyMatcher::normalize(key);
        if normalized.is_empty() {
            return None;
        }

        // 规则 1
        if let Some(index) = self.entries.iter().position(|e| e.normalized == normalized) {
            return Some(KeyMatch {
                index,
                rule: MatchRule::Exact,
            });
        }

        // 规则 2（剥离后为空不参与比较）
        let stripped = self.matcher.strip_prefix(key);
        if !stripped.is_empty() {
            if let Some(index) = self.entries.iter().position(|e| e.stripped == stripped) {
                return Some(KeyMatch {
                    index,
                    rule: MatchRule::PrefixInsensitive,
                });
            }
        }

        // 规则 3
        let digits = KeyMatcher::longest_digit_run(key)?;
        self.entries
            .iter()
            .position(|e| e.digits.as_deref() == Some(digits))
            .map(|index| KeyMatch {
                index,
                rule: MatchRule::NumericSuffix,
            })
    }
}
