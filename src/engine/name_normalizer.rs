// ==========================================
// 代课覆盖表系统 - 姓名标准化
// ==========================================
// 职责: 教师姓名 → "Last, First"; 代课人姓名去电话号码
// 约束: 两个函数均幂等
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;

/// "姓, 名" 前缀: 第一个逗号前的文本 + 逗号 + 空白 + 第一个非空白词
static TEACHER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^,]+,\s+\S+").expect("teacher prefix pattern"));

/// 美国电话号码 (ddd) ddd-dddd
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d{3}\) \d{3}-\d{4}").expect("phone pattern"));

// ==========================================
// NameNormalizer - 无状态
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct NameNormalizer;

impl NameNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 标准化教师姓名
    ///
    /// 规则:
    /// 1) 截掉第一个换行及其后内容（报表单元格常带房间号等附加行）
    /// 2) 去首尾空白
    /// 3) 取 "姓, 名" 前缀; 不匹配时原样返回第 2 步结果
    ///
    /// # 示例
    /// - "Smith, John\nRoom 204" → "Smith, John"
    /// - "Smith, John (Rm 5)"    → "Smith, John"
    pub fn normalize_teacher(&self, raw: &str) -> String {
        let first_line = raw.split(['\n', '\r']).next().unwrap_or_default().trim();

        match TEACHER_PREFIX_RE.find(first_line) {
            Some(m) => m.as_str().to_string(),
            None => first_line.to_string(),
        }
    }

    /// 标准化代课人姓名: 去除电话号码后去首尾空白
    ///
    /// 说明: 反复替换直到不再匹配，避免拼接出新的号码
    pub fn normalize_sub(&self, raw: &str) -> String {
        let mut current = raw.to_string();
        while PHONE_RE.is_match(&current) {
            current = PHONE_RE.replace_all(&current, "").into_owned();
        }
        current.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_teacher_strips_extra_lines() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize_teacher("Smith, John\nRoom 204"), "Smith, John");
        assert_eq!(n.normalize_teacher("Smith, John\r\nRoom 204"), "Smith, John");
    }

    #[test]
    fn test_normalize_teacher_keeps_last_first_prefix() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize_teacher("Smith, John (Rm 5)"), "Smith, John");
        assert_eq!(n.normalize_teacher("  Van Dyke,   Mary Ann "), "Van Dyke,   Mary");
    }

    #[test]
    fn test_normalize_teacher_without_comma_unchanged() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize_teacher("Coach Taylor"), "Coach Taylor");
        assert_eq!(n.normalize_teacher("Smith,John"), "Smith,John");
        assert_eq!(n.normalize_teacher(""), "");
    }

    #[test]
    fn test_normalize_teacher_idempotent() {
        let n = NameNormalizer::new();
        for raw in [
            "Smith, John\nRoom 204",
            "Smith, John (Rm 5)",
            "  Lee,\tAnn  ",
            "Coach Taylor",
            "O'Neil, Pat, Jr.",
            "\nSmith, John",
        ] {
            let once = n.normalize_teacher(raw);
            assert_eq!(n.normalize_teacher(&once), once, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_sub_removes_phone() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize_sub("Jane Doe (555) 123-4567"), "Jane Doe");
        assert_eq!(n.normalize_sub("(555) 123-4567 Jane Sub"), "Jane Sub");
        assert_eq!(n.normalize_sub("Jane Doe"), "Jane Doe");
        assert_eq!(n.normalize_sub("Jane Doe 555-123-4567"), "Jane Doe 555-123-4567");
    }

    #[test]
    fn test_normalize_sub_idempotent() {
        let n = NameNormalizer::new();
        for raw in [
            "Jane Doe (555) 123-4567",
            "(55(555) 123-45675) 123-4567",
            "  ",
        ] {
            let once = n.normalize_sub(raw);
            assert_eq!(n.normalize_sub(&once), once, "input: {:?}", raw);
        }
        assert_eq!(n.normalize_sub("(55(555) 123-45675) 123-4567"), "");
    }
}
