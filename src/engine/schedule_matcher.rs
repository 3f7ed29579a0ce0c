// ==========================================
// 代课覆盖表系统 - 总课表匹配
// ==========================================
// 职责: 教师姓名 → 总课表行
// - 精确匹配: 姓名已标准化（人工录入路径）
// - 模糊匹配: 缺勤报表姓名存在格式漂移（报表路径）
// 红线: 未匹配不是错误，返回 None 由调用方降级处理
// ==========================================

use crate::domain::ScheduleRow;
use tracing::debug;

/// 模糊匹配命中结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleMatch<'a> {
    pub row: &'a ScheduleRow,
    /// 相似度 0–100
    pub score: u32,
}

// ==========================================
// ScheduleMatcher
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleMatcher {
    /// 接受阈值: 分数必须严格大于该值
    threshold: u32,
}

impl Default for ScheduleMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleMatcher {
    pub const DEFAULT_THRESHOLD: u32 = 85;

    pub fn new() -> Self {
        Self::with_threshold(Self::DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold: threshold.min(100),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// 忽略大小写的相似度（0–100，四舍五入）
    ///
    /// 插入/删除比率: 100 × 2·M / (len_a + len_b)，M 为最长公共子序列长度。
    /// 尾部多出的字符只按长度扣分，不像替换那样双倍惩罚。
    pub fn similarity(a: &str, b: &str) -> u32 {
        let a: Vec<char> = a.to_lowercase().chars().collect();
        let b: Vec<char> = b.to_lowercase().chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 100;
        }
        let matched = lcs_len(&a, &b);
        ((2 * matched) as f64 * 100.0 / total as f64).round() as u32
    }

    /// 精确匹配（区分大小写，比较第 0 列）
    ///
    /// # 参数
    /// - rows: 总课表数据行（不含表头）
    pub fn find_exact<'a>(&self, name: &str, rows: &'a [ScheduleRow]) -> Option<&'a ScheduleRow> {
        rows.iter().find(|row| row.teacher == name)
    }

    /// 模糊匹配，只返回行
    pub fn find_fuzzy<'a>(&self, name: &str, rows: &'a [ScheduleRow]) -> Option<&'a ScheduleRow> {
        self.best_match(name, rows).map(|m| m.row)
    }

    /// 模糊匹配，返回行与分数
    ///
    /// 规则:
    /// 1) 跳过教师列为空的行
    /// 2) 只接受分数 > 阈值的行
    /// 3) 取分数严格最高者; 同分保留输入顺序中的第一个
    pub fn best_match<'a>(&self, name: &str, rows: &'a [ScheduleRow]) -> Option<ScheduleMatch<'a>> {
        let mut best: Option<ScheduleMatch<'a>> = None;

        for row in rows.iter().filter(|r| !r.teacher.is_empty()) {
            let score = Self::similarity(name, &row.teacher);
            if score <= self.threshold {
                continue;
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(ScheduleMatch { row, score });
            }
        }

        match &best {
            Some(m) => debug!(name = %name, matched = %m.row.teacher, score = m.score, "模糊匹配命中"),
            None => debug!(name = %name, threshold = self.threshold, "模糊匹配未命中"),
        }
        best
    }
}

/// 最长公共子序列长度（滚动单行 DP）
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb { diag + 1 } else { up.max(row[j]) };
            diag = up;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(teacher: &str) -> ScheduleRow {
        ScheduleRow {
            teacher: teacher.to_string(),
            periods: std::array::from_fn(|i| format!("{}-P{}", teacher, i)),
        }
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(ScheduleMatcher::similarity("Smith, John", "Smith, John"), 100);
        assert_eq!(ScheduleMatcher::similarity("SMITH, JOHN", "smith, john"), 100);
        assert_eq!(ScheduleMatcher::similarity("abc", "xyz"), 0);
    }

    #[test]
    fn test_find_fuzzy_exact_string_scores_100() {
        let rows = vec![row("Doe, Jane"), row("Smith, John")];
        let matcher = ScheduleMatcher::new();
        let m = matcher.best_match("Smith, John", &rows).unwrap();
        assert_eq!(m.score, 100);
        assert_eq!(m.row.teacher, "Smith, John");
    }

    #[test]
    fn test_find_fuzzy_tolerates_case_and_small_drift() {
        let rows = vec![row("Doe, Jane"), row("Johnson, Robert")];
        let matcher = ScheduleMatcher::new();
        let found = matcher.find_fuzzy("johnson,  robert", &rows).unwrap();
        assert_eq!(found.teacher, "Johnson, Robert");
    }

    #[test]
    fn test_find_fuzzy_rejects_below_threshold() {
        let rows = vec![row("Smith, John")];
        let matcher = ScheduleMatcher::new();
        assert!(matcher.find_fuzzy("Smyth, Joan", &rows).is_none());
        assert!(matcher.find_fuzzy("Smith, John", &[]).is_none());
    }

    #[test]
    fn test_find_fuzzy_never_returns_score_at_or_below_threshold() {
        let rows = vec![row("Smith, John"), row("Smith, Joan"), row("Smithe, John")];
        for threshold in [0, 50, 85, 90, 99] {
            let matcher = ScheduleMatcher::with_threshold(threshold);
            for name in ["Smith, John", "Smith, Jon", "Smyth, J", "x"] {
                if let Some(m) = matcher.best_match(name, &rows) {
                    assert!(m.score > threshold);
                }
            }
        }
    }

    #[test]
    fn test_find_fuzzy_tie_keeps_first_row() {
        let rows = vec![row("Smith, John"), row("Smith, John")];
        let matcher = ScheduleMatcher::new();
        let found = matcher.find_fuzzy("Smith, John", &rows).unwrap();
        assert!(std::ptr::eq(found, &rows[0]));
    }

    #[test]
    fn test_find_fuzzy_skips_empty_teacher_cells() {
        let rows = vec![row(""), row("Lee, Ann")];
        let matcher = ScheduleMatcher::with_threshold(0);
        assert!(matcher.find_fuzzy("", &rows).is_none());
    }

    #[test]
    fn test_similarity_trailing_suffix_uses_indel_ratio() {
        // 2·11 / (11 + 13) = 0.9167
        assert_eq!(ScheduleMatcher::similarity("Smith, John", "Smith, Johnny"), 92);
        // 2·9 / (9 + 11) = 0.9
        assert_eq!(ScheduleMatcher::similarity("Brown, Al", "Brown, Alan"), 90);
        assert_eq!(lcs_len(&['a', 'b', 'c', 'd'], &['a', 'c', 'x', 'd']), 3);
    }

    #[test]
    fn test_find_fuzzy_accepts_name_with_extra_suffix() {
        let rows = vec![row("Brown, Alan"), row("Smith, Johnny")];
        let matcher = ScheduleMatcher::new();
        let m = matcher.best_match("Smith, John", &rows).unwrap();
        assert_eq!(m.row.teacher, "Smith, Johnny");
        assert_eq!(m.score, 92);
    }

    #[test]
    fn test_score_equal_to_threshold_is_rejected() {
        // 2·17 / (17 + 23) = 0.85
        let name = "abcdefghijklmnopq";
        let rows = vec![row("abcdefghijklmnopq123456")];
        assert_eq!(ScheduleMatcher::similarity(name, &rows[0].teacher), 85);

        assert!(ScheduleMatcher::new().best_match(name, &rows).is_none());
        assert!(ScheduleMatcher::with_threshold(84).best_match(name, &rows).is_some());
    }

    #[test]
    fn test_find_exact_is_case_sensitive() {
        let rows = vec![row("Smith, John")];
        let matcher = ScheduleMatcher::new();
        assert!(matcher.find_exact("Smith, John", &rows).is_some());
        assert!(matcher.find_exact("smith, john", &rows).is_none());
    }
}
