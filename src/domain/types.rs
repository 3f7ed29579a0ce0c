// ==========================================
// 代课覆盖表系统 - 领域类型定义
// ==========================================
// 职责: 课节标签 / 缺勤时长策略 / 保护标签 / 填充颜色
// 红线: 时长策略为封闭集合，不接受未知字符串静默通过
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ==========================================
// 固定列布局
// ==========================================

/// 每天的课节数（HR + 1..9）
pub const PERIOD_COUNT: usize = 10;

/// 覆盖行列数: 教师 + 10 课节 + 代课人 + 时长
pub const COVERAGE_WIDTH: usize = 13;

/// 课表行最小宽度: 教师 + 10 课节
pub const SCHEDULE_MIN_WIDTH: usize = 1 + PERIOD_COUNT;

/// 缺勤报表行最小宽度（代课信息位于第 8 列）
pub const REPORT_MIN_WIDTH: usize = 9;

/// 覆盖行中课节区间 [1, 11)
pub const FIRST_PERIOD_COL: usize = 1;
pub const SUB_COL: usize = 11;
pub const DURATION_COL: usize = 12;

/// 覆盖表表头
pub const COVERAGE_HEADER: [&str; COVERAGE_WIDTH] = [
    "Teacher/TA", "HR", "1", "2", "3", "4", "5", "6", "7", "8", "9", "Subs", "Duration",
];

/// 非活动课节占位符（Not Scheduled Now）
pub const NSN: &str = "NSN";

/// 代课标记
pub const SUB_MARKER: &str = "sub";

/// 非教学标签: 不可泛化为 "sub"，且必须高亮
pub const PROTECTED_LABELS: [&str; 5] = ["Prep", "Plan/Duty", "Duty/Plan", "Lunch", NSN];

/// 是否为保护标签（区分大小写，字面量比较）
pub fn is_protected_label(value: &str) -> bool {
    PROTECTED_LABELS.contains(&value)
}

// ==========================================
// 课节标签 (Period Label)
// ==========================================
// 顺序即列序: HR, 1, 2, ..., 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeriodLabel {
    Hr,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    P9,
}

impl PeriodLabel {
    pub const ALL: [PeriodLabel; PERIOD_COUNT] = [
        PeriodLabel::Hr,
        PeriodLabel::P1,
        PeriodLabel::P2,
        PeriodLabel::P3,
        PeriodLabel::P4,
        PeriodLabel::P5,
        PeriodLabel::P6,
        PeriodLabel::P7,
        PeriodLabel::P8,
        PeriodLabel::P9,
    ];

    /// 在 10 课节窗口中的下标（0..10）
    pub fn slot(self) -> usize {
        self as usize
    }

    /// 上午课节: HR..5
    pub fn is_morning(self) -> bool {
        self <= PeriodLabel::P5
    }

    pub fn as_str(self) -> &'static str {
        COVERAGE_HEADER[FIRST_PERIOD_COL + self.slot()]
    }

    /// 宽松解析: 未知标签返回 None（由调用方决定忽略还是报错）
    pub fn parse(label: &str) -> Option<PeriodLabel> {
        let trimmed = label.trim();
        PeriodLabel::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 缺勤时长策略 (Duration Policy)
// ==========================================
// 依据: 行投影状态机，每个变体一条分支，穷尽匹配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "periods", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationPolicy {
    FullDay,
    HalfDayAm,
    HalfDayPm,
    Periods(BTreeSet<PeriodLabel>),
}

impl DurationPolicy {
    /// 写入覆盖行 Duration 列的文本
    pub fn label(&self) -> &'static str {
        match self {
            DurationPolicy::FullDay => "Full Day",
            DurationPolicy::HalfDayAm => "Half Day AM",
            DurationPolicy::HalfDayPm => "Half Day PM",
            DurationPolicy::Periods(_) => "Period",
        }
    }

    /// 由表单标签与勾选课节构造策略
    ///
    /// # 参数
    /// - label: "Full Day" / "Half Day AM" / "Half Day PM" / "Period"
    /// - periods: 仅当 label 为 "Period" 时使用，不在 HR..9 内的标签被忽略
    pub fn from_form<S: AsRef<str>>(
        label: &str,
        periods: &[S],
    ) -> Result<DurationPolicy, UnknownDurationError> {
        let mut policy: DurationPolicy = label.parse()?;
        if let DurationPolicy::Periods(set) = &mut policy {
            set.extend(periods.iter().filter_map(|p| PeriodLabel::parse(p.as_ref())));
        }
        Ok(policy)
    }
}

impl fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 未知时长标签
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知的缺勤时长: {0}")]
pub struct UnknownDurationError(pub String);

impl FromStr for DurationPolicy {
    type Err = UnknownDurationError;

    /// 解析时长标签（忽略大小写与首尾空白），"Period" 解析为空课节集合
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "full day" => Ok(DurationPolicy::FullDay),
            "half day am" => Ok(DurationPolicy::HalfDayAm),
            "half day pm" => Ok(DurationPolicy::HalfDayPm),
            "period" | "periods" => Ok(DurationPolicy::Periods(BTreeSet::new())),
            _ => Err(UnknownDurationError(s.to_string())),
        }
    }
}

// ==========================================
// 单元格填充颜色
// ==========================================
// RGB 取值范围 0–1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl FillColor {
    pub const DARK_GRAY: FillColor = FillColor {
        red: 0.41,
        green: 0.41,
        blue: 0.41,
    };
}

impl Default for FillColor {
    fn default() -> Self {
        FillColor::DARK_GRAY
    }
}

impl FromStr for FillColor {
    type Err = String;

    /// 解析 "r,g,b" 形式
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{}: {}", p.trim(), e)))
            .collect::<Result<_, _>>()?;

        match parts.as_slice() {
            [red, green, blue] if parts.iter().all(|v| (0.0..=1.0).contains(v)) => Ok(FillColor {
                red: *red,
                green: *green,
                blue: *blue,
            }),
            _ => Err(format!("填充颜色格式错误: {}（期望 r,g,b 且取值 0–1）", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_label_order_and_slots() {
        assert_eq!(PeriodLabel::Hr.slot(), 0);
        assert_eq!(PeriodLabel::P9.slot(), 9);
        assert_eq!(PeriodLabel::P5.as_str(), "5");
        assert!(PeriodLabel::P5.is_morning());
        assert!(!PeriodLabel::P6.is_morning());
    }

    #[test]
    fn test_period_label_parse() {
        assert_eq!(PeriodLabel::parse("hr"), Some(PeriodLabel::Hr));
        assert_eq!(PeriodLabel::parse(" 7 "), Some(PeriodLabel::P7));
        assert_eq!(PeriodLabel::parse("10"), None);
        assert_eq!(PeriodLabel::parse("Lunch"), None);
    }

    #[test]
    fn test_duration_policy_parse() {
        assert_eq!("Full Day".parse::<DurationPolicy>(), Ok(DurationPolicy::FullDay));
        assert_eq!(" half day am ".parse::<DurationPolicy>(), Ok(DurationPolicy::HalfDayAm));
        assert_eq!("Half Day PM".parse::<DurationPolicy>(), Ok(DurationPolicy::HalfDayPm));
        assert!("Two Days".parse::<DurationPolicy>().is_err());
    }

    #[test]
    fn test_duration_policy_from_form_ignores_unknown_periods() {
        let policy = DurationPolicy::from_form("Period", &["HR", "3", "11", "Lunch"]).unwrap();
        let expected: BTreeSet<_> = [PeriodLabel::Hr, PeriodLabel::P3].into_iter().collect();
        assert_eq!(policy, DurationPolicy::Periods(expected));
        assert_eq!(policy.label(), "Period");

        // 非 Period 策略忽略勾选课节
        let policy = DurationPolicy::from_form("Full Day", &["3"]).unwrap();
        assert_eq!(policy, DurationPolicy::FullDay);
    }

    #[test]
    fn test_protected_labels() {
        assert!(is_protected_label("Lunch"));
        assert!(is_protected_label("NSN"));
        assert!(!is_protected_label("lunch"));
        assert!(!is_protected_label("sub"));
    }

    #[test]
    fn test_fill_color_parse() {
        let color: FillColor = "0.5, 0.25,1".parse().unwrap();
        assert_eq!(color.red, 0.5);
        assert_eq!(color.blue, 1.0);
        assert!("0.5,0.5".parse::<FillColor>().is_err());
        assert!("2,0,0".parse::<FillColor>().is_err());
    }
}
