//! 参数校验
//!
//! 每个参数类型携带自己的规则集,校验返回全部违规项(有序),
//! 而不是在第一条失败时停止

use std::fmt;

/// 单条字段级违规
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 参数自描述规则集
pub trait Validate {
    /// 返回全部违规项,空列表表示通过
    fn validate(&self) -> Vec<Violation> {
        Vec::new()
    }
}

/// 把违规列表拼成单条错误信息
pub fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 常用规则
pub mod rules {
    use super::Violation;

    /// 字段非空
    pub fn non_empty(out: &mut Vec<Violation>, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            out.push(Violation::new(field, "must not be empty"));
        }
    }

    /// 数值下限
    pub fn at_least(out: &mut Vec<Violation>, field: &'static str, value: u32, min: u32) {
        if value < min {
            out.push(Violation::new(field, format!("must be greater than or equal to {}", min)));
        }
    }

    /// 最小长度
    pub fn min_length(out: &mut Vec<Violation>, field: &'static str, value: &str, min: usize) {
        if value.chars().count() < min {
            out.push(Violation::new(field, format!("must be at least {} characters", min)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_rule() {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "UserName", "  ");
        rules::non_empty(&mut out, "Password", "secret");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "UserName");
    }

    #[test]
    fn test_at_least_rule() {
        let mut out = Vec::new();
        rules::at_least(&mut out, "PageNumber", 0, 1);
        rules::at_least(&mut out, "PageSize", 10, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "PageNumber");
    }

    #[test]
    fn test_violations_keep_declaration_order() {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "A", "");
        rules::non_empty(&mut out, "B", "");
        assert_eq!(join_violations(&out), "A: must not be empty; B: must not be empty");
    }

    #[test]
    fn test_min_length_counts_chars() {
        let mut out = Vec::new();
        rules::min_length(&mut out, "Password", "密码", 6);
        assert_eq!(out.len(), 1);
    }
}
