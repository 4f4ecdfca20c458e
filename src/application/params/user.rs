//! 用户相关参数模型

use serde::Deserialize;

use crate::application::dispatch::{ModelShape, ParameterModel};
use crate::application::validate::{rules, Validate, Violation};

/// 登录参数
#[derive(Debug, Clone, Deserialize)]
pub struct LogInParameter {
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl Validate for LogInParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "UserName", &self.user_name);
        rules::non_empty(&mut out, "Password", &self.password);
        out
    }
}

impl ParameterModel for LogInParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[("UserName", "String"), ("Password", "String")])
    }
}

/// 注册参数
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationParameter {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl Validate for RegistrationParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "UserName", &self.user_name);
        rules::non_empty(&mut out, "Password", &self.password);
        rules::min_length(&mut out, "Password", &self.password, 6);
        out
    }
}

impl ParameterModel for RegistrationParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[
            ("Name", "String"),
            ("UserName", "String"),
            ("Password", "String"),
        ])
    }
}

/// 修改口令参数
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordParameter {
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "CurrentPassword")]
    pub current_password: String,
    #[serde(rename = "NewPassword")]
    pub new_password: String,
}

impl Validate for ResetPasswordParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "UserName", &self.user_name);
        rules::non_empty(&mut out, "CurrentPassword", &self.current_password);
        rules::min_length(&mut out, "NewPassword", &self.new_password, 6);
        out
    }
}

impl ParameterModel for ResetPasswordParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[
            ("UserName", "String"),
            ("CurrentPassword", "String"),
            ("NewPassword", "String"),
        ])
    }
}

/// 编辑用户参数
#[derive(Debug, Clone, Deserialize)]
pub struct EditUserParameter {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl Validate for EditUserParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "Id", &self.id);
        out
    }
}

impl ParameterModel for EditUserParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[("Id", "String"), ("Name", "String")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        let param = LogInParameter {
            user_name: String::new(),
            password: String::new(),
        };
        let violations = param.validate();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_registration_short_password() {
        let param = RegistrationParameter {
            name: None,
            user_name: "alice".to_string(),
            password: "abc".to_string(),
        };
        let violations = param.validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "Password");
    }
}
