//! 跨模块共享的参数模型

use serde::Deserialize;

use crate::application::dispatch::{ModelShape, ParameterModel};
use crate::application::validate::{rules, Validate, Violation};

/// 无参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmptyParameter {}

impl Validate for EmptyParameter {}

impl ParameterModel for EmptyParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[])
    }
}

/// 按 ID 定位资源
#[derive(Debug, Clone, Deserialize)]
pub struct IdParameter {
    #[serde(rename = "Id")]
    pub id: String,
}

impl Validate for IdParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "Id", &self.id);
        out
    }
}

impl ParameterModel for IdParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[("Id", "String")])
    }
}

/// 分页参数
///
/// 缺省值 0 会被规则集拦下,调用方必须显式给出从 1 开始的页码
#[derive(Debug, Clone, Deserialize)]
pub struct GetItemsParameter {
    #[serde(rename = "PageNumber", default)]
    pub page_number: u32,
    #[serde(rename = "PageSize", default)]
    pub page_size: u32,
}

impl Validate for GetItemsParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::at_least(&mut out, "PageNumber", self.page_number, 1);
        rules::at_least(&mut out, "PageSize", self.page_size, 1);
        out
    }
}

impl ParameterModel for GetItemsParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[("PageNumber", "Int32"), ("PageSize", "Int32")])
    }
}
