//! 合同相关参数模型

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::application::dispatch::{FormPayload, ModelShape, ParameterModel};
use crate::application::validate::{rules, Validate, Violation};

/// 保存合同参数(Id 为空表示新建)
#[derive(Debug, Clone, Deserialize)]
pub struct ContractParameter {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Created", default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "Updated", default)]
    pub updated: Option<DateTime<Utc>>,
}

impl Validate for ContractParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "Author", &self.author);
        rules::non_empty(&mut out, "Name", &self.name);
        out
    }
}

impl ParameterModel for ContractParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[
            ("Id", "String"),
            ("Author", "String"),
            ("Name", "String"),
            ("Description", "String"),
            ("Created", "DateTime"),
            ("Updated", "DateTime"),
        ])
    }
}

/// 上传合同附件参数
///
/// JSON 里只有 ContractId,文件内容经 multipart 旁路并入
#[derive(Debug, Clone, Deserialize)]
pub struct UploadContractFileParameter {
    #[serde(rename = "ContractId")]
    pub contract_id: String,
    #[serde(skip)]
    pub form: FormPayload,
}

impl Validate for UploadContractFileParameter {
    fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        rules::non_empty(&mut out, "ContractId", &self.contract_id);
        out
    }
}

impl ParameterModel for UploadContractFileParameter {
    fn shape() -> ModelShape {
        ModelShape::new(&[("ContractId", "String")])
    }

    fn attach_form(&mut self, form: FormPayload) {
        self.form = form;
    }
}
