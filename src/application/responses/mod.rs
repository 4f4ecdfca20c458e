//! Response Models - 响应模型
//!
//! 线格式使用 PascalCase;每个响应类型提供字段形状供 Detail
//! 发现端点使用,并转换成调度器的封闭输出变体

use serde::Serialize;

use crate::application::dispatch::{FileResponse, HandlerOutput, ModelShape, ResponseModel};
use crate::domain::{Attachment, Contract, User};

// ============================================================================
// 通用响应
// ============================================================================

/// 空响应
#[derive(Debug, Clone, Serialize)]
pub struct EmptyResponse {}

impl ResponseModel for EmptyResponse {
    fn shape() -> ModelShape {
        ModelShape::new(&[])
    }

    fn into_output(self) -> anyhow::Result<HandlerOutput> {
        Ok(HandlerOutput::Json(serde_json::to_value(self)?))
    }
}

/// 全量列表响应
#[derive(Debug, Clone, Serialize)]
pub struct GetAllResponse<T> {
    #[serde(rename = "Items")]
    pub items: Vec<T>,
}

impl<T: Serialize + Send + 'static> ResponseModel for GetAllResponse<T> {
    fn shape() -> ModelShape {
        ModelShape::new(&[("Items", "Array")])
    }

    fn into_output(self) -> anyhow::Result<HandlerOutput> {
        Ok(HandlerOutput::Json(serde_json::to_value(self)?))
    }
}

/// 分页响应
///
/// TotalPage = ceil(Count / PageSize)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_page: u32,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, count: u64, page_number: u32, page_size: u32) -> Self {
        let total_page = if page_size == 0 {
            0
        } else {
            ((count + u64::from(page_size) - 1) / u64::from(page_size)) as u32
        };
        Self {
            data,
            count,
            page_number,
            page_size,
            total_page,
        }
    }
}

impl<T: Serialize + Send + 'static> ResponseModel for PagedResponse<T> {
    fn shape() -> ModelShape {
        ModelShape::new(&[
            ("Data", "Array"),
            ("Count", "Int32"),
            ("PageNumber", "Int32"),
            ("PageSize", "Int32"),
            ("TotalPage", "Int32"),
        ])
    }

    fn into_output(self) -> anyhow::Result<HandlerOutput> {
        Ok(HandlerOutput::Json(serde_json::to_value(self)?))
    }
}

// ============================================================================
// User 响应
// ============================================================================

/// 用户响应,登录/注册时携带访问凭证
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub token: Option<String>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

impl ResponseModel for UserResponse {
    fn shape() -> ModelShape {
        ModelShape::new(&[
            ("Id", "String"),
            ("Username", "String"),
            ("Name", "String"),
            ("Token", "String"),
        ])
    }

    fn into_output(self) -> anyhow::Result<HandlerOutput> {
        Ok(HandlerOutput::Json(serde_json::to_value(self)?))
    }
}

// ============================================================================
// Contract 响应
// ============================================================================

/// 合同响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContractResponse {
    pub id: String,
    pub author: String,
    pub name: String,
    pub description: String,
    pub created: String,
    pub updated: Option<String>,
}

impl From<Contract> for ContractResponse {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            author: contract.author,
            name: contract.name,
            description: contract.description,
            created: contract.created.to_rfc3339(),
            updated: contract.updated.map(|u| u.to_rfc3339()),
        }
    }
}

impl ResponseModel for ContractResponse {
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

    fn into_output(self) -> anyhow::Result<HandlerOutput> {
        Ok(HandlerOutput::Json(serde_json::to_value(self)?))
    }
}

/// 附件元数据响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachmentResponse {
    pub id: String,
    pub contract_id: String,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl From<Attachment> for AttachmentResponse {
    fn from(attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            contract_id: attachment.contract_id,
            file_name: attachment.file_name,
            content_type: attachment.content_type,
            size: attachment.size,
        }
    }
}

impl ResponseModel for AttachmentResponse {
    fn shape() -> ModelShape {
        ModelShape::new(&[
            ("Id", "String"),
            ("ContractId", "String"),
            ("FileName", "String"),
            ("ContentType", "String"),
            ("Size", "Int64"),
        ])
    }

    fn into_output(self) -> anyhow::Result<HandlerOutput> {
        Ok(HandlerOutput::Json(serde_json::to_value(self)?))
    }
}

// ============================================================================
// File 响应
// ============================================================================

impl ResponseModel for FileResponse {
    fn shape() -> ModelShape {
        ModelShape::new(&[
            ("ContentType", "String"),
            ("FileName", "String"),
            ("FileStream", "Stream"),
        ])
    }

    fn into_output(self) -> anyhow::Result<HandlerOutput> {
        Ok(HandlerOutput::File(self))
    }
}
