//! Contract Context - 合同与附件实体

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 合同实体
///
/// created_by / last_modified_by 从调用方身份盖戳,
/// 删除为软删除,分页查询会过滤 is_deleted
#[derive(Debug, Clone)]
pub struct Contract {
    pub id: String,
    pub author: String,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub create_time: DateTime<Utc>,
    pub last_modified_time: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl Contract {
    pub fn new(author: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.into(),
            name: name.into(),
            description: description.into(),
            created: now,
            updated: None,
            created_by: None,
            last_modified_by: None,
            create_time: now,
            last_modified_time: None,
            is_deleted: false,
        }
    }
}

/// 合同附件
///
/// 二进制内容落盘于 stored_path,此处仅保存元数据
#[derive(Debug, Clone)]
pub struct Attachment {
    pub id: String,
    pub contract_id: String,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub stored_path: String,
    pub create_time: DateTime<Utc>,
}

impl Attachment {
    pub fn new(
        contract_id: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
        stored_path: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            contract_id: contract_id.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            size,
            stored_path: stored_path.into(),
            create_time: Utc::now(),
        }
    }
}
