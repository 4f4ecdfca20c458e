//! 合同命令处理器

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;

use crate::application::dispatch::{ExecutionContext, HandlerKind, RequestHandler};
use crate::application::error::ApplicationError;
use crate::application::params::{ContractParameter, IdParameter, UploadContractFileParameter};
use crate::application::ports::{
    AttachmentRepositoryPort, AttachmentStoragePort, ContractRepositoryPort,
};
use crate::application::responses::{
    AttachmentResponse, ContractResponse, EmptyResponse, GetAllResponse,
};
use crate::domain::{Attachment, Contract};

// ============================================================================
// SaveContract
// ============================================================================

/// SaveContract Handler - upsert 语义
///
/// Id 命中已有合同则更新,否则新建;审计字段从调用方身份盖戳
pub struct SaveContractCommandHandler {
    contracts: Arc<dyn ContractRepositoryPort>,
}

impl SaveContractCommandHandler {
    pub fn new(contracts: Arc<dyn ContractRepositoryPort>) -> Self {
        Self { contracts }
    }
}

#[async_trait]
impl RequestHandler for SaveContractCommandHandler {
    const NAME: &'static str = "SaveContract";
    const KIND: HandlerKind = HandlerKind::Command;

    type Param = ContractParameter;
    type Response = ContractResponse;

    async fn execute(
        &self,
        param: Self::Param,
        ctx: &ExecutionContext,
    ) -> anyhow::Result<ContractResponse> {
        let actor = ctx.identity.as_ref().map(|i| i.user_id.clone());

        let existing = if param.id.trim().is_empty() {
            None
        } else {
            self.contracts
                .get(&param.id, false)
                .await
                .map_err(ApplicationError::from)?
        };

        let contract = match existing {
            Some(mut contract) => {
                contract.author = param.author;
                contract.name = param.name;
                contract.description = param.description;
                contract.updated = Some(Utc::now());
                if let Some(actor) = actor {
                    contract.last_modified_by = Some(actor);
                }
                self.contracts
                    .update(&contract)
                    .await
                    .map_err(ApplicationError::from)?;
                contract
            }
            None => {
                let mut contract = Contract::new(param.author, param.name, param.description);
                if !param.id.trim().is_empty() {
                    contract.id = param.id;
                }
                if let Some(created) = param.created {
                    contract.created = created;
                }
                contract.created_by = actor;
                self.contracts
                    .add(&contract)
                    .await
                    .map_err(ApplicationError::from)?;
                contract
            }
        };

        tracing::info!(contract_id = %contract.id, name = %contract.name, "Contract saved");

        Ok(ContractResponse::from(contract))
    }
}

// ============================================================================
// DeleteContract
// ============================================================================

/// DeleteContract Handler - 软删除
pub struct DeleteContractCommandHandler {
    contracts: Arc<dyn ContractRepositoryPort>,
}

impl DeleteContractCommandHandler {
    pub fn new(contracts: Arc<dyn ContractRepositoryPort>) -> Self {
        Self { contracts }
    }
}

#[async_trait]
impl RequestHandler for DeleteContractCommandHandler {
    const NAME: &'static str = "DeleteContract";
    const KIND: HandlerKind = HandlerKind::Command;

    type Param = IdParameter;
    type Response = EmptyResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<EmptyResponse> {
        let contract = self
            .contracts
            .get(&param.id, false)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::not_found("Contract", &param.id))?;

        self.contracts
            .delete(&contract.id, true)
            .await
            .map_err(ApplicationError::from)?;

        tracing::info!(contract_id = %contract.id, name = %contract.name, "Contract deleted");

        Ok(EmptyResponse {})
    }
}

// ============================================================================
// UploadContractFile
// ============================================================================

/// UploadContractFile Handler - multipart 附件入库
///
/// 文件字节落盘,元数据入仓储;参数里的 ContractId 来自 JSON 信封,
/// 文件本身经旁路并入
pub struct UploadContractFileCommandHandler {
    contracts: Arc<dyn ContractRepositoryPort>,
    attachments: Arc<dyn AttachmentRepositoryPort>,
    attachment_storage: Arc<dyn AttachmentStoragePort>,
}

impl UploadContractFileCommandHandler {
    pub fn new(
        contracts: Arc<dyn ContractRepositoryPort>,
        attachments: Arc<dyn AttachmentRepositoryPort>,
        attachment_storage: Arc<dyn AttachmentStoragePort>,
    ) -> Self {
        Self {
            contracts,
            attachments,
            attachment_storage,
        }
    }
}

#[async_trait]
impl RequestHandler for UploadContractFileCommandHandler {
    const NAME: &'static str = "UploadContractFile";
    const KIND: HandlerKind = HandlerKind::Command;
    const REQUIRES_AUTH: bool = true;

    type Param = UploadContractFileParameter;
    type Response = GetAllResponse<AttachmentResponse>;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<GetAllResponse<AttachmentResponse>> {
        self.contracts
            .get(&param.contract_id, false)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::not_found("Contract", &param.contract_id))?;

        if param.form.files.is_empty() {
            bail!("No files were attached to the request.");
        }

        let mut items = Vec::with_capacity(param.form.files.len());
        for file in &param.form.files {
            let mut attachment = Attachment::new(
                &param.contract_id,
                &file.file_name,
                &file.content_type,
                file.bytes.len() as u64,
                "",
            );
            attachment.stored_path = self
                .attachment_storage
                .save(&attachment.id, &file.bytes)
                .await
                .map_err(ApplicationError::from)?;

            self.attachments
                .add(&attachment)
                .await
                .map_err(ApplicationError::from)?;

            tracing::info!(
                contract_id = %param.contract_id,
                attachment_id = %attachment.id,
                file_name = %attachment.file_name,
                size = attachment.size,
                "Attachment uploaded"
            );

            items.push(AttachmentResponse::from(attachment));
        }

        Ok(GetAllResponse { items })
    }
}
