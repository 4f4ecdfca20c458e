//! 合同查询处理器

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatch::{ExecutionContext, FileResponse, HandlerKind, RequestHandler};
use crate::application::error::ApplicationError;
use crate::application::params::{EmptyParameter, GetItemsParameter, IdParameter};
use crate::application::ports::{
    AttachmentRepositoryPort, AttachmentStoragePort, ContractRepositoryPort,
};
use crate::application::responses::{ContractResponse, GetAllResponse, PagedResponse};

// ============================================================================
// GetContract
// ============================================================================

/// GetContract Handler
pub struct GetContractQueryHandler {
    contracts: Arc<dyn ContractRepositoryPort>,
}

impl GetContractQueryHandler {
    pub fn new(contracts: Arc<dyn ContractRepositoryPort>) -> Self {
        Self { contracts }
    }
}

#[async_trait]
impl RequestHandler for GetContractQueryHandler {
    const NAME: &'static str = "GetContract";
    const KIND: HandlerKind = HandlerKind::Query;

    type Param = IdParameter;
    type Response = ContractResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<ContractResponse> {
        let contract = self
            .contracts
            .get(&param.id, false)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::not_found("Contract", &param.id))?;

        Ok(ContractResponse::from(contract))
    }
}

// ============================================================================
// GetAllContract
// ============================================================================

/// GetAllContract Handler - 未删除合同全量列表
pub struct GetAllContractQueryHandler {
    contracts: Arc<dyn ContractRepositoryPort>,
}

impl GetAllContractQueryHandler {
    pub fn new(contracts: Arc<dyn ContractRepositoryPort>) -> Self {
        Self { contracts }
    }
}

#[async_trait]
impl RequestHandler for GetAllContractQueryHandler {
    const NAME: &'static str = "GetAllContract";
    const KIND: HandlerKind = HandlerKind::Query;

    type Param = EmptyParameter;
    type Response = GetAllResponse<ContractResponse>;

    async fn execute(
        &self,
        _param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<GetAllResponse<ContractResponse>> {
        let contracts = self
            .contracts
            .get_all(false)
            .await
            .map_err(ApplicationError::from)?;

        Ok(GetAllResponse {
            items: contracts.into_iter().map(ContractResponse::from).collect(),
        })
    }
}

// ============================================================================
// GetByPagedContract
// ============================================================================

/// GetByPagedContract Handler
pub struct GetByPagedContractQueryHandler {
    contracts: Arc<dyn ContractRepositoryPort>,
}

impl GetByPagedContractQueryHandler {
    pub fn new(contracts: Arc<dyn ContractRepositoryPort>) -> Self {
        Self { contracts }
    }
}

#[async_trait]
impl RequestHandler for GetByPagedContractQueryHandler {
    const NAME: &'static str = "GetByPagedContract";
    const KIND: HandlerKind = HandlerKind::Query;
    const REQUIRES_AUTH: bool = true;

    type Param = GetItemsParameter;
    type Response = PagedResponse<ContractResponse>;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<PagedResponse<ContractResponse>> {
        let (contracts, total) = self
            .contracts
            .paged(param.page_number, param.page_size, false)
            .await
            .map_err(ApplicationError::from)?;

        Ok(PagedResponse::new(
            contracts.into_iter().map(ContractResponse::from).collect(),
            total,
            param.page_number,
            param.page_size,
        ))
    }
}

// ============================================================================
// GetContractFile
// ============================================================================

/// GetContractFile Handler - 附件下载
///
/// 返回文件变体,传输层直接流式输出而不是包进结果信封
pub struct GetContractFileQueryHandler {
    attachments: Arc<dyn AttachmentRepositoryPort>,
    attachment_storage: Arc<dyn AttachmentStoragePort>,
}

impl GetContractFileQueryHandler {
    pub fn new(
        attachments: Arc<dyn AttachmentRepositoryPort>,
        attachment_storage: Arc<dyn AttachmentStoragePort>,
    ) -> Self {
        Self {
            attachments,
            attachment_storage,
        }
    }
}

#[async_trait]
impl RequestHandler for GetContractFileQueryHandler {
    const NAME: &'static str = "GetContractFile";
    const KIND: HandlerKind = HandlerKind::Query;
    const ALLOWS_ANONYMOUS: bool = true;

    type Param = IdParameter;
    type Response = FileResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<FileResponse> {
        let attachment = self
            .attachments
            .get(&param.id)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::not_found("Attachment", &param.id))?;

        let body = self
            .attachment_storage
            .open(&attachment.stored_path)
            .await
            .map_err(ApplicationError::from)?;

        Ok(FileResponse {
            file_name: attachment.file_name,
            content_type: attachment.content_type,
            body,
        })
    }
}
