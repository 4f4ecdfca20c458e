//! Query Handlers - 只读处理器

mod contract_queries;

pub use contract_queries::{
    GetAllContractQueryHandler, GetByPagedContractQueryHandler, GetContractFileQueryHandler,
    GetContractQueryHandler,
};
