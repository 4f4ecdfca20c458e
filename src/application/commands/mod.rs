//! Command Handlers - 状态变更处理器

mod contract_commands;
mod user_commands;

pub use contract_commands::{
    DeleteContractCommandHandler, SaveContractCommandHandler, UploadContractFileCommandHandler,
};
pub use user_commands::{
    ChangePasswordCommandHandler, DeleteUserCommandHandler, EditUserCommandHandler,
    LogInCommandHandler, RegistrationCommandHandler,
};
