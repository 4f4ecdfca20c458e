//! 用户命令处理器

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;

use crate::application::dispatch::{ExecutionContext, HandlerKind, RequestHandler};
use crate::application::error::ApplicationError;
use crate::application::params::{
    EditUserParameter, IdParameter, LogInParameter, RegistrationParameter, ResetPasswordParameter,
};
use crate::application::ports::{PasswordHasherPort, TokenCodecPort, UserRepositoryPort};
use crate::application::responses::{EmptyResponse, UserResponse};
use crate::domain::User;

// ============================================================================
// LogIn
// ============================================================================

/// LogIn Handler - 口令登录,签发访问凭证
pub struct LogInCommandHandler {
    users: Arc<dyn UserRepositoryPort>,
    token_codec: Arc<dyn TokenCodecPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
}

impl LogInCommandHandler {
    pub fn new(
        users: Arc<dyn UserRepositoryPort>,
        token_codec: Arc<dyn TokenCodecPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
    ) -> Self {
        Self {
            users,
            token_codec,
            password_hasher,
        }
    }
}

#[async_trait]
impl RequestHandler for LogInCommandHandler {
    const NAME: &'static str = "LogIn";
    const KIND: HandlerKind = HandlerKind::Command;
    const ALLOWS_ANONYMOUS: bool = true;

    type Param = LogInParameter;
    type Response = UserResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<UserResponse> {
        let user = self
            .users
            .find_by_username(&param.user_name)
            .await
            .map_err(ApplicationError::from)?
            // 用户不存在与口令错误返回同一条信息,不泄露账户是否存在
            .ok_or(ApplicationError::InvalidCredentials)?;

        if !self.password_hasher.verify(&param.password, &user.password_hash) {
            return Err(ApplicationError::InvalidCredentials.into());
        }

        if !user.can_sign_in() {
            return Err(ApplicationError::UserDisabled(user.username.clone()).into());
        }

        let token = self.token_codec.issue(&user);

        tracing::info!(username = %user.username, "User logged in");

        Ok(UserResponse::from_user(&user).with_token(token))
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Registration Handler - 注册新用户并直接签发凭证
pub struct RegistrationCommandHandler {
    users: Arc<dyn UserRepositoryPort>,
    token_codec: Arc<dyn TokenCodecPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
}

impl RegistrationCommandHandler {
    pub fn new(
        users: Arc<dyn UserRepositoryPort>,
        token_codec: Arc<dyn TokenCodecPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
    ) -> Self {
        Self {
            users,
            token_codec,
            password_hasher,
        }
    }
}

#[async_trait]
impl RequestHandler for RegistrationCommandHandler {
    const NAME: &'static str = "Registration";
    const KIND: HandlerKind = HandlerKind::Command;
    const ALLOWS_ANONYMOUS: bool = true;

    type Param = RegistrationParameter;
    type Response = UserResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<UserResponse> {
        let existing = self
            .users
            .get(&param.user_name)
            .await
            .map_err(ApplicationError::from)?;
        if existing.is_some() {
            return Err(ApplicationError::Duplicate(format!("User {}", param.user_name)).into());
        }

        let hashed = self.password_hasher.hash(&param.password)?;
        let user = User::new(param.user_name, param.name, hashed);

        self.users.add(&user).await.map_err(ApplicationError::from)?;

        let token = self.token_codec.issue(&user);

        tracing::info!(username = %user.username, "User registered");

        Ok(UserResponse::from_user(&user).with_token(token))
    }
}

// ============================================================================
// ChangePassword
// ============================================================================

/// ChangePassword Handler
pub struct ChangePasswordCommandHandler {
    users: Arc<dyn UserRepositoryPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
}

impl ChangePasswordCommandHandler {
    pub fn new(users: Arc<dyn UserRepositoryPort>, password_hasher: Arc<dyn PasswordHasherPort>) -> Self {
        Self {
            users,
            password_hasher,
        }
    }
}

#[async_trait]
impl RequestHandler for ChangePasswordCommandHandler {
    const NAME: &'static str = "ChangePassword";
    const KIND: HandlerKind = HandlerKind::Command;
    const REQUIRES_AUTH: bool = true;

    type Param = ResetPasswordParameter;
    type Response = EmptyResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<EmptyResponse> {
        let mut user = self
            .users
            .get(&param.user_name)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::not_found("User", &param.user_name))?;

        if !self.password_hasher.verify(&param.current_password, &user.password_hash) {
            bail!("Incorrect current password.");
        }

        user.password_hash = self.password_hasher.hash(&param.new_password)?;
        self.users.update(&user).await.map_err(ApplicationError::from)?;

        tracing::info!(username = %user.username, "Password changed");

        Ok(EmptyResponse {})
    }
}

// ============================================================================
// EditUser
// ============================================================================

/// EditUser Handler
pub struct EditUserCommandHandler {
    users: Arc<dyn UserRepositoryPort>,
}

impl EditUserCommandHandler {
    pub fn new(users: Arc<dyn UserRepositoryPort>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler for EditUserCommandHandler {
    const NAME: &'static str = "EditUser";
    const KIND: HandlerKind = HandlerKind::Command;
    const REQUIRES_AUTH: bool = true;

    type Param = EditUserParameter;
    type Response = UserResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<UserResponse> {
        let mut user = self
            .users
            .get(&param.id)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::not_found("User", &param.id))?;

        user.name = Some(param.name);
        self.users.update(&user).await.map_err(ApplicationError::from)?;

        Ok(UserResponse::from_user(&user))
    }
}

// ============================================================================
// DeleteUser
// ============================================================================

/// DeleteUser Handler - 硬删除
pub struct DeleteUserCommandHandler {
    users: Arc<dyn UserRepositoryPort>,
}

impl DeleteUserCommandHandler {
    pub fn new(users: Arc<dyn UserRepositoryPort>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler for DeleteUserCommandHandler {
    const NAME: &'static str = "DeleteUser";
    const KIND: HandlerKind = HandlerKind::Command;
    const REQUIRES_AUTH: bool = true;

    type Param = IdParameter;
    type Response = UserResponse;

    async fn execute(
        &self,
        param: Self::Param,
        _ctx: &ExecutionContext,
    ) -> anyhow::Result<UserResponse> {
        let user = self
            .users
            .get(&param.id)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::not_found("User", &param.id))?;

        self.users.delete(&user.id).await.map_err(ApplicationError::from)?;

        tracing::info!(username = %user.username, "User deleted");

        Ok(UserResponse::from_user(&user))
    }
}
