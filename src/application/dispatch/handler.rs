//! 处理器能力接口
//!
//! Command/Query 是一个封闭的双变体能力:两者共用同一个
//! `RequestHandler` trait,以 `KIND` 常量区分,分类只看这里声明的
//! 常量,从不从名字推断。
//!
//! 注册名约定: 处理器类型名去掉 `CommandHandler`/`QueryHandler` 后缀,
//! 即 `LogInCommandHandler` 注册为 `LogIn`,以 `NAME` 常量在编译期固定

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::application::identity::AccessIdentity;
use crate::application::ports::AttachmentStream;
use crate::application::services::AppServices;
use crate::application::validate::Validate;
use crate::domain::Module;

/// 处理器类别
///
/// Command 变更状态,Query 只读;这是路由/文档约定,
/// 不是强制的效果系统
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Command,
    Query,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Command => "Command",
            HandlerKind::Query => "Query",
        }
    }
}

/// 路由可见性
///
/// Public 路由只能到达显式允许匿名的处理器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteVisibility {
    Private,
    Public,
}

/// 参数/响应的字段形状,用于 Detail 发现端点
#[derive(Debug, Clone, Copy)]
pub struct ModelShape {
    pub fields: &'static [(&'static str, &'static str)],
}

impl ModelShape {
    pub const fn new(fields: &'static [(&'static str, &'static str)]) -> Self {
        Self { fields }
    }

    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .map(|(name, type_name)| ((*name).to_string(), serde_json::Value::from(*type_name)))
            .collect()
    }
}

/// multipart 上传的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// multipart 表单旁路输入
///
/// JSON 信封只反序列化一次,文件部分原样并入参数,
/// 不会被当作 JSON 二次解析
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    pub files: Vec<UploadedFile>,
}

/// 文件型响应
///
/// 传输层识别这个变体后直接流式输出,
/// 不包进序列化的结果信封
pub struct FileResponse {
    pub file_name: String,
    pub content_type: String,
    pub body: AttachmentStream,
}

/// 处理器输出的封闭变体
pub enum HandlerOutput {
    Json(serde_json::Value),
    File(FileResponse),
}

/// 处理器声明的参数类型
pub trait ParameterModel: DeserializeOwned + Validate + Send + 'static {
    /// 字段形状,供 Detail 端点使用
    fn shape() -> ModelShape;

    /// 接收 multipart 旁路输入;接受附件的参数类型覆盖此方法
    fn attach_form(&mut self, _form: FormPayload) {}
}

/// 处理器声明的响应类型
pub trait ResponseModel: Send + 'static {
    /// 字段形状,供 Detail 端点使用
    fn shape() -> ModelShape;

    /// 转成封闭输出变体
    fn into_output(self) -> anyhow::Result<HandlerOutput>;
}

/// 单次调用的执行上下文
///
/// 每次调度新建,从不跨调用共享
#[derive(Clone)]
pub struct ExecutionContext {
    pub module: Module,
    pub identity: Option<AccessIdentity>,
    /// 传输层的取消信号,处理器应尽早停止阻塞 I/O
    pub cancel: CancellationToken,
}

/// 请求处理器能力
///
/// 每个处理器绑定唯一的注册名和类别;执行错误经 anyhow 上抛,
/// 由 Dispatcher 统一捕获并归一化成失败信封
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// 注册名(类型名去掉类别后缀)
    const NAME: &'static str;

    /// 结构化类别,分类的唯一依据
    const KIND: HandlerKind;

    /// 调用是否要求已验证的身份存在
    const REQUIRES_AUTH: bool = false;

    /// 是否允许经由 public 路由到达
    const ALLOWS_ANONYMOUS: bool = false;

    type Param: ParameterModel;
    type Response: ResponseModel;

    async fn execute(
        &self,
        param: Self::Param,
        ctx: &ExecutionContext,
    ) -> anyhow::Result<Self::Response>;
}

/// 构造处理器新实例的工厂,每次调度调用一次
pub trait HandlerFactory<H>: Send + Sync + 'static {
    fn build(&self, services: &AppServices) -> H;
}

impl<H, F> HandlerFactory<H> for F
where
    F: Fn(&AppServices) -> H + Send + Sync + 'static,
{
    fn build(&self, services: &AppServices) -> H {
        self(services)
    }
}
