//! 错误类型定义

use thiserror::Error;

/// 依赖解析错误类型
///
/// 除 [`DependencyError::ServiceNotRegistered`] 之外，所有变体都表示对象图无法构建
/// 或作用域已经失效，可选解析路径也必须原样向上传播。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("服务未注册: {service}")]
    ServiceNotRegistered { service: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 服务本身已注册，但构建它时某个依赖未注册
    #[error("解析 {service} 失败: {source}")]
    DependencyResolutionFailed {
        service: String,
        source: Box<DependencyError>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("没有标记为 '{tag}' 的祖先作用域可以承载服务 {service}")]
    NoMatchingScope { tag: String, service: String },

    #[error("解析深度超过上限 {max_depth}: {service}")]
    ResolutionDepthExceeded { max_depth: usize, service: String },

    #[error("类型转换失败: 期望 {expected}, 实际 {actual}")]
    DowncastFailed { expected: String, actual: String },

    #[error("选项验证失败: {type_name}, 错误: {errors:?}")]
    OptionsValidationFailed {
        type_name: String,
        errors: Vec<String>,
    },

    #[error("生命周期作用域已释放: {scope_id}")]
    ScopeDisposed { scope_id: String },

    #[error("服务提供者已释放, 无法继续解析")]
    ProviderDisposed,
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 在 `service` 的激活过程中出现的未注册错误改写为依赖解析失败
    ///
    /// 其他错误原样返回，已经改写过的错误不会重复包装。
    pub fn within_activation(self, service: impl Into<String>) -> Self {
        match self {
            Self::ServiceNotRegistered { .. } => Self::DependencyResolutionFailed {
                service: service.into(),
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// 是否为 "服务未注册" 错误
    pub fn is_not_registered(&self) -> bool {
        matches!(self, Self::ServiceNotRegistered { .. })
    }

    /// 是否为作用域或提供者释放后的访问错误
    pub fn is_use_after_dispose(&self) -> bool {
        matches!(self, Self::ScopeDisposed { .. } | Self::ProviderDisposed)
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
/// 基础设施结果类型别名
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
