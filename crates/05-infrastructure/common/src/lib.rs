//! # DI Common
//!
//! 生命周期作用域容器与宿主依赖注入抽象共用的基础类型。
//!
//! ## 核心内容
//!
//! - [`DependencyError`] - 依赖解析错误分类
//! - [`ServiceKey`] / [`TypeInfo`] - 运行时服务查找键
//! - [`Instance`] - 类型擦除的服务实例
//! - [`Lifetime`] / [`ScopeTag`] - 生命周期与作用域标签
//! - [`Dispose`] / [`AsyncDispose`] / [`ReleaseHooks`] - 实例释放
//! - [`LoggingConfig`] - 日志初始化

pub mod errors;
pub mod instance;
pub mod lifecycle;
pub mod logging;
pub mod metadata;

pub use errors::*;
pub use instance::*;
pub use lifecycle::*;
pub use logging::{init_logging, LoggingConfig};
pub use metadata::*;
