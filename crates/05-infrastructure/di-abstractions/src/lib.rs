//! # 依赖注入宿主抽象
//!
//! 宿主框架面向的依赖注入接口，与具体容器无关。
//!
//! ## 核心接口
//!
//! - [`ServiceDescriptor`] / [`ServiceCollection`] - 有序的服务描述
//! - [`ServiceProvider`] - 按服务键解析服务
//! - [`ServiceScope`] / [`ServiceScopeFactory`] - 可释放的作用域
//! - [`ServiceProviderFactory`] - 接入第三方容器
//! - [`Injectable`] - 构造注入
//! - [`ServiceFactory`] - 延迟工厂
//! - [`Options`] / [`OptionsBuilder`] - 选项模式

pub mod collection;
pub mod descriptor;
pub mod factory;
pub mod injectable;
pub mod options;
pub mod provider;
pub mod scope;

pub use collection::*;
pub use descriptor::*;
pub use factory::*;
pub use injectable::*;
pub use options::*;
pub use provider::*;
pub use scope::*;

pub use di_common::{
    downcast_instance, into_instance, AsyncDispose, DependencyError, DependencyResult, Dispose,
    Instance, Lifetime, ServiceKey, TypeInfo,
};
