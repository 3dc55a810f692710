//! # 生命周期作用域容器
//!
//! 基于注册的依赖注入容器：
//!
//! - [`ContainerBuilder`] 收集注册，`build` 之后注册表不可变
//! - 每个 [`Registration`] 由生命周期、共享模式和所有权描述
//! - [`LifetimeScope`] 组成作用域树，共享实例缓存在归属作用域中
//! - 子作用域可以追加只对自身可见的注册
//! - 作用域释放时按逆序执行实例的释放钩子
//!
//! ```
//! use di_container::{ComponentResolver, ContainerBuilder};
//! use std::sync::Arc;
//!
//! struct Clock;
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register(|_| Ok(Arc::new(Clock))).single_instance();
//! let container = builder.build();
//!
//! let scope = container.begin_lifetime_scope().unwrap();
//! let a = container.resolve::<Clock>().unwrap();
//! let b = scope.resolve::<Clock>().unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

pub mod builder;
pub mod config;
pub mod container;
pub mod context;
pub mod registration;
mod registry;
pub mod resolver;
pub mod scope;

pub use builder::{ContainerBuilder, Module};
pub use config::ContainerConfig;
pub use container::Container;
pub use context::ResolveContext;
pub use registration::{
    Activator, InstanceLifetime, InstanceOwnership, InstanceSharing, Registration,
    RegistrationId, ScopeMatch,
};
pub use registry::RegistryId;
pub use resolver::ComponentResolver;
pub use scope::LifetimeScope;

pub use di_common::{DependencyError, DependencyResult, Instance, ScopeTag, ServiceKey};
