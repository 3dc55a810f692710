//! # 依赖注入桥接
//!
//! 让生命周期作用域容器满足宿主的依赖注入抽象。桥接层本身没有解析算法：
//!
//! - [`populate`] 把有序的服务描述符追加为容器注册，并选择生命周期三元组
//! - [`BridgingServiceProvider`] 每次解析开启子作用域，加载 [`ModuleAccessor`] 给出的模块后转发
//! - [`BridgedServiceScope`] 拥有一个提供者并转发释放
//! - [`BridgeServiceProviderFactory`] 接入宿主的提供者工厂
//!
//! ```
//! use di_abstractions::{Lifetime, ServiceCollection, ServiceProviderExt};
//! use di_bridge::ContainerBuilderExt;
//! use di_container::ContainerBuilder;
//! use std::sync::Arc;
//!
//! let mut services = ServiceCollection::new();
//! services.add_factory(Lifetime::Singleton, |_| Ok(Arc::new("hello".to_string())));
//!
//! let mut builder = ContainerBuilder::new();
//! builder.populate(services);
//! let container = builder.build();
//!
//! let provider = di_bridge::BridgingServiceProvider::new(container.root().clone());
//! assert_eq!(provider.get_required::<String>().unwrap().as_str(), "hello");
//! ```

pub mod config;
mod context_provider;
pub mod lifetime_mapping;
pub mod module_accessor;
pub mod populate;
pub mod provider;
pub mod provider_factory;
pub mod scope;
pub mod scope_factory;

pub use config::BridgeOptions;
pub use lifetime_mapping::{map_lifetime, LifetimeMapping};
pub use module_accessor::{ModuleAccessor, StaticModules};
pub use populate::{populate, ContainerBuilderExt};
pub use provider::BridgingServiceProvider;
pub use provider_factory::BridgeServiceProviderFactory;
pub use scope::BridgedServiceScope;
pub use scope_factory::BridgedServiceScopeFactory;
