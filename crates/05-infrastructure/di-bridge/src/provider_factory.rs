//! 服务提供者工厂

use crate::config::BridgeOptions;
use crate::populate::populate;
use crate::provider::BridgingServiceProvider;
use di_abstractions::{ServiceCollection, ServiceProvider, ServiceProviderFactory};
use di_common::DependencyResult;
use di_container::ContainerBuilder;
use std::fmt;
use std::sync::Arc;
use tracing::info;

type ConfigureContainerFn = Arc<dyn Fn(&mut ContainerBuilder) + Send + Sync>;

/// 把宿主服务集合接入生命周期作用域容器
#[derive(Clone, Default)]
pub struct BridgeServiceProviderFactory {
    options: BridgeOptions,
    configure: Option<ConfigureContainerFn>,
}

impl BridgeServiceProviderFactory {
    /// 使用默认桥接选项
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BridgeOptions) -> Self {
        Self {
            options,
            configure: None,
        }
    }

    /// 在描述符填充之后直接向容器追加注册
    pub fn configure_container<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut ContainerBuilder) + Send + Sync + 'static,
    {
        self.configure = Some(Arc::new(configure));
        self
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// 构建容器并返回根作用域上的具体提供者
    pub fn build_provider(&self, builder: ContainerBuilder) -> Arc<BridgingServiceProvider> {
        let container = builder.build();
        info!(scope_id = %container.id(), "桥接服务提供者已创建");
        Arc::new(BridgingServiceProvider::new(container.root().clone()))
    }
}

impl ServiceProviderFactory<ContainerBuilder> for BridgeServiceProviderFactory {
    fn create_builder(&self, services: ServiceCollection) -> ContainerBuilder {
        let mut builder = ContainerBuilder::with_config(self.options.container.clone());
        populate(&mut builder, services, self.options.scope_tag());
        if let Some(configure) = &self.configure {
            configure(&mut builder);
        }
        builder
    }

    fn create_service_provider(
        &self,
        builder: ContainerBuilder,
    ) -> DependencyResult<Arc<dyn ServiceProvider>> {
        Ok(self.build_provider(builder))
    }
}

impl fmt::Debug for BridgeServiceProviderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeServiceProviderFactory")
            .field("options", &self.options)
            .field("configure", &self.configure.is_some())
            .finish()
    }
}
