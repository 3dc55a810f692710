//! 容器构建器

use crate::config::ContainerConfig;
use crate::container::Container;
use crate::context::ResolveContext;
use crate::registration::{Activator, Registration};
use di_common::{into_instance, DependencyResult};
use std::sync::Arc;
use tracing::info;

/// 注册模块
///
/// 把一组相关注册打包，加载到构建器中。
pub trait Module: Send + Sync {
    fn load(&self, builder: &mut ContainerBuilder);
}

/// 容器构建器
///
/// `build` 消耗构建器，构建之后不能再注册。
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    registrations: Vec<Registration>,
    config: ContainerConfig,
}

impl ContainerBuilder {
    /// 使用默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用给定配置
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registrations: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 注册一个工厂，以其返回类型 `S` 暴露
    pub fn register<S, F>(&mut self, factory: F) -> &mut Registration
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolveContext) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        let registration = self.register_activator(Arc::new(move |context: &ResolveContext| {
            factory(context).map(into_instance::<S>)
        }));
        registration.as_type::<S>()
    }

    /// 注册一个原始激活器，服务键由调用方通过 `as_service` 指定
    pub fn register_activator(&mut self, activator: Activator) -> &mut Registration {
        self.registrations.push(Registration::new(activator));
        let index = self.registrations.len() - 1;
        &mut self.registrations[index]
    }

    /// 注册一个现成的实例
    ///
    /// 实例由外部创建，默认不由容器释放。
    pub fn register_instance<S>(&mut self, instance: Arc<S>) -> &mut Registration
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let instance = into_instance(instance);
        self.register_activator(Arc::new(move |_: &ResolveContext| Ok(instance.clone())))
            .as_type::<S>()
            .single_instance()
            .externally_owned()
    }

    /// 加载模块
    pub fn register_module(&mut self, module: &dyn Module) -> &mut Self {
        module.load(self);
        self
    }

    /// 已添加的注册数量
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// 构建容器
    pub fn build(self) -> Container {
        info!(registrations = self.registrations.len(), "构建依赖注入容器");
        Container::new(self.registrations, self.config)
    }

    pub(crate) fn into_registrations(self) -> Vec<Registration> {
        self.registrations
    }
}
