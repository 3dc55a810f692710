//! 服务提供者抽象接口

use crate::factory::{DeferredFactory, ServiceFactory};
use di_common::{downcast_instance, DependencyError, DependencyResult, Instance, ServiceKey};
use std::sync::Arc;

/// 服务提供者 trait
///
/// 宿主框架通过它按键解析服务。
pub trait ServiceProvider: Send + Sync {
    /// 获取服务，未注册时返回 `None`
    ///
    /// 服务已注册但创建失败时返回错误，不会变成 `None`。
    fn get_service(&self, key: &ServiceKey) -> DependencyResult<Option<Instance>>;

    /// 获取必需的服务，未注册时返回 [`DependencyError::ServiceNotRegistered`]
    fn get_required_service(&self, key: &ServiceKey) -> DependencyResult<Instance> {
        self.get_service(key)?
            .ok_or_else(|| DependencyError::ServiceNotRegistered {
                service: key.to_string(),
            })
    }

    /// 按注册顺序获取服务的全部实现
    fn get_services(&self, key: &ServiceKey) -> DependencyResult<Vec<Instance>>;
}

/// 服务提供者的类型化扩展方法
pub trait ServiceProviderExt: ServiceProvider {
    /// 获取服务 `S`，未注册时返回 `None`
    fn get<S>(&self) -> DependencyResult<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.get_service(&ServiceKey::of::<S>())?
            .map(|instance| downcast_instance::<S>(&instance))
            .transpose()
    }

    /// 获取必需的服务 `S`
    fn get_required<S>(&self) -> DependencyResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        downcast_instance(&self.get_required_service(&ServiceKey::of::<S>())?)
    }

    /// 获取服务 `S` 的全部实现
    fn get_all<S>(&self) -> DependencyResult<Vec<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.get_services(&ServiceKey::of::<S>())?
            .iter()
            .map(|instance| downcast_instance::<S>(instance))
            .collect()
    }

    /// 获取生产服务 `S` 的延迟工厂
    fn get_factory<S>(&self) -> DependencyResult<ServiceFactory<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let instance = self.get_required_service(&ServiceKey::factory_of::<S>())?;
        Ok(ServiceFactory::new(downcast_instance::<DeferredFactory>(
            &instance,
        )?))
    }
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {}
