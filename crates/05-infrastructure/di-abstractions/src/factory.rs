//! 延迟工厂
//!
//! 以工厂方式注册的服务，除了服务本身，还可以按 "生产该服务的工厂" 解析，
//! 得到一个可以稍后调用的 [`ServiceFactory`]。

use crate::descriptor::ActivatorFn;
use crate::provider::ServiceProvider;
use di_common::{downcast_instance, DependencyResult, Instance, ServiceKey};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type CreateFn = Arc<dyn Fn() -> DependencyResult<Instance> + Send + Sync>;

/// 类型擦除的延迟工厂
#[derive(Clone)]
pub struct DeferredFactory {
    service: ServiceKey,
    create: CreateFn,
    create_with: ActivatorFn,
}

impl DeferredFactory {
    /// 创建延迟工厂
    ///
    /// `create` 在工厂被解析的作用域中解析服务，遵循服务注册的生命周期；
    /// `create_with` 直接用给定的服务提供者运行原始工厂。
    pub fn new<F>(service: ServiceKey, create: F, create_with: ActivatorFn) -> Self
    where
        F: Fn() -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        Self {
            service,
            create: Arc::new(create),
            create_with,
        }
    }

    /// 工厂创建的服务
    pub fn service(&self) -> &ServiceKey {
        &self.service
    }

    /// 在捕获的作用域中创建实例
    pub fn create(&self) -> DependencyResult<Instance> {
        (self.create)()
    }

    /// 使用给定提供者直接运行描述符工厂
    pub fn create_with(&self, provider: &dyn ServiceProvider) -> DependencyResult<Instance> {
        (self.create_with)(provider)
    }
}

impl fmt::Debug for DeferredFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredFactory")
            .field("service", &self.service)
            .finish()
    }
}

/// 服务 `S` 的类型化延迟工厂
pub struct ServiceFactory<S: ?Sized> {
    inner: Arc<DeferredFactory>,
    _service: PhantomData<fn() -> Arc<S>>,
}

impl<S> ServiceFactory<S>
where
    S: ?Sized + Send + Sync + 'static,
{
    pub fn new(inner: Arc<DeferredFactory>) -> Self {
        Self {
            inner,
            _service: PhantomData,
        }
    }

    /// 无参调用：从工厂所在的作用域解析服务
    pub fn create(&self) -> DependencyResult<Arc<S>> {
        downcast_instance(&self.inner.create()?)
    }

    /// 单参调用：用给定的服务提供者运行工厂
    pub fn create_with(&self, provider: &dyn ServiceProvider) -> DependencyResult<Arc<S>> {
        downcast_instance(&self.inner.create_with(provider)?)
    }

    pub fn service(&self) -> &ServiceKey {
        self.inner.service()
    }
}

impl<S: ?Sized> Clone for ServiceFactory<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _service: PhantomData,
        }
    }
}

impl<S: ?Sized> fmt::Debug for ServiceFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceFactory").field(&self.inner).finish()
    }
}
