//! 服务描述符
//!
//! 宿主框架的注册单位：服务键、实现来源和生命周期。描述符构造后不可变，
//! 在 [`ServiceCollection`](crate::ServiceCollection) 中的顺序有意义。

use crate::injectable::Injectable;
use crate::provider::ServiceProvider;
use di_common::{
    into_instance, AsyncDispose, DependencyResult, Dispose, Instance, Lifetime, ReleaseHooks,
    ServiceKey, TypeInfo,
};
use std::fmt;
use std::sync::Arc;

/// 以服务提供者为唯一参数的激活函数
pub type ActivatorFn =
    Arc<dyn Fn(&dyn ServiceProvider) -> DependencyResult<Instance> + Send + Sync>;

/// 实现来源
#[derive(Clone)]
pub enum ImplementationSource {
    /// 实现类型，通过构造注入创建
    Type {
        implementation: TypeInfo,
        activator: ActivatorFn,
    },
    /// 工厂函数
    Factory(ActivatorFn),
    /// 预先创建的实例
    Instance(Instance),
}

impl fmt::Debug for ImplementationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { implementation, .. } => {
                f.debug_tuple("Type").field(&implementation.name).finish()
            }
            Self::Factory(_) => f.write_str("Factory"),
            Self::Instance(_) => f.write_str("Instance"),
        }
    }
}

/// 服务描述符
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    service: ServiceKey,
    lifetime: Lifetime,
    implementation: ImplementationSource,
    release: ReleaseHooks,
}

impl ServiceDescriptor {
    /// 实现类型即服务类型
    pub fn of_type<S: Injectable>(lifetime: Lifetime) -> Self {
        Self {
            service: ServiceKey::of::<S>(),
            lifetime,
            implementation: ImplementationSource::Type {
                implementation: TypeInfo::of::<S>(),
                activator: Arc::new(|provider: &dyn ServiceProvider| {
                    Ok(into_instance(Arc::new(S::create(provider)?)))
                }),
            },
            release: ReleaseHooks::default(),
        }
    }

    /// 以实现类型 `I` 提供服务 `S`，通常 `S` 是 trait 对象
    pub fn of_type_as<S, I>(lifetime: Lifetime, cast: fn(Arc<I>) -> Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable,
    {
        Self {
            service: ServiceKey::of::<S>(),
            lifetime,
            implementation: ImplementationSource::Type {
                implementation: TypeInfo::of::<I>(),
                activator: Arc::new(move |provider: &dyn ServiceProvider| {
                    Ok(into_instance(cast(Arc::new(I::create(provider)?))))
                }),
            },
            release: ReleaseHooks::default(),
        }
    }

    /// 由工厂函数提供服务
    pub fn from_factory<S, F>(lifetime: Lifetime, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        Self {
            service: ServiceKey::of::<S>(),
            lifetime,
            implementation: ImplementationSource::Factory(Arc::new(
                move |provider: &dyn ServiceProvider| factory(provider).map(into_instance::<S>),
            )),
            release: ReleaseHooks::default(),
        }
    }

    /// 预先创建的实例，总是单例
    pub fn from_instance<S>(instance: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            service: ServiceKey::of::<S>(),
            lifetime: Lifetime::Singleton,
            implementation: ImplementationSource::Instance(into_instance(instance)),
            release: ReleaseHooks::default(),
        }
    }

    /// 瞬态类型描述符
    pub fn transient<S: Injectable>() -> Self {
        Self::of_type::<S>(Lifetime::Transient)
    }

    /// 作用域类型描述符
    pub fn scoped<S: Injectable>() -> Self {
        Self::of_type::<S>(Lifetime::Scoped)
    }

    /// 单例类型描述符
    pub fn singleton<S: Injectable>() -> Self {
        Self::of_type::<S>(Lifetime::Singleton)
    }

    /// 拥有该实例的作用域释放时调用 [`Dispose::dispose`]
    pub fn with_dispose<S>(mut self) -> Self
    where
        S: ?Sized + Dispose + 'static,
    {
        self.release = self.release.with_dispose::<S>();
        self
    }

    /// 拥有该实例的作用域异步释放时调用 [`AsyncDispose::dispose_async`]
    pub fn with_async_dispose<S>(mut self) -> Self
    where
        S: ?Sized + AsyncDispose + 'static,
    {
        self.release = self.release.with_async_dispose::<S>();
        self
    }

    /// 描述的服务键
    pub fn service(&self) -> &ServiceKey {
        &self.service
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn implementation(&self) -> &ImplementationSource {
        &self.implementation
    }

    pub fn release_hooks(&self) -> &ReleaseHooks {
        &self.release
    }

    /// 实现是否为工厂函数
    pub fn is_factory(&self) -> bool {
        matches!(self.implementation, ImplementationSource::Factory(_))
    }
}
