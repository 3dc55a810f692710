//! 服务集合

use crate::descriptor::ServiceDescriptor;
use crate::injectable::Injectable;
use crate::options::OptionsBuilder;
use crate::provider::ServiceProvider;
use di_common::{DependencyResult, Lifetime, ServiceKey};
use std::sync::Arc;

/// 有序的服务描述符集合
///
/// 同一服务的多个描述符都会保留，按加入顺序枚举，最后加入的作为默认实现。
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加描述符
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// 添加瞬态可注入类型
    pub fn add_transient<S: Injectable>(&mut self) -> &mut Self {
        self.add(ServiceDescriptor::transient::<S>())
    }

    /// 添加作用域可注入类型
    pub fn add_scoped<S: Injectable>(&mut self) -> &mut Self {
        self.add(ServiceDescriptor::scoped::<S>())
    }

    /// 添加单例可注入类型
    pub fn add_singleton<S: Injectable>(&mut self) -> &mut Self {
        self.add(ServiceDescriptor::singleton::<S>())
    }

    /// 以实现类型 `I` 注册服务 `S`
    pub fn add_as<S, I>(&mut self, lifetime: Lifetime, cast: fn(Arc<I>) -> Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable,
    {
        self.add(ServiceDescriptor::of_type_as::<S, I>(lifetime, cast))
    }

    /// 以工厂函数添加服务
    pub fn add_factory<S, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::from_factory(lifetime, factory))
    }

    pub fn add_transient_factory<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    pub fn add_scoped_factory<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    pub fn add_singleton_factory<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> DependencyResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// 添加现成的单例实例，容器不负责释放
    pub fn add_instance<S>(&mut self, instance: Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::from_instance(instance))
    }

    /// 开始配置选项 `T`，调用 `register` 后注册 `Options<T>`
    pub fn add_options<T>(&mut self) -> OptionsBuilder<'_, T>
    where
        T: Default + Send + Sync + 'static,
    {
        OptionsBuilder::new(self)
    }

    /// 是否存在该服务的描述符
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.descriptors
            .iter()
            .any(|descriptor| descriptor.service() == key)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 按添加顺序遍历描述符
    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.descriptors.iter()
    }

    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }
}

impl IntoIterator for ServiceCollection {
    type Item = ServiceDescriptor;
    type IntoIter = std::vec::IntoIter<ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl Extend<ServiceDescriptor> for ServiceCollection {
    fn extend<I: IntoIterator<Item = ServiceDescriptor>>(&mut self, iter: I) {
        self.descriptors.extend(iter);
    }
}

impl FromIterator<ServiceDescriptor> for ServiceCollection {
    fn from_iter<I: IntoIterator<Item = ServiceDescriptor>>(iter: I) -> Self {
        Self {
            descriptors: iter.into_iter().collect(),
        }
    }
}
