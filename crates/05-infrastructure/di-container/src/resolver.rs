//! 组件解析接口

use di_common::{downcast_instance, DependencyResult, Instance, ServiceKey};
use std::sync::Arc;

/// 组件解析器
///
/// 由 [`LifetimeScope`](crate::LifetimeScope) 和
/// [`ResolveContext`](crate::ResolveContext) 实现。类型化方法只是按键解析的薄包装。
pub trait ComponentResolver: Send + Sync {
    /// 解析服务的默认注册（最后注册者胜出）
    fn resolve_key(&self, key: &ServiceKey) -> DependencyResult<Instance>;

    /// 解析服务，未注册时返回 `None`
    ///
    /// 只有 "未注册" 会变成 `None`，激活过程中的错误照常返回。
    fn resolve_optional_key(&self, key: &ServiceKey) -> DependencyResult<Option<Instance>>;

    /// 按注册顺序解析服务的全部注册
    fn resolve_all_key(&self, key: &ServiceKey) -> DependencyResult<Vec<Instance>>;

    /// 服务是否已注册
    fn is_registered(&self, key: &ServiceKey) -> bool;

    /// 按类型解析
    fn resolve<S>(&self) -> DependencyResult<Arc<S>>
    where
        Self: Sized,
        S: ?Sized + Send + Sync + 'static,
    {
        downcast_instance(&self.resolve_key(&ServiceKey::of::<S>())?)
    }

    /// 按类型解析，未注册时返回 `None`
    fn resolve_optional<S>(&self) -> DependencyResult<Option<Arc<S>>>
    where
        Self: Sized,
        S: ?Sized + Send + Sync + 'static,
    {
        self.resolve_optional_key(&ServiceKey::of::<S>())?
            .map(|instance| downcast_instance::<S>(&instance))
            .transpose()
    }

    /// 按类型解析全部注册
    fn resolve_all<S>(&self) -> DependencyResult<Vec<Arc<S>>>
    where
        Self: Sized,
        S: ?Sized + Send + Sync + 'static,
    {
        self.resolve_all_key(&ServiceKey::of::<S>())?
            .iter()
            .map(|instance| downcast_instance::<S>(instance))
            .collect()
    }
}
