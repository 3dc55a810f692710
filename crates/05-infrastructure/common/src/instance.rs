//! 类型擦除的服务实例
//!
//! 所有实例以 `Arc<dyn Any>` 形式在容器与适配层之间传递，内部包裹 `Arc<S>`，
//! 这样 `S` 可以是 `dyn Trait`，共享实例的指针身份也能保持不变。

use crate::errors::{DependencyError, DependencyResult};
use crate::metadata::TypeInfo;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除的服务实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 将服务包装为 [`Instance`]
pub fn into_instance<S>(service: Arc<S>) -> Instance
where
    S: ?Sized + Send + Sync + 'static,
{
    Arc::new(service)
}

/// 从 [`Instance`] 还原服务
pub fn downcast_instance<S>(instance: &Instance) -> DependencyResult<Arc<S>>
where
    S: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<S>>()
        .cloned()
        .ok_or_else(|| DependencyError::DowncastFailed {
            expected: TypeInfo::of::<S>().name.to_string(),
            actual: describe_instance(instance),
        })
}

fn describe_instance(instance: &Instance) -> String {
    format!("{:?}", (**instance).type_id())
}
