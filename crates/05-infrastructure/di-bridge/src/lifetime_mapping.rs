//! 生命周期映射
//!
//! 宿主的三种生命周期到容器的 "生命周期 / 共享 / 所有权" 三元组。

use di_common::{Lifetime, ScopeTag};
use di_container::{InstanceLifetime, InstanceOwnership, InstanceSharing, ScopeMatch};

/// 容器词汇下的生命周期配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifetimeMapping {
    pub lifetime: InstanceLifetime,
    pub sharing: InstanceSharing,
    pub ownership: InstanceOwnership,
}

/// 映射宿主生命周期
///
/// 作用域标签只影响单例：单例固定到最近的带该标签的祖先作用域。
pub fn map_lifetime(lifetime: Lifetime, scope_tag: Option<&ScopeTag>) -> LifetimeMapping {
    let (lifetime, sharing) = match (lifetime, scope_tag) {
        (Lifetime::Transient, _) => (InstanceLifetime::PerDependency, InstanceSharing::None),
        (Lifetime::Scoped, _) => (
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Current),
            InstanceSharing::Shared,
        ),
        (Lifetime::Singleton, None) => (
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Root),
            InstanceSharing::Shared,
        ),
        (Lifetime::Singleton, Some(tag)) => (
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Tagged(tag.clone())),
            InstanceSharing::Shared,
        ),
    };

    LifetimeMapping {
        lifetime,
        sharing,
        ownership: InstanceOwnership::OwnedByLifetimeScope,
    }
}
