//! 组件注册信息
//!
//! 每个注册由激活器加上 "生命周期 / 共享 / 所有权" 三元组描述。

use crate::context::ResolveContext;
use crate::registry::RegistryId;
use di_common::{DependencyResult, Instance, ReleaseHooks, ScopeTag, ServiceKey};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 激活器：在给定解析上下文中创建实例
pub type Activator = Arc<dyn Fn(&ResolveContext) -> DependencyResult<Instance> + Send + Sync>;

/// 注册唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

impl RegistrationId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registration-{}", self.0)
    }
}

/// 共享实例所归属的作用域
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeMatch {
    /// 发起解析的作用域
    Current,
    /// 引入该注册的根作用域
    Root,
    /// 最近的带指定标签的祖先作用域（含自身）
    Tagged(ScopeTag),
}

/// 实例生命周期策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceLifetime {
    /// 每次依赖都创建新实例
    PerDependency,
    /// 每个匹配的生命周期作用域一个实例
    PerMatchingLifetimeScope(ScopeMatch),
}

/// 实例共享模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSharing {
    None,
    Shared,
}

/// 实例所有权
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceOwnership {
    /// 由生命周期作用域负责释放
    OwnedByLifetimeScope,
    /// 容器不负责释放
    ExternallyOwned,
}

/// 组件注册信息
pub struct Registration {
    id: RegistrationId,
    services: Vec<ServiceKey>,
    activator: Activator,
    lifetime: InstanceLifetime,
    sharing: InstanceSharing,
    ownership: InstanceOwnership,
    release: ReleaseHooks,
    description: Option<String>,
    registry: Option<RegistryId>,
}

impl Registration {
    pub(crate) fn new(activator: Activator) -> Self {
        Self {
            id: RegistrationId::next(),
            services: Vec::new(),
            activator,
            lifetime: InstanceLifetime::PerDependency,
            sharing: InstanceSharing::None,
            ownership: InstanceOwnership::OwnedByLifetimeScope,
            release: ReleaseHooks::default(),
            description: None,
            registry: None,
        }
    }

    /// 以指定服务键暴露
    pub fn as_service(&mut self, key: ServiceKey) -> &mut Self {
        if !self.services.contains(&key) {
            self.services.push(key);
        }
        self
    }

    /// 以服务类型 `S` 暴露
    pub fn as_type<S: ?Sized + 'static>(&mut self) -> &mut Self {
        self.as_service(ServiceKey::of::<S>())
    }

    /// 每次解析创建新实例
    pub fn instance_per_dependency(&mut self) -> &mut Self {
        self.with_lifecycle(
            InstanceLifetime::PerDependency,
            InstanceSharing::None,
            self.ownership,
        )
    }

    /// 每个生命周期作用域一个实例
    pub fn instance_per_lifetime_scope(&mut self) -> &mut Self {
        self.with_lifecycle(
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Current),
            InstanceSharing::Shared,
            self.ownership,
        )
    }

    /// 由引入该注册的作用域持有唯一实例
    pub fn single_instance(&mut self) -> &mut Self {
        self.with_lifecycle(
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Root),
            InstanceSharing::Shared,
            self.ownership,
        )
    }

    /// 每个带 `tag` 标签的作用域一个实例，归属最近的匹配祖先
    pub fn instance_per_matching_lifetime_scope(&mut self, tag: impl Into<ScopeTag>) -> &mut Self {
        self.with_lifecycle(
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Tagged(tag.into())),
            InstanceSharing::Shared,
            self.ownership,
        )
    }

    /// 一次性设置生命周期、共享模式和所有权
    pub fn with_lifecycle(
        &mut self,
        lifetime: InstanceLifetime,
        sharing: InstanceSharing,
        ownership: InstanceOwnership,
    ) -> &mut Self {
        self.lifetime = lifetime;
        self.sharing = sharing;
        self.ownership = ownership;
        self
    }

    /// 实例不由作用域释放
    pub fn externally_owned(&mut self) -> &mut Self {
        self.ownership = InstanceOwnership::ExternallyOwned;
        self
    }

    /// 实例由归属作用域释放
    pub fn owned_by_lifetime_scope(&mut self) -> &mut Self {
        self.ownership = InstanceOwnership::OwnedByLifetimeScope;
        self
    }

    /// 设置释放钩子
    pub fn on_release(&mut self, hooks: ReleaseHooks) -> &mut Self {
        self.release = hooks;
        self
    }

    /// 设置日志和错误信息中使用的描述
    pub fn described_as(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// 该注册暴露的服务键
    pub fn services(&self) -> &[ServiceKey] {
        &self.services
    }

    pub fn lifetime(&self) -> &InstanceLifetime {
        &self.lifetime
    }

    pub fn sharing(&self) -> InstanceSharing {
        self.sharing
    }

    pub fn ownership(&self) -> InstanceOwnership {
        self.ownership
    }

    pub fn release_hooks(&self) -> &ReleaseHooks {
        &self.release
    }

    /// 人类可读的描述，用于错误信息和日志
    pub fn description(&self) -> String {
        match (&self.description, self.services.first()) {
            (Some(description), _) => description.clone(),
            (None, Some(service)) => service.to_string(),
            (None, None) => self.id.to_string(),
        }
    }

    pub(crate) fn registry(&self) -> Option<RegistryId> {
        self.registry
    }

    pub(crate) fn attach_to(&mut self, registry: RegistryId) {
        self.registry = Some(registry);
    }

    /// 执行激活器，依赖缺失被改写为本注册的解析失败
    pub(crate) fn activate(&self, context: &ResolveContext) -> DependencyResult<Instance> {
        (self.activator)(context).map_err(|err| err.within_activation(self.description()))
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("services", &self.services)
            .field("lifetime", &self.lifetime)
            .field("sharing", &self.sharing)
            .field("ownership", &self.ownership)
            .field("release", &self.release)
            .field("activator", &"<function>")
            .finish()
    }
}
