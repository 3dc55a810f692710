//! 生命周期作用域
//!
//! 作用域组成一棵树：子作用域持有父作用域，父作用域不感知子作用域。
//! 共享实例缓存在归属作用域中，归属作用域由注册的生命周期决定：
//!
//! - `PerDependency` / `Current`：发起解析的作用域
//! - `Root`：引入该注册的作用域（容器注册对应根作用域）
//! - `Tagged(tag)`：最近的带该标签的祖先作用域（含自身）
//!
//! 作用域释放时按创建顺序的逆序执行其拥有实例的释放钩子。

use crate::builder::ContainerBuilder;
use crate::config::ContainerConfig;
use crate::context::ResolveContext;
use crate::registration::{
    InstanceLifetime, InstanceOwnership, InstanceSharing, Registration, RegistrationId,
    ScopeMatch,
};
use crate::registry::{ComponentRegistry, RegistryId};
use crate::resolver::ComponentResolver;
use dashmap::DashMap;
use di_common::{DependencyError, DependencyResult, Instance, ReleaseHooks, ScopeTag, ServiceKey};
use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

struct OwnedInstance {
    instance: Instance,
    release: ReleaseHooks,
    description: String,
}

struct ScopeInner {
    id: Uuid,
    tag: Option<ScopeTag>,
    parent: Option<LifetimeScope>,
    registry: Arc<ComponentRegistry>,
    /// 本作用域引入的注册层
    introduced: Option<RegistryId>,
    config: Arc<ContainerConfig>,
    shared: DashMap<RegistrationId, Instance>,
    /// 串行化共享实例的创建，同一线程内可重入
    creation: ReentrantMutex<()>,
    owned: Mutex<Vec<OwnedInstance>>,
    disposed: AtomicBool,
}

/// 生命周期作用域
///
/// 克隆得到的是同一个作用域的句柄。
#[derive(Clone)]
pub struct LifetimeScope {
    inner: Arc<ScopeInner>,
}

impl LifetimeScope {
    pub(crate) fn root(registrations: Vec<Registration>, config: ContainerConfig) -> Self {
        let registry = Arc::new(ComponentRegistry::new(registrations, None));
        debug!(
            registrations = registry.len(),
            "创建根生命周期作用域"
        );
        Self::from_parts(
            Some(ScopeTag::root()),
            None,
            registry.clone(),
            Some(registry.id()),
            Arc::new(config),
        )
    }

    fn from_parts(
        tag: Option<ScopeTag>,
        parent: Option<LifetimeScope>,
        registry: Arc<ComponentRegistry>,
        introduced: Option<RegistryId>,
        config: Arc<ContainerConfig>,
    ) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                id: Uuid::new_v4(),
                tag,
                parent,
                registry,
                introduced,
                config,
                shared: DashMap::new(),
                creation: ReentrantMutex::new(()),
                owned: Mutex::new(Vec::new()),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// 开始一个子作用域
    pub fn begin_lifetime_scope(&self) -> DependencyResult<LifetimeScope> {
        self.begin_scope(None, Vec::new())
    }

    /// 开始一个带标签的子作用域
    pub fn begin_tagged_lifetime_scope(
        &self,
        tag: impl Into<ScopeTag>,
    ) -> DependencyResult<LifetimeScope> {
        self.begin_scope(Some(tag.into()), Vec::new())
    }

    /// 开始一个子作用域，并向其追加注册
    ///
    /// 追加的注册只对该作用域及其后代可见。
    pub fn begin_lifetime_scope_with<F>(&self, configure: F) -> DependencyResult<LifetimeScope>
    where
        F: FnOnce(&mut ContainerBuilder),
    {
        let registrations = self.collect_registrations(configure);
        self.begin_scope(None, registrations)
    }

    /// 开始一个带标签的子作用域，并向其追加注册
    pub fn begin_tagged_lifetime_scope_with<F>(
        &self,
        tag: impl Into<ScopeTag>,
        configure: F,
    ) -> DependencyResult<LifetimeScope>
    where
        F: FnOnce(&mut ContainerBuilder),
    {
        let registrations = self.collect_registrations(configure);
        self.begin_scope(Some(tag.into()), registrations)
    }

    fn collect_registrations<F>(&self, configure: F) -> Vec<Registration>
    where
        F: FnOnce(&mut ContainerBuilder),
    {
        let mut builder = ContainerBuilder::with_config(self.config().clone());
        configure(&mut builder);
        builder.into_registrations()
    }

    fn begin_scope(
        &self,
        tag: Option<ScopeTag>,
        registrations: Vec<Registration>,
    ) -> DependencyResult<LifetimeScope> {
        self.ensure_not_disposed()?;

        let (registry, introduced) = if registrations.is_empty() {
            (self.inner.registry.clone(), None)
        } else {
            let layer = Arc::new(ComponentRegistry::new(
                registrations,
                Some(self.inner.registry.clone()),
            ));
            let id = layer.id();
            (layer, Some(id))
        };

        let child = Self::from_parts(
            tag,
            Some(self.clone()),
            registry,
            introduced,
            self.inner.config.clone(),
        );
        debug!(
            scope_id = %child.id(),
            parent_id = %self.id(),
            tag = child.tag().map(ScopeTag::as_str),
            layered = introduced.is_some(),
            "开始生命周期作用域"
        );
        Ok(child)
    }

    /// 作用域唯一标识
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// 作用域标签，根作用域为 `root`
    pub fn tag(&self) -> Option<&ScopeTag> {
        self.inner.tag.as_ref()
    }

    /// 父作用域
    pub fn parent(&self) -> Option<&LifetimeScope> {
        self.inner.parent.as_ref()
    }

    /// 是否已释放
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// 是否缓存了共享实例，或拥有需要释放的实例
    pub fn owns_instances(&self) -> bool {
        !self.inner.shared.is_empty() || !self.inner.owned.lock().is_empty()
    }

    /// 指向本作用域的句柄数量，子作用域持有的父句柄也计算在内
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// 两个句柄是否指向同一个作用域
    pub fn same_scope(&self, other: &LifetimeScope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// 按注册标识解析，遵循该注册的生命周期
    pub fn resolve_registration(&self, id: RegistrationId) -> DependencyResult<Instance> {
        self.ensure_not_disposed()?;
        let registration =
            self.inner
                .registry
                .find(id)
                .ok_or_else(|| DependencyError::ServiceNotRegistered {
                    service: id.to_string(),
                })?;
        self.resolve_registration_in(&registration, &ResolveContext::new(self.clone()))
    }

    pub(crate) fn resolve_key_in(
        &self,
        key: &ServiceKey,
        context: &ResolveContext,
    ) -> DependencyResult<Instance> {
        self.ensure_not_disposed()?;
        let registration = self.inner.registry.default_for(key).ok_or_else(|| {
            DependencyError::ServiceNotRegistered {
                service: key.to_string(),
            }
        })?;
        self.resolve_registration_in(&registration, context)
    }

    pub(crate) fn resolve_optional_key_in(
        &self,
        key: &ServiceKey,
        context: &ResolveContext,
    ) -> DependencyResult<Option<Instance>> {
        self.ensure_not_disposed()?;
        match self.inner.registry.default_for(key) {
            Some(registration) => self.resolve_registration_in(&registration, context).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn resolve_all_key_in(
        &self,
        key: &ServiceKey,
        context: &ResolveContext,
    ) -> DependencyResult<Vec<Instance>> {
        self.ensure_not_disposed()?;
        self.inner
            .registry
            .all_for(key)
            .iter()
            .map(|registration| self.resolve_registration_in(registration, context))
            .collect()
    }

    fn resolve_registration_in(
        &self,
        registration: &Arc<Registration>,
        context: &ResolveContext,
    ) -> DependencyResult<Instance> {
        let _guard = context.enter(registration)?;
        let owner = self.owner_for(registration)?;

        match registration.sharing() {
            InstanceSharing::Shared => owner.shared_instance(registration, context),
            InstanceSharing::None => {
                let instance = registration.activate(&context.with_scope(owner.clone()))?;
                owner.track(registration, &instance);
                trace!(
                    scope_id = %owner.id(),
                    service = %registration.description(),
                    "创建非共享实例"
                );
                Ok(instance)
            }
        }
    }

    fn shared_instance(
        &self,
        registration: &Registration,
        context: &ResolveContext,
    ) -> DependencyResult<Instance> {
        self.ensure_not_disposed()?;
        if let Some(existing) = self.inner.shared.get(&registration.id()) {
            return Ok(existing.clone());
        }

        let _creating = self.inner.creation.lock();
        if let Some(existing) = self.inner.shared.get(&registration.id()) {
            return Ok(existing.clone());
        }

        let instance = registration.activate(&context.with_scope(self.clone()))?;
        self.inner.shared.insert(registration.id(), instance.clone());
        self.track(registration, &instance);
        trace!(
            scope_id = %self.id(),
            service = %registration.description(),
            "创建共享实例"
        );
        Ok(instance)
    }

    /// 选择实例的归属作用域
    fn owner_for(&self, registration: &Registration) -> DependencyResult<LifetimeScope> {
        match registration.lifetime() {
            InstanceLifetime::PerDependency
            | InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Current) => Ok(self.clone()),
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Root) => {
                Ok(self.introducing_scope(registration))
            }
            InstanceLifetime::PerMatchingLifetimeScope(ScopeMatch::Tagged(tag)) => self
                .ancestors()
                .find(|scope| scope.tag() == Some(tag))
                .ok_or_else(|| DependencyError::NoMatchingScope {
                    tag: tag.to_string(),
                    service: registration.description(),
                }),
        }
    }

    fn introducing_scope(&self, registration: &Registration) -> LifetimeScope {
        let mut last = self.clone();
        for scope in self.ancestors() {
            if scope.inner.introduced.is_some() && scope.inner.introduced == registration.registry()
            {
                return scope;
            }
            last = scope;
        }
        last
    }

    /// 自身及全部祖先，由近及远
    fn ancestors(&self) -> impl Iterator<Item = LifetimeScope> {
        std::iter::successors(Some(self.clone()), |scope| scope.parent().cloned())
    }

    fn track(&self, registration: &Registration, instance: &Instance) {
        let release = registration.release_hooks();
        if registration.ownership() == InstanceOwnership::OwnedByLifetimeScope
            && !release.is_empty()
        {
            self.inner.owned.lock().push(OwnedInstance {
                instance: instance.clone(),
                release: release.clone(),
                description: registration.description(),
            });
        }
    }

    fn ensure_not_disposed(&self) -> DependencyResult<()> {
        if self.is_disposed() {
            return Err(DependencyError::ScopeDisposed {
                scope_id: self.id().to_string(),
            });
        }
        Ok(())
    }

    fn take_owned(&self) -> Option<Vec<OwnedInstance>> {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return None;
        }
        let owned = std::mem::take(&mut *self.inner.owned.lock());
        Some(owned)
    }

    /// 同步释放作用域
    ///
    /// 只有异步释放钩子的实例会被跳过。重复调用无效果。
    pub fn dispose(&self) {
        let Some(owned) = self.take_owned() else {
            return;
        };
        let count = owned.len();

        for entry in owned.into_iter().rev() {
            if !entry.release.release(&entry.instance) && entry.release.has_async() {
                warn!(
                    scope_id = %self.id(),
                    service = %entry.description,
                    "同步释放作用域时跳过只支持异步释放的实例"
                );
            }
        }
        self.inner.shared.clear();

        debug!(scope_id = %self.id(), released = count, "生命周期作用域已释放");
    }

    /// 异步释放作用域，优先使用异步释放钩子
    pub async fn dispose_async(&self) {
        let Some(owned) = self.take_owned() else {
            return;
        };
        let count = owned.len();

        for entry in owned.into_iter().rev() {
            entry.release.release_async(entry.instance).await;
        }
        self.inner.shared.clear();

        debug!(scope_id = %self.id(), released = count, "生命周期作用域已异步释放");
    }
}

impl ComponentResolver for LifetimeScope {
    fn resolve_key(&self, key: &ServiceKey) -> DependencyResult<Instance> {
        self.resolve_key_in(key, &ResolveContext::new(self.clone()))
    }

    fn resolve_optional_key(&self, key: &ServiceKey) -> DependencyResult<Option<Instance>> {
        self.resolve_optional_key_in(key, &ResolveContext::new(self.clone()))
    }

    fn resolve_all_key(&self, key: &ServiceKey) -> DependencyResult<Vec<Instance>> {
        self.resolve_all_key_in(key, &ResolveContext::new(self.clone()))
    }

    fn is_registered(&self, key: &ServiceKey) -> bool {
        self.inner.registry.is_registered(key)
    }
}

impl fmt::Debug for LifetimeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeScope")
            .field("id", &self.inner.id)
            .field("tag", &self.inner.tag)
            .field("shared", &self.inner.shared.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
