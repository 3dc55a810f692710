//! 作用域桥接服务提供者
//!
//! 每次解析都在基础作用域下开启一个子作用域，先把模块访问器给出的模块加载进去，再从子作用域解析。
//! 作用域内共享的服务因此只在一次解析的对象图内共享。
//!
//! 解析结束后，子作用域若缓存了实例、拥有待释放实例或仍被其他句柄引用，就由提供者持有，
//! 提供者释放时一并释放；否则直接丢弃。

use crate::module_accessor::ModuleAccessor;
use di_abstractions::ServiceProvider;
use di_common::{DependencyError, DependencyResult, Instance, ServiceKey};
use di_container::{ComponentResolver, LifetimeScope, Module};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// 作用域桥接服务提供者
pub struct BridgingServiceProvider {
    base: LifetimeScope,
    children: Mutex<Vec<LifetimeScope>>,
    disposed: AtomicBool,
}

impl BridgingServiceProvider {
    /// 在给定的基础作用域上创建提供者，提供者释放时基础作用域随之释放
    pub fn new(base: LifetimeScope) -> Self {
        Self {
            base,
            children: Mutex::new(Vec::new()),
            disposed: AtomicBool::new(false),
        }
    }

    /// 基础生命周期作用域
    pub fn lifetime_scope(&self) -> &LifetimeScope {
        &self.base
    }

    /// 是否已释放
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// 当前持有的单次解析子作用域数量
    pub fn retained_scopes(&self) -> usize {
        self.children.lock().len()
    }

    /// 解析服务
    ///
    /// `required` 为 `false` 时只有未注册返回 `Ok(None)`，其他错误照常返回。
    pub fn resolve(&self, key: &ServiceKey, required: bool) -> DependencyResult<Option<Instance>> {
        self.in_child_scope(|scope| {
            if required {
                scope.resolve_key(key).map(Some)
            } else {
                scope.resolve_optional_key(key)
            }
        })
    }

    fn in_child_scope<T>(
        &self,
        resolve: impl FnOnce(&LifetimeScope) -> DependencyResult<T>,
    ) -> DependencyResult<T> {
        let child = self.begin_child()?;
        let result = resolve(&child);
        self.retain(child);
        result
    }

    fn begin_child(&self) -> DependencyResult<LifetimeScope> {
        if self.is_disposed() {
            return Err(DependencyError::ProviderDisposed);
        }

        let modules = self.modules()?;
        let child = self.base.begin_lifetime_scope_with(|builder| {
            for module in &modules {
                builder.register_module(module.as_ref());
            }
        })?;
        trace!(
            base_id = %self.base.id(),
            scope_id = %child.id(),
            modules = modules.len(),
            "开始单次解析子作用域"
        );
        Ok(child)
    }

    fn retain(&self, child: LifetimeScope) {
        if !child.owns_instances() && child.handle_count() == 1 {
            trace!(scope_id = %child.id(), "子作用域未持有实例, 直接丢弃");
            return;
        }

        let mut children = self.children.lock();
        if self.is_disposed() {
            drop(children);
            child.dispose();
            return;
        }
        children.push(child);
    }

    fn modules(&self) -> DependencyResult<Vec<Arc<dyn Module>>> {
        Ok(self
            .base
            .resolve_optional::<dyn ModuleAccessor>()?
            .map(|accessor| accessor.modules())
            .unwrap_or_default())
    }

    fn take_children(&self) -> Option<Vec<LifetimeScope>> {
        let mut children = self.children.lock();
        if self.disposed.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(std::mem::take(&mut *children))
    }

    /// 释放子作用域和基础作用域，重复调用无效果
    pub fn dispose(&self) {
        let Some(children) = self.take_children() else {
            return;
        };
        for child in children.iter().rev() {
            child.dispose();
        }
        self.base.dispose();
        debug!(
            scope_id = %self.base.id(),
            children = children.len(),
            "服务提供者已释放"
        );
    }

    /// 异步释放子作用域和基础作用域
    pub async fn dispose_async(&self) {
        let Some(children) = self.take_children() else {
            return;
        };
        for child in children.iter().rev() {
            child.dispose_async().await;
        }
        self.base.dispose_async().await;
        debug!(
            scope_id = %self.base.id(),
            children = children.len(),
            "服务提供者已异步释放"
        );
    }
}

impl ServiceProvider for BridgingServiceProvider {
    fn get_service(&self, key: &ServiceKey) -> DependencyResult<Option<Instance>> {
        self.resolve(key, false)
    }

    fn get_required_service(&self, key: &ServiceKey) -> DependencyResult<Instance> {
        self.resolve(key, true)?
            .ok_or_else(|| DependencyError::ServiceNotRegistered {
                service: key.to_string(),
            })
    }

    fn get_services(&self, key: &ServiceKey) -> DependencyResult<Vec<Instance>> {
        self.in_child_scope(|scope| scope.resolve_all_key(key))
    }
}

impl fmt::Debug for BridgingServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgingServiceProvider")
            .field("base", &self.base)
            .field("children", &self.retained_scopes())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
