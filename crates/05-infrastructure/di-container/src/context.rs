//! 解析上下文
//!
//! 一次顶层解析请求对应一条解析链，激活器通过上下文解析自己的依赖，
//! 链上记录正在激活的注册，用于循环依赖检测和深度限制。

use crate::registration::{Registration, RegistrationId};
use crate::resolver::ComponentResolver;
use crate::scope::LifetimeScope;
use di_common::{DependencyError, DependencyResult, Instance, ServiceKey};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ChainEntry {
    id: RegistrationId,
    description: String,
}

/// 解析上下文
///
/// 激活器收到的唯一参数。解析依赖时使用的作用域是实例的归属作用域：
/// 单例的依赖从根作用域解析，作用域实例的依赖从当前作用域解析。
#[derive(Clone)]
pub struct ResolveContext {
    scope: LifetimeScope,
    chain: Arc<Mutex<Vec<ChainEntry>>>,
}

impl ResolveContext {
    pub(crate) fn new(scope: LifetimeScope) -> Self {
        Self {
            scope,
            chain: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 切换到另一个作用域，共享同一条解析链
    pub(crate) fn with_scope(&self, scope: LifetimeScope) -> Self {
        Self {
            scope,
            chain: self.chain.clone(),
        }
    }

    /// 当前解析所在的生命周期作用域
    pub fn lifetime_scope(&self) -> &LifetimeScope {
        &self.scope
    }

    /// 当前解析链的深度
    pub fn depth(&self) -> usize {
        self.chain.lock().len()
    }

    /// 进入一个注册的激活过程
    pub(crate) fn enter(&self, registration: &Registration) -> DependencyResult<ChainGuard> {
        let config = self.scope.config();
        let mut chain = self.chain.lock();

        if config.enable_circular_dependency_detection
            && chain.iter().any(|entry| entry.id == registration.id())
        {
            let mut path: Vec<&str> = chain
                .iter()
                .skip_while(|entry| entry.id != registration.id())
                .map(|entry| entry.description.as_str())
                .collect();
            let description = registration.description();
            path.push(&description);
            return Err(DependencyError::CircularDependency {
                dependency_chain: path.join(" -> "),
            });
        }

        if chain.len() >= config.max_resolution_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                max_depth: config.max_resolution_depth,
                service: registration.description(),
            });
        }

        chain.push(ChainEntry {
            id: registration.id(),
            description: registration.description(),
        });

        Ok(ChainGuard {
            chain: self.chain.clone(),
        })
    }
}

impl ComponentResolver for ResolveContext {
    fn resolve_key(&self, key: &ServiceKey) -> DependencyResult<Instance> {
        self.scope.resolve_key_in(key, self)
    }

    fn resolve_optional_key(&self, key: &ServiceKey) -> DependencyResult<Option<Instance>> {
        self.scope.resolve_optional_key_in(key, self)
    }

    fn resolve_all_key(&self, key: &ServiceKey) -> DependencyResult<Vec<Instance>> {
        self.scope.resolve_all_key_in(key, self)
    }

    fn is_registered(&self, key: &ServiceKey) -> bool {
        self.scope.is_registered(key)
    }
}

/// 离开激活过程时弹出解析链
pub(crate) struct ChainGuard {
    chain: Arc<Mutex<Vec<ChainEntry>>>,
}

impl Drop for ChainGuard {
    fn drop(&mut self) {
        self.chain.lock().pop();
    }
}
