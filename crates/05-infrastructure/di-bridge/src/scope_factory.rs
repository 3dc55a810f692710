//! 服务作用域工厂

use crate::scope::BridgedServiceScope;
use di_abstractions::{ServiceScope, ServiceScopeFactory};
use di_common::DependencyResult;
use di_container::LifetimeScope;
use tracing::debug;

/// 在所属生命周期作用域下创建子作用域
#[derive(Debug, Clone)]
pub struct BridgedServiceScopeFactory {
    scope: LifetimeScope,
}

impl BridgedServiceScopeFactory {
    /// 新作用域都以 `scope` 为父作用域
    pub fn new(scope: LifetimeScope) -> Self {
        Self { scope }
    }

    /// 创建具体类型的服务作用域
    pub fn create_bridged_scope(&self) -> DependencyResult<BridgedServiceScope> {
        let child = self.scope.begin_lifetime_scope()?;
        debug!(parent_id = %self.scope.id(), scope_id = %child.id(), "创建服务作用域");
        Ok(BridgedServiceScope::new(child))
    }
}

impl ServiceScopeFactory for BridgedServiceScopeFactory {
    fn create_scope(&self) -> DependencyResult<Box<dyn ServiceScope>> {
        Ok(Box::new(self.create_bridged_scope()?))
    }
}
