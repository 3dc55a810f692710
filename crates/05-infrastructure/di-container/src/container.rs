//! 容器

use crate::config::ContainerConfig;
use crate::registration::Registration;
use crate::scope::LifetimeScope;
use std::ops::Deref;

/// 已构建的容器
///
/// 容器本身就是根生命周期作用域。
#[derive(Debug, Clone)]
pub struct Container {
    root: LifetimeScope,
}

impl Container {
    pub(crate) fn new(registrations: Vec<Registration>, config: ContainerConfig) -> Self {
        Self {
            root: LifetimeScope::root(registrations, config),
        }
    }

    /// 根生命周期作用域
    pub fn root(&self) -> &LifetimeScope {
        &self.root
    }
}

impl Deref for Container {
    type Target = LifetimeScope;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl From<Container> for LifetimeScope {
    fn from(container: Container) -> Self {
        container.root
    }
}
