//! 服务生命周期与释放

use crate::instance::{downcast_instance, Instance};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// 服务生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// 单例模式 - 整个作用域树内只创建一个实例
    Singleton,
    /// 作用域模式 - 在同一作用域内共享实例
    Scoped,
    /// 瞬时模式 - 每次请求都创建新实例
    #[default]
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        };
        f.write_str(name)
    }
}

/// 生命周期作用域标签
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeTag(String);

impl ScopeTag {
    /// 根作用域使用的标签
    pub const ROOT: &'static str = "root";

    /// 创建标签
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// 根作用域标签
    pub fn root() -> Self {
        Self::new(Self::ROOT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScopeTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ScopeTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl fmt::Display for ScopeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 同步释放资源
///
/// 拥有该服务的作用域被释放时调用，按创建顺序的逆序执行。
pub trait Dispose: Send + Sync {
    /// 释放资源
    fn dispose(&self);
}

/// 异步释放资源
///
/// 异步释放作用域时优先调用；同步释放路径不会执行只有异步实现的钩子。
#[async_trait]
pub trait AsyncDispose: Send + Sync {
    /// 异步释放资源
    async fn dispose_async(&self);
}

type SyncReleaseFn = Arc<dyn Fn(&Instance) + Send + Sync>;
type AsyncReleaseFn = Arc<dyn Fn(Instance) -> BoxFuture<'static, ()> + Send + Sync>;

/// 实例释放钩子
///
/// 由注册方提供，容器在拥有该实例的作用域释放时调用。
#[derive(Clone, Default)]
pub struct ReleaseHooks {
    sync: Option<SyncReleaseFn>,
    asynchronous: Option<AsyncReleaseFn>,
}

impl ReleaseHooks {
    /// 不含任何钩子
    pub fn new() -> Self {
        Self::default()
    }

    /// 为实现 [`Dispose`] 的服务添加同步钩子
    pub fn with_dispose<S>(mut self) -> Self
    where
        S: ?Sized + Dispose + 'static,
    {
        self.sync = Some(Arc::new(|instance: &Instance| {
            if let Ok(service) = downcast_instance::<S>(instance) {
                service.dispose();
            }
        }));
        self
    }

    /// 为实现 [`AsyncDispose`] 的服务添加异步钩子
    pub fn with_async_dispose<S>(mut self) -> Self
    where
        S: ?Sized + AsyncDispose + 'static,
    {
        self.asynchronous = Some(Arc::new(|instance: Instance| {
            Box::pin(async move {
                if let Ok(service) = downcast_instance::<S>(&instance) {
                    service.dispose_async().await;
                }
            }) as BoxFuture<'static, ()>
        }));
        self
    }

    /// 同步和异步钩子都未设置
    pub fn is_empty(&self) -> bool {
        self.sync.is_none() && self.asynchronous.is_none()
    }

    pub fn has_sync(&self) -> bool {
        self.sync.is_some()
    }

    pub fn has_async(&self) -> bool {
        self.asynchronous.is_some()
    }

    /// 同步释放，返回是否执行了钩子
    pub fn release(&self, instance: &Instance) -> bool {
        match &self.sync {
            Some(release) => {
                release(instance);
                true
            }
            None => false,
        }
    }

    /// 异步释放，优先使用异步钩子，否则退回同步钩子
    pub async fn release_async(&self, instance: Instance) {
        match &self.asynchronous {
            Some(release) => release(instance).await,
            None => {
                self.release(&instance);
            }
        }
    }
}

impl fmt::Debug for ReleaseHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseHooks")
            .field("sync", &self.sync.is_some())
            .field("asynchronous", &self.asynchronous.is_some())
            .finish()
    }
}
