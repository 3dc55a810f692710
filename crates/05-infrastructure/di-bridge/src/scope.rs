//! 服务作用域包装

use crate::provider::BridgingServiceProvider;
use async_trait::async_trait;
use di_abstractions::{ServiceProvider, ServiceScope};
use di_container::LifetimeScope;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 宿主服务作用域
///
/// 拥有唯一的桥接提供者，释放只转发一次。
#[derive(Debug)]
pub struct BridgedServiceScope {
    provider: Arc<BridgingServiceProvider>,
    disposed: AtomicBool,
}

impl BridgedServiceScope {
    /// 以给定的生命周期作用域为基础创建服务作用域
    pub fn new(scope: LifetimeScope) -> Self {
        Self {
            provider: Arc::new(BridgingServiceProvider::new(scope)),
            disposed: AtomicBool::new(false),
        }
    }

    /// 作用域拥有的桥接提供者
    pub fn provider(&self) -> &Arc<BridgingServiceProvider> {
        &self.provider
    }

    /// 是否已释放
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceScope for BridgedServiceScope {
    fn service_provider(&self) -> Arc<dyn ServiceProvider> {
        self.provider.clone()
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.provider.dispose();
        }
    }

    async fn dispose_async(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.provider.dispose_async().await;
        }
    }
}
