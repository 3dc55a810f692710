//! 作用域与提供者工厂抽象接口

use crate::collection::ServiceCollection;
use crate::provider::ServiceProvider;
use async_trait::async_trait;
use di_common::DependencyResult;
use std::sync::Arc;

/// 可释放的服务作用域
///
/// 作用域拥有一个服务提供者，释放作用域即释放其中创建的服务。
/// 同步与异步释放共用一个标记，重复释放不会产生效果。
#[async_trait]
pub trait ServiceScope: Send + Sync {
    /// 该作用域的服务提供者
    fn service_provider(&self) -> Arc<dyn ServiceProvider>;

    /// 同步释放作用域
    fn dispose(&self);

    /// 异步释放作用域
    async fn dispose_async(&self);
}

/// 服务作用域工厂
pub trait ServiceScopeFactory: Send + Sync {
    /// 创建新的服务作用域
    fn create_scope(&self) -> DependencyResult<Box<dyn ServiceScope>>;
}

/// 服务提供者工厂
///
/// 宿主框架通过它接入第三方容器：先把服务集合转换为容器构建器，
/// 再由构建器创建服务提供者。
pub trait ServiceProviderFactory<B>: Send + Sync {
    /// 把服务集合转换为容器构建器
    fn create_builder(&self, services: ServiceCollection) -> B;

    /// 由构建器创建根服务提供者
    fn create_service_provider(&self, builder: B) -> DependencyResult<Arc<dyn ServiceProvider>>;
}
