//! 构造注入

use crate::provider::ServiceProvider;
use di_common::DependencyResult;

/// 可由容器构造的实现类型
///
/// 通常由 `#[derive(Injectable)]` 生成：每个字段从服务提供者解析。
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 从服务提供者解析依赖并构造实例
    fn create(provider: &dyn ServiceProvider) -> DependencyResult<Self>;
}
