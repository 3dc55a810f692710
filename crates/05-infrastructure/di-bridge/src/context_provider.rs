//! 解析上下文上的服务提供者
//!
//! 激活器在容器的解析链内运行，描述符的工厂和构造注入通过它解析依赖，
//! 循环依赖检测因此可以跨越宿主抽象。

use di_abstractions::ServiceProvider;
use di_common::{DependencyResult, Instance, ServiceKey};
use di_container::{ComponentResolver, ResolveContext};

pub(crate) struct ContextServiceProvider<'a> {
    context: &'a ResolveContext,
}

impl<'a> ContextServiceProvider<'a> {
    pub(crate) fn new(context: &'a ResolveContext) -> Self {
        Self { context }
    }
}

impl ServiceProvider for ContextServiceProvider<'_> {
    fn get_service(&self, key: &ServiceKey) -> DependencyResult<Option<Instance>> {
        self.context.resolve_optional_key(key)
    }

    fn get_required_service(&self, key: &ServiceKey) -> DependencyResult<Instance> {
        self.context.resolve_key(key)
    }

    fn get_services(&self, key: &ServiceKey) -> DependencyResult<Vec<Instance>> {
        self.context.resolve_all_key(key)
    }
}
