//! 服务描述符转换
//!
//! 把宿主的有序描述符列表追加为容器注册，并加入两个固定的引导注册。

use crate::context_provider::ContextServiceProvider;
use crate::lifetime_mapping::{map_lifetime, LifetimeMapping};
use crate::provider::BridgingServiceProvider;
use crate::scope_factory::BridgedServiceScopeFactory;
use di_abstractions::{
    ActivatorFn, DeferredFactory, ImplementationSource, ServiceDescriptor, ServiceProvider,
    ServiceScopeFactory,
};
use di_common::{into_instance, ScopeTag};
use di_container::{Activator, ContainerBuilder, ResolveContext};
use std::sync::Arc;
use tracing::debug;

/// 容器构建器的填充扩展
pub trait ContainerBuilderExt {
    /// 追加描述符，单例固定到根作用域
    fn populate<I>(&mut self, descriptors: I) -> &mut Self
    where
        I: IntoIterator<Item = ServiceDescriptor>;

    /// 追加描述符，给定标签时单例固定到带该标签的祖先作用域
    fn populate_with_tag<I>(&mut self, descriptors: I, scope_tag: Option<ScopeTag>) -> &mut Self
    where
        I: IntoIterator<Item = ServiceDescriptor>;
}

impl ContainerBuilderExt for ContainerBuilder {
    fn populate<I>(&mut self, descriptors: I) -> &mut Self
    where
        I: IntoIterator<Item = ServiceDescriptor>,
    {
        populate(self, descriptors, None);
        self
    }

    fn populate_with_tag<I>(&mut self, descriptors: I, scope_tag: Option<ScopeTag>) -> &mut Self
    where
        I: IntoIterator<Item = ServiceDescriptor>,
    {
        populate(self, descriptors, scope_tag);
        self
    }
}

/// 把描述符追加到构建器
///
/// 构建器中已有的注册在枚举时排在前面，之后追加的注册排在后面。
pub fn populate<I>(builder: &mut ContainerBuilder, descriptors: I, scope_tag: Option<ScopeTag>)
where
    I: IntoIterator<Item = ServiceDescriptor>,
{
    register_bootstrap(builder);

    let mut count = 0;
    for descriptor in descriptors {
        register_descriptor(builder, &descriptor, scope_tag.as_ref());
        count += 1;
    }

    debug!(
        descriptors = count,
        scope_tag = scope_tag.as_ref().map(ScopeTag::as_str),
        "服务描述符已填充"
    );
}

fn register_bootstrap(builder: &mut ContainerBuilder) {
    builder
        .register(|context: &ResolveContext| {
            Ok(Arc::new(BridgingServiceProvider::new(context.lifetime_scope().clone()))
                as Arc<dyn ServiceProvider>)
        })
        .instance_per_dependency()
        .externally_owned()
        .described_as("ServiceProvider");

    builder
        .register(|context: &ResolveContext| {
            Ok(Arc::new(BridgedServiceScopeFactory::new(context.lifetime_scope().clone()))
                as Arc<dyn ServiceScopeFactory>)
        })
        .instance_per_lifetime_scope()
        .owned_by_lifetime_scope()
        .described_as("ServiceScopeFactory");
}

fn register_descriptor(
    builder: &mut ContainerBuilder,
    descriptor: &ServiceDescriptor,
    scope_tag: Option<&ScopeTag>,
) {
    let LifetimeMapping {
        lifetime,
        sharing,
        ownership,
    } = map_lifetime(descriptor.lifetime(), scope_tag);
    let service = *descriptor.service();

    let (activator, description) = match descriptor.implementation() {
        ImplementationSource::Type {
            implementation,
            activator,
        } => (bridge_activator(activator.clone()), implementation.to_string()),
        ImplementationSource::Factory(factory) => {
            (bridge_activator(factory.clone()), service.to_string())
        }
        ImplementationSource::Instance(instance) => {
            let instance = instance.clone();
            let activator: Activator = Arc::new(move |_: &ResolveContext| Ok(instance.clone()));
            (activator, service.to_string())
        }
    };

    let id = builder
        .register_activator(activator)
        .as_service(service)
        .with_lifecycle(lifetime, sharing, ownership)
        .on_release(descriptor.release_hooks().clone())
        .described_as(description)
        .id();

    if let ImplementationSource::Factory(factory) = descriptor.implementation() {
        let factory = factory.clone();
        builder
            .register_activator(Arc::new(move |context: &ResolveContext| {
                let scope = context.lifetime_scope().clone();
                let deferred = DeferredFactory::new(
                    service,
                    move || scope.resolve_registration(id),
                    factory.clone(),
                );
                Ok(into_instance(Arc::new(deferred)))
            }))
            .as_service(service.as_factory())
            .instance_per_dependency()
            .externally_owned()
            .described_as(service.as_factory().to_string());
    }
}

/// 让宿主激活函数在容器的解析上下文中运行
fn bridge_activator(activator: ActivatorFn) -> Activator {
    Arc::new(move |context: &ResolveContext| activator(&ContextServiceProvider::new(context)))
}
