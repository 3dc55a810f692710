//! 桥接层集成测试
//!
//! 宿主描述符经 `populate` 进入容器，再通过桥接提供者和服务作用域解析。

use anyhow::Result;
use async_trait::async_trait;
use component_macros::Injectable;
use di_abstractions::{
    AsyncDispose, DependencyError, Dispose, Lifetime, Options, ServiceCollection,
    ServiceProvider, ServiceProviderExt, ServiceProviderFactory, ServiceScope,
    ServiceScopeFactory,
};
use di_bridge::{
    BridgeOptions, BridgeServiceProviderFactory, BridgedServiceScope, BridgingServiceProvider,
    ContainerBuilderExt, ModuleAccessor, StaticModules,
};
use di_common::ScopeTag;
use di_container::{ComponentResolver, ContainerBuilder, Module};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

trait GreetingService: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Injectable)]
struct EnglishGreeting;

impl GreetingService for EnglishGreeting {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

fn greeting_as_service(greeting: Arc<EnglishGreeting>) -> Arc<dyn GreetingService> {
    greeting
}

/// 记录创建次数的服务
struct Tracked {
    id: usize,
}

fn tracked_factory(
    counter: Arc<AtomicUsize>,
) -> impl Fn(&dyn ServiceProvider) -> di_abstractions::DependencyResult<Arc<Tracked>> + Send + Sync
{
    move |_| {
        Ok(Arc::new(Tracked {
            id: counter.fetch_add(1, Ordering::SeqCst),
        }))
    }
}

fn root_provider(builder: ContainerBuilder) -> BridgingServiceProvider {
    BridgingServiceProvider::new(builder.build().root().clone())
}

fn populated(services: ServiceCollection) -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    builder.populate(services);
    builder
}

#[test]
fn test_transient_service_is_distinct_per_resolution() -> Result<()> {
    let mut services = ServiceCollection::new();
    services.add_as::<dyn GreetingService, EnglishGreeting>(
        Lifetime::Transient,
        greeting_as_service,
    );
    let provider = root_provider(populated(services));

    let first = provider.get_required::<dyn GreetingService>()?;
    let second = provider.get_required::<dyn GreetingService>()?;
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.greet(), "hello");
    Ok(())
}

#[test]
fn test_singleton_is_shared_across_child_scopes() -> Result<()> {
    let mut services = ServiceCollection::new();
    services.add_as::<dyn GreetingService, EnglishGreeting>(
        Lifetime::Singleton,
        greeting_as_service,
    );
    let container = populated(services).build();

    let first = BridgedServiceScope::new(container.begin_lifetime_scope()?);
    let second = BridgedServiceScope::new(container.begin_lifetime_scope()?);

    let a = first.service_provider().get_required::<dyn GreetingService>()?;
    let b = second.service_provider().get_required::<dyn GreetingService>()?;
    assert!(Arc::ptr_eq(&a, &b));
    Ok(())
}

#[test]
fn test_enumeration_keeps_builder_and_descriptor_order() -> Result<()> {
    let mut builder = ContainerBuilder::new();
    builder.register(|_| Ok(Arc::new("builder-1".to_string())));
    builder.register(|_| Ok(Arc::new("builder-2".to_string())));

    let mut services = ServiceCollection::new();
    services
        .add_transient_factory(|_| Ok(Arc::new("factory-1".to_string())))
        .add_transient_factory(|_| Ok(Arc::new("factory-2".to_string())));
    builder.populate(services);

    let provider = root_provider(builder);
    let strings: Vec<String> = provider
        .get_all::<String>()?
        .iter()
        .map(|s| s.as_str().to_owned())
        .collect();

    assert_eq!(strings.len(), 4);
    assert_eq!(strings, vec!["builder-1", "builder-2", "factory-1", "factory-2"]);
    Ok(())
}

#[test]
fn test_registrations_after_populate_enumerate_last() -> Result<()> {
    let mut builder = ContainerBuilder::new();
    builder.register(|_| Ok(Arc::new(1_u32)));

    let mut services = ServiceCollection::new();
    services.add_instance(Arc::new(2_u32));
    builder.populate(services);
    builder.register(|_| Ok(Arc::new(3_u32)));

    let provider = root_provider(builder);
    let values: Vec<u32> = provider.get_all::<u32>()?.iter().map(|v| **v).collect();
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(*provider.get_required::<u32>()?, 3);
    Ok(())
}

/// 在一次解析中两次依赖同一个作用域服务
struct TrackedPair {
    first: Arc<Tracked>,
    second: Arc<Tracked>,
}

fn tracked_pair(provider: &dyn ServiceProvider) -> di_abstractions::DependencyResult<Arc<TrackedPair>> {
    Ok(Arc::new(TrackedPair {
        first: provider.get_required::<Tracked>()?,
        second: provider.get_required::<Tracked>()?,
    }))
}

#[test]
fn test_scoped_service_shared_within_one_resolution() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services
        .add_scoped_factory(tracked_factory(counter.clone()))
        .add_transient_factory(tracked_pair);
    let provider = root_provider(populated(services));

    let scope = provider
        .get_required::<dyn ServiceScopeFactory>()?
        .create_scope()?;
    let pair = scope.service_provider().get_required::<TrackedPair>()?;
    assert!(Arc::ptr_eq(&pair.first, &pair.second));

    let again = scope.service_provider().get_required::<TrackedPair>()?;
    assert!(Arc::ptr_eq(&again.first, &again.second));
    assert!(!Arc::ptr_eq(&pair.first, &again.first));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_each_resolution_gets_its_own_child_scope() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services.add_scoped_factory(tracked_factory(counter.clone()));
    let provider = root_provider(populated(services));

    let a = provider.get_required::<Tracked>()?;
    let b = provider.get_required::<Tracked>()?;
    assert!(!Arc::ptr_eq(&a, &b));

    let scope = BridgedServiceScope::new(provider.lifetime_scope().begin_lifetime_scope()?);
    let c = scope.service_provider().get_required::<Tracked>()?;
    let d = scope.service_provider().get_required::<Tracked>()?;
    assert!(!Arc::ptr_eq(&c, &d));
    assert_eq!(counter.load(Ordering::SeqCst), 4);
    Ok(())
}

#[test]
fn test_scope_factory_is_shared_per_scope() -> Result<()> {
    let container = populated(ServiceCollection::new()).build();

    let a = container.resolve::<dyn ServiceScopeFactory>()?;
    let b = container.resolve::<dyn ServiceScopeFactory>()?;
    assert!(Arc::ptr_eq(&a, &b));

    let scope = a.create_scope()?;
    let nested = scope
        .service_provider()
        .get_required::<dyn ServiceScopeFactory>()?;
    assert!(!Arc::ptr_eq(&a, &nested));
    Ok(())
}

#[test]
fn test_tagged_singleton_lives_in_tagged_ancestor() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services.add_singleton_factory(tracked_factory(counter.clone()));

    let mut builder = ContainerBuilder::new();
    builder.populate_with_tag(services, Some(ScopeTag::new("tenant")));
    let container = builder.build();

    let tenant = container.begin_tagged_lifetime_scope("tenant")?;
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    let request_a = BridgedServiceScope::new(tenant.begin_lifetime_scope()?);
    let request_b = BridgedServiceScope::new(tenant.begin_lifetime_scope()?);
    let a = request_a.service_provider().get_required::<Tracked>()?;
    let b = request_b.service_provider().get_required::<Tracked>()?;
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.id, 0);

    request_a.dispose();
    let again = BridgedServiceScope::new(tenant.begin_lifetime_scope()?);
    assert!(Arc::ptr_eq(
        &a,
        &again.service_provider().get_required::<Tracked>()?
    ));

    let other_tenant = BridgedServiceScope::new(container.begin_tagged_lifetime_scope("tenant")?);
    let c = other_tenant.service_provider().get_required::<Tracked>()?;
    assert!(!Arc::ptr_eq(&a, &c));

    let untagged = BridgedServiceScope::new(container.begin_lifetime_scope()?);
    match untagged.service_provider().get::<Tracked>() {
        Err(DependencyError::NoMatchingScope { tag, .. }) => assert_eq!(tag, "tenant"),
        other => panic!("期望 NoMatchingScope, 实际: {:?}", other.map(|v| v.map(|t| t.id))),
    }
    Ok(())
}

#[test]
fn test_nested_tenant_scopes_own_their_own_singleton() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services.add_singleton_factory(tracked_factory(counter.clone()));

    let mut builder = ContainerBuilder::new();
    builder.populate_with_tag(services, Some(ScopeTag::new("tenant")));
    let container = builder.build();

    let outer = container.begin_tagged_lifetime_scope("tenant")?;
    let inner = outer.begin_tagged_lifetime_scope("tenant")?;

    let request_a = BridgedServiceScope::new(inner.begin_lifetime_scope()?);
    let request_b = BridgedServiceScope::new(inner.begin_lifetime_scope()?);
    let a = request_a.service_provider().get_required::<Tracked>()?;
    let b = request_b.service_provider().get_required::<Tracked>()?;
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &inner.resolve::<Tracked>()?));

    let outer_request = BridgedServiceScope::new(outer.begin_lifetime_scope()?);
    let from_outer = outer_request.service_provider().get_required::<Tracked>()?;
    assert!(!Arc::ptr_eq(&a, &from_outer));
    assert!(Arc::ptr_eq(&from_outer, &outer.resolve::<Tracked>()?));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_factory_descriptor_resolves_as_service_and_factory() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services.add_scoped_factory(tracked_factory(counter.clone()));
    let provider = root_provider(populated(services));

    let direct = provider.get_required::<Tracked>()?;
    let factory = provider.get_factory::<Tracked>()?;

    let from_scope = factory.create()?;
    assert!(Arc::ptr_eq(&from_scope, &factory.create()?));
    assert!(!Arc::ptr_eq(&direct, &from_scope));

    let fresh = factory.create_with(&provider)?;
    assert!(!Arc::ptr_eq(&from_scope, &fresh));
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    Ok(())
}

#[test]
fn test_unregistered_service_optional_vs_required() -> Result<()> {
    let provider = root_provider(populated(ServiceCollection::new()));

    assert!(provider.get::<Tracked>()?.is_none());
    let err = match provider.get_required::<Tracked>() {
        Ok(_) => panic!("未注册的服务不应解析成功"),
        Err(err) => err,
    };
    assert!(err.is_not_registered());
    assert!(provider.get_all::<Tracked>()?.is_empty());
    Ok(())
}

#[test]
fn test_optional_resolution_propagates_creation_failure() {
    let mut services = ServiceCollection::new();
    services.add_transient_factory(|_| -> di_abstractions::DependencyResult<Arc<Tracked>> {
        Err(DependencyError::creation_failed("Tracked", "后端不可用"))
    });
    let provider = root_provider(populated(services));

    assert!(matches!(
        provider.get::<Tracked>(),
        Err(DependencyError::ComponentCreationFailed { .. })
    ));
}

#[test]
fn test_missing_transitive_dependency_is_not_reported_as_unregistered() {
    struct Left;
    struct Missing;

    let mut services = ServiceCollection::new();
    services.add_transient_factory(|provider| {
        provider.get_required::<Missing>()?;
        Ok(Arc::new(Left))
    });
    let provider = root_provider(populated(services));

    let err = match provider.get::<Left>() {
        Ok(_) => panic!("缺少依赖时不应解析成功"),
        Err(err) => err,
    };
    assert!(!err.is_not_registered());
    match err {
        DependencyError::DependencyResolutionFailed { service, source } => {
            assert!(service.contains("Left"));
            assert!(source.is_not_registered());
        }
        other => panic!("期望 DependencyResolutionFailed, 实际: {other:?}"),
    }
}

#[test]
fn test_factory_descriptors_take_part_in_cycle_detection() {
    struct Left;
    struct Right;

    let mut services = ServiceCollection::new();
    services
        .add_transient_factory(|provider| {
            provider.get_required::<Right>()?;
            Ok(Arc::new(Left))
        })
        .add_transient_factory(|provider| {
            provider.get_required::<Left>()?;
            Ok(Arc::new(Right))
        });
    let provider = root_provider(populated(services));

    assert!(matches!(
        provider.get::<Left>(),
        Err(DependencyError::CircularDependency { .. })
    ));
}

#[test]
fn test_service_provider_is_resolvable_from_itself() -> Result<()> {
    let mut services = ServiceCollection::new();
    services.add_singleton_factory(|_| Ok(Arc::new(42_i64)));
    let provider = root_provider(populated(services));

    let inner = provider.get_required::<dyn ServiceProvider>()?;
    assert_eq!(*inner.get_required::<i64>()?, 42);
    Ok(())
}

struct Connection {
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Dispose for Connection {
    fn dispose(&self) {
        self.log.lock().unwrap().push("sync");
    }
}

#[async_trait]
impl AsyncDispose for Connection {
    async fn dispose_async(&self) {
        self.log.lock().unwrap().push("async");
    }
}

fn connection_services(log: Arc<Mutex<Vec<&'static str>>>) -> ServiceCollection {
    let mut services = ServiceCollection::new();
    services.add(
        di_abstractions::ServiceDescriptor::from_factory(Lifetime::Scoped, move |_| {
            Ok(Arc::new(Connection { log: log.clone() }))
        })
        .with_dispose::<Connection>()
        .with_async_dispose::<Connection>(),
    );
    services
}

#[test]
fn test_double_sync_dispose_is_noop() -> Result<()> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = populated(connection_services(log.clone())).build();

    let scope = BridgedServiceScope::new(container.begin_lifetime_scope()?);
    scope.service_provider().get_required::<Connection>()?;

    scope.dispose();
    scope.dispose();
    assert_eq!(*log.lock().unwrap(), vec!["sync"]);
    assert!(scope.is_disposed());
    assert!(scope.provider().lifetime_scope().is_disposed());

    assert!(matches!(
        scope.service_provider().get::<Connection>(),
        Err(DependencyError::ProviderDisposed)
    ));
    Ok(())
}

#[tokio::test]
async fn test_sync_then_async_dispose_releases_once() -> Result<()> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = populated(connection_services(log.clone())).build();

    let scope = BridgedServiceScope::new(container.begin_lifetime_scope()?);
    scope.service_provider().get_required::<Connection>()?;

    scope.dispose();
    scope.dispose_async().await;
    assert_eq!(*log.lock().unwrap(), vec!["sync"]);
    Ok(())
}

#[tokio::test]
async fn test_async_dispose_prefers_async_hook() -> Result<()> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = populated(connection_services(log.clone())).build();

    let scope = BridgedServiceScope::new(container.begin_lifetime_scope()?);
    scope.service_provider().get_required::<Connection>()?;

    scope.dispose_async().await;
    scope.dispose();
    assert_eq!(*log.lock().unwrap(), vec!["async"]);
    Ok(())
}

#[test]
fn test_disposing_child_scope_keeps_root_alive() -> Result<()> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = populated(connection_services(log.clone())).build();

    let scope = BridgedServiceScope::new(container.begin_lifetime_scope()?);
    scope.service_provider().get_required::<Connection>()?;
    scope.dispose();

    assert!(!container.is_disposed());
    assert!(container.resolve::<Connection>().is_ok());
    Ok(())
}

struct AuditModule {
    audits: Arc<AtomicUsize>,
}

struct AuditTrail;

impl Module for AuditModule {
    fn load(&self, builder: &mut ContainerBuilder) {
        let audits = self.audits.clone();
        builder.register(move |_| {
            audits.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(AuditTrail))
        });
    }
}

#[test]
fn test_module_accessor_loads_modules_per_resolution() -> Result<()> {
    let audits = Arc::new(AtomicUsize::new(0));
    let accessor: Arc<dyn ModuleAccessor> = Arc::new(StaticModules::default().with(AuditModule {
        audits: audits.clone(),
    }));

    let mut builder = populated(ServiceCollection::new());
    builder.register_instance(accessor);
    let container = builder.build();
    assert!(container.resolve_optional::<AuditTrail>()?.is_none());

    let provider = BridgingServiceProvider::new(container.begin_lifetime_scope()?);
    provider.get_required::<AuditTrail>()?;
    provider.get_required::<AuditTrail>()?;
    assert_eq!(audits.load(Ordering::SeqCst), 2);

    provider.dispose();
    assert!(provider.lifetime_scope().is_disposed());
    assert!(!container.is_disposed());
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CacheOptions {
    capacity: usize,
    prefix: String,
}

#[test]
fn test_options_are_bound_configured_and_validated() -> Result<()> {
    let mut services = ServiceCollection::new();
    services.add_singleton_factory(|_| Ok(Arc::new("tenant".to_string())));
    services
        .add_options::<CacheOptions>()
        .bind(serde_json::json!({ "capacity": 128 }))
        .configure(|provider, options| {
            options.prefix = provider.get_required::<String>()?.as_str().to_owned();
            Ok(())
        })
        .validate(|options| {
            if options.capacity > 0 {
                Ok(())
            } else {
                Err("capacity 必须大于 0".to_string())
            }
        })
        .register();
    let provider = root_provider(populated(services));

    let options = provider.get_required::<Options<CacheOptions>>()?;
    assert_eq!(options.value().capacity, 128);
    assert_eq!(options.value().prefix, "tenant");
    assert!(Arc::ptr_eq(
        &options,
        &provider.get_required::<Options<CacheOptions>>()?
    ));
    Ok(())
}

#[test]
fn test_invalid_options_fail_resolution() {
    let mut services = ServiceCollection::new();
    services
        .add_options::<CacheOptions>()
        .validate(|options| {
            if options.capacity > 0 {
                Ok(())
            } else {
                Err("capacity 必须大于 0".to_string())
            }
        })
        .register();
    let provider = root_provider(populated(services));

    match provider.get::<Options<CacheOptions>>() {
        Err(DependencyError::OptionsValidationFailed { errors, .. }) => {
            assert_eq!(errors.len(), 1)
        }
        other => panic!("期望选项验证失败, 实际: {:?}", other.map(|o| o.is_some())),
    }
}

#[test]
fn test_provider_factory_builds_bridged_provider() -> Result<()> {
    let options: BridgeOptions = serde_json::from_value(serde_json::json!({
        "container": { "max_resolution_depth": 32 }
    }))?;
    let factory = BridgeServiceProviderFactory::with_options(options)
        .configure_container(|builder| {
            builder.register(|_| Ok(Arc::new(7_u8))).single_instance();
        });

    let mut services = ServiceCollection::new();
    services.add_as::<dyn GreetingService, EnglishGreeting>(
        Lifetime::Singleton,
        greeting_as_service,
    );

    let builder = factory.create_builder(services);
    assert_eq!(builder.config().max_resolution_depth, 32);

    let provider = factory.create_service_provider(builder)?;
    assert_eq!(provider.get_required::<dyn GreetingService>()?.greet(), "hello");
    assert_eq!(*provider.get_required::<u8>()?, 7);
    Ok(())
}
