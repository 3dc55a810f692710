//! 构造注入宏集成测试

use anyhow::Result;
use component_macros::Injectable;
use di_abstractions::{
    DependencyError, Lifetime, ServiceCollection, ServiceFactory, ServiceProviderExt,
};
use di_bridge::{BridgingServiceProvider, ContainerBuilderExt};
use di_container::ContainerBuilder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Repository: Send + Sync {
    fn name(&self) -> &'static str;
}

#[derive(Injectable)]
struct MemoryRepository;

impl Repository for MemoryRepository {
    fn name(&self) -> &'static str {
        "memory"
    }
}

trait Plugin: Send + Sync {
    fn id(&self) -> u8;
}

struct NumberedPlugin(u8);

impl Plugin for NumberedPlugin {
    fn id(&self) -> u8 {
        self.0
    }
}

struct Ticket(usize);

/// 测试服务
#[derive(Injectable)]
#[injectable(scoped)]
struct OrderService {
    repository: Arc<dyn Repository>,
    audit: Option<Arc<AuditLog>>,
    plugins: Vec<Arc<dyn Plugin>>,
    tickets: ServiceFactory<Ticket>,
    #[inject(default)]
    retries: u32,
}

#[derive(Injectable)]
struct AuditLog;

#[derive(Injectable)]
struct Wrapper(Arc<OrderService>, Arc<OrderService>);

fn provider(services: ServiceCollection) -> BridgingServiceProvider {
    let mut builder = ContainerBuilder::new();
    builder.populate(services);
    BridgingServiceProvider::new(builder.build().root().clone())
}

fn base_services() -> ServiceCollection {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut services = ServiceCollection::new();
    services
        .add_as::<dyn Repository, MemoryRepository>(Lifetime::Singleton, |r| {
            r as Arc<dyn Repository>
        })
        .add_instance(Arc::new(NumberedPlugin(1)) as Arc<dyn Plugin>)
        .add_instance(Arc::new(NumberedPlugin(2)) as Arc<dyn Plugin>)
        .add_transient_factory(move |_| {
            Ok(Arc::new(Ticket(counter.fetch_add(1, Ordering::SeqCst))))
        })
        .add(OrderService::service_descriptor());
    services
}

#[test]
fn test_derive_resolves_every_field_kind() -> Result<()> {
    let provider = provider(base_services());

    let service = provider.get_required::<OrderService>()?;
    assert_eq!(service.repository.name(), "memory");
    assert!(service.audit.is_none());
    assert_eq!(
        service.plugins.iter().map(|p| p.id()).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(service.retries, 0);

    let first = service.tickets.create()?;
    let second = service.tickets.create()?;
    assert_ne!(first.0, second.0);
    Ok(())
}

#[test]
fn test_optional_field_is_filled_when_registered() -> Result<()> {
    let mut services = base_services();
    services.add_transient::<AuditLog>();
    let provider = provider(services);

    assert!(provider.get_required::<OrderService>()?.audit.is_some());
    Ok(())
}

#[test]
fn test_generated_descriptor_uses_declared_lifetime() -> Result<()> {
    let descriptor = OrderService::service_descriptor();
    assert_eq!(descriptor.lifetime(), Lifetime::Scoped);

    let mut services = base_services();
    services.add_transient::<Wrapper>();
    let provider = provider(services);

    let wrapper = provider.get_required::<Wrapper>()?;
    assert!(Arc::ptr_eq(&wrapper.0, &wrapper.1));

    let direct = provider.get_required::<OrderService>()?;
    assert!(!Arc::ptr_eq(&wrapper.0, &direct));
    Ok(())
}

#[test]
fn test_missing_required_dependency_propagates() {
    let mut services = ServiceCollection::new();
    services.add_transient::<Wrapper>();
    let provider = provider(services);

    let err = match provider.get::<Wrapper>() {
        Ok(_) => panic!("缺少依赖时不应构造成功"),
        Err(err) => err,
    };
    assert!(!err.is_not_registered());
    match err {
        DependencyError::DependencyResolutionFailed { service, source } => {
            assert!(service.contains("Wrapper"));
            assert!(source.to_string().contains("OrderService"));
        }
        other => panic!("期望 DependencyResolutionFailed, 实际: {other:?}"),
    }
}
