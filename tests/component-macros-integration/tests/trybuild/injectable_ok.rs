use component_macros::Injectable;
use di_abstractions::{Lifetime, ServiceCollection, ServiceFactory, ServiceProviderExt};
use di_bridge::{BridgingServiceProvider, ContainerBuilderExt};
use di_container::ContainerBuilder;
use std::sync::Arc;

#[derive(Injectable)]
struct Clock;

#[derive(Injectable)]
struct Cache;

#[derive(Injectable)]
#[injectable(singleton)]
struct Catalog {
    clock: Arc<Clock>,
    cache: Option<Arc<Cache>>,
    clocks: Vec<Arc<Clock>>,
    later: ServiceFactory<Clock>,
    #[inject(default)]
    hits: u64,
}

fn main() {
    let mut services = ServiceCollection::new();
    services.add_transient::<Clock>().add(Catalog::service_descriptor());
    assert_eq!(Catalog::service_descriptor().lifetime(), Lifetime::Singleton);

    let mut builder = ContainerBuilder::new();
    builder.populate(services);
    let provider = BridgingServiceProvider::new(builder.build().root().clone());

    let catalog = provider.get_required::<Catalog>().unwrap();
    let _ = &catalog.clock;
    assert!(catalog.cache.is_none());
    assert_eq!(catalog.clocks.len(), 1);
    assert!(catalog.later.create().is_ok());
    assert_eq!(catalog.hits, 0);
}
