use component_macros::Injectable;
use di_abstractions::{Lifetime, ServiceProviderExt};
use std::sync::Arc;

#[derive(Injectable)]
#[injectable(transient)]
struct Marker;

#[derive(Injectable)]
#[injectable(scoped)]
struct Holder(Arc<Marker>, #[inject(default)] String);

fn main() {
    assert_eq!(Marker::service_descriptor().lifetime(), Lifetime::Transient);
    assert_eq!(Holder::service_descriptor().lifetime(), Lifetime::Scoped);

    let mut services = di_abstractions::ServiceCollection::new();
    services
        .add(Marker::service_descriptor())
        .add(Holder::service_descriptor());

    let mut builder = di_container::ContainerBuilder::new();
    di_bridge::ContainerBuilderExt::populate(&mut builder, services);
    let provider = di_bridge::BridgingServiceProvider::new(builder.build().root().clone());

    let holder = provider.get_required::<Holder>().unwrap();
    assert!(holder.1.is_empty());
}
