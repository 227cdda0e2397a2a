/// Unit tests for container introspection

use anno_di::{Constructible, Container, Instance, Key, ServiceDescriptor, Strategy};

#[test]
fn test_descriptors_are_sorted_by_key() {
    let container = Container::new();
    container.bind("zeta", Constructible::named("Zeta", |_| Ok(0u8))).unwrap();
    container.instance_as("alpha", Instance::new(1u8)).unwrap();
    container.singleton_as("mid", Constructible::named("Mid", |_| Ok(2u8))).unwrap();

    let keys: Vec<String> = container.descriptors().iter().map(|d| d.key.to_string()).collect();
    assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    assert_eq!(container.keys(), vec![Key::new("alpha"), Key::new("mid"), Key::new("zeta")]);
}

#[test]
fn test_descriptor_fields() {
    let container = Container::new();
    container.singleton_as("pool", Constructible::named("Pool", |_| Ok(4usize))).unwrap();
    container.alias("pool", ["connections", "db_pool"]).unwrap();

    let descriptors = container.descriptors();
    assert_eq!(
        descriptors,
        vec![ServiceDescriptor {
            key: Key::new("pool"),
            strategy: Strategy::Singleton,
            service: "Pool".to_string(),
            aliases: vec![Key::new("connections"), Key::new("db_pool")],
        }]
    );
    assert!(descriptors[0].is_aliased());
    assert!(descriptors[0].is_shared());
}

#[test]
fn test_factory_is_not_shared() {
    let container = Container::new();
    container.bind("job", Constructible::named("Job", |_| Ok(0u8))).unwrap();
    let descriptor = &container.descriptors()[0];
    assert_eq!(descriptor.strategy, Strategy::Factory);
    assert!(!descriptor.is_shared());
    assert!(!descriptor.is_aliased());
}

#[test]
fn test_strategy_display() {
    assert_eq!(Strategy::Factory.to_string(), "factory");
    assert_eq!(Strategy::Singleton.to_string(), "singleton");
    assert_eq!(Strategy::Instance.to_string(), "instance");
}
