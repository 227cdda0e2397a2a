use anno_di::{Arguments, Constructible, Container, DiError, Instance, Key, Strategy, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_define_singleton_with_alias_and_callback() {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();

    let container = Container::new();
    container
        .define("cache", Constructible::named("Cache", |_| Ok(Mutex::new(Vec::<u8>::new()))))
        .resolved(move |key: &Key, _: &Value| sink.lock().unwrap().push(key.to_string()))
        .alias("store")
        .singleton()
        .unwrap();

    let a = container.get::<Mutex<Vec<u8>>>("cache").unwrap();
    let b = container.get::<Mutex<Vec<u8>>>("store").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*fired.lock().unwrap(), vec!["cache".to_string()]);

    let descriptor = &container.descriptors()[0];
    assert_eq!(descriptor.strategy, Strategy::Singleton);
    assert_eq!(descriptor.aliases, vec![Key::new("store")]);
}

#[test]
fn test_depends_on_overrides_annotations() {
    let container = Container::new();
    container.instance_as("left", Instance::new(1i32)).unwrap();
    container.instance_as("right", Instance::new(2i32)).unwrap();

    container
        .define(
            "difference",
            Constructible::named("Difference", |mut args: Arguments| {
                Ok(*args.next::<i32>()? - *args.next::<i32>()?)
            }),
        )
        .depends_on(["right", "left"])
        .factory()
        .unwrap();

    assert_eq!(*container.get::<i32>("difference").unwrap(), 1);
}

#[test]
fn test_cached_arguments_are_reused() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();

    let container = Container::new();
    container
        .bind(
            "seed",
            Constructible::named("Seed", move |_| Ok(counter.fetch_add(1, Ordering::SeqCst))),
        )
        .unwrap();
    container
        .define(
            "rng",
            Constructible::named("Rng", |mut args: Arguments| Ok(*args.next::<usize>()?)),
        )
        .depends_on(["seed"])
        .cache_arguments(true)
        .factory()
        .unwrap();

    assert_eq!(*container.get::<usize>("rng").unwrap(), 0);
    assert_eq!(*container.get::<usize>("rng").unwrap(), 0);
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn test_instance_requires_object() {
    let container = Container::new();
    let err = container.define("unit", Instance::new(())).instance().unwrap_err();
    assert_eq!(err.to_string(), "Invalid service definition: Class or Object required, () given.");

    let err = container
        .define("typed", Constructible::named("Typed", |_| Ok(1u8)))
        .instance()
        .unwrap_err();
    assert!(matches!(err, DiError::InvalidDefinition(_)));
}
