use anno_di::{Constructible, Container, Instance, Key, LoggingObserver, ResolutionObserver, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ResolutionObserver for Recorder {
    fn resolved(&self, key: &Key, _value: &Value) {
        self.events.lock().unwrap().push(key.to_string());
    }
}

#[test]
fn test_singleton_fires_once() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());
    container.singleton_as("config", Constructible::named("Config", |_| Ok(1u8))).unwrap();

    for _ in 0..3 {
        container.make("config").unwrap();
    }
    assert_eq!(recorder.events(), vec!["config"]);
}

#[test]
fn test_factory_fires_every_time() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());
    container.bind("request", Constructible::named("Request", |_| Ok(1u8))).unwrap();

    container.make("request").unwrap();
    container.make("request").unwrap();
    assert_eq!(recorder.events(), vec!["request", "request"]);
}

#[test]
fn test_instance_fires_on_first_resolution_only() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());
    container.instance_as("token", Instance::new(String::from("abc"))).unwrap();

    container.make("token").unwrap();
    container.make("token").unwrap();
    assert_eq!(recorder.events(), vec!["token"]);
}

#[test]
fn test_keyed_observer_sees_only_its_service() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let container = Container::new();
    container.bind("a", Constructible::named("A", |_| Ok(1u8))).unwrap();
    container.bind("b", Constructible::named("B", |_| Ok(2u8))).unwrap();
    container
        .resolving("b", move |key: &Key, value: &Value| {
            let n = value.downcast_ref::<u8>().copied().unwrap_or_default();
            sink.lock().unwrap().push((key.to_string(), n));
        })
        .unwrap();

    container.make("a").unwrap();
    container.make("b").unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![("b".to_string(), 2u8)]);
}

#[test]
fn test_observer_on_alias_receives_canonical_key() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let container = Container::new();
    container.bind("mailer", Constructible::named("Mailer", |_| Ok(()))).unwrap();
    container.alias("mailer", ["smtp"]).unwrap();
    container
        .resolving("smtp", move |key: &Key, _: &Value| sink.lock().unwrap().push(key.to_string()))
        .unwrap();

    container.make("smtp").unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["mailer".to_string()]);
}

#[test]
fn test_dependencies_are_observed_before_dependents() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());
    container.bind("leaf", Constructible::named("Leaf", |_| Ok(0u8))).unwrap();
    container
        .bind("root", Constructible::named("Root", |_| Ok(1u8)).with_dependencies(["leaf"]))
        .unwrap();

    container.make("root").unwrap();
    assert_eq!(recorder.events(), vec!["leaf", "root"]);
}

#[test]
fn test_failed_resolution_is_not_observed() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());
    container
        .bind("root", Constructible::named("Root", |_| Ok(1u8)).with_dependencies(["missing"]))
        .unwrap();

    assert!(container.make("root").is_err());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_logging_observer_emits_events() {
    let subscriber = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().finish();
    tracing::subscriber::with_default(subscriber, || {
        let container = Container::new();
        container.add_observer(Arc::new(LoggingObserver::with_prefix("[test]")));
        container.instance_as("value", Instance::new(5u8)).unwrap();
        assert_eq!(*container.get::<u8>("value").unwrap(), 5);
    });
}
