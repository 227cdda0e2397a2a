use anno_di::{
    Annotation, Arguments, Container, DiError, DiResult, Inject, Injectable, MetadataStore, Reader, ServiceId, Target,
    INJECT,
};
use std::any::Any;
use std::cell::Cell;

#[derive(Debug, Clone, PartialEq)]
struct Route(&'static str);

impl Annotation for Route {
    fn name(&self) -> &str {
        "Route"
    }

    fn targets(&self) -> &'static [Target] {
        &[Target::Method]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone)]
struct Column;

impl Annotation for Column {
    fn name(&self) -> &str {
        "Column"
    }

    fn targets(&self) -> &'static [Target] {
        &[Target::Property]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

thread_local! {
    static ANNOTATE_CALLS: Cell<usize> = Cell::new(0);
}

struct Controller;

impl Injectable for Controller {
    fn annotate(reader: &Reader<'_>) -> DiResult<()> {
        ANNOTATE_CALLS.with(|calls| calls.set(calls.get() + 1));
        reader
            .add_class_annotation(Inject::new(Vec::<ServiceId>::new()))?
            .add_method_annotation("index", Route("/"))?
            .add_method_annotation("show", Route("/:id"))?
            .add_property_annotation("id", Column)?;
        Ok(())
    }

    fn construct(_: Arguments) -> DiResult<Self> {
        Ok(Controller)
    }
}

#[test]
fn test_annotations_are_declared_once() {
    let container = Container::new();
    container.make_type::<Controller>().unwrap();
    container.make_type::<Controller>().unwrap();
    let reader = container.reader::<Controller>().unwrap();

    assert_eq!(ANNOTATE_CALLS.with(Cell::get), 1);
    assert_eq!(reader.class_annotations().len(), 1);
    assert_eq!(reader.method_names(), vec!["index".to_string(), "show".to_string()]);
    assert_eq!(reader.property_names(), vec!["id".to_string()]);
}

#[test]
fn test_method_lookup_by_name() {
    let container = Container::new();
    let reader = container.reader::<Controller>().unwrap();

    let first = reader.method_annotation("Route", None).unwrap();
    assert_eq!(first.as_any().downcast_ref::<Route>(), Some(&Route("/")));

    let show = reader.method_annotation("Route", Some("show")).unwrap();
    assert_eq!(show.as_any().downcast_ref::<Route>(), Some(&Route("/:id")));

    assert!(reader.method_annotation("Route", Some("missing")).is_none());
    assert!(reader.method_annotation("Other", None).is_none());
}

#[test]
fn test_wrong_target_is_rejected() {
    let store = MetadataStore::new();
    let reader = store.reader("app::Thing");

    match reader.add_class_annotation(Route("/")) {
        Err(DiError::AnnotationTarget { annotation, required, given }) => {
            assert_eq!(annotation, "Route");
            assert_eq!(required, "Method");
            assert_eq!(given, "Class");
        }
        other => panic!("expected AnnotationTarget, got {:?}", other.map(|_| ())),
    }
    assert!(reader.add_property_annotation("id", Inject::from("x")).is_err());
    assert!(reader.class_annotations().is_empty());
}

#[test]
fn test_retrieved_lists_are_snapshots() {
    let store = MetadataStore::new();
    let reader = store.reader("app::Thing");
    reader.add_method_annotation("run", Route("/run")).unwrap();

    let mut snapshot = reader.method_annotations("run");
    snapshot.clear();
    assert_eq!(reader.method_annotations("run").len(), 1);

    let mut all = reader.all_method_annotations();
    all.clear();
    assert_eq!(reader.all_method_annotations().len(), 1);
}

#[test]
fn test_typed_class_lookup() {
    let store = MetadataStore::new();
    let reader = store.reader("app::Service");
    reader.add_class_annotation(Inject::new(["a", "b"])).unwrap();

    let inject = reader.class_annotation_as::<Inject>().unwrap();
    assert_eq!(inject.len(), 2);
    assert!(reader.class_annotation(INJECT).is_some());
    assert_eq!(reader.inject().unwrap().dependencies()[1].describe(), "b");
}

#[test]
fn test_unannotated_type_has_no_dependencies() {
    struct Plain;

    impl Injectable for Plain {
        fn construct(args: Arguments) -> DiResult<Self> {
            assert!(args.is_empty());
            Ok(Plain)
        }
    }

    let container = Container::new();
    container.make_type::<Plain>().unwrap();
    assert!(container.reader::<Plain>().unwrap().inject().is_none());
}

#[test]
fn test_failing_annotation_hook_surfaces() {
    struct Misannotated;

    impl Injectable for Misannotated {
        fn annotate(reader: &Reader<'_>) -> DiResult<()> {
            reader.add_method_annotation("new", Inject::from("x"))?;
            Ok(())
        }

        fn construct(_: Arguments) -> DiResult<Self> {
            Ok(Misannotated)
        }
    }

    let container = Container::new();
    assert!(matches!(
        container.make_type::<Misannotated>(),
        Err(DiError::AnnotationTarget { .. })
    ));
}
