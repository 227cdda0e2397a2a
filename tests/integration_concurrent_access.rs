use anno_di::{Arguments, Constructible, Container, DiResult, Inject, Injectable, Instance, Reader};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

#[test]
fn test_singleton_constructed_once_across_threads() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let container = Container::new();
    container
        .singleton_as(
            "pool",
            Constructible::named("Pool", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(std::time::Duration::from_millis(5));
                Ok(vec![0u8; 16])
            }),
        )
        .unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.get::<Vec<u8>>("pool").unwrap()
            })
        })
        .collect();

    let pools: Vec<Arc<Vec<u8>>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(built.load(Ordering::SeqCst), 1);
    for pool in &pools[1..] {
        assert!(Arc::ptr_eq(&pools[0], pool));
    }
}

struct Worker {
    id: Arc<usize>,
}

impl Injectable for Worker {
    fn annotate(reader: &Reader<'_>) -> DiResult<()> {
        reader.add_class_annotation(Inject::single("worker_id"))?;
        Ok(())
    }

    fn construct(mut args: Arguments) -> DiResult<Self> {
        Ok(Worker { id: args.next()? })
    }
}

#[test]
fn test_concurrent_auto_registration() {
    let container = Container::new();
    container.instance_as("worker_id", Instance::new(7usize)).unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    let worker = container.make_type::<Worker>().unwrap();
                    assert_eq!(*worker.id, 7);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(container.keys().len(), 2);
    assert_eq!(container.reader::<Worker>().unwrap().class_annotations().len(), 1);
}

#[test]
fn test_registration_while_resolving() {
    let container = Container::new();
    container.instance_as("base", Instance::new(1u32)).unwrap();

    let writer = {
        let container = container.clone();
        thread::spawn(move || {
            for i in 0..100u32 {
                container.instance_as(format!("extra{}", i), Instance::new(i)).unwrap();
            }
        })
    };
    let reader = {
        let container = container.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                assert_eq!(*container.get::<u32>("base").unwrap(), 1);
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(container.keys().len(), 101);
}
