//! # anno-di
//!
//! Dependency injection with annotation-driven auto-wiring.
//!
//! ## Features
//!
//! - **Strategies**: Factory, Singleton and Instance registrations
//! - **Auto-wiring**: constructor dependencies declared with an `Inject` class annotation
//! - **Auto-registration**: named types resolve without being registered first
//! - **Aliases**: several names for one service, declared before or after it
//! - **Circular dependency detection**: cycles are reported with the full path
//! - **Observers**: callbacks on every fresh resolution
//!
//! ## Quick Start
//!
//! ```rust
//! use anno_di::{Arguments, Container, DiResult, Inject, Injectable, Reader};
//! use std::sync::Arc;
//!
//! struct Wheels {
//!     count: u8,
//! }
//!
//! impl Injectable for Wheels {
//!     fn construct(_: Arguments) -> DiResult<Self> {
//!         Ok(Wheels { count: 4 })
//!     }
//! }
//!
//! struct Engine {
//!     wheels: Arc<Wheels>,
//! }
//!
//! impl Injectable for Engine {
//!     fn annotate(reader: &Reader<'_>) -> DiResult<()> {
//!         reader.add_class_annotation(Inject::single("Wheels"))?;
//!         Ok(())
//!     }
//!
//!     fn construct(mut args: Arguments) -> DiResult<Self> {
//!         Ok(Engine { wheels: args.next()? })
//!     }
//! }
//!
//! let container = Container::new();
//! container.singleton(anno_di::Constructible::of::<Wheels>()).unwrap();
//!
//! // Engine was never registered: it is auto-registered as a factory.
//! let engine = container.make_type::<Engine>().unwrap();
//! assert_eq!(engine.wheels.count, 4);
//!
//! let again = container.make_type::<Engine>().unwrap();
//! assert!(!Arc::ptr_eq(&engine, &again));
//! assert!(Arc::ptr_eq(&engine.wheels, &again.wheels));
//! ```
//!
//! ## Strategies
//!
//! - **Factory**: constructed on every resolution
//! - **Singleton**: constructed once, then cached for the container's lifetime
//! - **Instance**: a pre-built value handed back verbatim
//!
//! ## Identifiers
//!
//! Anything that can be resolved is a [`ServiceId`]: a plain name, a
//! [`Constructible`] type, or an [`Instance`]. Types and instances are keyed
//! by their declared name, so `"Engine"` and `ServiceId::of::<Engine>()`
//! resolve the same registration.
//!
//! ```rust
//! use anno_di::{Constructible, Container, ServiceId};
//!
//! let container = Container::new();
//! container.bind("greeting", Constructible::function(|_| Ok(String::from("hello")))).unwrap();
//! assert_eq!(*container.get::<String>("greeting").unwrap(), "hello");
//!
//! // Unknown plain names are not guessed at.
//! assert!(container.make("missing").is_err());
//! assert!(!container.has("missing"));
//! ```

pub mod annotation;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod id;
pub mod observer;
pub mod registrar;
pub mod resolver;
pub mod service;
pub mod strategy;

pub use annotation::{Annotation, AnnotationRef, Inject, MetadataStore, Reader, Target, INJECT};
pub use config::ContainerConfig;
pub use container::{Container, ResolutionContext};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use id::{short_type_name, Key, ServiceId, ANONYMOUS};
pub use observer::{LoggingObserver, ResolutionObserver};
pub use registrar::Registrar;
pub use resolver::{
    resolver_for, Concrete, Definition, DependencyProvider, FactoryResolver, InstanceResolver, Resolution,
    Resolve, SingletonResolver,
};
pub use service::{Arguments, Constructible, Injectable, Instance, Invocation, Value};
pub use strategy::Strategy;
