//! Engine demo - annotation-driven wiring of a small car
//!
//! This example demonstrates:
//! - Declaring constructor dependencies with the `Inject` annotation
//! - Auto-registration of types that were never registered
//! - Singleton, factory and instance strategies side by side
//! - Aliases, resolution observers and the fluent `define` builder
//! - Reading container configuration from the environment
//!
//! Run with `RUST_LOG=anno_di=trace cargo run --example engine` to see the
//! container's own tracing output.

use anno_di::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shared fuel tank, one per container
struct FuelTank {
    litres: u32,
}

impl Injectable for FuelTank {
    fn annotate(reader: &Reader<'_>) -> DiResult<()> {
        reader.add_class_annotation(Inject::single("tank_size"))?;
        Ok(())
    }

    fn construct(mut args: Arguments) -> DiResult<Self> {
        Ok(FuelTank {
            litres: *args.next::<u32>()?,
        })
    }
}

struct Wheels {
    count: u8,
}

impl Injectable for Wheels {
    fn construct(_: Arguments) -> DiResult<Self> {
        Ok(Wheels { count: 4 })
    }
}

struct Engine {
    wheels: Arc<Wheels>,
    tank: Arc<FuelTank>,
}

impl Injectable for Engine {
    fn annotate(reader: &Reader<'_>) -> DiResult<()> {
        reader.add_class_annotation(Inject::new([ServiceId::of::<Wheels>(), ServiceId::from("tank")]))?;
        Ok(())
    }

    fn construct(mut args: Arguments) -> DiResult<Self> {
        Ok(Engine {
            wheels: args.next()?,
            tank: args.next()?,
        })
    }
}

impl Engine {
    fn describe(&self) -> String {
        format!("engine on {} wheels with {}l of fuel", self.wheels.count, self.tank.litres)
    }
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🚗 anno-di engine demo\n");

    let container = Container::with_config(ContainerConfig::from_env()?);
    container.add_observer(Arc::new(LoggingObserver::with_prefix("[engine-demo]")));

    container
        .instance_as("tank_size", Instance::new(60u32))?
        .singleton(Constructible::of::<FuelTank>())?
        .alias(ServiceId::of::<FuelTank>(), ["tank"])?;

    container.resolving(ServiceId::of::<Engine>(), |key, _| {
        println!("🔧 assembled a fresh {}", key);
    })?;

    // Engine and Wheels were never registered: both are auto-registered as factories.
    let first = container.make_type::<Engine>()?;
    let second = container.make_type::<Engine>()?;
    println!("1️⃣  {}", first.describe());
    println!("2️⃣  {}", second.describe());
    println!(
        "   same engine: {}, same tank: {}",
        Arc::ptr_eq(&first, &second),
        Arc::ptr_eq(&first.tank, &second.tank)
    );

    container
        .define(
            "horn",
            Constructible::named("Horn", |_| Ok(String::from("beep beep"))),
        )
        .resolved(|key, _| println!("📣 {} installed", key))
        .alias("klaxon")
        .singleton()?;
    println!("📯 {}", container.get::<String>("klaxon")?);

    println!("\n📋 Registered services:");
    for descriptor in container.descriptors() {
        let aliases: Vec<&str> = descriptor.aliases.iter().map(Key::as_str).collect();
        println!(
            "   {:<12} {:<10} {:<10} {}",
            descriptor.key.as_str(),
            descriptor.strategy,
            descriptor.service,
            aliases.join(", ")
        );
    }

    match container.make("steering_wheel") {
        Err(err) => println!("\n❌ {}", err),
        Ok(_) => println!("\n❓ steering wheel appeared from nowhere"),
    }

    Ok(())
}
