#![no_main]

use anno_di::{Container, DiError, Instance};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fuzz_target!(|data: &[u8]| {
    let container = Container::new();

    // Each pair of bytes is one operation on a small name space.
    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 3;
        let left = NAMES[(chunk[0] / 3) as usize % NAMES.len()];
        let right = NAMES[chunk[1] as usize % NAMES.len()];

        match op {
            0 => {
                container.instance_as(left, Instance::new(chunk[1])).unwrap();
            }
            1 => {
                let _ = container.alias(left, [right]);
            }
            _ => match container.make(left) {
                Ok(_) => assert!(container.has(left)),
                Err(DiError::NotFound(_)) => assert!(!container.has(left)),
                Err(other) => panic!("unexpected error for {}: {}", left, other),
            },
        }
    }

    // Every alias must lead to a name the registry can answer for.
    for name in NAMES {
        let _ = container.aliases_of(name);
        let _ = container.make(name);
    }
});
