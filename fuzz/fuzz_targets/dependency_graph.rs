#![no_main]

use anno_di::{Constructible, Container, ContainerConfig, DiError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let nodes = (data[0] % 16) as usize + 1;
    let singleton_mask = data[1];
    let container = Container::with_config(ContainerConfig::default().with_max_depth(64));

    // Remaining bytes are edges: high nibble -> low nibble.
    let mut edges = vec![Vec::new(); nodes];
    for byte in &data[2..] {
        let from = (byte >> 4) as usize % nodes;
        let to = (byte & 0x0f) as usize % nodes;
        edges[from].push(format!("n{}", to));
    }

    for (index, dependencies) in edges.into_iter().enumerate() {
        let node = Constructible::named("Node", |_| Ok(())).with_dependencies(dependencies);
        let name = format!("n{}", index);
        if singleton_mask & (1 << (index % 8)) != 0 {
            container.singleton_as(name, node).unwrap();
        } else {
            container.factory_as(name, node).unwrap();
        }
    }

    for index in 0..nodes {
        match container.make(format!("n{}", index)) {
            Ok(_) => {}
            Err(DiError::Circular(path)) => assert_eq!(path.first(), path.last()),
            Err(DiError::DepthExceeded(depth)) => assert_eq!(depth, 64),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
});
