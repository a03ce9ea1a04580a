//! Concurrent writers sharing one engine

use crate::common::*;
use canopy::Ente;
use std::sync::{Arc, Barrier};
use std::thread;

/// Distinct children created in parallel all land, each with one relation
#[test]
fn parallel_children_all_linked() {
    const THREADS: usize = 8;
    let canopy = ephemeral();
    let (_, space) = seeded(&canopy.catalog(), "busy");
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let catalog = canopy.catalog();
            let barrier = Arc::clone(&barrier);
            let space_key = space.key.clone();
            thread::spawn(move || {
                let ente = Ente::new(space_key, format!("ente-{i:02}"));
                barrier.wait();
                assert!(catalog.create_ente(&ente).unwrap().applied);
                ente.key
            })
        })
        .collect();
    let keys: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let entes = canopy.catalog().entes_of(&space.key).unwrap();
    assert_eq!(entes.len(), THREADS);
    for key in keys {
        assert_eq!(canopy.ops().list_dlr("test", &key).unwrap().len(), 1);
    }
}

/// Two racing renames of one ente leave exactly one index row
///
/// Both writers may read the same old relation before either commits. The
/// later commit still wins the entity and its DLRel together, so the DLRel
/// points at a relation carrying the stored name; the earlier writer's
/// relation can remain under the space without an index row.
#[test]
fn racing_renames_keep_one_index_row() {
    const ROUNDS: usize = 20;
    let canopy = ephemeral();
    let catalog = canopy.catalog();
    let (_, space) = seeded(&catalog, "space1");

    for round in 0..ROUNDS {
        let ente = Ente::new(space.key(), format!("start-{round:02}"));
        catalog.create_ente(&ente).unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = ["x", "y"]
            .into_iter()
            .map(|suffix| {
                let catalog = canopy.catalog();
                let barrier = Arc::clone(&barrier);
                let mut renamed = ente.clone();
                renamed.name = format!("{suffix}-{round:02}");
                thread::spawn(move || {
                    barrier.wait();
                    assert!(catalog.save(&renamed).unwrap().applied);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = catalog.load::<Ente>(&ente.key).unwrap().unwrap();
        let dlrs = canopy.ops().list_dlr("test", &ente.key).unwrap();
        assert_eq!(dlrs.len(), 1);

        let edges: Vec<_> = catalog
            .entes_of(&space.key)
            .unwrap()
            .into_iter()
            .filter(|r| r.child_key == ente.key)
            .collect();
        assert!(!edges.is_empty() && edges.len() <= 2);
        assert!(edges.iter().all(|r| r.name.ends_with(&format!("-{round:02}"))
            && !r.name.starts_with("start")));
        assert!(edges
            .iter()
            .any(|r| r.key() == dlrs[0].pointer && r.name == stored.name));
    }
}
