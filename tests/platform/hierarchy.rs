//! Hierarchy building and renaming through the catalog

use crate::common::*;
use canopy::{Category, Ente, Property, PropertyType};

#[test]
fn space1_children_alpha_beta() {
    let canopy = ephemeral();
    let catalog = canopy.catalog();
    let (_, space) = seeded(&catalog, "space1");

    for name in ["beta", "alpha"] {
        assert!(catalog.create_ente(&Ente::new(space.key(), name)).unwrap().applied);
    }
    let names: Vec<_> = catalog
        .entes_of(&space.key)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[test]
fn rename_space_updates_instance_listing() {
    let canopy = ephemeral();
    let catalog = canopy.catalog();
    let (instance, mut space) = seeded(&catalog, "before");

    space.name = "after".to_string();
    assert!(catalog.save(&space).unwrap().applied);

    let spaces = catalog.spaces_of(&instance.key).unwrap();
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].name, "after");
    let dlrs = canopy.ops().list_dlr("test", &space.key).unwrap();
    assert_eq!(dlrs.len(), 1);
    assert_eq!(dlrs[0].pointer, spaces[0].key());
}

#[test]
fn deep_chain_and_category_tree() {
    let canopy = ephemeral();
    let catalog = canopy.catalog();
    let (_, space) = seeded(&catalog, "space1");

    let ente = Ente::new(space.key(), "order");
    catalog.create_ente(&ente).unwrap();
    for (name, ty) in [("total", PropertyType::Float), ("placed", PropertyType::Timestamp)] {
        catalog.create_property(&Property::new(ente.key(), name, ty)).unwrap();
    }
    let props: Vec<_> = catalog
        .properties_of(&ente.key)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(props, vec!["placed", "total"]);

    let top = Category::new(space.key(), "top");
    let sub = Category::new(top.key(), "sub");
    catalog.create_category(&top).unwrap();
    catalog.create_category(&sub).unwrap();
    assert_eq!(catalog.parents_of(&sub.key).unwrap(), vec![top.key.clone()]);
    assert_eq!(catalog.categories_of(&top.key).unwrap().len(), 1);
}

#[test]
fn ente_under_missing_space_is_rejected() {
    let canopy = ephemeral();
    let catalog = canopy.catalog();
    let out = catalog.create_ente(&Ente::new("S#gone", "x")).unwrap();
    assert!(!out.parent_found);
    assert_eq!(canopy.ops().store().revision(), 0);
}
