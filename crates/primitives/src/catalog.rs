//! Catalog: stateless facade over the CRUD engine for the domain hierarchy
//!
//! Holds only a [`CrudOperation`]; every method is one engine call. Location
//! tags follow `<kind>.<operation>` so errors and logs name the call site.

use canopy_core::{CanopyResult, EntityRelation, RelationRecord};
use canopy_engine::{CrudOperation, LinkOutcome, RelWrite};

use crate::category::Category;
use crate::ente::Ente;
use crate::instance::Instance;
use crate::keys::{Keyed, ENTE_PROPERTY, INSTANCE_SPACE, SPACE_ENTE};
use crate::property::Property;
use crate::space::Space;

/// Creates, renames and lists domain entities
#[derive(Debug, Clone)]
pub struct Catalog {
    ops: CrudOperation,
}

impl Catalog {
    /// Catalog over `ops`
    pub fn new(ops: CrudOperation) -> Self {
        Catalog { ops }
    }

    /// Underlying CRUD operations
    pub fn ops(&self) -> &CrudOperation {
        &self.ops
    }

    /// Create an instance; false if the key was taken
    pub fn create_instance(&self, instance: &Instance) -> CanopyResult<bool> {
        self.ops.create("instance.create", instance)
    }

    /// Create a space under its instance
    pub fn create_space(&self, space: &Space) -> CanopyResult<RelWrite> {
        self.ops.create_with_rel("space.create", space)
    }

    /// Create an ente under its space
    pub fn create_ente(&self, ente: &Ente) -> CanopyResult<RelWrite> {
        self.ops.create_with_rel("ente.create", ente)
    }

    /// Create a category under its space or parent category
    pub fn create_category(&self, category: &Category) -> CanopyResult<RelWrite> {
        self.ops.create_with_rel("category.create", category)
    }

    /// Create a property under its ente
    pub fn create_property(&self, property: &Property) -> CanopyResult<RelWrite> {
        self.ops.create_with_rel("property.create", property)
    }

    /// Upsert any hierarchy entity; a changed name relinks all its relations
    pub fn save<E: EntityRelation>(&self, entity: &E) -> CanopyResult<RelWrite> {
        let location = format!("{}.save", entity.kind());
        self.ops.put_with_rel(&location, entity)
    }

    /// Load the entity stored under `key`
    pub fn load<E: Keyed>(&self, key: &str) -> CanopyResult<Option<E>> {
        let mut out = E::with_key(key);
        let location = format!("{}.load", out.kind());
        let found = self.ops.get(&location, &mut out)?;
        Ok(found.then_some(out))
    }

    /// Also list `category_key` under `parent_key` (a space or a category)
    pub fn link_category(&self, category_key: &str, parent_key: &str) -> CanopyResult<LinkOutcome> {
        let mut category = Category::with_key(category_key);
        let parent = parent_key.to_string();
        self.ops.link_to(
            "category.link",
            &mut category,
            parent_key,
            move |c| c.parent_key = parent,
            None,
        )
    }

    /// Spaces of an instance, by name
    pub fn spaces_of(&self, instance_key: &str) -> CanopyResult<Vec<RelationRecord>> {
        self.ops
            .list_children("instance.spaces", instance_key, INSTANCE_SPACE, 0)
    }

    /// Entes of a space, by name
    pub fn entes_of(&self, space_key: &str) -> CanopyResult<Vec<RelationRecord>> {
        self.ops.list_children("space.entes", space_key, SPACE_ENTE, 0)
    }

    /// Categories directly under a space or a category, by name
    pub fn categories_of(&self, parent_key: &str) -> CanopyResult<Vec<RelationRecord>> {
        self.ops.list_children(
            "category.children",
            parent_key,
            Category::tag_for(parent_key),
            0,
        )
    }

    /// Properties of an ente, by name
    pub fn properties_of(&self, ente_key: &str) -> CanopyResult<Vec<RelationRecord>> {
        self.ops
            .list_children("ente.properties", ente_key, ENTE_PROPERTY, 0)
    }

    /// Parent keys of `child_key` (one per relation)
    pub fn parents_of(&self, child_key: &str) -> CanopyResult<Vec<String>> {
        Ok(self
            .ops
            .list_dlr("relation.parents", child_key)?
            .into_iter()
            .map(|dlr| dlr.parent_id)
            .collect())
    }
}
