//! Collaborator interfaces implemented by the host engine
//!
//! The core never owns physics or rendering. It asks the world to
//! instantiate and remove entities and to report material colors.
//! `RecordingWorld` is a plain in-memory implementation used by tests and
//! the native demo.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Opaque handle to an entity owned by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

/// Prefab identifier understood by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrefabId(pub u32);

/// Color lookup on an entity's attached visual
pub trait MaterialLookup {
    /// Color stored under `property`, or `None` if the material lacks it
    fn color_property(&self, property: &str) -> Option<Rgba>;
}

/// Entity lifecycle operations the core calls into
pub trait World {
    type Material: MaterialLookup;

    fn instantiate(&mut self, prefab: PrefabId, position: Vec2, rotation: f32) -> EntityHandle;

    fn remove(&mut self, handle: EntityHandle);

    /// Visual attached to `handle`, if any
    fn material(&self, handle: EntityHandle) -> Option<&Self::Material>;
}

/// Named color properties, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    properties: Vec<(String, Rgba)>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style property setter (replaces an existing property)
    pub fn with_color(mut self, property: &str, color: Rgba) -> Self {
        self.set_color(property, color);
        self
    }

    pub fn set_color(&mut self, property: &str, color: Rgba) {
        match self.properties.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = color,
            None => self.properties.push((property.to_owned(), color)),
        }
    }
}

impl MaterialLookup for Material {
    fn color_property(&self, property: &str) -> Option<Rgba> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, color)| *color)
    }
}

/// A live entity in the recording world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    pub prefab: PrefabId,
    pub position: Vec2,
    pub rotation: f32,
}

/// Journal entry for every instantiate/remove call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldOp {
    Instantiate {
        handle: EntityHandle,
        prefab: PrefabId,
        position: Vec2,
    },
    Remove {
        handle: EntityHandle,
    },
}

/// In-memory world that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingWorld {
    next_id: u32,
    live: BTreeMap<EntityHandle, WorldEntity>,
    materials: HashMap<PrefabId, Material>,
    journal: Vec<WorldOp>,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Attach a material to every entity instantiated from `prefab`
    pub fn set_prefab_material(&mut self, prefab: PrefabId, material: Material) {
        self.materials.insert(prefab, material);
    }

    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&WorldEntity> {
        self.live.get(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live entities created from `prefab`, in handle order
    pub fn live_of(&self, prefab: PrefabId) -> Vec<(EntityHandle, &WorldEntity)> {
        self.live
            .iter()
            .filter(|(_, e)| e.prefab == prefab)
            .map(|(h, e)| (*h, e))
            .collect()
    }

    pub fn journal(&self) -> &[WorldOp] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Instantiations recorded in the journal
    pub fn instantiated(&self) -> impl Iterator<Item = (EntityHandle, PrefabId, Vec2)> + '_ {
        self.journal.iter().filter_map(|op| match op {
            WorldOp::Instantiate {
                handle,
                prefab,
                position,
            } => Some((*handle, *prefab, *position)),
            WorldOp::Remove { .. } => None,
        })
    }

    /// Removals recorded in the journal
    pub fn removed(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.journal.iter().filter_map(|op| match op {
            WorldOp::Remove { handle } => Some(*handle),
            WorldOp::Instantiate { .. } => None,
        })
    }
}

impl World for RecordingWorld {
    type Material = Material;

    fn instantiate(&mut self, prefab: PrefabId, position: Vec2, rotation: f32) -> EntityHandle {
        let handle = EntityHandle(self.next_id.max(1));
        self.next_id = handle.0 + 1;
        self.live.insert(
            handle,
            WorldEntity {
                prefab,
                position,
                rotation,
            },
        );
        self.journal.push(WorldOp::Instantiate {
            handle,
            prefab,
            position,
        });
        handle
    }

    fn remove(&mut self, handle: EntityHandle) {
        if self.live.remove(&handle).is_some() {
            self.journal.push(WorldOp::Remove { handle });
        }
    }

    fn material(&self, handle: EntityHandle) -> Option<&Material> {
        let entity = self.live.get(&handle)?;
        self.materials.get(&entity.prefab)
    }
}
