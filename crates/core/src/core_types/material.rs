//! Materials and their combustion constants
//!
//! Every cell is made of exactly one [`Material`]. The material never changes and
//! selects the [`MaterialProperties`] row used by both physics phases.

use super::cell::CombustionState;
use serde::{Deserialize, Serialize};

/// Number of material variants
pub const MATERIAL_COUNT: usize = 5;

/// Physical type of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Material {
    /// Empty space, never burns
    #[default]
    Air = 0,
    /// Ground, never burns
    Soil = 1,
    /// Trunks and branches
    Wood = 2,
    /// Living foliage
    Leaf = 3,
    /// Fallen, dried foliage on the ground
    DryLeaf = 4,
}

impl Material {
    /// All variants in code order
    pub const ALL: [Material; MATERIAL_COUNT] = [
        Material::Air,
        Material::Soil,
        Material::Wood,
        Material::Leaf,
        Material::DryLeaf,
    ];

    /// Numeric code used by the snapshot format
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Material::code`]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Material::Air),
            1 => Some(Material::Soil),
            2 => Some(Material::Wood),
            3 => Some(Material::Leaf),
            4 => Some(Material::DryLeaf),
            _ => None,
        }
    }

    /// Air and soil take no part in combustion
    #[inline]
    pub const fn is_inert(self) -> bool {
        matches!(self, Material::Air | Material::Soil)
    }

    /// Get material name
    pub fn name(self) -> &'static str {
        match self {
            Material::Air => "Air",
            Material::Soil => "Soil",
            Material::Wood => "Wood",
            Material::Leaf => "Leaf",
            Material::DryLeaf => "Dry Leaf",
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Per-material combustion constants
///
/// Thresholds are compared with `>=` only, so the infinite thresholds of inert
/// materials are never reached and never enter arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Steps a cell stays burning before it is burned out (0 for non-combustibles)
    pub burn_duration: f32,
    /// Energy needed to ignite when at least one neighbor is burning
    pub ignition_threshold_with_source: f32,
    /// Energy needed to ignite with no burning neighbor
    pub ignition_threshold_spontaneous: f32,
    /// Energy emitted to each neighbor per step, indexed by [`CombustionState`]
    pub emitted_energy: [f32; 3],
}

impl MaterialProperties {
    /// Non-combustible: no emission, unreachable thresholds
    pub const INERT: MaterialProperties = MaterialProperties {
        burn_duration: 0.0,
        ignition_threshold_with_source: f32::INFINITY,
        ignition_threshold_spontaneous: f32::INFINITY,
        emitted_energy: [0.0, 0.0, 0.0],
    };

    /// Wood - slow burning
    pub const WOOD: MaterialProperties = MaterialProperties {
        burn_duration: 20.0,
        ignition_threshold_with_source: 5000.0,
        ignition_threshold_spontaneous: 16000.0,
        emitted_energy: [0.0, 2000.0, 0.0],
    };

    /// Leaf - burns out in a single step
    pub const LEAF: MaterialProperties = MaterialProperties {
        burn_duration: 1.0,
        ignition_threshold_with_source: 5000.0,
        ignition_threshold_spontaneous: 16000.0,
        emitted_energy: [0.0, 2000.0, 0.0],
    };

    /// Dry leaf litter
    pub const DRY_LEAF: MaterialProperties = MaterialProperties {
        burn_duration: 1.0,
        ignition_threshold_with_source: 5000.0,
        ignition_threshold_spontaneous: 16000.0,
        emitted_energy: [0.0, 2000.0, 0.0],
    };

    /// Energy emitted to each neighbor by a cell in `state`
    #[inline]
    pub fn emitted(&self, state: CombustionState) -> f32 {
        self.emitted_energy[state.index()]
    }

    /// Threshold applicable to a normal cell, depending on whether a neighbor burns
    #[inline]
    pub fn ignition_threshold(&self, has_burning_neighbor: bool) -> f32 {
        if has_burning_neighbor {
            self.ignition_threshold_with_source
        } else {
            self.ignition_threshold_spontaneous
        }
    }
}

/// Read-only lookup from [`Material`] to [`MaterialProperties`]
///
/// Built once and shared by reference with every step. Lookups are total over
/// the closed material set.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTable {
    rows: [MaterialProperties; MATERIAL_COUNT],
}

impl MaterialTable {
    /// Baseline constants
    pub const fn baseline() -> Self {
        Self {
            rows: [
                MaterialProperties::INERT,    // Air
                MaterialProperties::INERT,    // Soil
                MaterialProperties::WOOD,     // Wood
                MaterialProperties::LEAF,     // Leaf
                MaterialProperties::DRY_LEAF, // DryLeaf
            ],
        }
    }

    /// Replace the constants of a combustible material
    ///
    /// Air and soil keep [`MaterialProperties::INERT`] regardless of `properties`.
    pub fn with_properties(mut self, material: Material, properties: MaterialProperties) -> Self {
        if !material.is_inert() {
            self.rows[material.index()] = properties;
        }
        self
    }

    /// Constants for `material`
    #[inline]
    pub fn properties(&self, material: Material) -> &MaterialProperties {
        &self.rows[material.index()]
    }

    /// Energy a cell of `material` in `state` emits to each neighbor
    #[inline]
    pub fn emitted_energy(&self, material: Material, state: CombustionState) -> f32 {
        self.properties(material).emitted(state)
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::baseline()
    }
}
