//! Per-position cell state

use super::material::Material;
use serde::{Deserialize, Serialize};

/// Combustion state of a cell
///
/// `Normal -> Burning -> Burned`, where `Burned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CombustionState {
    /// Unburned (or inert) cell
    #[default]
    Normal = 0,
    /// Actively burning and emitting energy
    Burning = 1,
    /// Burned out
    Burned = 2,
}

impl CombustionState {
    /// All variants in code order
    pub const ALL: [CombustionState; 3] = [
        CombustionState::Normal,
        CombustionState::Burning,
        CombustionState::Burned,
    ];

    /// Numeric code used by the snapshot format
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`CombustionState::code`]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CombustionState::Normal),
            1 => Some(CombustionState::Burning),
            2 => Some(CombustionState::Burned),
            _ => None,
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// One grid position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Combustion state
    pub state: CombustionState,
    /// Material, fixed for the cell's lifetime
    pub material: Material,
    /// Accumulated energy, never decreases
    pub energy: f32,
    /// Steps spent burning
    pub burn_elapsed: f32,
}

impl Cell {
    /// Unburned cell of `material` with no energy
    pub const fn new(material: Material) -> Self {
        Self {
            state: CombustionState::Normal,
            material,
            energy: 0.0,
            burn_elapsed: 0.0,
        }
    }

    /// Burning cell of `material` that has not burned for any step yet
    pub const fn burning(material: Material) -> Self {
        Self {
            state: CombustionState::Burning,
            material,
            energy: 0.0,
            burn_elapsed: 0.0,
        }
    }

    /// Builder-style energy setter
    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = energy;
        self
    }

    #[inline]
    pub fn is_burning(&self) -> bool {
        self.state == CombustionState::Burning
    }

    #[inline]
    pub fn is_burned(&self) -> bool {
        self.state == CombustionState::Burned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_is_blank_air() {
        let cell = Cell::default();
        assert_eq!(cell.material, Material::Air);
        assert_eq!(cell.state, CombustionState::Normal);
        assert_eq!(cell.energy, 0.0);
        assert_eq!(cell.burn_elapsed, 0.0);
    }

    #[test]
    fn test_state_codes() {
        for state in CombustionState::ALL {
            assert_eq!(CombustionState::from_code(state.code()), Some(state));
        }
        assert_eq!(CombustionState::from_code(3), None);
    }

    #[test]
    fn test_builders() {
        let cell = Cell::burning(Material::Wood).with_energy(12.5);
        assert!(cell.is_burning());
        assert!(!cell.is_burned());
        assert_eq!(cell.energy, 12.5);
    }
}
