//! Device table.

use crate::bank::Bank;
use crate::error::ChipError;
use serde::Serialize;

/// Lowest local tile column, part of the two-tile margin.
pub const DIE_X_MIN: i32 = -2;
/// Highest local tile column.
pub const DIE_X_MAX: i32 = 163;
/// Lowest local tile row.
pub const DIE_Y_MIN: i32 = -2;
/// Highest local tile row.
pub const DIE_Y_MAX: i32 = 131;
/// Tile columns per die, margin included.
pub const DIE_COLUMNS: i32 = DIE_X_MAX - DIE_X_MIN + 1;
/// Tile rows per die, margin included.
pub const DIE_ROWS: i32 = DIE_Y_MAX - DIE_Y_MIN + 1;

/// A package option and the banks it bonds out on every die.
#[derive(Debug, Serialize)]
pub struct Package {
    /// Package name.
    pub name: &'static str,
    /// Bonded banks.
    pub banks: &'static [Bank],
}

/// A device of the family.
#[derive(Debug, Serialize)]
pub struct Chip {
    /// Part name, e.g. `CCGM1A1`.
    pub name: &'static str,
    /// Die columns.
    pub dies_x: u32,
    /// Die rows.
    pub dies_y: u32,
    /// Available packages.
    pub packages: &'static [Package],
}

const ALL_BANKS: &[Bank] = &Bank::ALL;
const BGA_BANKS: &[Bank] = &[Bank::N1, Bank::N2, Bank::E1, Bank::E2, Bank::W1, Bank::W2, Bank::S3];

/// Known devices.
pub const CHIPS: &[Chip] = &[
    Chip {
        name: "CCGM1A1",
        dies_x: 1,
        dies_y: 1,
        packages: &[
            Package {
                name: "FBGA324",
                banks: ALL_BANKS,
            },
            Package {
                name: "BGA196",
                banks: BGA_BANKS,
            },
        ],
    },
    Chip {
        name: "CCGM1A2",
        dies_x: 1,
        dies_y: 2,
        packages: &[Package {
            name: "FBGA324",
            banks: ALL_BANKS,
        }],
    },
    Chip {
        name: "CCGM1A4",
        dies_x: 2,
        dies_y: 2,
        packages: &[Package {
            name: "FBGA324",
            banks: ALL_BANKS,
        }],
    },
];

/// Looks up a device by name, ignoring case.
///
/// # Errors
///
/// Returns [`ChipError::UnknownDevice`] if no device matches.
pub fn chip(name: &str) -> Result<&'static Chip, ChipError> {
    CHIPS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ChipError::UnknownDevice(name.to_string()))
}

impl Chip {
    /// Number of dies.
    pub fn die_count(&self) -> u32 {
        self.dies_x * self.dies_y
    }

    /// Total tile columns across all dies.
    pub fn columns(&self) -> i32 {
        DIE_COLUMNS * self.dies_x as i32
    }

    /// Total tile rows across all dies.
    pub fn rows(&self) -> i32 {
        DIE_ROWS * self.dies_y as i32
    }

    /// Looks up a package of this device, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ChipError::UnknownPackage`] if the device has no such package.
    pub fn package(&self, name: &str) -> Result<&'static Package, ChipError> {
        self.packages
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ChipError::UnknownPackage {
                device: self.name.to_string(),
                package: name.to_string(),
            })
    }
}

impl Package {
    /// Returns `true` if the package bonds out `bank`.
    pub fn bonds(&self, bank: Bank) -> bool {
        self.banks.contains(&bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_extent() {
        assert_eq!(DIE_COLUMNS, 166);
        assert_eq!(DIE_ROWS, 134);
    }

    #[test]
    fn known_devices() {
        let a1 = chip("CCGM1A1").unwrap();
        assert_eq!((a1.dies_x, a1.dies_y), (1, 1));
        let a2 = chip("ccgm1a2").unwrap();
        assert_eq!(a2.die_count(), 2);
        assert_eq!(a2.rows(), 268);
        assert_eq!(a2.columns(), 166);
        let a4 = chip("CCGM1A4").unwrap();
        assert_eq!(a4.die_count(), 4);
    }

    #[test]
    fn unknown_device() {
        assert_eq!(
            chip("CCGM2A1").unwrap_err(),
            ChipError::UnknownDevice("CCGM2A1".to_string())
        );
    }

    #[test]
    fn packages() {
        let a1 = chip("CCGM1A1").unwrap();
        let bga = a1.package("bga196").unwrap();
        assert!(bga.bonds(Bank::W1));
        assert!(!bga.bonds(Bank::S1));
        assert!(a1.package("FBGA324").unwrap().bonds(Bank::S1));
        assert!(matches!(
            a1.package("QFN48"),
            Err(ChipError::UnknownPackage { .. })
        ));
    }

    #[test]
    fn chip_serializes() {
        let json = serde_json::to_string(chip("CCGM1A2").unwrap()).unwrap();
        assert!(json.contains("\"dies_y\":2"));
        assert!(json.contains("\"FBGA324\""));
    }
}
