//! Board pin identifiers.
//!
//! Pin assignments are compile-time constants owned by the firmware crate.
//! Configuration types carry a [`PinId`] so they can be validated and logged
//! on the host; the hardware layer maps each `PinId` to the matching Embassy
//! peripheral token.

use core::fmt;

/// GPIO port letter on the STM32H743 (A–K).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
}

impl Port {
    fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
            Self::I => 'I',
            Self::J => 'J',
            Self::K => 'K',
        }
    }
}

/// A physical pin, e.g. `PE5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    /// GPIO port.
    pub port: Port,
    /// Pin index within the port (0–15).
    pub index: u8,
}

impl PinId {
    /// Create a pin identifier. `index` is masked to 0–15.
    #[must_use]
    pub const fn new(port: Port, index: u8) -> Self {
        Self {
            port,
            index: index & 0x0F,
        }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.index)
    }
}

/// Returns `true` when no pin appears twice in `pins`.
#[must_use]
pub fn all_distinct(pins: &[PinId]) -> bool {
    pins.iter()
        .enumerate()
        .all(|(i, pin)| pins.iter().skip(i.saturating_add(1)).all(|other| other != pin))
}
