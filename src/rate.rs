//! Calculation rates for unit generators and their outputs.

use core::fmt;

/// The rate at which a unit generator (or one of its outputs) is computed.
///
/// Rates are ordered from slowest to fastest, so `max` over a set of input
/// rates gives the rate a consumer has to run at.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rate {
    /// Computed once when the synth is instantiated.
    Scalar,
    /// Computed once per control block.
    Control,
    /// Computed once per sample.
    Audio,
    /// Computed on demand by a demand-rate consumer.
    Demand,
}

impl Rate {
    /// Numeric code used by the definition file format.
    pub const fn code(self) -> i8 {
        match self {
            Rate::Scalar => 0,
            Rate::Control => 1,
            Rate::Audio => 2,
            Rate::Demand => 3,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub const fn from_code(code: i8) -> Option<Rate> {
        match code {
            0 => Some(Rate::Scalar),
            1 => Some(Rate::Control),
            2 => Some(Rate::Audio),
            3 => Some(Rate::Demand),
            _ => None,
        }
    }

    /// Conventional method suffix (`ir`, `kr`, `ar`, `dr`).
    pub const fn suffix(self) -> &'static str {
        match self {
            Rate::Scalar => "ir",
            Rate::Control => "kr",
            Rate::Audio => "ar",
            Rate::Demand => "dr",
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// The subset of [`Rate`] a control node can run at.
///
/// Audio-rate and triggered controls are separate node types, so they can't
/// be requested here at all.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlRate {
    /// Fixed at synth instantiation (`ir`).
    Scalar,
    /// Modulatable while the synth runs (`kr`).
    Control,
}

impl From<ControlRate> for Rate {
    fn from(rate: ControlRate) -> Rate {
        match rate {
            ControlRate::Scalar => Rate::Scalar,
            ControlRate::Control => Rate::Control,
        }
    }
}

impl TryFrom<Rate> for ControlRate {
    type Error = Rate;

    /// Returns the rejected rate on failure.
    fn try_from(rate: Rate) -> Result<ControlRate, Rate> {
        match rate {
            Rate::Scalar => Ok(ControlRate::Scalar),
            Rate::Control => Ok(ControlRate::Control),
            other => Err(other),
        }
    }
}

impl fmt::Display for ControlRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Rate::from(*self).fmt(f)
    }
}
