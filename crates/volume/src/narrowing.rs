//! Policies for narrowing wide numeric values to bytes

// external crates
use log::trace;

/// How values outside of `0..=255` become a `u8`
///
/// ```rust
/// # use voxtools_volume::Narrowing;
/// assert_eq!(Narrowing::Saturate.narrow_f64(300.7), 255);
/// assert_eq!(Narrowing::Saturate.narrow_i64(-4), 0);
///
/// assert_eq!(Narrowing::Wrap.narrow_f64(300.7), 44);
/// assert_eq!(Narrowing::Wrap.narrow_i64(-4), 252);
/// ```
///
/// Fractions are always truncated toward zero, and NaN is always 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Narrowing {
    /// Clamp to the nearest representable value
    #[default]
    Saturate,
    /// Keep the low 8 bits, i.e. wrap modulo 256
    Wrap,
}

impl Narrowing {
    /// Narrow a signed integer
    pub fn narrow_i64(self, value: i64) -> u8 {
        match self {
            Narrowing::Saturate => value.clamp(0, u8::MAX as i64) as u8,
            Narrowing::Wrap => value as u8,
        }
    }

    /// Narrow an unsigned integer
    pub fn narrow_u64(self, value: u64) -> u8 {
        match self {
            Narrowing::Saturate => value.min(u8::MAX as u64) as u8,
            Narrowing::Wrap => value as u8,
        }
    }

    /// Narrow a float
    pub fn narrow_f64(self, value: f64) -> u8 {
        match self {
            // float to int casts saturate and send NaN to 0
            Narrowing::Saturate => value as u8,
            Narrowing::Wrap => value.trunc() as i64 as u8,
        }
    }
}

impl std::str::FromStr for Narrowing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        trace!("Parsing narrowing policy from \"{s}\"");
        match s.to_lowercase().as_str() {
            "saturate" | "clamp" => Ok(Narrowing::Saturate),
            "wrap" | "truncate" => Ok(Narrowing::Wrap),
            _ => Err(format!(
                "unknown narrowing \"{s}\" (expected \"saturate\" or \"wrap\")"
            )),
        }
    }
}

impl std::fmt::Display for Narrowing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Narrowing::Saturate => write!(f, "saturate"),
            Narrowing::Wrap => write!(f, "wrap"),
        }
    }
}
