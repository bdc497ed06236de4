//! Named, scaled axes for the viewer

// crate modules
use crate::error::{Error, Result};

// voxtools modules
use voxtools_utils::f;

// external crates
use serde::ser::{Serialize, SerializeMap, Serializer};

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::{all_consuming, map, value};
use nom::sequence::pair;
use nom::IResult;

/// One axis of a [CoordinateSpace]
///
/// The scale is always held in the base unit, so `10 cm` is stored as a
/// scale of `0.1` with unit `m`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Axis name, e.g. `x`
    pub name: String,
    /// Physical size of one voxel along the axis, in `unit`
    pub scale: f64,
    /// Base unit (`m`, `s`, `Hz`, `rad/s`) or empty for unitless axes
    pub unit: String,
}

impl Dimension {
    /// Create a dimension, normalising any SI prefix on the unit
    ///
    /// ```rust
    /// # use voxtools_viewer::Dimension;
    /// let x = Dimension::new("x", "cm", 10.0).unwrap();
    /// assert_eq!(x.scale, 0.1);
    /// assert_eq!(x.unit, "m");
    /// ```
    pub fn new(name: &str, unit: &str, scale: f64) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidScale(scale));
        }

        let (exponent, base) = parse_unit(unit)?;
        Ok(Self {
            name: name.to_string(),
            scale: apply_exponent(scale, exponent),
            unit: base.to_string(),
        })
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit.is_empty() {
            true => write!(f, "{}: {}", self.name, self.scale),
            false => write!(f, "{}: {} {}", self.name, self.scale, self.unit),
        }
    }
}

/// Ordered set of named axes with units and scales
///
/// This is both the global coordinate space of the viewer and the space
/// attached to each local volume.
///
/// ```rust
/// # use voxtools_viewer::CoordinateSpace;
/// let space = CoordinateSpace::new(&["x", "y", "z"], &["cm"; 3], &[10.0; 3]).unwrap();
/// let json = serde_json::to_string(&space).unwrap();
///
/// assert_eq!(json, r#"{"x":[0.1,"m"],"y":[0.1,"m"],"z":[0.1,"m"]}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateSpace {
    dimensions: Vec<Dimension>,
}

// Public API
impl CoordinateSpace {
    /// Build from parallel lists of names, units, and scales
    pub fn new<N, U>(names: &[N], units: &[U], scales: &[f64]) -> Result<Self>
    where
        N: AsRef<str>,
        U: AsRef<str>,
    {
        if names.len() != units.len() || names.len() != scales.len() {
            return Err(Error::MismatchedDimensions {
                names: names.len(),
                units: units.len(),
                scales: scales.len(),
            });
        }

        let dimensions = names
            .iter()
            .zip(units)
            .zip(scales)
            .map(|((n, u), s)| Dimension::new(n.as_ref(), u.as_ref(), *s))
            .collect::<Result<Vec<Dimension>>>()?;

        Ok(Self { dimensions })
    }

    /// Same unit and scale on every named axis
    pub fn uniform<N: AsRef<str>>(names: &[N], unit: &str, scale: f64) -> Result<Self> {
        let units = vec![unit; names.len()];
        let scales = vec![scale; names.len()];
        Self::new(names, units.as_slice(), &scales)
    }

    /// Number of axes
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Axes in order
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Axis names in order
    pub fn names(&self) -> Vec<&str> {
        self.dimensions.iter().map(|d| d.name.as_str()).collect()
    }
}

impl Serialize for CoordinateSpace {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dimensions.len()))?;
        for d in &self.dimensions {
            map.serialize_entry(&d.name, &(d.scale, &d.unit))?;
        }
        map.end()
    }
}

impl std::fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let axes: Vec<String> = self.dimensions.iter().map(|d| f!("{d}")).collect();
        write!(f, "[{}]", axes.join(", "))
    }
}

/// Split a unit into its power of ten and base unit
fn parse_unit(unit: &str) -> Result<(i32, &str)> {
    if unit.is_empty() {
        return Ok((0, ""));
    }

    // A bare base unit wins, so "m" is metres rather than milli-nothing
    let mut parser = alt((
        all_consuming(map(base_unit, |b| (0, b))),
        all_consuming(pair(si_prefix, base_unit)),
    ));

    match parser(unit) {
        Ok((_, parsed)) => Ok(parsed),
        Err(_) => Err(Error::UnknownUnit(unit.to_string())),
    }
}

fn base_unit(i: &str) -> IResult<&str, &str> {
    alt((tag("rad/s"), tag("Hz"), tag("m"), tag("s")))(i)
}

fn si_prefix(i: &str) -> IResult<&str, i32> {
    alt((
        value(1, tag("da")),
        value(24, tag("Y")),
        value(21, tag("Z")),
        value(18, tag("E")),
        value(15, tag("P")),
        value(12, tag("T")),
        value(9, tag("G")),
        value(6, tag("M")),
        value(3, tag("k")),
        value(2, tag("h")),
        value(-1, tag("d")),
        value(-2, tag("c")),
        value(-3, tag("m")),
        value(-6, alt((tag("u"), tag("µ")))),
        value(-9, tag("n")),
        value(-12, tag("p")),
        value(-15, tag("f")),
        value(-18, tag("a")),
        value(-21, tag("z")),
        value(-24, tag("y")),
    ))(i)
}

/// Divide for negative powers so that e.g. 10 cm is exactly 0.1 m
fn apply_exponent(scale: f64, exponent: i32) -> f64 {
    match exponent >= 0 {
        true => scale * 10f64.powi(exponent),
        false => scale / 10f64.powi(-exponent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(parse_unit("m").unwrap(), (0, "m"));
        assert_eq!(parse_unit("cm").unwrap(), (-2, "m"));
        assert_eq!(parse_unit("mm").unwrap(), (-3, "m"));
        assert_eq!(parse_unit("um").unwrap(), (-6, "m"));
        assert_eq!(parse_unit("µm").unwrap(), (-6, "m"));
        assert_eq!(parse_unit("km").unwrap(), (3, "m"));
        assert_eq!(parse_unit("ms").unwrap(), (-3, "s"));
        assert_eq!(parse_unit("MHz").unwrap(), (6, "Hz"));
        assert_eq!(parse_unit("dam").unwrap(), (1, "m"));
        assert_eq!(parse_unit("rad/s").unwrap(), (0, "rad/s"));
        assert_eq!(parse_unit("").unwrap(), (0, ""));
    }

    #[test]
    fn unknown_units() {
        assert!(parse_unit("inch").is_err());
        assert!(parse_unit("cmm").is_err());
        assert!(parse_unit("c").is_err());
    }

    #[test]
    fn scales() {
        assert_eq!(Dimension::new("x", "cm", 10.0).unwrap().scale, 0.1);
        assert_eq!(Dimension::new("x", "mm", 1.0).unwrap().scale, 0.001);
        assert_eq!(Dimension::new("x", "km", 2.0).unwrap().scale, 2000.0);
        assert_eq!(Dimension::new("t", "", 3.0).unwrap().scale, 3.0);
        assert!(Dimension::new("x", "m", 0.0).is_err());
        assert!(Dimension::new("x", "m", f64::NAN).is_err());
    }

    #[test]
    fn mismatched_lists() {
        let result = CoordinateSpace::new(&["x", "y"], &["m"], &[1.0, 1.0]);
        assert!(matches!(
            result,
            Err(Error::MismatchedDimensions {
                names: 2,
                units: 1,
                scales: 2
            })
        ));
    }

    #[test]
    fn display() {
        let space = CoordinateSpace::uniform(&["x", "y"], "cm", 10.0).unwrap();
        assert_eq!(space.to_string(), "[x: 0.1 m, y: 0.1 m]");
        assert_eq!(space.names(), vec!["x", "y"]);
    }
}
