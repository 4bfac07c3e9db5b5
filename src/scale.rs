//! Scale and unit conversion.
//!
//! Every symbol size in the layout is multiplied by an object scale derived
//! from the map scale, the course's print scale and the configured sizing
//! mode. Paper millimetres convert to projected map coordinates through a
//! [`Crs`].

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::layout::defaults::{LEGACY_RELATIVE_TO_MAP_FACTOR, REFERENCE_SCALE};
use crate::types::{MapScale, check_positive};

/// How course symbols are sized relative to the map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScaleSizes {
    /// Symbols grow and shrink with the print/map scale ratio
    #[default]
    RelativeToMap,
    /// Symbols sized as if the map were printed at 1:15000
    RelativeTo15000,
    /// Fixed size regardless of scale
    None,
}

impl ScaleSizes {
    pub fn as_str(self) -> &'static str {
        match self {
            ScaleSizes::RelativeToMap => "RelativeToMap",
            ScaleSizes::RelativeTo15000 => "RelativeTo15000",
            ScaleSizes::None => "None",
        }
    }
}

impl fmt::Display for ScaleSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleSizes {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RelativeToMap" => Ok(ScaleSizes::RelativeToMap),
            "RelativeTo15000" => Ok(ScaleSizes::RelativeTo15000),
            "None" => Ok(ScaleSizes::None),
            other => Err(LayoutError::UnknownScaleMode {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ScaleSizes {
    type Error = LayoutError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScaleSizes> for String {
    fn from(mode: ScaleSizes) -> Self {
        mode.as_str().to_string()
    }
}

/// Object scale used for print and export.
pub fn object_scale(mode: ScaleSizes, map_scale: MapScale, print_scale: f64) -> f64 {
    match mode {
        ScaleSizes::None => 1.0,
        ScaleSizes::RelativeToMap => print_scale / map_scale.raw(),
        ScaleSizes::RelativeTo15000 => REFERENCE_SCALE / map_scale.raw(),
    }
}

/// Object scale used by the live map layer.
///
/// Same as [`object_scale`] except that `RelativeToMap` is multiplied by
/// [`LEGACY_RELATIVE_TO_MAP_FACTOR`], which the on-screen symbols have
/// always been drawn with.
pub fn map_layer_object_scale(mode: ScaleSizes, map_scale: MapScale, print_scale: f64) -> f64 {
    let scale = object_scale(mode, map_scale, print_scale);
    match mode {
        ScaleSizes::RelativeToMap => scale * LEGACY_RELATIVE_TO_MAP_FACTOR,
        ScaleSizes::RelativeTo15000 | ScaleSizes::None => scale,
    }
}

/// Georeferencing of the map: paper mm → projected CRS units.
///
/// The scale is validated on construction and on load, so
/// [`Crs::from_projected`] always inverts [`Crs::to_projected`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCrs")]
pub struct Crs {
    scale: f64,
    origin: DVec2,
}

#[derive(Deserialize)]
struct RawCrs {
    scale: f64,
    origin: DVec2,
}

impl TryFrom<RawCrs> for Crs {
    type Error = LayoutError;

    fn try_from(raw: RawCrs) -> Result<Self, Self::Error> {
        Crs::try_new(raw.scale, raw.origin)
    }
}

impl Crs {
    /// Rejects NaN, infinite, zero and negative scales.
    pub fn try_new(scale: f64, origin: DVec2) -> Result<Self, LayoutError> {
        let scale = check_positive(scale)
            .map_err(|source| LayoutError::InvalidCrsScale { value: scale, source })?;
        Ok(Self { scale, origin })
    }

    /// Projected units per paper metre
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Projected coordinate of the paper origin
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn to_projected(&self, paper: DVec2) -> DVec2 {
        paper * 0.001 * self.scale + self.origin
    }

    pub fn from_projected(&self, projected: DVec2) -> DVec2 {
        (projected - self.origin) / self.scale / 0.001
    }
}
