//! Geometric measurements of a detected structure.

use serde::Serialize;

use crate::error::NephroError;
use crate::Result;

/// Area and feret diameter of an anatomic structure.
///
/// Both values are strictly positive; [`GeometryInfo::new`] is the only way
/// to build one, so every instance upholds that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryInfo {
    area: f64,
    feret: f64,
}

impl GeometryInfo {
    /// Create a new geometry, rejecting non-positive (or NaN) values.
    pub fn new(area: f64, feret: f64) -> Result<Self> {
        if area.is_nan() || feret.is_nan() || area <= 0.0 || feret <= 0.0 {
            return Err(NephroError::InvalidGeometry { area, feret });
        }
        Ok(Self { area, feret })
    }

    /// Area in µm².
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Feret diameter in µm.
    pub fn feret(&self) -> f64 {
        self.feret
    }
}
