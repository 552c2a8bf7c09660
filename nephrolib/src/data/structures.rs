//! Anatomic structures found in a biopsy image.
//!
//! Two kinds of structure are recognized:
//!
//! - **Glomerulus**: large structure, owns the podocytes that follow it
//! - **Podocyte**: small structure nested in the most recent glomerulus
//!
//! Both carry a [`GeometryInfo`]; that is the only behaviour they share, so
//! it is expressed as the [`AnatomicStructure`] trait rather than an enum.

use serde::Serialize;

use super::geometry::GeometryInfo;

/// Any physical structure with a measured geometry.
pub trait AnatomicStructure {
    /// The measured geometry of this structure.
    fn geometry(&self) -> &GeometryInfo;

    /// Shorthand for `geometry().area()`.
    fn area(&self) -> f64 {
        self.geometry().area()
    }

    /// Shorthand for `geometry().feret()`.
    fn feret(&self) -> f64 {
        self.geometry().feret()
    }
}

/// A single podocyte of a glomerulus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PodocyteData {
    geometry: GeometryInfo,
}

impl PodocyteData {
    pub fn new(geometry: GeometryInfo) -> Self {
        Self { geometry }
    }
}

impl AnatomicStructure for PodocyteData {
    fn geometry(&self) -> &GeometryInfo {
        &self.geometry
    }
}

/// A sealed glomerulus record.
///
/// Only the row classifier creates these, when it seals its in-progress
/// glomerulus; the podocyte list is frozen from then on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlomerulusData {
    geometry: GeometryInfo,
    image_id: u32,
    number: u32,
    podocytes: Vec<PodocyteData>,
}

impl GlomerulusData {
    pub(crate) fn sealed(
        geometry: GeometryInfo,
        image_id: u32,
        number: u32,
        podocytes: Vec<PodocyteData>,
    ) -> Self {
        Self {
            geometry,
            image_id,
            number,
            podocytes,
        }
    }

    /// Id of the image this glomerulus was found in.
    pub fn image_id(&self) -> u32 {
        self.image_id
    }

    /// 1-based rank of this glomerulus within its image, in discovery order.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Podocytes of this glomerulus, in file order. Never empty.
    pub fn podocytes(&self) -> &[PodocyteData] {
        &self.podocytes
    }

    pub fn podocyte_count(&self) -> usize {
        self.podocytes.len()
    }
}

impl AnatomicStructure for GlomerulusData {
    fn geometry(&self) -> &GeometryInfo {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(area: f64, feret: f64) -> GeometryInfo {
        GeometryInfo::new(area, feret).unwrap()
    }

    #[test]
    fn test_podocyte_exposes_geometry() {
        let podocyte = PodocyteData::new(geometry(23.243, 8.696));
        assert_eq!(podocyte.area(), 23.243);
        assert_eq!(podocyte.feret(), 8.696);
    }

    #[test]
    fn test_glomerulus_accessors() {
        let podocytes = vec![
            PodocyteData::new(geometry(23.243, 8.696)),
            PodocyteData::new(geometry(40.369, 8.250)),
        ];
        let glomerulus = GlomerulusData::sealed(geometry(8914.940, 128.412), 42, 1, podocytes);

        assert_eq!(glomerulus.image_id(), 42);
        assert_eq!(glomerulus.number(), 1);
        assert_eq!(glomerulus.area(), 8914.940);
        assert_eq!(glomerulus.podocyte_count(), 2);
        assert_eq!(glomerulus.podocytes()[1].area(), 40.369);
    }
}
