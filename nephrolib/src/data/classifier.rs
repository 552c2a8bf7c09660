//! Row classifier: groups the rows of one image into glomeruli and podocytes.
//!
//! An image export follows this layout:
//!
//! ```text
//! Header
//! Glomerulus row
//! Podocyte row
//! Podocyte row
//! Glomerulus row
//! Podocyte row
//! ...
//! ```
//!
//! Rows are told apart by area alone. An area inside
//! [`MIN_PODOCYTE_AREA`]..=[`MAX_PODOCYTE_AREA`] is a podocyte of the most
//! recent glomerulus; an area inside
//! [`MIN_GLOMERULUS_AREA`]..=[`MAX_GLOMERULUS_AREA`] starts a new glomerulus.
//! Anything else is invalid. The gaps between and around the two bands are
//! deliberate.
//!
//! The classifier is single-pass and never looks ahead. Every structural
//! violation aborts the image:
//!
//! - a second header line
//! - a podocyte row before any glomerulus row
//! - a glomerulus without podocytes (mid-file or last in the file)
//! - no header, or no glomerulus at all, by the time the input ends

use serde::Serialize;

use crate::error::NephroError;
use crate::Result;

use super::geometry::GeometryInfo;
use super::row::{parse_line, ParsedLine};
use super::structures::{GlomerulusData, PodocyteData};

/// Minimum podocyte area in µm² (inclusive).
pub const MIN_PODOCYTE_AREA: f64 = 5.0;
/// Maximum podocyte area in µm² (inclusive).
pub const MAX_PODOCYTE_AREA: f64 = 150.0;
/// Minimum glomerulus area in µm² (inclusive).
pub const MIN_GLOMERULUS_AREA: f64 = 4000.0;
/// Maximum glomerulus area in µm² (inclusive).
pub const MAX_GLOMERULUS_AREA: f64 = 15000.0;

/// Kind of structure a measurement row describes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Podocyte,
    Glomerulus,
}

impl StructureKind {
    /// Classify an area into a structure kind, or `None` when it falls in
    /// neither band.
    pub fn classify(area: f64) -> Option<Self> {
        if (MIN_PODOCYTE_AREA..=MAX_PODOCYTE_AREA).contains(&area) {
            Some(Self::Podocyte)
        } else if (MIN_GLOMERULUS_AREA..=MAX_GLOMERULUS_AREA).contains(&area) {
            Some(Self::Glomerulus)
        } else {
            None
        }
    }
}

/// Observable phase of an [`ImageClassifier`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClassifierState {
    /// No header line seen yet
    AwaitingHeader,
    /// Header seen, no glomerulus started
    AwaitingFirstGlomerulus,
    /// A glomerulus is open and collecting podocytes
    Accumulating,
    /// `finalize` has run; no more input is accepted
    Sealed,
}

/// In-progress glomerulus, owned by the classifier until sealed.
#[derive(Debug)]
struct GlomerulusBuilder {
    geometry: GeometryInfo,
    image_id: u32,
    number: u32,
    podocytes: Vec<PodocyteData>,
}

impl GlomerulusBuilder {
    fn new(geometry: GeometryInfo, image_id: u32, number: u32) -> Self {
        Self {
            geometry,
            image_id,
            number,
            podocytes: Vec::new(),
        }
    }

    fn push(&mut self, podocyte: PodocyteData) {
        self.podocytes.push(podocyte);
    }

    /// Freeze the podocyte list. Every glomerulus needs at least one.
    fn seal(self) -> Result<GlomerulusData> {
        if self.podocytes.is_empty() {
            return Err(NephroError::EmptyGlomerulus {
                image_id: self.image_id,
                number: self.number,
            });
        }
        Ok(GlomerulusData::sealed(
            self.geometry,
            self.image_id,
            self.number,
            self.podocytes,
        ))
    }
}

/// Single-use state machine turning the lines of one image into glomeruli.
///
/// Feed every line in file order with [`feed_line`](Self::feed_line), then
/// call [`finalize`](Self::finalize) once.
///
/// # Example
///
/// ```rust
/// use nephrolib::ImageClassifier;
///
/// let mut classifier = ImageClassifier::new(42).unwrap();
/// classifier.feed_line("Area\tFeret\tFeretX\tFeretY\tFeretAngle\tMinFeret").unwrap();
/// classifier.feed_line("1\t8914.940\t128.412\t226.768\t248.444\t117.031\t85.135").unwrap();
/// classifier.feed_line("2\t23.243\t8.696\t214.429\t267.119\t57.529\t3.673").unwrap();
///
/// let glomeruli = classifier.finalize().unwrap();
/// assert_eq!(glomeruli.len(), 1);
/// assert_eq!(glomeruli[0].podocyte_count(), 1);
/// ```
#[derive(Debug)]
pub struct ImageClassifier {
    image_id: u32,
    header_seen: bool,
    current: Option<GlomerulusBuilder>,
    finalized: Vec<GlomerulusData>,
    sealed: bool,
}

impl ImageClassifier {
    /// Create a classifier for the image with the given (positive) id.
    pub fn new(image_id: u32) -> Result<Self> {
        if image_id == 0 {
            return Err(NephroError::InvalidImageId(image_id));
        }
        Ok(Self {
            image_id,
            header_seen: false,
            current: None,
            finalized: Vec::new(),
            sealed: false,
        })
    }

    /// Run a whole sequence of lines through a fresh classifier.
    pub fn classify_lines<I, S>(image_id: u32, lines: I) -> Result<Vec<GlomerulusData>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classifier = Self::new(image_id)?;
        for line in lines {
            classifier.feed_line(line.as_ref())?;
        }
        classifier.finalize()
    }

    pub fn image_id(&self) -> u32 {
        self.image_id
    }

    pub fn state(&self) -> ClassifierState {
        if self.sealed {
            ClassifierState::Sealed
        } else if self.current.is_some() {
            ClassifierState::Accumulating
        } else if self.header_seen {
            ClassifierState::AwaitingFirstGlomerulus
        } else {
            ClassifierState::AwaitingHeader
        }
    }

    /// Process one raw line.
    ///
    /// An error seals the classifier: the image is invalid and no partial
    /// result can be finalized from it.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        if self.sealed {
            return Err(NephroError::ClassifierSealed {
                image_id: self.image_id,
            });
        }

        let fed = self.feed_parsed(line);
        if fed.is_err() {
            self.sealed = true;
            self.current = None;
            self.finalized.clear();
        }
        fed
    }

    fn feed_parsed(&mut self, line: &str) -> Result<()> {
        match parse_line(line)? {
            ParsedLine::Header => {
                if self.header_seen {
                    return Err(NephroError::DuplicateHeader {
                        image_id: self.image_id,
                    });
                }
                self.header_seen = true;
            }
            // Rows ahead of the header are accepted here; the missing
            // header is reported by `finalize`.
            ParsedLine::Measurement(row) => self.feed_measurement(row.geometry)?,
        }

        Ok(())
    }

    fn feed_measurement(&mut self, geometry: GeometryInfo) -> Result<()> {
        let area = geometry.area();

        match StructureKind::classify(area) {
            Some(StructureKind::Podocyte) => match self.current.as_mut() {
                Some(glomerulus) => glomerulus.push(PodocyteData::new(geometry)),
                None => {
                    return Err(NephroError::OrphanPodocyte {
                        area,
                        image_id: self.image_id,
                    })
                }
            },
            Some(StructureKind::Glomerulus) => {
                if let Some(previous) = self.current.take() {
                    self.finalized.push(previous.seal()?);
                }
                let number = self.finalized.len() as u32 + 1;
                self.current = Some(GlomerulusBuilder::new(geometry, self.image_id, number));
            }
            None => {
                return Err(NephroError::OutOfBandArea {
                    area,
                    image_id: self.image_id,
                })
            }
        }

        Ok(())
    }

    /// Seal the last glomerulus and return every glomerulus of the image in
    /// discovery order.
    ///
    /// The classifier is sealed afterwards, whether or not this succeeds.
    pub fn finalize(&mut self) -> Result<Vec<GlomerulusData>> {
        if self.sealed {
            return Err(NephroError::ClassifierSealed {
                image_id: self.image_id,
            });
        }
        self.sealed = true;

        if !self.header_seen {
            return Err(NephroError::MissingHeader {
                image_id: self.image_id,
            });
        }

        let last = self.current.take().ok_or(NephroError::NoGlomerulusFound {
            image_id: self.image_id,
        })?;

        let mut glomeruli = std::mem::take(&mut self.finalized);
        glomeruli.push(last.seal()?);
        Ok(glomeruli)
    }
}
