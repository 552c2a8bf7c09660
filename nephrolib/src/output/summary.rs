//! Table-ready summaries of extraction results.
//!
//! `SummaryTable` is a presentation-ready structure that can be printed as
//! text or serialized to JSON. It only formats counts; all extraction work
//! happens in [`crate::data`].

use serde::Serialize;

use crate::data::biopsy::{BiopsyResult, RootResult};
use crate::data::image::ImageResult;
use crate::data::structures::AnatomicStructure;

/// Column headers after the label column.
const VALUE_HEADERS: [&str; 4] = ["Glomeruli", "Podocytes", "Pod/Glom", "Mean area"];

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Row label (biopsy id, image id, "Total (N biopsies)", etc.)
    pub label: String,
    /// Values for each column (as strings, ready for display)
    pub values: Vec<String>,
}

/// Table-ready summary data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    /// Optional title (e.g., "Biopsy B-0142")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers: [label_header, Glomeruli, Podocytes, Pod/Glom, Mean area]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary/footer row
    pub footer: TableRow,
    /// Skipped file notes, one per file
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Running totals behind one table row.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    glomeruli: usize,
    podocytes: usize,
    glomerulus_area: f64,
}

impl Tally {
    fn of_image(image: &ImageResult) -> Self {
        image.glomeruli.iter().fold(Self::default(), |mut tally, g| {
            tally.glomeruli += 1;
            tally.podocytes += g.podocyte_count();
            tally.glomerulus_area += g.area();
            tally
        })
    }

    fn of_biopsy(biopsy: &BiopsyResult) -> Self {
        biopsy
            .images
            .iter()
            .map(Self::of_image)
            .fold(Self::default(), Self::merge)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            glomeruli: self.glomeruli + other.glomeruli,
            podocytes: self.podocytes + other.podocytes,
            glomerulus_area: self.glomerulus_area + other.glomerulus_area,
        }
    }

    fn values(&self) -> Vec<String> {
        let (ratio, mean_area) = if self.glomeruli == 0 {
            ("-".to_string(), "-".to_string())
        } else {
            let n = self.glomeruli as f64;
            (
                format!("{:.2}", self.podocytes as f64 / n),
                format!("{:.1}", self.glomerulus_area / n),
            )
        };
        vec![
            self.glomeruli.to_string(),
            self.podocytes.to_string(),
            ratio,
            mean_area,
        ]
    }
}

fn headers(label: &str) -> Vec<String> {
    std::iter::once(label)
        .chain(VALUE_HEADERS)
        .map(str::to_string)
        .collect()
}

fn total_label(count: usize, singular: &str, plural: &str) -> String {
    let unit = if count == 1 { singular } else { plural };
    format!("Total ({count} {unit})")
}

fn skipped_notes(biopsy: &BiopsyResult) -> impl Iterator<Item = String> + '_ {
    biopsy
        .skipped
        .iter()
        .map(|s| format!("skipped {}: {}", s.path.display(), s.reason))
}

impl SummaryTable {
    /// One row per biopsy.
    pub fn by_biopsy(result: &RootResult) -> Self {
        let tallies: Vec<Tally> = result.biopsies.iter().map(Tally::of_biopsy).collect();
        let rows = result
            .biopsies
            .iter()
            .zip(&tallies)
            .map(|(biopsy, tally)| TableRow {
                label: biopsy.id.clone(),
                values: tally.values(),
            })
            .collect();
        let total = tallies.into_iter().fold(Tally::default(), Tally::merge);

        SummaryTable {
            title: None,
            headers: headers("Biopsy"),
            rows,
            footer: TableRow {
                label: total_label(result.biopsies.len(), "biopsy", "biopsies"),
                values: total.values(),
            },
            notes: result.biopsies.iter().flat_map(skipped_notes).collect(),
        }
    }

    /// One row per image of a single biopsy.
    pub fn by_image(biopsy: &BiopsyResult) -> Self {
        let rows = biopsy
            .images
            .iter()
            .map(|image| TableRow {
                label: image.image_id.to_string(),
                values: Tally::of_image(image).values(),
            })
            .collect();

        SummaryTable {
            title: Some(format!("Biopsy {}", biopsy.id)),
            headers: headers("Image"),
            rows,
            footer: TableRow {
                label: total_label(biopsy.images.len(), "image", "images"),
                values: Tally::of_biopsy(biopsy).values(),
            },
            notes: skipped_notes(biopsy).collect(),
        }
    }

    /// One row per image, across every biopsy of a root.
    pub fn by_image_all(result: &RootResult) -> Self {
        let rows = result
            .biopsies
            .iter()
            .flat_map(|biopsy| {
                biopsy.images.iter().map(move |image| TableRow {
                    label: format!("{}/{}", biopsy.id, image.image_id),
                    values: Tally::of_image(image).values(),
                })
            })
            .collect::<Vec<_>>();
        let total = result
            .biopsies
            .iter()
            .map(Tally::of_biopsy)
            .fold(Tally::default(), Tally::merge);

        SummaryTable {
            title: None,
            headers: headers("Image"),
            footer: TableRow {
                label: total_label(rows.len(), "image", "images"),
                values: total.values(),
            },
            rows,
            notes: result.biopsies.iter().flat_map(skipped_notes).collect(),
        }
    }

    /// One row per glomerulus of a single image.
    pub fn by_glomerulus(image: &ImageResult) -> Self {
        let rows = image
            .glomeruli
            .iter()
            .map(|g| TableRow {
                label: format!("#{}", g.number()),
                values: vec![
                    "1".to_string(),
                    g.podocyte_count().to_string(),
                    format!("{:.2}", g.podocyte_count() as f64),
                    format!("{:.1}", g.area()),
                ],
            })
            .collect();

        SummaryTable {
            title: Some(format!("Image {}", image.image_id)),
            headers: headers("Glomerulus"),
            rows,
            footer: TableRow {
                label: total_label(image.glomeruli.len(), "glomerulus", "glomeruli"),
                values: Tally::of_image(image).values(),
            },
            notes: Vec::new(),
        }
    }
}
