//! Page layout: raster-space placement, sub-page splitting, and grouping.
//!
//! Sub-pages live in an arena: each holds its raster plus its
//! (document, original page, split index) identity, and placed markers
//! reference sub-pages by arena id. Splitting re-homes later markers by
//! swapping the id instead of rewriting page numbers.

use std::collections::{HashMap, HashSet};

use image::{imageops, RgbaImage};
use log::debug;

use crate::model::Marker;

use super::raster::PageKey;

/// One segment of a rasterized page.
#[derive(Debug)]
pub struct SubPage {
    /// Document side: 0 = left, 1 = right.
    pub doc: u8,
    /// Original 1-based page number.
    pub page: u32,
    /// Split index within the page; increases with each cut.
    pub split: u32,
    /// The segment's raster.
    pub image: RgbaImage,
}

/// A changed region in raster-pixel coordinates, homed on a sub-page.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBox {
    pub doc: u8,
    /// Arena id of the owning sub-page.
    pub subpage: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RegionBox {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A marker placed in raster space.
#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
    Boundary,
    Region(RegionBox),
}

impl Placed {
    fn as_region(&self) -> Option<&RegionBox> {
        match self {
            Placed::Boundary => None,
            Placed::Region(b) => Some(b),
        }
    }
}

/// The sub-page arena plus the placed marker sequence.
#[derive(Debug)]
pub struct Layout {
    pub subpages: Vec<SubPage>,
    pub markers: Vec<Placed>,
}

/// An ordered grouping of sub-pages from both documents that are laid out
/// together; the two sides realign vertically after each group.
#[derive(Debug, Default)]
pub struct PageGroup {
    /// Sub-page arena ids per document side, in layout order.
    pub sides: [Vec<usize>; 2],
}

/// Convert markers into raster space.
///
/// Every rasterized page becomes one initial sub-page (split 0); each
/// changed fragment's box is rescaled from document units by
/// `pixel_dim / document_dim` per axis and homed on its page's sub-page.
/// The cache is built from the same marker list, so every referenced page
/// has a raster.
pub fn place_markers(markers: &[Marker], mut images: HashMap<PageKey, RgbaImage>) -> Layout {
    let mut subpages: Vec<SubPage> = Vec::new();
    let mut ids: HashMap<PageKey, usize> = HashMap::new();
    let mut placed: Vec<Placed> = Vec::with_capacity(markers.len());

    for marker in markers {
        match marker {
            Marker::Boundary => placed.push(Placed::Boundary),
            Marker::Changed(f) => {
                let key = (f.doc.index, f.page.number);
                let id = match ids.get(&key) {
                    Some(&id) => id,
                    None => {
                        let Some(image) = images.remove(&key) else {
                            continue;
                        };
                        let id = subpages.len();
                        subpages.push(SubPage {
                            doc: f.doc.index,
                            page: f.page.number,
                            split: 0,
                            image,
                        });
                        ids.insert(key, id);
                        id
                    }
                };
                let image = &subpages[id].image;
                let sx = image.width() as f32 / f.page.width;
                let sy = image.height() as f32 / f.page.height;
                placed.push(Placed::Region(RegionBox {
                    doc: f.doc.index,
                    subpage: id,
                    x: f.x * sx,
                    y: f.y * sy,
                    width: f.width * sx,
                    height: f.height * sy,
                }));
            }
        }
    }

    Layout {
        subpages,
        markers: placed,
    }
}

/// Split sub-pages at boundary markers so equivalent regions of both
/// documents can line up vertically.
///
/// At each boundary, a sub-page may be cut when the lowest bottom edge of
/// its regions before the boundary sits above the highest top edge of its
/// regions after it; the cut lands at the rounded midpoint, so it never
/// slices through a marked region. Markers after the boundary are
/// re-homed onto the new sub-page with their `y` shifted up by the cut.
pub fn split_subpages(layout: &mut Layout) {
    let initial: Vec<usize> = (0..layout.subpages.len()).collect();
    for start_id in initial {
        let mut current = start_id;
        for i in 0..layout.markers.len() {
            if !matches!(layout.markers[i], Placed::Boundary) {
                continue;
            }

            let bottom_before = layout.markers[..i]
                .iter()
                .filter_map(Placed::as_region)
                .filter(|b| b.subpage == current)
                .map(RegionBox::bottom)
                .fold(None, |acc: Option<f32>, v| Some(acc.map_or(v, |a| a.max(v))));
            let top_after = layout.markers[i + 1..]
                .iter()
                .filter_map(Placed::as_region)
                .filter(|b| b.subpage == current)
                .map(|b| b.y)
                .fold(None, |acc: Option<f32>, v| Some(acc.map_or(v, |a| a.min(v))));

            // Regions on only one side of the boundary mean nothing to
            // separate; overlapping extents mean no safe cut line.
            let (Some(y1), Some(y2)) = (bottom_before, top_after) else {
                continue;
            };
            if y1 + 1.0 >= y2 {
                continue;
            }

            let (width, height) = layout.subpages[current].image.dimensions();
            let cut = ((y1 + y2) / 2.0).round() as i64;
            if cut <= 0 || cut >= height as i64 {
                continue;
            }
            let cut = cut as u32;

            let image = &layout.subpages[current].image;
            let top = imageops::crop_imm(image, 0, 0, width, cut).to_image();
            let bottom = imageops::crop_imm(image, 0, cut, width, height - cut).to_image();

            let new_id = layout.subpages.len();
            let (doc, page, split) = {
                let sp = &layout.subpages[current];
                (sp.doc, sp.page, sp.split)
            };
            debug!("splitting doc {doc} page {page} (split {split}) at y={cut}");
            layout.subpages[current].image = top;
            layout.subpages.push(SubPage {
                doc,
                page,
                split: split + 1,
                image: bottom,
            });

            for marker in &mut layout.markers[i + 1..] {
                if let Placed::Region(b) = marker {
                    if b.subpage == current {
                        b.subpage = new_id;
                        b.y -= cut as f32;
                    }
                }
            }
            current = new_id;
        }
    }
}

/// Group sub-pages across both documents.
///
/// A new group starts at a boundary marker only when no sub-page is
/// referenced both strictly before and strictly after it — a point of
/// total alignment between the two sides. Each group's sides are ordered
/// by (page, split).
pub fn group_subpages(layout: &Layout) -> Vec<PageGroup> {
    let mut groups: Vec<PageGroup> = Vec::new();
    let mut current = PageGroup::default();

    for (i, marker) in layout.markers.iter().enumerate() {
        match marker {
            Placed::Region(b) => {
                let side = &mut current.sides[b.doc as usize];
                if !side.contains(&b.subpage) {
                    side.push(b.subpage);
                }
            }
            Placed::Boundary => {
                let before: HashSet<usize> = layout.markers[..i]
                    .iter()
                    .filter_map(Placed::as_region)
                    .map(|b| b.subpage)
                    .collect();
                let after: HashSet<usize> = layout.markers[i + 1..]
                    .iter()
                    .filter_map(Placed::as_region)
                    .map(|b| b.subpage)
                    .collect();
                if before.is_disjoint(&after) {
                    groups.push(std::mem::take(&mut current));
                }
            }
        }
    }
    groups.push(current);

    for group in &mut groups {
        for side in &mut group.sides {
            side.sort_by_key(|&id| (layout.subpages[id].page, layout.subpages[id].split));
        }
    }
    debug!("{} page group(s)", groups.len());
    groups
}
