//! Zealous crop: remove blank margins while keeping segments aligned.
//!
//! Vertical margins are cropped per segment, but every segment of a
//! document gets the same horizontal crop so the stacked column stays
//! left/right aligned.

use image::{imageops, RgbaImage};
use log::debug;

use super::layout::{PageGroup, SubPage};

/// Bounding box of non-background content, as (x0, y0, x1, y1) with
/// exclusive right/bottom edges. A pixel counts as content when it is not
/// pure white.
pub fn content_bbox(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        if r == 255 && g == 255 && b == 255 {
            continue;
        }
        bbox = Some(match bbox {
            None => (x, y, x + 1, y + 1),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
        });
    }
    bbox
}

/// Crop all grouped sub-pages of both documents.
///
/// Per document: one shared horizontal crop from the union of content
/// bounding boxes, padded by 2% of page width; per segment, an
/// independent vertical crop to its own content padded by 2% of its own
/// height. Segments with no content keep their full height.
pub fn zealous_crop(subpages: &mut [SubPage], groups: &[PageGroup], horizontal: bool) {
    for doc in 0..2u8 {
        let mut ids: Vec<usize> = Vec::new();
        for group in groups {
            for &id in &group.sides[doc as usize] {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        // Shared horizontal extremes across the document's segments.
        let mut min_x: Option<u32> = None;
        let mut max_x: Option<u32> = None;
        let mut width: Option<u32> = None;
        for &id in &ids {
            let image = &subpages[id].image;
            if let Some((x0, _, x1, _)) = content_bbox(image) {
                min_x = Some(min_x.map_or(x0, |v| v.min(x0)));
                max_x = Some(max_x.map_or(x1, |v| v.max(x1)));
                width = Some(width.map_or(image.width(), |v| v.max(image.width())));
            }
        }
        let bounds = match (min_x, max_x, width) {
            (Some(min_x), Some(max_x), Some(width)) => {
                let pad = (0.02 * width as f32) as u32;
                Some((min_x.saturating_sub(pad), (max_x + pad).min(width)))
            }
            _ => None,
        };
        if let Some((x0, x1)) = bounds {
            debug!("document {doc}: horizontal content crop {x0}..{x1}");
        }

        for &id in &ids {
            let image = &subpages[id].image;
            let (img_width, img_height) = image.dimensions();

            let (y0, y1) = match content_bbox(image) {
                Some((_, y0, _, y1)) => {
                    let vpad = (0.02 * img_height as f32) as u32;
                    (y0.saturating_sub(vpad), (y1 + vpad).min(img_height))
                }
                None => (0, img_height),
            };
            let mut cropped = imageops::crop_imm(image, 0, y0, img_width, y1 - y0).to_image();

            if horizontal {
                if let Some((x0, x1)) = bounds {
                    let x0 = x0.min(cropped.width());
                    let x1 = x1.min(cropped.width());
                    if x1 > x0 {
                        cropped =
                            imageops::crop_imm(&cropped, x0, 0, x1 - x0, cropped.height())
                                .to_image();
                    }
                }
            }

            subpages[id].image = cropped;
        }
    }
}
