//! Region annotation drawing.

use image::Rgba;
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use super::layout::{Layout, Placed};
use super::options::MarkStyle;

/// Annotation color.
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Draw every changed region onto its sub-page raster, in the style
/// configured for its document side. Runs before cropping so coordinates
/// still match the rasters.
pub fn annotate(layout: &mut Layout, styles: [MarkStyle; 2]) {
    let Layout { subpages, markers } = layout;
    for marker in markers.iter() {
        let Placed::Region(b) = marker else { continue };
        let image = &mut subpages[b.subpage].image;
        match styles[b.doc as usize] {
            MarkStyle::Box => {
                let rect = Rect::at(b.x as i32, b.y as i32)
                    .of_size((b.width as u32).max(1), (b.height as u32).max(1));
                draw_hollow_rect_mut(image, rect, RED);
            }
            MarkStyle::Strike => {
                let mid = b.y + b.height / 2.0;
                draw_line_segment_mut(image, (b.x, mid), (b.x + b.width, mid), RED);
            }
            MarkStyle::Underline => {
                let bottom = b.y + b.height;
                draw_line_segment_mut(image, (b.x, bottom), (b.x + b.width, bottom), RED);
            }
        }
    }
}
