//! Side-by-side column assembly.
//!
//! Takes the cropped sub-pages, grouped into vertically aligned runs, and
//! pastes them onto one canvas: left document on the left column, right
//! document on the right, with a divider between and spacers keeping
//! corresponding groups level.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use log::debug;

use super::layout::{PageGroup, SubPage};

/// Canvas background.
const BACKGROUND: Rgba<u8> = Rgba([0xF3, 0xF3, 0xF3, 0xFF]);
/// Vertical guide lines on the background.
const GUIDE: Rgba<u8> = Rgba([0xE3, 0xE3, 0xE3, 0xFF]);
/// Page separators and the center divider.
const SEPARATOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Spacers smaller than this are dropped.
const MIN_SPACER: i64 = 10;

/// Guide line spacing in pixels.
const GUIDE_STEP: u32 = 50;

/// Stack the grouped sub-pages into the final side-by-side image.
pub fn stack_columns(subpages: &[SubPage], groups: &[PageGroup]) -> RgbaImage {
    // Column dimensions and the per-group spacer that levels the columns
    // after each group.
    let mut col_height: [i64; 2] = [0, 0];
    let mut col_width: u32 = 0;
    let mut spacers: Vec<[i64; 2]> = Vec::with_capacity(groups.len());
    for group in groups {
        for side in 0..2 {
            for &id in &group.sides[side] {
                let image = &subpages[id].image;
                col_height[side] += i64::from(image.height());
                col_width = col_width.max(image.width());
            }
        }
        let mut dy = col_height[1] - col_height[0];
        if dy.abs() < MIN_SPACER {
            dy = 0;
        }
        let spacer = [dy.max(0), (-dy).max(0)];
        col_height[0] += spacer[0];
        col_height[1] += spacer[1];
        spacers.push(spacer);
    }

    let height = col_height[0].max(col_height[1]).max(1) as u32;
    let canvas_width = col_width * 2 + 1;
    debug!("stacking {} group(s) onto {canvas_width}x{height}", groups.len());

    let mut canvas = RgbaImage::from_pixel(canvas_width, height, BACKGROUND);
    for x in (0..canvas_width).step_by(GUIDE_STEP as usize) {
        draw_line_segment_mut(
            &mut canvas,
            (x as f32, 0.0),
            (x as f32, height as f32),
            GUIDE,
        );
    }

    for side in 0..2 {
        let column_x = if side == 0 { 0 } else { i64::from(col_width) + 1 };
        let mut y: i64 = 0;
        for (group, spacer) in groups.iter().zip(&spacers) {
            for &id in &group.sides[side] {
                let sub = &subpages[id];
                imageops::replace(&mut canvas, &sub.image, column_x, y);
                if sub.page > 1 && sub.split == 0 {
                    // Separator above each physical page except the first.
                    // Splits within a page do not get one.
                    let x0 = if side == 0 { 0.0 } else { col_width as f32 };
                    let x1 = (col_width * (side as u32 + 1)) as f32;
                    draw_line_segment_mut(&mut canvas, (x0, y as f32), (x1, y as f32), SEPARATOR);
                }
                y += i64::from(sub.image.height());
            }
            y += spacer[side];
        }
    }

    draw_line_segment_mut(
        &mut canvas,
        (col_width as f32, 0.0),
        (col_width as f32, height as f32),
        SEPARATOR,
    );

    canvas
}
