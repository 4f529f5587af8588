//! Rendering: turn a change list into the side-by-side annotated image.
//!
//! The pipeline rasterizes every referenced page, places the changed
//! regions in pixel space, splits pages at change boundaries so both
//! sides line up, draws the marks, crops blank margins, and stacks the
//! two columns onto one canvas.

mod annotate;
mod crop;
mod layout;
mod options;
mod raster;
mod stack;

pub use options::{MarkStyle, RenderOptions};
pub use raster::{PageRasterizer, PopplerRasterizer};

use image::RgbaImage;
use log::info;

use crate::diff::simplify;
use crate::error::{Error, Result};
use crate::model::Marker;

/// Render a change list with a caller-supplied rasterizer.
///
/// Neighboring changed fragments are merged first; an input with no
/// changed fragments at all is an error, since there is nothing to show.
pub fn render_changes_with(
    rasterizer: &dyn PageRasterizer,
    markers: &[Marker],
    options: &RenderOptions,
) -> Result<RgbaImage> {
    options.validate()?;

    let markers = simplify(markers);
    let changed = markers.iter().filter(|m| !m.is_boundary()).count();
    if changed == 0 {
        return Err(Error::EmptyDiff);
    }
    info!("rendering {changed} changed region(s)");

    let images = raster::rasterize_pages(rasterizer, &markers, options.width, options.parallel)?;
    let mut layout = layout::place_markers(&markers, images);
    layout::split_subpages(&mut layout);
    let groups = layout::group_subpages(&layout);

    annotate::annotate(&mut layout, options.styles);
    crop::zealous_crop(&mut layout.subpages, &groups, options.horizontal_crop);

    Ok(stack::stack_columns(&layout.subpages, &groups))
}

/// Render a change list using poppler's `pdftoppm`.
pub fn render_changes(markers: &[Marker], options: &RenderOptions) -> Result<RgbaImage> {
    render_changes_with(&PopplerRasterizer::new(), markers, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentRef, Fragment, PageInfo};
    use image::Rgba;

    struct BlankRasterizer;

    impl PageRasterizer for BlankRasterizer {
        fn rasterize(
            &self,
            _doc: &DocumentRef,
            _page: u32,
            width: u32,
        ) -> Result<RgbaImage> {
            Ok(RgbaImage::from_pixel(
                width,
                width * 2,
                Rgba([255, 255, 255, 255]),
            ))
        }
    }

    fn change(doc: u8, y: f32) -> Marker {
        Marker::Changed(Fragment {
            index: 0,
            doc: DocumentRef::new(doc, format!("doc{doc}.pdf")),
            page: PageInfo::new(1, 100.0, 200.0),
            x: 20.0,
            y,
            width: 40.0,
            height: 8.0,
            text: "word ".to_string(),
            start_index: 0,
            length: 5,
        })
    }

    #[test]
    fn test_render_produces_marked_image() {
        let markers = vec![change(0, 50.0), Marker::Boundary, change(1, 50.0)];
        let options = RenderOptions::new()
            .with_width(100)
            .with_horizontal_crop(false)
            .sequential();
        let image = render_changes_with(&BlankRasterizer, &markers, &options).unwrap();

        // Two full-width columns plus the divider.
        assert_eq!(image.width(), 201);
        assert!(image.height() > 0);
        let red = image
            .pixels()
            .filter(|p| p.0 == [255, 0, 0, 255])
            .count();
        assert!(red > 0, "expected red annotation marks");
    }

    #[test]
    fn test_no_changes_is_an_error() {
        let options = RenderOptions::new().with_width(100);
        let err = render_changes_with(&BlankRasterizer, &[Marker::Boundary], &options);
        assert!(matches!(err, Err(Error::EmptyDiff)));
    }

    #[test]
    fn test_invalid_options_rejected_before_work() {
        let markers = vec![change(0, 50.0)];
        let options = RenderOptions::new().with_width(0);
        assert!(matches!(
            render_changes_with(&BlankRasterizer, &markers, &options),
            Err(Error::InvalidConfig(_))
        ));
    }
}
