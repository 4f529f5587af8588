//! Rendering options and marking styles.

use std::str::FromStr;

use crate::error::{Error, Result};

/// How a changed region is marked on its raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStyle {
    /// Bordered box around the region.
    Box,
    /// Strike-through at the vertical midline.
    Strike,
    /// Underline at the bottom edge.
    Underline,
}

impl FromStr for MarkStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "box" => Ok(MarkStyle::Box),
            "strike" => Ok(MarkStyle::Strike),
            "underline" => Ok(MarkStyle::Underline),
            other => Err(Error::InvalidConfig(format!(
                "style must be box, strike or underline, not {other:?}"
            ))),
        }
    }
}

impl MarkStyle {
    /// Parse a `left,right` style pair, e.g. `strike,underline`.
    pub fn parse_pair(spec: &str) -> Result<[MarkStyle; 2]> {
        let parts: Vec<&str> = spec.split(',').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidConfig(format!(
                "exactly two style values must be specified, got {spec:?}"
            )));
        }
        Ok([parts[0].parse()?, parts[1].parse()?])
    }
}

/// Options for rendering a change list into the side-by-side image.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Target raster width per page, in pixels.
    pub width: u32,

    /// Marking style per document side.
    pub styles: [MarkStyle; 2],

    /// Apply the shared horizontal content crop per document.
    pub horizontal_crop: bool,

    /// Rasterize pages in parallel.
    pub parallel: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target raster width in pixels.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the marking styles (left, right).
    pub fn with_styles(mut self, styles: [MarkStyle; 2]) -> Self {
        self.styles = styles;
        self
    }

    /// Enable or disable the shared horizontal crop.
    pub fn with_horizontal_crop(mut self, crop: bool) -> Self {
        self.horizontal_crop = crop;
        self
    }

    /// Disable parallel rasterization.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check the options before any expensive work.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::InvalidConfig(
                "result width must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 900,
            styles: [MarkStyle::Strike, MarkStyle::Underline],
            horizontal_crop: true,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_str() {
        assert_eq!("box".parse::<MarkStyle>().unwrap(), MarkStyle::Box);
        assert_eq!("strike".parse::<MarkStyle>().unwrap(), MarkStyle::Strike);
        assert_eq!(
            "underline".parse::<MarkStyle>().unwrap(),
            MarkStyle::Underline
        );
        assert!("circle".parse::<MarkStyle>().is_err());
    }

    #[test]
    fn test_parse_pair() {
        let styles = MarkStyle::parse_pair("strike,underline").unwrap();
        assert_eq!(styles, [MarkStyle::Strike, MarkStyle::Underline]);

        assert!(MarkStyle::parse_pair("strike").is_err());
        assert!(MarkStyle::parse_pair("strike,box,underline").is_err());
        assert!(MarkStyle::parse_pair("strike,circle").is_err());
    }

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.width, 900);
        assert_eq!(options.styles, [MarkStyle::Strike, MarkStyle::Underline]);
        assert!(options.horizontal_crop);
        assert!(options.parallel);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(RenderOptions::new().with_width(0).validate().is_err());
    }
}
