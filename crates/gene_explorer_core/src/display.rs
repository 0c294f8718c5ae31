//! Plot display region.

use crate::request::ImageSize;

/// Image currently shown in the plot region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotImage {
    pub url: String,
    pub size: ImageSize,
}

impl PlotImage {
    /// Target of the enlarged viewer.
    pub fn full_size_url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotDisplay {
    image: Option<PlotImage>,
    max_px: u32,
}

impl PlotDisplay {
    pub fn new(max_px: u32) -> Self {
        Self {
            image: None,
            max_px,
        }
    }

    pub fn image(&self) -> Option<&PlotImage> {
        self.image.as_ref()
    }

    /// Replace the displayed image with a square fitted to the container.
    pub fn show(&mut self, url: impl Into<String>, container_width: u32) {
        self.image = Some(PlotImage {
            url: url.into(),
            size: ImageSize::square_within(container_width, self.max_px),
        });
    }

    /// Fit the displayed image to a new container width, keeping its aspect
    /// ratio. Returns whether anything changed.
    pub fn resize(&mut self, container_width: u32) -> bool {
        let max_px = self.max_px;
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        let resized = image.size.scaled_to_width(container_width.min(max_px));
        if resized == image.size {
            return false;
        }
        image.size = resized;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_without_image_is_noop() {
        let mut display = PlotDisplay::new(800);
        assert!(!display.resize(500));
        assert!(display.image().is_none());
    }

    #[test]
    fn test_resize_keeps_square_and_cap() {
        let mut display = PlotDisplay::new(800);
        display.show("http://x/plot.png", 1000);
        assert_eq!(display.image().unwrap().size.width, 800);

        assert!(display.resize(420));
        let size = display.image().unwrap().size;
        assert_eq!((size.width, size.height), (420, 420));

        assert!(display.resize(2000));
        let size = display.image().unwrap().size;
        assert_eq!((size.width, size.height), (800, 800));
        assert!(!display.resize(900));
    }
}
