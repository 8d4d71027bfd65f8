//! Image placement on a page
//!
//! Photos are scaled with a contain-fit into the printable area (page minus
//! margins) and then centered on the full page. Margins only bound the scale;
//! since they are uniform, centering on the page is the same as centering in
//! the printable area.

use crate::options::ExportOptions;
use crate::types::{Orientation, PageSize, PhotoPdfError, Result};

use super::{PagePlan, Placement, Rect};

/// Page dimensions (width, height) in points with orientation applied.
///
/// Landscape swaps the portrait-native width and height.
pub fn page_dimensions(page_size: PageSize, orientation: Orientation) -> (f32, f32) {
    let (w, h) = page_size.dimensions_pt();
    match orientation {
        Orientation::Portrait => (w, h),
        Orientation::Landscape => (h, w),
    }
}

/// Calculate the centered contain-fit placement of an image on a page.
///
/// # Arguments
/// * `image_width` - Width of the image in pixels
/// * `image_height` - Height of the image in pixels
/// * `page_width` - Page width in points
/// * `page_height` - Page height in points
/// * `margin` - Uniform margin in points
///
/// Fails with [`PhotoPdfError::InvalidLayout`] when the margins consume the
/// whole page or the image has no area.
pub fn compute_placement(
    image_width: u32,
    image_height: u32,
    page_width: f32,
    page_height: f32,
    margin: f32,
) -> Result<Placement> {
    if image_width == 0 || image_height == 0 {
        return Err(PhotoPdfError::InvalidLayout(format!(
            "image has no area ({}x{})",
            image_width, image_height
        )));
    }
    if margin < 0.0 {
        return Err(PhotoPdfError::InvalidLayout(format!(
            "negative margin ({})",
            margin
        )));
    }

    let printable_width = page_width - 2.0 * margin;
    let printable_height = page_height - 2.0 * margin;
    if printable_width <= 0.0 || printable_height <= 0.0 {
        return Err(PhotoPdfError::InvalidLayout(format!(
            "margin {}pt leaves no printable area on a {}x{}pt page",
            margin, page_width, page_height
        )));
    }

    let scale = fit_scale(
        image_width as f32,
        image_height as f32,
        printable_width,
        printable_height,
    );

    let draw_width = image_width as f32 * scale;
    let draw_height = image_height as f32 * scale;

    let x = (page_width - draw_width) / 2.0;
    let y = (page_height - draw_height) / 2.0;

    Ok(Placement {
        rect: Rect::new(x, y, draw_width, draw_height),
        scale,
    })
}

/// Lay out one image on a page configured by `options`.
pub fn plan_page(image_width: u32, image_height: u32, options: &ExportOptions) -> Result<PagePlan> {
    let (page_width, page_height) = options.page_dimensions();
    let placement = compute_placement(
        image_width,
        image_height,
        page_width,
        page_height,
        options.margin.points(),
    )?;

    Ok(PagePlan {
        page_width,
        page_height,
        placement,
    })
}

/// Largest uniform scale that keeps the source inside the target.
fn fit_scale(src_width: f32, src_height: f32, target_width: f32, target_height: f32) -> f32 {
    let scale_w = target_width / src_width;
    let scale_h = target_height / src_height;
    scale_w.min(scale_h)
}
