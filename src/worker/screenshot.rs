use crate::error::BrowseError;
use crate::requests::ScreenshotRequest;
use crate::results::ScreenshotResult;
use base64::Engine as _;
use base64::engine::general_purpose;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport};
use chromiumoxide::page::ScreenshotParams;

/// Reference viewport width the requested size is normalized against.
const BASE_VIEWPORT_WIDTH: f64 = 1024.0;

/// Scale factor for the requested output width, rounded to two decimals.
pub(crate) fn compute_scale(width: u32) -> f64 {
    (100.0 * f64::from(width) / BASE_VIEWPORT_WIDTH).round() / 100.0
}

/// Unscaled viewport dimension, rounded to a whole pixel.
fn unscaled_dimension(pixels: u32, scale: f64) -> f64 {
    (f64::from(pixels) / scale).round()
}

/// Capture a scaled viewport screenshot as a WebP data URI.
///
/// The viewport is resized to the unscaled dimensions with the scale applied
/// as the device scale factor, so the captured image comes out at the
/// requested pixel size while the page lays out at 1024px-equivalent width.
pub(crate) async fn capture(
    page: &Page,
    request: &ScreenshotRequest,
) -> Result<ScreenshotResult, BrowseError> {
    let scale = compute_scale(request.width);
    if scale <= 0.0 {
        return Err(BrowseError::Protocol(format!(
            "screenshot width {} is too small to scale",
            request.width
        )));
    }

    // Rounded once and reused so the clip never exceeds the viewport.
    let viewport_width = unscaled_dimension(request.width, scale);
    let viewport_height = unscaled_dimension(request.height, scale);

    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(viewport_width as i64)
        .height(viewport_height as i64)
        .device_scale_factor(scale)
        .mobile(false)
        .build()
        .map_err(BrowseError::Protocol)?;
    page.execute(metrics).await?;

    let mut params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Webp)
        .clip(Viewport {
            x: 0.0,
            y: 0.0,
            width: viewport_width,
            height: viewport_height,
            scale: 1.0,
        });
    if let Some(quality) = request.quality {
        params = params.quality(i64::from(quality));
    }

    let image = page.screenshot(params.build()).await?;
    let encoded = general_purpose::STANDARD.encode(image);

    Ok(ScreenshotResult {
        img_data_url: format!("data:image/webp;base64,{encoded}"),
        mime_type: "image/webp".to_string(),
        width: request.width,
        height: request.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_for_double_width() {
        assert_eq!(compute_scale(2048), 2.0);
    }

    #[test]
    fn test_scale_for_baseline_width() {
        assert_eq!(compute_scale(1024), 1.0);
    }

    #[test]
    fn test_scale_rounds_to_two_decimals() {
        assert_eq!(compute_scale(1280), 1.25);
        assert_eq!(compute_scale(800), 0.78);
    }

    #[test]
    fn test_unscaled_viewport_dimensions() {
        let scale = compute_scale(2048);

        assert_eq!(unscaled_dimension(2048, scale), 1024.0);
        assert_eq!(unscaled_dimension(1536, scale), 768.0);
    }

    #[test]
    fn test_unscaled_dimension_is_whole_pixels() {
        // 800/0.78 = 1025.64...; the override command takes integers, so
        // the clip must use the same rounded value
        let scale = compute_scale(800);

        assert_eq!(unscaled_dimension(800, scale), 1026.0);
        assert_eq!(unscaled_dimension(600, scale), 769.0);
        assert_eq!(unscaled_dimension(800, scale).fract(), 0.0);
    }

    #[test]
    fn test_tiny_width_rounds_scale_to_zero() {
        // 5/1024 rounds to 0.00; capture refuses rather than dividing by it
        assert_eq!(compute_scale(5), 0.0);
    }
}
