use crate::core::{GymError, RenderFrame, Result};
use crate::vision::{render_from_frame, Frame};

/// Encode a RenderFrame::Pixels to a PNG byte vector.
/// - When the `image` feature is enabled, this will encode using the `image` crate.
/// - Without the feature, returns GymError::NotSupported.
pub fn encode_png(frame: &RenderFrame) -> Result<Vec<u8>> {
    match frame {
        RenderFrame::Pixels { width, height, data } => encode_pixels_png(*width, *height, data),
        RenderFrame::Text(_) => Err(GymError::NotSupported("Text frames cannot be encoded to PNG".into())),
    }
}

/// Encode one observation view (`full`, `fovea` or `peripheral`) as PNG.
/// Empty crops have no PNG representation and are rejected.
pub fn encode_view_png(view: &Frame) -> Result<Vec<u8>> {
    if view.is_empty() {
        return Err(GymError::InvalidObservation("Cannot encode an empty view".into()));
    }
    encode_png(&render_from_frame(view)?)
}

#[cfg(feature = "image")]
fn encode_pixels_png(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>> {
    use image::codecs::png::PngEncoder;
    use image::{ColorType, ImageEncoder};
    use std::io::Cursor;

    let count = (width as usize) * (height as usize);
    let color = if pixels.len() == count * 3 {
        ColorType::Rgb8
    } else if pixels.len() == count * 4 {
        ColorType::Rgba8
    } else {
        return Err(GymError::InvalidObservation(format!(
            "Pixel data length {} does not match width*height*3 or *4 ({}x{})",
            pixels.len(), width, height
        )));
    };

    let mut buf = Vec::new();
    PngEncoder::new(Cursor::new(&mut buf))
        .write_image(pixels, width, height, color.into())
        .map_err(|e| GymError::Other(format!("PNG encode error: {}", e)))?;
    Ok(buf)
}

#[cfg(not(feature = "image"))]
fn encode_pixels_png(_width: u32, _height: u32, _pixels: &[u8]) -> Result<Vec<u8>> {
    Err(GymError::NotSupported(
        "PNG encoding requires the `image` feature".into(),
    ))
}

/// Save a RenderFrame::Pixels as a PNG file at the given path.
/// Requires the `image` feature; otherwise returns NotSupported.
pub fn save_png<P: AsRef<std::path::Path>>(path: P, frame: &RenderFrame) -> Result<()> {
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes).map_err(|e| GymError::Other(format!("Failed to write PNG: {}", e)))
}
