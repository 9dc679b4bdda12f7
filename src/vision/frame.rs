//! Frame plumbing between raw render buffers and `(height, width, channels)` arrays.

use std::ops::Range;

use ndarray::Array3;

use crate::core::{GymError, RenderFrame, Result};

/// A rendered frame: height × width × channel, 8 bits per channel.
pub type Frame = Array3<u8>;

/// Convert a pixel [`RenderFrame`] into a [`Frame`].
/// Channel count (3 or 4) is inferred from the buffer length.
pub fn frame_from_render(frame: &RenderFrame) -> Result<Frame> {
    match frame {
        RenderFrame::Pixels { width, height, data } => {
            let (w, h) = (*width as usize, *height as usize);
            let count = w * h;
            let channels = if data.len() == count * 3 {
                3
            } else if data.len() == count * 4 {
                4
            } else {
                return Err(GymError::InvalidObservation(format!(
                    "Pixel data length {} does not match width*height*3 or *4 ({}x{})",
                    data.len(), width, height
                )));
            };
            Array3::from_shape_vec((h, w, channels), data.clone())
                .map_err(|e| GymError::InvalidObservation(e.to_string()))
        }
        RenderFrame::Text(_) => Err(GymError::NotSupported("Text frames carry no pixels".into())),
    }
}

/// Pack a 3- or 4-channel frame back into a row-major [`RenderFrame`].
pub fn render_from_frame(frame: &Frame) -> Result<RenderFrame> {
    let (h, w, c) = frame.dim();
    if c != 3 && c != 4 {
        return Err(GymError::NotSupported(format!("Cannot pack a {c}-channel frame")));
    }
    // iter() walks logical order, so non-standard layouts come out row-major too
    let data: Vec<u8> = frame.iter().copied().collect();
    Ok(RenderFrame::Pixels { width: w as u32, height: h as u32, data })
}

/// Resolve `[start, start + len)` against an axis of size `n` the way
/// Python sequence slicing does: negative bounds count from the end, both
/// bounds are clipped to `[0, n]` and an inverted range is empty.
pub(crate) fn slice_bounds(start: i64, len: usize, n: usize) -> Range<usize> {
    let n = n as i64;
    let resolve = |i: i64| if i < 0 { (i + n).max(0) } else { i.min(n) };
    let lo = resolve(start);
    let hi = resolve(start.saturating_add(len as i64));
    lo as usize..hi.max(lo) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_render_frame_round_trips() {
        let data: Vec<u8> = (0..2 * 3 * 3).map(|v| v as u8).collect();
        let rf = RenderFrame::Pixels { width: 3, height: 2, data: data.clone() };
        let frame = frame_from_render(&rf).expect("rgb frame converts");
        assert_eq!(frame.dim(), (2, 3, 3));
        // pixel (row 1, col 2) starts at (1*3 + 2) * 3
        assert_eq!(frame[[1, 2, 0]], 15);
        assert_eq!(render_from_frame(&frame).expect("packs"), rf);
    }

    #[test]
    fn rgba_channel_count_is_inferred() {
        let rf = RenderFrame::Pixels { width: 2, height: 2, data: vec![9; 16] };
        assert_eq!(frame_from_render(&rf).expect("rgba").dim(), (2, 2, 4));
    }

    #[test]
    fn bad_buffers_are_rejected() {
        let short = RenderFrame::Pixels { width: 2, height: 2, data: vec![0; 5] };
        assert!(matches!(frame_from_render(&short), Err(GymError::InvalidObservation(_))));
        let text = RenderFrame::Text("count=3".into());
        assert!(matches!(frame_from_render(&text), Err(GymError::NotSupported(_))));
        let gray = Frame::zeros((2, 2, 1));
        assert!(matches!(render_from_frame(&gray), Err(GymError::NotSupported(_))));
    }

    #[test]
    fn slice_bounds_follow_python_slicing() {
        assert_eq!(slice_bounds(0, 10, 100), 0..10);
        assert_eq!(slice_bounds(95, 10, 100), 95..100);
        assert_eq!(slice_bounds(120, 10, 100), 100..100);
        // start wraps to 99, stop stays at 9: inverted, so empty
        assert_eq!(slice_bounds(-1, 10, 100).len(), 0);
        // both bounds negative: counts from the end
        assert_eq!(slice_bounds(-15, 10, 100), 85..95);
        assert_eq!(slice_bounds(-500, 10, 100), 0..0);
        assert_eq!(slice_bounds(3, 0, 100), 3..3);
    }
}
