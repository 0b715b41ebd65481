//! Animated GIF output for composed frame sequences

use crate::framebuffer::Framebuffer;
use crate::output::{create_parent_dirs, frame_to_image, scale_image, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Encode frames as a looping animated GIF.
///
/// Every frame is shown for `frame_ms` milliseconds, rounded to the nearest
/// GIF centisecond with a floor of one. An empty frame list writes nothing.
pub fn render_gif(
    frames: &[Framebuffer],
    frame_ms: u32,
    scale: u32,
    path: &Path,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    create_parent_dirs(path)?;

    let file = File::create(path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_centiseconds(frame_ms) * 10, 1);

    for frame in frames {
        let image = scale_image(frame_to_image(frame), scale);
        encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
    }

    tracing::debug!(frames = frames.len(), path = %path.display(), "wrote gif");
    Ok(())
}

fn delay_centiseconds(frame_ms: u32) -> u32 {
    (frame_ms.saturating_add(5) / 10).max(1)
}
