//! PNG encoding of rendered frames.

use sky_core::FrameBuffer;

use crate::error::RenderResult;

/// Encodes an RGBA frame as a PNG blob.
///
/// Used by scalers running without a shared output buffer, where the
/// scaled band has to travel inside the completion event itself.
pub fn encode_png(frame: &FrameBuffer) -> RenderResult<Vec<u8>> {
    let dims = frame.dims();
    let mut blob = Vec::new();

    let mut encoder = png::Encoder::new(&mut blob, dims.width, dims.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(frame.data())?;
    writer.finish()?;

    Ok(blob)
}
