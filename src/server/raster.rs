//! SVG icon rasterization.

use anyhow::{Context, Result};
use resvg::{tiny_skia, usvg};

/// Edge length of served raster icons.
pub const ICON_SIZE: u32 = 48;

pub fn is_svg(mime: &str) -> bool {
    matches!(mime, "image/svg+xml" | "image/svg")
}

/// Renders an SVG document scaled into a `size`×`size` PNG.
pub fn svg_to_png(data: &[u8], size: u32) -> Result<Vec<u8>> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .context("Failed to parse SVG icon")?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size).context("Invalid raster size")?;
    let svg_size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / svg_size.width(),
        size as f32 / svg_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.encode_png().context("Failed to encode PNG")
}
