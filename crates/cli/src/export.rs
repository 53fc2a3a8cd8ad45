//! Adobe `.cube` export of a [`Lut3d`].
//!
//! The `.cube` text format stores `LUT_3D_SIZE` followed by one
//! whitespace-separated RGB triple per texel, red channel varying fastest
//! -- exactly the storage order of `Lut3d`, so the export is a straight
//! walk over the texel buffer.

use grade_engine_core::Lut3d;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::CliError;

/// Renders a LUT as `.cube` file contents.
pub fn cube_contents(lut: &Lut3d, title: &str) -> String {
    let mut out = String::new();
    // fmt::Write into a String never fails.
    let _ = writeln!(out, "TITLE \"{title}\"");
    let _ = writeln!(out, "LUT_3D_SIZE {}", lut.size());
    for texel in lut.texels().chunks_exact(4) {
        let _ = writeln!(
            out,
            "{:.6} {:.6} {:.6}",
            texel[0] as f32 / 255.0,
            texel[1] as f32 / 255.0,
            texel[2] as f32 / 255.0
        );
    }
    out
}

/// Writes a LUT to `path` in `.cube` format.
///
/// Returns `CliError::Io` on write failure.
pub fn write_cube(lut: &Lut3d, title: &str, path: &Path) -> Result<(), CliError> {
    std::fs::write(path, cube_contents(lut, title))
        .map_err(|e| CliError::Io(format!("failed to write {}: {e}", path.display())))
}
