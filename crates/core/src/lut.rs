//! CPU-side 3D lookup table construction and the grading coordinate remap.
//!
//! A [`Lut3d`] is a cubic volume of RGBA8 texels of side length N. Texel
//! (x, y, z) holds the output color that grading should return for the
//! input triple `(x/(N-1), y/(N-1), z/(N-1))`. LUTs are sampled with
//! nearest filtering; [`grading_coord`] is the half-texel remap that makes
//! nearest sampling land on texel centers exactly at every grid point.
//!
//! Built-in variants are registered by name, mirroring how palettes are
//! selected elsewhere in the workspace: construct with [`Lut3d::from_name`]
//! and enumerate with [`Lut3d::list_names`]. The rendering core never
//! inspects a selected LUT's contents -- it only binds the designated
//! handle.

use crate::error::PipelineError;

/// Side length of the default identity LUT.
pub const DEFAULT_LUT_SIZE: usize = 16;

/// Smallest meaningful LUT side length (one texel per channel extreme).
pub const MIN_LUT_SIZE: usize = 2;

/// Number of quantization levels per channel in the posterize LUT.
const POSTERIZE_LEVELS: f32 = 4.0;

/// All registered LUT variant names.
const LUT_NAMES: &[&str] = &["identity", "inverted", "grayscale", "posterize"];

/// Maps a color channel value in [0, 1] to the LUT sampling coordinate.
///
/// `coord = (c * (S - 1) + 0.5) / S` for side length S. With nearest
/// filtering, sampling at `c` directly would read one texel short of the
/// final slice for values near 1.0; this remap is affine from the unit
/// interval onto texel centers and is exact at every grid point
/// `c = k/(S-1)`.
pub fn grading_coord(c: f32, size: usize) -> f32 {
    let s = size as f32;
    (c * (s - 1.0) + 0.5) / s
}

/// A cubic RGBA8 lookup table encoding a color transform.
///
/// Texels are stored x-fastest, then y, then z -- the layout a GL
/// `TexImage3D` upload expects. Alpha is always 255; the grading pass
/// carries the scene's alpha through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut3d {
    size: usize,
    texels: Vec<u8>,
}

impl Lut3d {
    /// Builds a LUT of side length `size` by evaluating `f` at every grid
    /// point. `f` receives the input triple in [0, 1]³ and returns the
    /// output triple, which is clamped and quantized to 8 bits.
    ///
    /// Returns `PipelineError::InvalidDimensions` if `size < 2`.
    pub fn build<F>(size: usize, f: F) -> Result<Self, PipelineError>
    where
        F: Fn(f32, f32, f32) -> [f32; 3],
    {
        if size < MIN_LUT_SIZE {
            return Err(PipelineError::InvalidDimensions(format!(
                "LUT side length must be at least {MIN_LUT_SIZE}, got {size}"
            )));
        }

        let step = 1.0 / (size - 1) as f32;
        let mut texels = Vec::with_capacity(size * size * size * 4);
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let out = f(x as f32 * step, y as f32 * step, z as f32 * step);
                    for channel in out {
                        texels.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
                    }
                    texels.push(255);
                }
            }
        }

        Ok(Self { size, texels })
    }

    /// The neutral LUT: texel (x, y, z) encodes exactly
    /// `(x/(N-1), y/(N-1), z/(N-1))`, so grading through it reproduces the
    /// input within 8-bit rounding.
    pub fn identity(size: usize) -> Result<Self, PipelineError> {
        Self::build(size, |r, g, b| [r, g, b])
    }

    /// Negates every channel.
    pub fn inverted(size: usize) -> Result<Self, PipelineError> {
        Self::build(size, |r, g, b| [1.0 - r, 1.0 - g, 1.0 - b])
    }

    /// Rec. 601 luma on all three channels.
    pub fn grayscale(size: usize) -> Result<Self, PipelineError> {
        Self::build(size, |r, g, b| {
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            [luma, luma, luma]
        })
    }

    /// Quantizes each channel to a small number of levels.
    pub fn posterize(size: usize) -> Result<Self, PipelineError> {
        Self::build(size, |r, g, b| {
            let q = |c: f32| (c * (POSTERIZE_LEVELS - 1.0)).round() / (POSTERIZE_LEVELS - 1.0);
            [q(r), q(g), q(b)]
        })
    }

    /// Constructs a registered LUT variant by name.
    ///
    /// Returns `PipelineError::UnknownLut` if the name is not recognized.
    pub fn from_name(name: &str, size: usize) -> Result<Self, PipelineError> {
        match name {
            "identity" => Self::identity(size),
            "inverted" => Self::inverted(size),
            "grayscale" => Self::grayscale(size),
            "posterize" => Self::posterize(size),
            _ => Err(PipelineError::UnknownLut(name.to_string())),
        }
    }

    /// Returns a slice of all registered LUT variant names.
    pub fn list_names() -> &'static [&'static str] {
        LUT_NAMES
    }

    /// Side length N of the cubic volume.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw RGBA8 texel data, x-fastest, then y, then z.
    pub fn texels(&self) -> &[u8] {
        &self.texels
    }

    /// The RGBA texel at integer grid coordinates.
    ///
    /// Callers must pass coordinates in `[0, size)`; this is test/debug
    /// plumbing, not a sampling path.
    pub fn texel(&self, x: usize, y: usize, z: usize) -> [u8; 4] {
        let i = 4 * ((z * self.size + y) * self.size + x);
        [
            self.texels[i],
            self.texels[i + 1],
            self.texels[i + 2],
            self.texels[i + 3],
        ]
    }

    /// CPU model of the shader's nearest-filtered, edge-clamped 3D sample.
    ///
    /// `coord` is the post-remap sampling coordinate per channel. Returns
    /// the texel's RGB as floats in [0, 1].
    pub fn sample_nearest(&self, coord: [f32; 3]) -> [f32; 3] {
        let pick = |c: f32| -> usize {
            let i = (c * self.size as f32).floor() as isize;
            i.clamp(0, self.size as isize - 1) as usize
        };
        let t = self.texel(pick(coord[0]), pick(coord[1]), pick(coord[2]));
        [
            t[0] as f32 / 255.0,
            t[1] as f32 / 255.0,
            t[2] as f32 / 255.0,
        ]
    }

    /// The full CPU grading reference: remap then nearest-sample.
    ///
    /// This mirrors exactly what the compositor's fragment stage computes
    /// for a scene color, and is what the testable properties assert
    /// against.
    pub fn grade(&self, color: [f32; 3]) -> [f32; 3] {
        self.sample_nearest([
            grading_coord(color[0], self.size),
            grading_coord(color[1], self.size),
            grading_coord(color[2], self.size),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_texels_follow_grid_formula() {
        let n = DEFAULT_LUT_SIZE;
        let lut = Lut3d::identity(n).unwrap();
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let expected = |k: usize| (255.0 * k as f32 / (n - 1) as f32).round() as u8;
                    assert_eq!(
                        lut.texel(x, y, z),
                        [expected(x), expected(y), expected(z), 255],
                        "texel ({x},{y},{z})"
                    );
                }
            }
        }
    }

    #[test]
    fn smallest_identity_lut_hits_channel_extremes() {
        let lut = Lut3d::identity(2).unwrap();
        assert_eq!(lut.texel(0, 0, 0), [0, 0, 0, 255]);
        assert_eq!(lut.texel(1, 1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn texel_layout_is_x_fastest() {
        let lut = Lut3d::identity(16).unwrap();
        // Moving one step along each axis must bump exactly that channel.
        assert_eq!(lut.texel(1, 0, 0)[0], 17);
        assert_eq!(lut.texel(0, 1, 0)[1], 17);
        assert_eq!(lut.texel(0, 0, 1)[2], 17);
    }

    #[test]
    fn build_rejects_degenerate_size() {
        assert!(matches!(
            Lut3d::identity(1),
            Err(PipelineError::InvalidDimensions(_))
        ));
        assert!(matches!(
            Lut3d::identity(0),
            Err(PipelineError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn texel_buffer_length_matches_volume() {
        let lut = Lut3d::identity(8).unwrap();
        assert_eq!(lut.texels().len(), 8 * 8 * 8 * 4);
        assert_eq!(lut.size(), 8);
    }

    #[test]
    fn alpha_is_always_opaque() {
        for name in Lut3d::list_names() {
            let lut = Lut3d::from_name(name, 4).unwrap();
            for a in lut.texels().chunks_exact(4).map(|t| t[3]) {
                assert_eq!(a, 255, "{name} produced non-opaque alpha");
            }
        }
    }

    #[test]
    fn grading_coord_hits_texel_centers_at_grid_points() {
        for s in [2usize, 4, 16, 33, 64] {
            for k in 0..s {
                let c = k as f32 / (s - 1) as f32;
                let expected = (k as f32 + 0.5) / s as f32;
                let got = grading_coord(c, s);
                assert!(
                    (got - expected).abs() < 1e-5,
                    "S={s} k={k}: coord {got}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn grading_coord_keeps_extremes_inside_edge_texels() {
        // Without the half-texel offset, c = 1.0 would read one texel short
        // of the final slice. With it, both extremes land mid-texel.
        let s = 16;
        assert!((grading_coord(0.0, s) - 0.5 / 16.0).abs() < 1e-6);
        assert!((grading_coord(1.0, s) - 15.5 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn identity_grade_reproduces_all_8bit_inputs_within_tolerance() {
        let lut = Lut3d::identity(DEFAULT_LUT_SIZE).unwrap();
        let tolerance = 1.0 / 15.0;
        for i in 0..=255u32 {
            let c = i as f32 / 255.0;
            let out = lut.grade([c, c, c]);
            for channel in out {
                assert!(
                    (channel - c).abs() <= tolerance,
                    "input {c}: graded {channel} drifted beyond {tolerance}"
                );
            }
        }
    }

    #[test]
    fn identity_grade_is_exact_at_grid_points() {
        let n = DEFAULT_LUT_SIZE;
        let lut = Lut3d::identity(n).unwrap();
        for k in 0..n {
            let c = k as f32 / (n - 1) as f32;
            let out = lut.grade([c, c, c]);
            for channel in out {
                // Only 8-bit rounding separates output from input here.
                assert!(
                    (channel - c).abs() <= 1.0 / 255.0 + 1e-6,
                    "grid input {c}: graded {channel}"
                );
            }
        }
    }

    #[test]
    fn inverted_lut_negates_channels() {
        let lut = Lut3d::inverted(16).unwrap();
        let out = lut.grade([0.0, 1.0, 0.0]);
        assert!(out[0] > 0.9, "red should invert to ~1, got {}", out[0]);
        assert!(out[1] < 0.1, "green should invert to ~0, got {}", out[1]);
        assert!(out[2] > 0.9, "blue should invert to ~1, got {}", out[2]);
    }

    #[test]
    fn grayscale_lut_equalizes_channels() {
        let lut = Lut3d::grayscale(16).unwrap();
        let out = lut.grade([0.8, 0.2, 0.4]);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn posterize_lut_uses_few_levels() {
        let lut = Lut3d::posterize(16).unwrap();
        let mut levels = std::collections::BTreeSet::new();
        for t in lut.texels().chunks_exact(4) {
            levels.insert(t[0]);
        }
        assert!(
            levels.len() <= POSTERIZE_LEVELS as usize,
            "expected at most {POSTERIZE_LEVELS} red levels, got {levels:?}"
        );
    }

    #[test]
    fn from_name_resolves_every_listed_name() {
        for name in Lut3d::list_names() {
            assert!(
                Lut3d::from_name(name, 4).is_ok(),
                "listed name {name} did not resolve"
            );
        }
    }

    #[test]
    fn from_name_rejects_unknown_names() {
        assert!(matches!(
            Lut3d::from_name("technicolor", 16),
            Err(PipelineError::UnknownLut(_))
        ));
    }

    #[test]
    fn default_variant_is_identity() {
        assert_eq!(Lut3d::list_names()[0], "identity");
    }

    #[test]
    fn sample_nearest_clamps_out_of_range_coordinates() {
        let lut = Lut3d::identity(16).unwrap();
        let low = lut.sample_nearest([-0.5, -0.5, -0.5]);
        let high = lut.sample_nearest([1.5, 1.5, 1.5]);
        assert_eq!(low, [0.0, 0.0, 0.0]);
        assert_eq!(high, [1.0, 1.0, 1.0]);
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Strategy for LUT side lengths (small to keep volume builds fast).
        fn side_length() -> impl Strategy<Value = usize> {
            2_usize..=33
        }

        fn unit_channel() -> impl Strategy<Value = f32> {
            0.0f32..=1.0
        }

        proptest! {
            #[test]
            fn grading_coord_is_affine_and_in_unit_range(
                s in side_length(),
                c in unit_channel(),
            ) {
                let coord = grading_coord(c, s);
                prop_assert!(coord > 0.0 && coord < 1.0,
                    "coord {coord} escaped the open unit interval");
            }

            #[test]
            fn grid_points_map_to_texel_centers(s in side_length(), k_frac in 0.0f32..1.0) {
                let k = (k_frac * (s - 1) as f32).round() as usize;
                let c = k as f32 / (s - 1) as f32;
                let expected = (k as f32 + 0.5) / s as f32;
                prop_assert!((grading_coord(c, s) - expected).abs() < 1e-5);
            }

            #[test]
            fn identity_grade_error_is_bounded_by_grid_spacing(
                s in side_length(),
                r in unit_channel(),
                g in unit_channel(),
                b in unit_channel(),
            ) {
                let lut = Lut3d::identity(s).unwrap();
                let out = lut.grade([r, g, b]);
                // Half the grid spacing plus 8-bit rounding.
                let bound = 0.5 / (s - 1) as f32 + 1.0 / 255.0 + 1e-4;
                for (got, want) in out.iter().zip([r, g, b]) {
                    prop_assert!(
                        (got - want).abs() <= bound,
                        "S={s}: graded {got}, input {want}, bound {bound}"
                    );
                }
            }
        }
    }
}
