//! GPU texture creation and upload for the two pipeline passes.
//!
//! Three kinds of texture live here: the base color texture (born as a 1x1
//! placeholder, mutated in place when asynchronous content arrives), the
//! offscreen scene color attachment, and the 3D LUT volume. LUT textures
//! use nearest filtering on purpose -- the compositor's half-texel remap
//! assumes it.

use crate::error::PipelineError;
use crate::lut::Lut3d;

/// Creates a 1x1 solid-color RGBA8 texture.
///
/// This is the "still loading" state of the base texture: the scene pass
/// samples it on any frame before real content lands. Once the external
/// loader finishes, [`upload_rgba`] replaces the contents in place and the
/// same handle serves the real image.
///
/// # Errors
///
/// `PipelineError::Gl` if the driver fails to create the texture object.
#[allow(unsafe_code)]
pub fn create_placeholder(gl: &glow::Context, rgba: [u8; 4]) -> Result<glow::Texture, PipelineError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. We create and configure a
    // texture with a valid 1x1 pixel upload.
    let texture = unsafe { gl.create_texture().map_err(PipelineError::Gl)? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        set_2d_sampling(gl);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            1,
            1,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(&rgba)),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

/// Replaces the contents of an existing 2D texture with RGBA8 pixel data.
///
/// This is the completion path of asynchronous base-texture loading: the
/// handle stays the same, so the renderer keeps sampling "whatever the
/// handle currently contains" with no synchronization beyond the shared
/// command stream.
///
/// # Errors
///
/// `PipelineError::InvalidDimensions` if either dimension is zero or the
/// pixel buffer length does not equal `width * height * 4`.
#[allow(unsafe_code)]
pub fn upload_rgba(
    gl: &glow::Context,
    texture: glow::Texture,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<(), PipelineError> {
    use glow::HasContext;

    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidDimensions(
            "texture dimensions must be non-zero".into(),
        ));
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(PipelineError::InvalidDimensions(format!(
            "pixel buffer length {} does not match {width}x{height} RGBA ({expected})",
            pixels.len()
        )));
    }

    // SAFETY: texture is a valid handle owned by the caller; dimensions and
    // buffer length were validated above.
    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            width as i32,
            height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(pixels)),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(())
}

/// Allocates an RGBA8 texture with no initial data, sized for use as the
/// offscreen target's color attachment.
///
/// # Errors
///
/// `PipelineError::Gl` if the driver fails to create the texture object.
#[allow(unsafe_code)]
pub fn create_scene_color(
    gl: &glow::Context,
    width: u32,
    height: u32,
) -> Result<glow::Texture, PipelineError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. Storage is allocated
    // without initial data; dimensions come from the validated target.
    let texture = unsafe { gl.create_texture().map_err(PipelineError::Gl)? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        set_2d_sampling(gl);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            width as i32,
            height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(None),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

/// Uploads a [`Lut3d`] as a `TEXTURE_3D` volume.
///
/// Filtering is NEAREST for both minification and magnification, with
/// CLAMP_TO_EDGE on all three axes. Interpolation would defeat the
/// compositor's exact grid-point mapping; the remap compensates for
/// nearest sampling instead.
///
/// # Errors
///
/// `PipelineError::Gl` if the driver fails to create the texture object.
#[allow(unsafe_code)]
pub fn create_lut_texture(gl: &glow::Context, lut: &Lut3d) -> Result<glow::Texture, PipelineError> {
    use glow::HasContext;

    let size = lut.size() as i32;

    // SAFETY: glow wraps raw GL calls as unsafe. The texel buffer length is
    // size^3 * 4 by Lut3d's construction, matching the upload extent.
    let texture = unsafe { gl.create_texture().map_err(PipelineError::Gl)? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_3D, Some(texture));
        gl.tex_parameter_i32(
            glow::TEXTURE_3D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_3D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_3D,
            glow::TEXTURE_WRAP_R,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_3D,
            glow::TEXTURE_MIN_FILTER,
            glow::NEAREST as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_3D,
            glow::TEXTURE_MAG_FILTER,
            glow::NEAREST as i32,
        );
        gl.tex_image_3d(
            glow::TEXTURE_3D,
            0,
            glow::RGBA8 as i32,
            size,
            size,
            size,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(lut.texels())),
        );
        gl.bind_texture(glow::TEXTURE_3D, None);
    }

    Ok(texture)
}

/// Deletes a texture created by this module.
///
/// GL objects have no destructor; owners call this when swapping out a
/// handle (e.g. replacing the selected LUT texture).
#[allow(unsafe_code)]
pub fn delete_texture(gl: &glow::Context, texture: glow::Texture) {
    use glow::HasContext;

    // SAFETY: the caller owns the handle and stops using it after this call.
    unsafe { gl.delete_texture(texture) };
}

/// Common 2D sampling state: linear filtering, edge clamping.
#[allow(unsafe_code)]
fn set_2d_sampling(gl: &glow::Context) {
    use glow::HasContext;

    // SAFETY: operates on the currently bound TEXTURE_2D; callers bind
    // before invoking.
    unsafe {
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
    }
}
