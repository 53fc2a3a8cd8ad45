#![cfg(target_arch = "wasm32")]
#![deny(unsafe_code)]
//! WASM bindings for the grade-engine pipeline.
//!
//! [`GradeApp`] wires the pipeline to an HTML canvas: the page hands over
//! the canvas, an options JSON string, and a per-frame timestamp, and gets
//! back the graded frame on screen. Asynchronous image loading stays on
//! the JavaScript side -- decode the image there and call
//! [`GradeApp::set_base_texture`] when the pixels are ready; until then
//! every frame renders the placeholder.

use grade_engine_core::params::{option_f64, option_string, option_usize};
use grade_engine_core::render::{
    create_lut_texture, create_placeholder, delete_texture, upload_rgba, GpuContext,
    GradingPipeline,
};
use grade_engine_core::transform::DEFAULT_VIEW_TRANSLATION;
use grade_engine_core::{Cube, Lut3d, SceneTransform, DEFAULT_LUT_SIZE};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Placeholder color shown until the real base texture arrives: opaque blue,
/// clearly distinguishable from the cleared black background.
const PLACEHOLDER_RGBA: [u8; 4] = [0, 0, 255, 255];

/// Default angular velocity of the spinning scene, radians per second.
const DEFAULT_ANGULAR_VELOCITY: f64 = 1.0;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// The pipeline bound to one canvas.
///
/// Options JSON keys (all optional): `"lut"` (variant name), `"lut_size"`
/// (cubic side length), `"angular_velocity"` (radians per second).
#[wasm_bindgen]
pub struct GradeApp {
    context: GpuContext,
    pipeline: GradingPipeline,
    base_texture: glow::Texture,
    lut_texture: glow::Texture,
    lut_size: usize,
    angular_velocity: f64,
}

#[wasm_bindgen]
impl GradeApp {
    /// Builds the pipeline against the canvas's WebGL2 context.
    ///
    /// Fails with the pipeline's startup-fatal conditions: no WebGL2
    /// context, shader compile/link failure, or an incomplete framebuffer.
    /// These are surfaced once; the page should report them and stop.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: &web_sys::HtmlCanvasElement, options: &str) -> Result<GradeApp, JsValue> {
        let options: serde_json::Value =
            serde_json::from_str(options).unwrap_or(serde_json::Value::Null);
        let lut_name = option_string(&options, "lut", Lut3d::list_names()[0]);
        let lut_size = option_usize(&options, "lut_size", DEFAULT_LUT_SIZE);
        let angular_velocity =
            option_f64(&options, "angular_velocity", DEFAULT_ANGULAR_VELOCITY);

        let webgl2: web_sys::WebGl2RenderingContext = canvas
            .get_context("webgl2")
            .map_err(|_| js_error("failed to query a webgl2 context"))?
            .ok_or_else(|| js_error("WebGL2 is not supported by this browser"))?
            .dyn_into()
            .map_err(|_| js_error("canvas returned a non-WebGL2 context"))?;

        let context =
            GpuContext::new(glow::Context::from_webgl2_context(webgl2)).map_err(js_error)?;
        let gl = context.gl();

        let pipeline = GradingPipeline::new(gl, &Cube::new(), canvas.width(), canvas.height())
            .map_err(js_error)?;
        let base_texture = create_placeholder(gl, PLACEHOLDER_RGBA).map_err(js_error)?;
        let lut = Lut3d::from_name(&lut_name, lut_size).map_err(js_error)?;
        let lut_texture = create_lut_texture(gl, &lut).map_err(js_error)?;

        Ok(GradeApp {
            context,
            pipeline,
            base_texture,
            lut_texture,
            lut_size,
            angular_velocity,
        })
    }

    /// Renders one frame for the given timestamp in seconds.
    pub fn render(&self, seconds: f64) {
        let transform =
            SceneTransform::spinning(seconds, self.angular_velocity, DEFAULT_VIEW_TRANSLATION);
        self.pipeline.render_frame(
            self.context.gl(),
            self.base_texture,
            self.lut_texture,
            &transform,
        );
    }

    /// Recreates the offscreen target after the canvas changed size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.pipeline
            .resize(self.context.gl(), width, height)
            .map_err(js_error)
    }

    /// Switches to another registered LUT variant.
    pub fn set_lut(&mut self, name: &str) -> Result<(), JsValue> {
        let lut = Lut3d::from_name(name, self.lut_size).map_err(js_error)?;
        let fresh = create_lut_texture(self.context.gl(), &lut).map_err(js_error)?;
        delete_texture(self.context.gl(), self.lut_texture);
        self.lut_texture = fresh;
        Ok(())
    }

    /// Completion path of asynchronous image loading: replaces the base
    /// texture's contents in place. The next rendered frame samples the
    /// new content; no frame ever waits for it.
    pub fn set_base_texture(
        &mut self,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), JsValue> {
        upload_rgba(self.context.gl(), self.base_texture, width, height, rgba).map_err(js_error)
    }

    /// The registered LUT variant names, for building a selection UI.
    pub fn lut_names() -> Vec<String> {
        Lut3d::list_names().iter().map(|s| s.to_string()).collect()
    }
}
