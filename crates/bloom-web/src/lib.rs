#![cfg(target_arch = "wasm32")]
//! JS-facing wrapper around the engine.
//!
//! The page owns the camera, the hand detector and the renderer. It forwards
//! each detector result to [`HeartBloom::on_results`], calls
//! [`HeartBloom::tick`] once per animation frame, and draws whatever
//! [`HeartBloom::instances`] returns.

use bloom_core::{
    instances_as_floats, status_label, BloomConfig, BloomContext, FrameLoop, FLOATS_PER_INSTANCE,
};
use std::sync::Arc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("bloom-web starting");
    Ok(())
}

#[wasm_bindgen]
pub struct HeartBloom {
    context: Arc<BloomContext>,
    frame_loop: FrameLoop,
}

#[wasm_bindgen]
impl HeartBloom {
    /// `config_json` may set any subset of the config; the rest is defaulted.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<HeartBloom, JsError> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => BloomConfig::from_json_str(json)?,
            _ => BloomConfig::default(),
        };
        let context = Arc::new(BloomContext::new(config.gesture.clone()));
        let frame_loop = FrameLoop::new(Arc::clone(&context), &config);
        log::info!(
            "[web] engine ready with {} objects",
            frame_loop.engine().objects().len()
        );
        Ok(Self { context, frame_loop })
    }

    /// Detector callback payload, serialized by the page with `JSON.stringify`.
    pub fn on_results(&self, results_json: &str) {
        self.context.on_frame_json(results_json);
    }

    pub fn set_camera_ready(&self, ready: bool) {
        self.context.set_camera_ready(ready);
    }

    pub fn camera_ready(&self) -> bool {
        self.context.ready()
    }

    pub fn start_capture(&self) {
        self.context.start_capture();
    }

    pub fn stop_capture(&self) {
        self.context.stop_capture();
    }

    pub fn reset(&self) {
        self.context.reset();
    }

    /// Replace the user photos with object URLs from an upload. Returns how
    /// many were kept.
    pub fn set_photos(&self, urls: js_sys::Array) -> usize {
        let urls: Vec<String> = urls.iter().filter_map(|v| v.as_string()).collect();
        self.context.upload_photos(urls)
    }

    /// Photo URL per object, in instance order.
    pub fn photo_urls(&self) -> js_sys::Array {
        self.frame_loop
            .engine()
            .objects()
            .iter()
            .map(|obj| JsValue::from_str(&obj.photo.url))
            .collect()
    }

    pub fn set_hidden_message(&self, message: &str) {
        self.context.set_hidden_message(message);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.frame_loop.engine_mut().resize(width, height);
    }

    /// Advance by `dt_sec`. Negative or non-finite steps count as zero.
    pub fn tick(&mut self, dt_sec: f32) {
        let dt = Duration::try_from_secs_f32(dt_sec).unwrap_or_default();
        self.frame_loop.advance(dt);
    }

    /// Column-major world matrix, color and emissive per object, flattened.
    pub fn instances(&self) -> Vec<f32> {
        instances_as_floats(&self.frame_loop.engine().instances()).to_vec()
    }

    pub fn floats_per_instance(&self) -> usize {
        FLOATS_PER_INSTANCE
    }

    /// Column-major view-projection matrix for the engine's camera.
    pub fn view_proj(&self) -> Vec<f32> {
        self.frame_loop
            .engine()
            .camera()
            .view_proj()
            .to_cols_array()
            .to_vec()
    }

    pub fn object_count(&self) -> usize {
        self.frame_loop.engine().objects().len()
    }

    pub fn status_label(&self) -> String {
        status_label(&self.context.snapshot()).to_string()
    }

    pub fn status_summary(&self) -> String {
        self.frame_loop.status().summary()
    }

    /// Message to overlay while a photo is spotlighted.
    pub fn reveal_message(&self) -> Option<String> {
        self.frame_loop.status().message
    }

    pub fn tension(&self) -> f32 {
        self.context.snapshot().tension
    }

    pub fn gallery_mode(&self) -> bool {
        self.context.snapshot().gallery_mode
    }

    pub fn mode(&self) -> String {
        self.frame_loop.engine().mode().label().to_string()
    }
}
