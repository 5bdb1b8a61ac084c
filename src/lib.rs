mod app;
mod chat_panel;
mod components;
mod upload_panel;

pub mod backdrop;
pub mod chat;
pub mod config;
pub mod error;
pub mod storage;
pub mod theme;
pub mod types;
pub mod upload;

// GPU rendering
pub mod gpu;
pub mod scene;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("starting HealthAnalyzer AI");
    yew::Renderer::<App>::new().render();
}
