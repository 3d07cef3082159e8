#![forbid(unsafe_code)]

//! WASM host for pmolens.
//!
//! Binds the inspection engine from `pmolens-core` to a live page:
//! - a [`pmolens_core::DocumentView`] over the browser DOM,
//! - capture-phase listeners feeding engine events,
//! - HTML layers repainted from the engine's scene,
//! - `fetch`, `alert` and scrolling for the effects the engine emits.
//!
//! [`markup`] and [`console_log`] are plain Rust and tested natively.

pub mod console_log;
pub mod markup;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PmoLensWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PmoLensWeb;

#[cfg(not(target_arch = "wasm32"))]
impl PmoLensWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
