//! artwork-ngin
//!
//! Artwork nodes for 3D gallery editors. An artwork is a scene node that shows
//! an image on a plane, optionally inside a picture frame, or reprojected
//! around the viewer as a 360° equirectangular panorama. It carries the
//! catalogue metadata of the piece and can be edited field by field through a
//! declarative property panel.
//!
//! High-level modules
//! - `artwork`: the artwork node, its texture loads, layout and projection switching
//! - `data_structures`: scene graph, meshes, materials, textures and transforms
//! - `editor`: property access by name, the editor seam and the property panel
//! - `resources`: image loaders that fetch and decode texture sources
//!

pub mod artwork;
pub mod data_structures;
pub mod editor;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use artwork::{ArtworkConfig, ArtworkNode, LoadOutcome, PendingLoad, Projection, Role};
pub use cgmath::Vector3;
pub use resources::{AssetLoader, ImageLoader, LoadError};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Sets up logging for the platform: `env_logger` natively, the browser console on the web.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }
}
