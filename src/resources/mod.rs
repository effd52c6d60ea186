/**
 * This module contains all logic for loading images from external sources.
 */
pub mod texture;

pub use texture::{AssetLoader, ImageLoader, LoadError, decode};
