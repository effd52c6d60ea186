//! Engine data structures: meshes, textures, scene graphs, and transforms.
//!
//! This module contains the core data types for scene representation:
//!
//! - `model` contains geometry descriptors, materials and mesh nodes
//! - `texture` contains the decoded texture type and its GPU upload
//! - `instance` holds per-node transformation data
//! - `scene_graph` enables hierarchical scene organization

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
