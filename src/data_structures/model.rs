//! Meshes and their materials.
//!
//! Geometry is kept as a descriptor (the renderer owns vertex generation); a
//! [`Material`] carries the surface parameters plus the optional texture map.

use std::any::Any;

use crate::data_structures::{
    instance::Instance,
    scene_graph::SceneNode,
    texture::{Texture, TextureId},
};

/// Unit-sized shapes; nodes reach their final size through scale.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// 1×1 plane in the XY plane, facing +Z.
    Plane,
    /// 1×1×1 box centred on the origin.
    Box,
    /// Sphere of diameter 1 whose UVs map an equirectangular image around the viewer.
    Sphere {
        width_segments: u32,
        height_segments: u32,
    },
}

/// Which faces of a surface are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// How the alpha channel of the colour map is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    Opaque,
    Blend,
    Mask,
}

impl AlphaMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opaque => "opaque",
            Self::Blend => "blend",
            Self::Mask => "mask",
        }
    }
}

#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub color: [f32; 4],
    pub side: Side,
    pub alpha_mode: AlphaMode,
    pub lit: bool,
    pub needs_update: bool,
    pub map: Option<Texture>,
}

impl Material {
    /// Opaque, lit white surface without a texture.
    pub fn standard(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: [1.0, 1.0, 1.0, 1.0],
            side: Side::Front,
            alpha_mode: AlphaMode::Opaque,
            lit: true,
            needs_update: false,
            map: None,
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha_mode == AlphaMode::Blend
    }

    /// Bind `texture` and hand back the texture that was bound before.
    pub fn set_map(&mut self, texture: Option<Texture>) -> Option<Texture> {
        self.needs_update = true;
        std::mem::replace(&mut self.map, texture)
    }

    pub fn map_id(&self) -> Option<TextureId> {
        self.map.as_ref().map(Texture::id)
    }

    /**
     * Copies every surface parameter. Textures are owned by exactly one material, so the
     * copy starts without a map and has to load its own.
     */
    pub fn copy_without_map(&self) -> Self {
        Self {
            name: self.name.clone(),
            color: self.color,
            side: self.side,
            alpha_mode: self.alpha_mode,
            lit: self.lit,
            needs_update: true,
            map: None,
        }
    }
}

pub struct MeshNode {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub children: Vec<Box<dyn SceneNode>>,
    pub instance: (Instance, Instance),
}

impl MeshNode {
    pub fn new(name: &str, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            children: vec![],
            instance: (Instance::default(), Instance::default()),
        }
    }

    pub fn scale(&self) -> cgmath::Vector3<f32> {
        self.instance.0.scale
    }

    pub fn position(&self) -> cgmath::Vector3<f32> {
        self.instance.0.position
    }
}

impl SceneNode for MeshNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn get_local_transform(&self) -> &Instance {
        &self.instance.0
    }

    fn get_local_transform_mut(&mut self) -> &mut Instance {
        &mut self.instance.0
    }

    fn get_world_transform(&self) -> &Instance {
        &self.instance.1
    }

    fn update_world_transforms(&mut self, parents_world_transform: &Instance) {
        self.instance.1 = parents_world_transform * &self.instance.0;
        let world = self.instance.1.clone();
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn copy_node(&self, recursive: bool) -> Box<dyn SceneNode> {
        let children = if recursive {
            self.children
                .iter()
                .map(|child| child.copy_node(true))
                .collect()
        } else {
            vec![]
        };

        Box::new(Self {
            name: self.name.clone(),
            geometry: self.geometry.clone(),
            material: self.material.copy_without_map(),
            visible: self.visible,
            cast_shadow: self.cast_shadow,
            receive_shadow: self.receive_shadow,
            children,
            instance: self.instance.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
