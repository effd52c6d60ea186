//! The artwork scene node.
//!
//! An [`ArtworkNode`] shows one image on a plane (or, reprojected, around the
//! viewer on an inward-facing sphere), optionally surrounded by a picture
//! frame of four struts, and carries the catalogue metadata of the piece.
//!
//! Its parts are ordinary children in the scene graph, addressed by their
//! [`Role`] name:
//!
//! ```text
//! ArtworkNode
//! ├── ArtworkMesh         display mesh, owns the texture
//! ├── ArtworkFrameTop
//! ├── ArtworkFrameBottom
//! ├── ArtworkFrameLeft
//! └── ArtworkFrameRight
//! ```
//!
//! Mutators that only change the size call [`ArtworkNode::relayout`]; changing
//! the source starts a new load which the caller drives to completion (see
//! [`load`]).

pub mod layout;
pub mod load;

use std::{any::Any, fmt, rc::Rc, str::FromStr};

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::{
    data_structures::{
        instance::Instance,
        model::{AlphaMode, Geometry, Material, MeshNode, Side},
        scene_graph::{
            SceneNode, child_index, find_child, find_child_mut, remove_child, replace_or_append,
        },
        texture::Texture,
    },
    resources::ImageLoader,
};

pub use layout::{FrameConfig, Layout, StrutLayout, aspect_ratio, compute_layout};
pub use load::{LoadCompletion, LoadOutcome, PendingLoad};

/// How the image is mapped onto the display surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Flat,
    Equirectangular360,
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Equirectangular360 => "360-equirectangular",
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown projection {0:?}")]
pub struct UnknownProjection(pub String);

impl FromStr for Projection {
    type Err = UnknownProjection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "360-equirectangular" => Ok(Self::Equirectangular360),
            other => Err(UnknownProjection(other.to_string())),
        }
    }
}

/// The part an artwork child plays. Children are found by these names, not by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Display,
    FrameTop,
    FrameBottom,
    FrameLeft,
    FrameRight,
}

impl Role {
    pub const STRUTS: [Role; 4] = [
        Role::FrameTop,
        Role::FrameBottom,
        Role::FrameLeft,
        Role::FrameRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Display => "ArtworkMesh",
            Self::FrameTop => "ArtworkFrameTop",
            Self::FrameBottom => "ArtworkFrameBottom",
            Self::FrameLeft => "ArtworkFrameLeft",
            Self::FrameRight => "ArtworkFrameRight",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtworkMetadata {
    pub title: String,
    pub artist: String,
    pub medium: String,
    pub style: String,
    pub year: String,
    pub description: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArtworkConfig {
    /// `None` builds an artwork without a picture frame.
    pub frame: Option<FrameConfig>,
    pub projection: Projection,
    pub width: f32,
    pub height: f32,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            frame: Some(FrameConfig::default()),
            projection: Projection::Flat,
            width: 1.0,
            height: 1.0,
        }
    }
}

fn build_display(projection: Projection) -> MeshNode {
    let (geometry, side) = match projection {
        Projection::Flat => (Geometry::Plane, Side::Front),
        // seen from the inside
        Projection::Equirectangular360 => (
            Geometry::Sphere {
                width_segments: 60,
                height_segments: 40,
            },
            Side::Back,
        ),
    };
    let material = Material::standard("ArtworkMaterial").with_side(side);
    let mut mesh = MeshNode::new(Role::Display.name(), geometry, material);
    mesh.visible = false;
    mesh
}

fn build_strut(role: Role, frame: &FrameConfig) -> MeshNode {
    let material = Material::standard("ArtworkFrameMaterial").with_color(frame.color);
    MeshNode::new(role.name(), Geometry::Box, material)
}

fn sanitize_length(field: &str, value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("Artwork {field} must be a non-negative number, got {value}. Using 0.");
        0.0
    }
}

pub struct ArtworkNode {
    name: String,
    visible: bool,
    instance: (Instance, Instance),
    children: Vec<Box<dyn SceneNode>>,
    src: Option<String>,
    width: f32,
    height: f32,
    projection: Projection,
    frame: Option<FrameConfig>,
    metadata: ArtworkMetadata,
    loader: Rc<dyn ImageLoader>,
    generation: u64,
    pending: Option<u64>,
    deferred_load: Option<PendingLoad>,
}

impl ArtworkNode {
    pub fn new(loader: Rc<dyn ImageLoader>) -> Self {
        Self::with_config(loader, ArtworkConfig::default())
    }

    pub fn with_config(loader: Rc<dyn ImageLoader>, config: ArtworkConfig) -> Self {
        let mut node = Self {
            name: "Artwork".to_string(),
            visible: true,
            instance: (Instance::default(), Instance::default()),
            children: vec![],
            src: None,
            width: sanitize_length("width", config.width),
            height: sanitize_length("height", config.height),
            projection: config.projection,
            frame: config.frame,
            metadata: ArtworkMetadata::default(),
            loader,
            generation: 0,
            pending: None,
            deferred_load: None,
        };
        node.ensure_parts();
        node
    }

    pub fn config(&self) -> ArtworkConfig {
        ArtworkConfig {
            frame: self.frame.clone(),
            projection: self.projection,
            width: self.width,
            height: self.height,
        }
    }

    // Re-creates any part that is missing, e.g. after a non-recursive copy.
    fn ensure_parts(&mut self) {
        if self.display().is_none() {
            self.children.push(Box::new(build_display(self.projection)));
        }
        if let Some(frame) = self.frame.clone() {
            for role in Role::STRUTS {
                if self.strut(role).is_none() {
                    self.children.push(Box::new(build_strut(role, &frame)));
                }
            }
        }
    }

    // Drops struts left over from a framed past.
    fn prune_parts(&mut self) {
        if self.frame.is_none() {
            for role in Role::STRUTS {
                if child_index(&self.children, role.name()).is_some() {
                    remove_child(&mut self.children, role.name());
                }
            }
        }
    }

    pub fn display(&self) -> Option<&MeshNode> {
        find_child(&self.children, Role::Display.name())
    }

    pub fn display_mut(&mut self) -> Option<&mut MeshNode> {
        find_child_mut(&mut self.children, Role::Display.name())
    }

    pub fn strut(&self, role: Role) -> Option<&MeshNode> {
        find_child(&self.children, role.name())
    }

    pub fn is_framed(&self) -> bool {
        self.frame.is_some()
    }

    /// The texture bound to the display mesh, if a load has succeeded.
    pub fn texture(&self) -> Option<&Texture> {
        self.display().and_then(|display| display.material.map.as_ref())
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn metadata(&self) -> &ArtworkMetadata {
        &self.metadata
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.metadata.title = title.to_string();
    }

    pub fn artist(&self) -> &str {
        &self.metadata.artist
    }

    pub fn set_artist(&mut self, artist: &str) {
        self.metadata.artist = artist.to_string();
    }

    pub fn medium(&self) -> &str {
        &self.metadata.medium
    }

    pub fn set_medium(&mut self, medium: &str) {
        self.metadata.medium = medium.to_string();
    }

    pub fn style(&self) -> &str {
        &self.metadata.style
    }

    pub fn set_style(&mut self, style: &str) {
        self.metadata.style = style.to_string();
    }

    pub fn year(&self) -> &str {
        &self.metadata.year
    }

    pub fn set_year(&mut self, year: &str) {
        self.metadata.year = year.to_string();
    }

    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.metadata.description = description.to_string();
    }

    pub fn url(&self) -> &str {
        &self.metadata.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.metadata.url = url.to_string();
    }

    /// Sets the display width in metres. The height follows from the image.
    pub fn set_width(&mut self, width: f32) {
        self.width = sanitize_length("width", width);
        self.relayout();
    }

    /**
     * Stores the requested height in metres. The laid out height is still derived from
     * the width and the aspect ratio of the bound image.
     */
    pub fn set_height(&mut self, height: f32) {
        self.height = sanitize_length("height", height);
        self.relayout();
    }

    /// Rescales the display mesh and repositions the frame. Does nothing until a texture is bound.
    pub fn relayout(&mut self) {
        let Some((image_width, image_height)) = self.texture().map(|t| (t.width(), t.height()))
        else {
            return;
        };
        let layout = compute_layout(self.width, image_width, image_height, self.frame.as_ref());

        if let Some(display) = self.display_mut() {
            display.instance.0.scale = layout.display_scale;
        }
        for strut in layout.struts {
            if let Some(mesh) = find_child_mut::<MeshNode>(&mut self.children, strut.role.name()) {
                mesh.instance.0.position = strut.position;
                mesh.instance.0.scale = strut.scale;
            }
        }
    }

    /**
     * Starts loading `src`.
     *
     * The display mesh is hidden and the previously bound texture is released right away.
     * Any load that is still in flight becomes stale. Await the returned load and pass
     * the completion to [`apply_load`](Self::apply_load).
     */
    pub fn set_source(&mut self, src: &str) -> PendingLoad {
        self.src = Some(src.to_string());
        self.generation += 1;
        self.pending = Some(self.generation);

        self.ensure_parts();
        if let Some(display) = self.display_mut() {
            display.visible = false;
            if let Some(previous) = display.material.set_map(None) {
                debug!("released texture {} before loading {}", previous.id(), src);
            }
        }

        PendingLoad::new(self.generation, src, self.loader.load(src))
    }

    /// Binds the result of a load unless a newer load was started since.
    pub fn apply_load(&mut self, completion: LoadCompletion) -> LoadOutcome {
        let LoadCompletion {
            generation,
            src,
            elapsed,
            result,
        } = completion;

        if self.pending != Some(generation) {
            debug!(
                "discarding stale load of {} (generation {}, current {})",
                src, generation, self.generation
            );
            return LoadOutcome::Stale;
        }
        self.pending = None;

        let img = match result {
            Ok(img) => img,
            Err(e) => {
                error!("{}", e);
                return LoadOutcome::Failed(e);
            }
        };

        let mut texture = Texture::from_image(&img, &src);
        texture.normalize();
        let id = texture.id();
        let (image_width, image_height) = (texture.width(), texture.height());

        self.ensure_parts();
        if let Some(display) = self.display_mut() {
            display.material.alpha_mode = AlphaMode::Opaque;
            display.material.lit = true;
            display.material.set_map(Some(texture));
            display.visible = true;
        }
        for role in Role::STRUTS {
            if let Some(strut) = find_child_mut::<MeshNode>(&mut self.children, role.name()) {
                strut.cast_shadow = true;
                strut.receive_shadow = true;
            }
        }
        self.relayout();

        info!(
            "bound texture {} for {} ({}x{}) after {:?}",
            id, src, image_width, image_height, elapsed
        );
        LoadOutcome::Bound(id)
    }

    /// Starts loading `src` and binds the result once it arrives.
    pub async fn load(&mut self, src: &str) -> LoadOutcome {
        let pending = self.set_source(src);
        let completion = pending.await;
        self.apply_load(completion)
    }

    /// Makes the load in flight stale. Returns whether there was one.
    pub fn cancel_load(&mut self) -> bool {
        match self.pending.take() {
            Some(generation) => {
                self.generation += 1;
                debug!("cancelled load generation {}", generation);
                true
            }
            None => false,
        }
    }

    /**
     * Switches between flat and 360° display.
     *
     * The display mesh is rebuilt for the new projection and takes over the bound texture
     * and the visibility of the old one. Framed artworks also get fresh struts. Rebuilt
     * parts keep their place among the children.
     */
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;

        let mut next = build_display(projection);
        if let Some(previous) = self.display_mut() {
            next.visible = previous.visible;
            next.material.set_map(previous.material.set_map(None));
        }
        replace_or_append(&mut self.children, Box::new(next));

        if let Some(frame) = self.frame.clone() {
            for role in Role::STRUTS {
                let mut strut = build_strut(role, &frame);
                if let Some(previous) = self.strut(role) {
                    strut.cast_shadow = previous.cast_shadow;
                    strut.receive_shadow = previous.receive_shadow;
                }
                replace_or_append(&mut self.children, Box::new(strut));
            }
        }

        self.relayout();
    }

    /**
     * Turns `self` into a copy of `source`.
     *
     * With `recursive` the children are copied through the scene graph and the parts are
     * looked up again by role. Then size, projection and metadata are taken over. If the
     * source has an image, the copy loads it itself; the returned load must be driven like
     * any other.
     */
    pub fn copy_from(&mut self, source: &ArtworkNode, recursive: bool) -> Option<PendingLoad> {
        self.cancel_load();

        self.name = source.name.clone();
        self.visible = source.visible;
        self.instance = source.instance.clone();
        self.frame = source.frame.clone();
        if recursive {
            self.children = source
                .children
                .iter()
                .map(|child| child.copy_node(true))
                .collect();
        }
        if self.projection != source.projection {
            self.set_projection(source.projection);
        }
        self.ensure_parts();
        self.prune_parts();
        if let Some(display) = self.display_mut() {
            // the copy only ever shows the image of its own load
            if source.src.is_none() {
                display.material.set_map(None);
            }
            if display.material.map.is_none() {
                display.visible = false;
            }
        }

        self.width = source.width;
        self.height = source.height;
        self.metadata = source.metadata.clone();
        self.src = source.src.clone();
        self.relayout();

        source.src.clone().map(|src| self.set_source(&src))
    }

    /// A deep copy of this artwork together with the load of its image.
    pub fn duplicate(&self) -> (ArtworkNode, Option<PendingLoad>) {
        let mut copy = ArtworkNode::with_config(self.loader.clone(), self.config());
        let pending = copy.copy_from(self, true);
        (copy, pending)
    }

    /// The load started when this node was created through [`SceneNode::copy_node`].
    pub fn take_deferred_load(&mut self) -> Option<PendingLoad> {
        self.deferred_load.take()
    }
}

impl SceneNode for ArtworkNode {
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
        let mut copy = ArtworkNode::with_config(self.loader.clone(), self.config());
        copy.deferred_load = copy.copy_from(self, recursive);
        Box::new(copy)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for ArtworkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtworkNode")
            .field("name", &self.name)
            .field("src", &self.src)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("projection", &self.projection)
            .field("metadata", &self.metadata)
            .field("texture", &self.texture().map(Texture::id))
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish()
    }
}
