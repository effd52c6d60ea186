//! Sizing of the display mesh and placement of the frame struts.
//!
//! The display mesh is a unit shape, so its scale is its size in metres. Only
//! the width is chosen by the author; the height always follows from the
//! aspect ratio of the bound image.

use cgmath::Vector3;

use crate::artwork::Role;

/// Frame struts are boxes of `thickness` × (side length) × `depth` metres.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameConfig {
    pub thickness: f32,
    pub depth: f32,
    pub color: [f32; 4],
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            thickness: 0.15,
            depth: 0.05,
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrutLayout {
    pub role: Role,
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub display_scale: Vector3<f32>,
    pub struts: Vec<StrutLayout>,
}

impl Layout {
    pub fn width(&self) -> f32 {
        self.display_scale.x
    }

    pub fn height(&self) -> f32 {
        self.display_scale.y
    }

    pub fn strut(&self, role: Role) -> Option<&StrutLayout> {
        self.struts.iter().find(|strut| strut.role == role)
    }
}

// A missing dimension counts as 1 so that a broken image still gets a size.
fn non_zero(dimension: u32) -> f32 {
    if dimension == 0 { 1.0 } else { dimension as f32 }
}

pub fn aspect_ratio(image_width: u32, image_height: u32) -> f32 {
    non_zero(image_width) / non_zero(image_height)
}

pub fn compute_layout(
    width: f32,
    image_width: u32,
    image_height: u32,
    frame: Option<&FrameConfig>,
) -> Layout {
    let height = width / aspect_ratio(image_width, image_height);
    let display_scale = Vector3::new(width, height, 1.0);

    let struts = match frame {
        None => vec![],
        Some(frame) => {
            let t = frame.thickness;
            let d = frame.depth;
            let horizontal = Vector3::new(width + 2.0 * t, t, d);
            let vertical = Vector3::new(t, height + 2.0 * t, d);
            let dy = height / 2.0 + t / 2.0;
            let dx = width / 2.0 + t / 2.0;
            vec![
                StrutLayout {
                    role: Role::FrameTop,
                    position: Vector3::new(0.0, dy, 0.0),
                    scale: horizontal,
                },
                StrutLayout {
                    role: Role::FrameBottom,
                    position: Vector3::new(0.0, -dy, 0.0),
                    scale: horizontal,
                },
                StrutLayout {
                    role: Role::FrameLeft,
                    position: Vector3::new(-dx, 0.0, 0.0),
                    scale: vertical,
                },
                StrutLayout {
                    role: Role::FrameRight,
                    position: Vector3::new(dx, 0.0, 0.0),
                    scale: vertical,
                },
            ]
        }
    };

    Layout {
        display_scale,
        struts,
    }
}
