//! Scene graph and hierarchical scene organization.
//!
//! Provides the [`SceneNode`] trait every node in an editor scene implements,
//! a plain [`ContainerNode`] for grouping, and helpers for addressing children
//! by name. Children are kept in an ordered list; the order is what a renderer
//! or an outliner panel shows, so replacing a child keeps its slot.

use std::any::Any;

use log::warn;

use crate::data_structures::instance::Instance;

pub trait SceneNode: Any {
    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn get_local_transform(&self) -> &Instance;

    fn get_local_transform_mut(&mut self) -> &mut Instance;

    fn get_world_transform(&self) -> &Instance;

    /**
     * Recomputes this node's world transform from `parents_world_transform` and passes
     * the result down to all children.
     */
    fn update_world_transforms(&mut self, parents_world_transform: &Instance);

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.get_children_mut().push(child);
    }

    /**
     * Returns a copy of this node. With `recursive` the children are copied as well,
     * otherwise the copy starts without children.
     */
    fn copy_node(&self, recursive: bool) -> Box<dyn SceneNode>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }
}

impl dyn SceneNode {
    pub fn downcast_ref<T: SceneNode>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SceneNode>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Position of the first direct child called `name`.
    pub fn child_index(&self, name: &str) -> Option<usize> {
        child_index(self.get_children(), name)
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.get_children().iter().map(|child| child.name()).collect()
    }
}

pub fn child_index(children: &[Box<dyn SceneNode>], name: &str) -> Option<usize> {
    children.iter().position(|child| child.name() == name)
}

pub fn find_child<'a, T: SceneNode>(children: &'a [Box<dyn SceneNode>], name: &str) -> Option<&'a T> {
    children
        .iter()
        .find(|child| child.name() == name)
        .and_then(|child| child.downcast_ref::<T>())
}

pub fn find_child_mut<'a, T: SceneNode>(
    children: &'a mut [Box<dyn SceneNode>],
    name: &str,
) -> Option<&'a mut T> {
    children
        .iter_mut()
        .find(|child| child.name() == name)
        .and_then(|child| child.downcast_mut::<T>())
}

/**
 * Puts `child` where the child with the same name currently sits. If there is no such
 * child it is appended. The replaced child is returned so the caller decides what to
 * carry over from it.
 */
pub fn replace_or_append(
    children: &mut Vec<Box<dyn SceneNode>>,
    child: Box<dyn SceneNode>,
) -> Option<Box<dyn SceneNode>> {
    match child_index(children, child.name()) {
        Some(idx) => Some(std::mem::replace(&mut children[idx], child)),
        None => {
            children.push(child);
            None
        }
    }
}

pub fn remove_child(children: &mut Vec<Box<dyn SceneNode>>, name: &str) -> Option<Box<dyn SceneNode>> {
    match child_index(children, name) {
        Some(idx) => Some(children.remove(idx)),
        None => {
            warn!("Tried to remove child {name}, which is not attached.");
            None
        }
    }
}

/// An empty group node that only positions its children.
pub struct ContainerNode {
    pub name: String,
    pub visible: bool,
    pub children: Vec<Box<dyn SceneNode>>,
    pub instance: (Instance, Instance),
}

impl ContainerNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visible: true,
            children: vec![],
            instance: (Instance::default(), Instance::default()),
        }
    }
}

impl SceneNode for ContainerNode {
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
            visible: self.visible,
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
