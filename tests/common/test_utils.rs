use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use artwork_ngin::{
    ArtworkNode, ImageLoader, LoadError,
    editor::{ArtworkProperty, Editor, PropertyError, PropertyValue},
    resources::decode,
};
use futures::{
    FutureExt,
    channel::oneshot,
    future::{self, LocalBoxFuture},
};
use image::DynamicImage;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::new_rgba8(width, height)
}

fn not_found(src: &str) -> LoadError {
    LoadError::Fetch {
        src: src.to_string(),
        source: anyhow::anyhow!("404 not found"),
    }
}

/// Resolves every load immediately. Unknown sources fail to fetch, `*.corrupt` fails to decode.
#[derive(Default)]
pub struct FakeLoader {
    images: HashMap<String, (u32, u32)>,
    calls: RefCell<Vec<String>>,
}

impl FakeLoader {
    pub fn with_image(mut self, src: &str, width: u32, height: u32) -> Self {
        self.images.insert(src.to_string(), (width, height));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ImageLoader for FakeLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, Result<DynamicImage, LoadError>> {
        self.calls.borrow_mut().push(src.to_string());
        let result = match self.images.get(src) {
            Some((width, height)) => Ok(image(*width, *height)),
            None if src.ends_with(".corrupt") => decode(src, b"definitely not an image"),
            None => Err(not_found(src)),
        };
        future::ready(result).boxed_local()
    }
}

/// Loads only resolve once the test releases them, in whatever order it likes.
#[derive(Default)]
pub struct GatedLoader {
    gates: RefCell<HashMap<String, VecDeque<oneshot::Sender<Result<DynamicImage, LoadError>>>>>,
}

impl GatedLoader {
    fn open(&self, src: &str, result: Result<DynamicImage, LoadError>) {
        let gate = self
            .gates
            .borrow_mut()
            .get_mut(src)
            .and_then(|gates| gates.pop_front())
            .unwrap_or_else(|| panic!("no load of {src} is waiting"));
        let _ = gate.send(result);
    }

    pub fn release(&self, src: &str, width: u32, height: u32) {
        self.open(src, Ok(image(width, height)));
    }

    pub fn fail(&self, src: &str) {
        self.open(src, Err(not_found(src)));
    }

    pub fn waiting(&self, src: &str) -> usize {
        self.gates.borrow().get(src).map_or(0, VecDeque::len)
    }
}

impl ImageLoader for GatedLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, Result<DynamicImage, LoadError>> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .borrow_mut()
            .entry(src.to_string())
            .or_default()
            .push_back(tx);
        let src = src.to_string();
        async move { rx.await.unwrap_or_else(|_| Err(not_found(&src))) }.boxed_local()
    }
}

/// Minimal host editor: one selected artwork, a log of dispatched commands, loads run inline.
pub struct TestEditor {
    pub selection: Option<ArtworkNode>,
    pub commands: Vec<(ArtworkProperty, PropertyValue)>,
}

impl TestEditor {
    pub fn new(node: ArtworkNode) -> Self {
        Self {
            selection: Some(node),
            commands: vec![],
        }
    }

    pub fn node(&self) -> &ArtworkNode {
        self.selection.as_ref().expect("selection")
    }
}

impl Editor for TestEditor {
    fn get_property_selected(&self, property: ArtworkProperty) -> Option<PropertyValue> {
        self.selection
            .as_ref()
            .map(|node| node.get_property(property))
    }

    fn set_property_selected(
        &mut self,
        property: ArtworkProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        let node = self.selection.as_mut().ok_or(PropertyError::NoSelection)?;
        self.commands.push((property, value.clone()));
        if let Some(pending) = node.set_property(property, value)? {
            let completion = futures::executor::block_on(pending);
            node.apply_load(completion);
        }
        Ok(())
    }
}

pub fn fake_node(loader: &Rc<FakeLoader>) -> ArtworkNode {
    ArtworkNode::new(loader.clone())
}
