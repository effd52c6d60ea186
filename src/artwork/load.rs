//! Texture loads in flight.
//!
//! Every call to [`ArtworkNode::set_source`] starts a new load generation. The
//! returned [`PendingLoad`] resolves to a [`LoadCompletion`] tagged with that
//! generation, and [`ArtworkNode::apply_load`] only binds it if no newer load
//! has been started (or the load was cancelled) in the meantime.

use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{FutureExt, future::LocalBoxFuture};
use image::DynamicImage;
use instant::{Duration, Instant};

use crate::{
    artwork::ArtworkNode,
    data_structures::texture::TextureId,
    resources::LoadError,
};

/// A fetch-and-decode that has not resolved yet.
///
/// Dropping it abandons the load; the node then stays hidden until the next
/// [`ArtworkNode::set_source`].
pub struct PendingLoad {
    generation: u64,
    src: String,
    started: Instant,
    fut: LocalBoxFuture<'static, Result<DynamicImage, LoadError>>,
}

impl PendingLoad {
    pub(crate) fn new(
        generation: u64,
        src: &str,
        fut: LocalBoxFuture<'static, Result<DynamicImage, LoadError>>,
    ) -> Self {
        Self {
            generation,
            src: src.to_string(),
            started: Instant::now(),
            fut,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /**
     * Turns the load into a future that resolves to a state mutation, ready to be handed to
     * an event loop that applies mutations once their futures complete.
     */
    pub fn into_mutation(self) -> LocalBoxFuture<'static, Box<dyn FnOnce(&mut ArtworkNode) -> LoadOutcome>> {
        self.map(|completion| {
            let mutation: Box<dyn FnOnce(&mut ArtworkNode) -> LoadOutcome> =
                Box::new(move |node: &mut ArtworkNode| node.apply_load(completion));
            mutation
        })
        .boxed_local()
    }
}

impl Future for PendingLoad {
    type Output = LoadCompletion;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.fut.poll_unpin(cx).map(|result| LoadCompletion {
            generation: this.generation,
            src: this.src.clone(),
            elapsed: this.started.elapsed(),
            result,
        })
    }
}

impl fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("generation", &self.generation)
            .field("src", &self.src)
            .finish()
    }
}

/// The result of a [`PendingLoad`], not yet applied to its node.
#[derive(Debug)]
pub struct LoadCompletion {
    pub(crate) generation: u64,
    pub(crate) src: String,
    pub(crate) elapsed: Duration,
    pub(crate) result: Result<DynamicImage, LoadError>,
}

impl LoadCompletion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// The texture is bound and the display mesh is visible.
    Bound(TextureId),
    /// The current load failed; nothing is bound and the display mesh stays hidden.
    Failed(LoadError),
    /// A newer load was started or the load was cancelled; the result was dropped.
    Stale,
}

impl LoadOutcome {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    pub fn texture_id(&self) -> Option<TextureId> {
        match self {
            Self::Bound(id) => Some(*id),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}
