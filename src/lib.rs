#![forbid(unsafe_code)]

//! Hover-triggered image preview lifecycle engine.
//!
//! Augments a dynamic thumbnail host (typically a client-side routed page)
//! with a single enlarged-image overlay: thumbnails are discovered as they
//! appear, wired with hover behavior exactly once, and the overlay is
//! placed right of the hovered thumbnail, clamped to the viewport, with
//! debounced show/hide timing that keeps rapid pointer travel between the
//! thumbnail and the overlay from flickering.
//!
//! The engine is host-agnostic: embedders implement [`HostPage`] for their
//! document (element handles, overlay mutation, listeners with disposers,
//! one-shot timers, frame callbacks) and feed everything back through
//! [`PageEvent`]s on a single thread. See [`PreviewController`] for the
//! `init`/`reinit`/`teardown` surface.

pub mod constants;
pub mod controller;
pub mod discovery;
pub mod geometry;
pub mod host;
pub mod overlay;
pub mod settings;
pub mod timing;

#[cfg(test)]
mod mock_page;

pub use controller::PreviewController;
pub use geometry::{Placement, Rect, Size, compute_placement};
pub use host::{
    HostPage, HoverZone, ListenerHandle, NodeId, ObserverHandle, PageEvent, TimerId,
};
pub use overlay::OverlaySurface;
pub use settings::{FeatureFlag, FileSettings, MemoryFlag, PreviewTunables};
pub use timing::{PreviewPhase, TimingController};
