//! Host page abstraction
//!
//! The engine never talks to a real document. A concrete binding (DOM,
//! webview bridge, test double) implements [`HostPage`] and feeds events
//! back in through [`PageEvent`]. Listener registration hands out disposer
//! handles so teardown is removal-based, never element-replacement-based.

use std::time::Duration;

use anyhow::Result;

use crate::geometry::{Placement, Rect, Size};

/// Opaque identity of a host element. Stable for the element's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Disposer for one attached hover listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Disposer for a registered mutation observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

/// Which hover zone a listener belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverZone {
    Thumbnail,
    Overlay,
}

/// One-shot timers the engine schedules through the host.
///
/// Scheduling an id that is already pending replaces it; the engine never
/// keeps two timers of the same id outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Debounced hide (quick or slow delay)
    Hide,
    /// Post-fade cleanup that actually conceals the overlay
    FadeCleanup,
    /// Initial-scan retry tick
    RetryScan,
}

/// Everything the host feeds back into the engine, in delivery order,
/// on the single event-loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Pointer entered a wired thumbnail's hover target
    ThumbnailEnter(NodeId),
    /// Pointer left a wired thumbnail's hover target
    ThumbnailLeave,
    /// Pointer entered the overlay
    OverlayEnter,
    /// Pointer moved within the overlay
    OverlayMove,
    /// Pointer left the overlay
    OverlayLeave,
    /// The overlay was clicked (dismiss request)
    OverlayClick,
    /// Escape was pressed anywhere on the page
    EscapePressed,
    /// The animation frame requested via [`HostPage::request_frame`] arrived
    Frame,
    /// A timer scheduled via [`HostPage::schedule`] fired
    Timer(TimerId),
    /// A mutation batch was delivered; `thumbnails_added` is true when any
    /// added node is or contains a matching thumbnail
    Mutations { thumbnails_added: bool },
    /// The page's content is ready (document loaded or primary data fetch
    /// completed); resolves the discovery readiness race
    ContentReady,
    /// Client-side navigation changed the current path
    RouteChanged,
}

/// Surface the engine needs from the page it augments.
///
/// All methods are synchronous; asynchrony only re-enters the engine as
/// [`PageEvent`]s. Query methods take `&self`, mutations `&mut self`.
pub trait HostPage {
    /// Whether the dynamic content root exists yet
    fn content_root_ready(&self) -> bool;

    /// All thumbnail elements currently present under the content root
    fn find_thumbnails(&self) -> Vec<NodeId>;

    /// Element that should receive the hover listeners for a thumbnail:
    /// the nearest eligible wrapper ancestor if one exists, else the
    /// thumbnail itself (wrapper masks may swallow pointer events on the
    /// raw image element)
    fn hover_target(&self, thumbnail: NodeId) -> NodeId;

    /// Current source URL of a thumbnail image, if it has one
    fn image_source(&self, thumbnail: NodeId) -> Option<String>;

    /// On-screen rectangle of an element in viewport coordinates
    fn element_rect(&self, node: NodeId) -> Rect;

    /// Natural (unscaled) dimensions of a thumbnail's image
    fn natural_size(&self, thumbnail: NodeId) -> Size;

    /// Current viewport dimensions
    fn viewport(&self) -> Size;

    /// Create the overlay image element, hidden and fully transparent
    fn create_overlay(&mut self) -> Result<NodeId>;

    /// Remove the overlay element from the page
    fn remove_overlay(&mut self, overlay: NodeId);

    /// Assign the overlay's image source
    fn set_overlay_source(&mut self, overlay: NodeId, url: &str);

    /// Clear the overlay's image source
    fn clear_overlay_source(&mut self, overlay: NodeId);

    /// Position and size the overlay
    fn set_overlay_bounds(&mut self, overlay: NodeId, placement: &Placement);

    /// Toggle the overlay in or out of the layout (display none vs block)
    fn set_overlay_displayed(&mut self, overlay: NodeId, displayed: bool);

    /// Set the overlay's target opacity; the host animates the transition
    fn set_overlay_opacity(&mut self, overlay: NodeId, opacity: f32);

    /// Attach hover listeners for a zone to an element, returning a disposer
    fn attach_hover(&mut self, target: NodeId, zone: HoverZone) -> ListenerHandle;

    /// Remove a previously attached listener
    fn detach(&mut self, listener: ListenerHandle);

    /// Start observing structural mutations under the content root.
    /// Fails when the content root cannot be observed yet.
    fn observe_mutations(&mut self) -> Result<ObserverHandle>;

    /// Stop a mutation observer
    fn disconnect(&mut self, observer: ObserverHandle);

    /// Schedule (or replace) a one-shot timer
    fn schedule(&mut self, timer: TimerId, delay: Duration);

    /// Cancel a pending timer; a no-op when none is pending
    fn cancel(&mut self, timer: TimerId);

    /// Request a single animation-frame callback, delivered as [`PageEvent::Frame`]
    fn request_frame(&mut self);
}
