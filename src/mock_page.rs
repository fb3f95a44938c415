//! Test double for [`HostPage`]
//!
//! Records every overlay mutation, listener attach/detach, scheduled timer
//! and frame request so tests can assert on observable host effects. Timers
//! and frames never fire on their own; tests deliver the corresponding
//! `PageEvent` explicitly.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::geometry::{Placement, Rect, Size};
use crate::host::{HostPage, HoverZone, ListenerHandle, NodeId, ObserverHandle};
use crate::host::TimerId;

/// Route engine logs through the test harness writer. Guarded: only the
/// first call installs a subscriber, later ones are no-ops.
fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Debug)]
pub struct MockThumbnail {
    pub node: NodeId,
    pub wrapper: Option<NodeId>,
    pub source: Option<String>,
    pub rect: Rect,
    pub natural: Size,
}

#[derive(Debug, Default)]
pub struct MockOverlay {
    pub node: NodeId,
    pub source: Option<String>,
    pub bounds: Option<Placement>,
    pub displayed: bool,
    pub opacity: f32,
    /// Times the source property was actually assigned
    pub source_sets: u32,
    /// Times display was toggled off
    pub display_toggles_off: u32,
}

pub struct MockPage {
    next_id: u64,
    pub thumbnails: Vec<MockThumbnail>,
    pub viewport_size: Size,
    pub root_ready: bool,
    pub fail_observe: bool,

    overlay: Option<MockOverlay>,
    pub overlays_created: u32,
    pub overlays_removed: u32,

    listeners: HashMap<ListenerHandle, (NodeId, HoverZone)>,
    observers: Vec<ObserverHandle>,
    pub observers_started: u32,

    timers: HashMap<TimerId, Duration>,
    pub frames_requested: u32,
}

impl MockPage {
    pub fn new() -> Self {
        init_test_logging();
        Self {
            next_id: 1,
            thumbnails: Vec::new(),
            viewport_size: Size::new(1280.0, 800.0),
            root_ready: true,
            fail_observe: false,
            overlay: None,
            overlays_created: 0,
            overlays_removed: 0,
            listeners: HashMap::new(),
            observers: Vec::new(),
            observers_started: 0,
            timers: HashMap::new(),
            frames_requested: 0,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_thumbnail(&mut self, source: Option<&str>, rect: Rect, natural: Size) -> NodeId {
        let node = NodeId(self.fresh_id());
        self.thumbnails.push(MockThumbnail {
            node,
            wrapper: None,
            source: source.map(str::to_string),
            rect,
            natural,
        });
        node
    }

    /// Give a thumbnail a wrapper ancestor that should receive its listeners
    pub fn wrap_thumbnail(&mut self, node: NodeId) -> NodeId {
        let wrapper = NodeId(self.fresh_id());
        if let Some(thumb) = self.thumbnails.iter_mut().find(|t| t.node == node) {
            thumb.wrapper = Some(wrapper);
        }
        wrapper
    }

    pub fn overlay_state(&self) -> &MockOverlay {
        self.overlay.as_ref().expect("no overlay created")
    }

    pub fn scheduled(&self, timer: TimerId) -> Option<Duration> {
        self.timers.get(&timer).copied()
    }

    /// Mark a pending timer as fired (the host forgets one-shot timers when
    /// they fire). Returns whether it was actually pending. The test still
    /// delivers the corresponding event itself.
    pub fn fire(&mut self, timer: TimerId) -> bool {
        self.timers.remove(&timer).is_some()
    }

    pub fn active_timers(&self, timer: TimerId) -> usize {
        usize::from(self.timers.contains_key(&timer))
    }

    pub fn hover_listener_count(&self, zone: HoverZone) -> usize {
        self.listeners.values().filter(|(_, z)| *z == zone).count()
    }

    pub fn has_hover_listener(&self, node: NodeId, zone: HoverZone) -> bool {
        self.listeners.values().any(|(n, z)| *n == node && *z == zone)
    }

    pub fn active_observers(&self) -> usize {
        self.observers.len()
    }
}

impl HostPage for MockPage {
    fn content_root_ready(&self) -> bool {
        self.root_ready
    }

    fn find_thumbnails(&self) -> Vec<NodeId> {
        if !self.root_ready {
            return Vec::new();
        }
        self.thumbnails.iter().map(|t| t.node).collect()
    }

    fn hover_target(&self, thumbnail: NodeId) -> NodeId {
        self.thumbnails
            .iter()
            .find(|t| t.node == thumbnail)
            .and_then(|t| t.wrapper)
            .unwrap_or(thumbnail)
    }

    fn image_source(&self, thumbnail: NodeId) -> Option<String> {
        self.thumbnails
            .iter()
            .find(|t| t.node == thumbnail)
            .and_then(|t| t.source.clone())
    }

    fn element_rect(&self, node: NodeId) -> Rect {
        self.thumbnails
            .iter()
            .find(|t| t.node == node)
            .map(|t| t.rect)
            .unwrap_or_default()
    }

    fn natural_size(&self, thumbnail: NodeId) -> Size {
        self.thumbnails
            .iter()
            .find(|t| t.node == thumbnail)
            .map(|t| t.natural)
            .unwrap_or_default()
    }

    fn viewport(&self) -> Size {
        self.viewport_size
    }

    fn create_overlay(&mut self) -> Result<NodeId> {
        let node = NodeId(self.fresh_id());
        self.overlay = Some(MockOverlay { node, ..MockOverlay::default() });
        self.overlays_created += 1;
        Ok(node)
    }

    fn remove_overlay(&mut self, overlay: NodeId) {
        if self.overlay.as_ref().is_some_and(|o| o.node == overlay) {
            self.overlay = None;
            self.overlays_removed += 1;
        }
    }

    fn set_overlay_source(&mut self, _overlay: NodeId, url: &str) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.source = Some(url.to_string());
            overlay.source_sets += 1;
        }
    }

    fn clear_overlay_source(&mut self, _overlay: NodeId) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.source = None;
        }
    }

    fn set_overlay_bounds(&mut self, _overlay: NodeId, placement: &Placement) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.bounds = Some(*placement);
        }
    }

    fn set_overlay_displayed(&mut self, _overlay: NodeId, displayed: bool) {
        if let Some(overlay) = self.overlay.as_mut() {
            if overlay.displayed && !displayed {
                overlay.display_toggles_off += 1;
            }
            overlay.displayed = displayed;
        }
    }

    fn set_overlay_opacity(&mut self, _overlay: NodeId, opacity: f32) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.opacity = opacity;
        }
    }

    fn attach_hover(&mut self, target: NodeId, zone: HoverZone) -> ListenerHandle {
        let handle = ListenerHandle(self.fresh_id());
        self.listeners.insert(handle, (target, zone));
        handle
    }

    fn detach(&mut self, listener: ListenerHandle) {
        self.listeners.remove(&listener);
    }

    fn observe_mutations(&mut self) -> Result<ObserverHandle> {
        if self.fail_observe {
            return Err(anyhow!("mutation observation unavailable"));
        }
        let handle = ObserverHandle(self.fresh_id());
        self.observers.push(handle);
        self.observers_started += 1;
        Ok(handle)
    }

    fn disconnect(&mut self, observer: ObserverHandle) {
        self.observers.retain(|o| *o != observer);
    }

    fn schedule(&mut self, timer: TimerId, delay: Duration) {
        self.timers.insert(timer, delay);
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }
}
