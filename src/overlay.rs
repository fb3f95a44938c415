//! Overlay surface
//!
//! Exactly one overlay element exists per controller lifetime once
//! initialized. This struct owns its handle plus a mirror of the host-side
//! state (displayed, current source) so the engine can make decisions
//! without querying the host back.

use anyhow::{Context, Result};
use tracing::debug;

use crate::geometry::Placement;
use crate::host::{HostPage, HoverZone, ListenerHandle, NodeId};

#[derive(Debug)]
pub struct OverlaySurface {
    node: NodeId,
    hover_listener: ListenerHandle,
    displayed: bool,
    source: Option<String>,
    source_assignments: u64,
}

impl OverlaySurface {
    /// Create the overlay element and wire its own hover zone
    pub fn create<H: HostPage>(host: &mut H) -> Result<Self> {
        let node = host.create_overlay().context("Failed to create overlay element")?;
        let hover_listener = host.attach_hover(node, HoverZone::Overlay);
        debug!(node = node.0, "Created overlay surface");
        Ok(Self {
            node,
            hover_listener,
            displayed: false,
            source: None,
            source_assignments: 0,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Number of times the underlying source was actually reassigned
    pub fn source_assignments(&self) -> u64 {
        self.source_assignments
    }

    /// Position the overlay and bring it into the layout, still transparent.
    /// The source is only reassigned when the URL differs, avoiding a
    /// redundant reload on rapid re-entry of the same thumbnail.
    pub fn present<H: HostPage>(&mut self, host: &mut H, url: &str, placement: &Placement) {
        if self.source.as_deref() != Some(url) {
            host.set_overlay_source(self.node, url);
            self.source = Some(url.to_string());
            self.source_assignments += 1;
        }
        host.set_overlay_bounds(self.node, placement);
        host.set_overlay_displayed(self.node, true);
        self.displayed = true;
    }

    /// Fade to fully opaque (the host animates the transition)
    pub fn fade_in<H: HostPage>(&mut self, host: &mut H) {
        host.set_overlay_opacity(self.node, 1.0);
    }

    /// Fade to fully transparent
    pub fn fade_out<H: HostPage>(&mut self, host: &mut H) {
        host.set_overlay_opacity(self.node, 0.0);
    }

    /// Take the overlay out of the layout and drop its source. The source
    /// is cleared only here, after any fade, so the fade-out frames still
    /// show the image.
    pub fn conceal<H: HostPage>(&mut self, host: &mut H) {
        host.set_overlay_displayed(self.node, false);
        host.clear_overlay_source(self.node);
        self.displayed = false;
        self.source = None;
    }

    /// Detach the overlay's hover listener and remove the element
    pub fn destroy<H: HostPage>(self, host: &mut H) {
        host.detach(self.hover_listener);
        host.remove_overlay(self.node);
        debug!(node = self.node.0, "Destroyed overlay surface");
    }
}
