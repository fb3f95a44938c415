//! Hide/show timing controller
//!
//! A small state machine coordinating debounced show, debounced hide and
//! immediate-cancel-on-re-entry across the two hover zones. Invariant: at
//! most one pending hide timer exists at any time; scheduling a new one
//! always cancels the previous one first.
//!
//! Two distinct hide delays exist on purpose. Leaving a thumbnail or the
//! overlay expects the pointer to arrive in the adjacent zone within a few
//! milliseconds, so both use the quick delay. Dismiss requests (click,
//! Escape) use the slow delay.

use tracing::debug;

use crate::geometry::compute_placement;
use crate::host::{HostPage, NodeId, TimerId};
use crate::overlay::OverlaySurface;
use crate::settings::PreviewTunables;

/// Where the overlay currently is in its show/hide lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    /// Not displayed
    Hidden,
    /// Displayed, waiting for the one-frame deferral before fading in
    Showing,
    /// Displayed at full opacity
    Visible,
    /// A quick-delay hide is pending
    HidingQuick,
    /// A slow-delay hide is pending
    HidingSlow,
}

#[derive(Debug, Clone, Copy)]
struct PendingHide {
    /// Skip the pointer-over-overlay re-check when the timer fires.
    /// Set for dismiss requests, where the pointer being over the overlay
    /// must not keep it alive.
    bypass_pointer_guard: bool,
}

/// A source that cannot be previewed: empty, whitespace, or a bare data URI
fn is_blank_source(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == "data:"
}

#[derive(Debug)]
pub struct TimingController {
    phase: PreviewPhase,
    pointer_over_overlay: bool,
    pending_hide: Option<PendingHide>,
    fade_running: bool,
    tunables: PreviewTunables,
}

impl TimingController {
    pub fn new(tunables: PreviewTunables) -> Self {
        Self {
            phase: PreviewPhase::Hidden,
            pointer_over_overlay: false,
            pending_hide: None,
            fade_running: false,
            tunables,
        }
    }

    pub fn phase(&self) -> PreviewPhase {
        self.phase
    }

    pub fn pointer_over_overlay(&self) -> bool {
        self.pointer_over_overlay
    }

    /// Pointer entered a thumbnail's hover target.
    ///
    /// The enabled flag is sampled by the caller on every enter so a live
    /// toggle takes effect without re-initializing discovery.
    pub fn on_thumbnail_enter<H: HostPage>(
        &mut self,
        host: &mut H,
        overlay: &mut OverlaySurface,
        thumbnail: NodeId,
        enabled: bool,
    ) {
        if !enabled {
            return;
        }

        let source = host.image_source(thumbnail);
        let Some(url) = source.filter(|url| !is_blank_source(url)) else {
            // Not an error: a blank source is a no-preview condition
            self.force_hidden(host, overlay);
            return;
        };

        self.cancel_pending_hide(host);
        self.pointer_over_overlay = false;

        let placement = compute_placement(
            host.element_rect(thumbnail),
            host.natural_size(thumbnail),
            host.viewport(),
            &self.tunables,
        );
        overlay.present(host, &url, &placement);
        self.phase = PreviewPhase::Showing;
        host.request_frame();
    }

    /// Pointer left a thumbnail's hover target
    pub fn on_thumbnail_leave<H: HostPage>(&mut self, host: &mut H, overlay: &OverlaySurface) {
        if !overlay.is_displayed() {
            return;
        }
        self.schedule_hide(host, PreviewPhase::HidingQuick, false);
    }

    /// Pointer entered or moved within the overlay
    pub fn on_overlay_enter<H: HostPage>(&mut self, host: &mut H, overlay: &OverlaySurface) {
        self.pointer_over_overlay = true;
        self.cancel_pending_hide(host);
        if overlay.is_displayed()
            && matches!(self.phase, PreviewPhase::HidingQuick | PreviewPhase::HidingSlow)
        {
            self.phase = PreviewPhase::Visible;
        }
    }

    /// Pointer left the overlay
    pub fn on_overlay_leave<H: HostPage>(&mut self, host: &mut H, overlay: &OverlaySurface) {
        self.pointer_over_overlay = false;
        if !overlay.is_displayed() {
            return;
        }
        self.schedule_hide(host, PreviewPhase::HidingQuick, false);
    }

    /// Click on the overlay or Escape anywhere: a user-driven dismiss.
    /// Click necessarily happens with the pointer over the overlay and
    /// Escape implies no zone at all, so both bypass the pointer guard.
    pub fn on_dismiss_request<H: HostPage>(&mut self, host: &mut H, overlay: &OverlaySurface) {
        if !overlay.is_displayed() {
            return;
        }
        self.schedule_hide(host, PreviewPhase::HidingSlow, true);
    }

    /// The one-frame deferral elapsed; start the fade-in
    pub fn on_frame<H: HostPage>(&mut self, host: &mut H, overlay: &mut OverlaySurface) {
        if self.phase == PreviewPhase::Showing {
            overlay.fade_in(host);
            self.phase = PreviewPhase::Visible;
        }
    }

    /// The pending hide timer fired
    pub fn on_hide_timer<H: HostPage>(&mut self, host: &mut H, overlay: &mut OverlaySurface) {
        let Some(pending) = self.pending_hide.take() else {
            return; // stale firing, already cancelled
        };

        // Re-check the guard at fire time: the pointer may have reached the
        // overlay while the timer was pending. No reschedule on abort; the
        // next leave event schedules a fresh one.
        if !pending.bypass_pointer_guard && self.pointer_over_overlay {
            debug!("Hide aborted, pointer over overlay");
            if overlay.is_displayed() {
                self.phase = PreviewPhase::Visible;
            }
            return;
        }

        if overlay.is_displayed() {
            overlay.fade_out(host);
            host.schedule(TimerId::FadeCleanup, self.tunables.fade());
            self.fade_running = true;
        } else {
            self.phase = PreviewPhase::Hidden;
        }
    }

    /// The fade-out finished; actually conceal the overlay. Never cancelled
    /// by enter events: an in-progress fade always completes.
    pub fn on_fade_cleanup<H: HostPage>(&mut self, host: &mut H, overlay: &mut OverlaySurface) {
        self.fade_running = false;
        overlay.conceal(host);
        self.pointer_over_overlay = false;
        self.phase = PreviewPhase::Hidden;
    }

    /// Immediate transition to `Hidden` (blank-source hover)
    pub fn force_hidden<H: HostPage>(&mut self, host: &mut H, overlay: &mut OverlaySurface) {
        self.cancel_pending_hide(host);
        if self.fade_running {
            host.cancel(TimerId::FadeCleanup);
            self.fade_running = false;
        }
        if overlay.is_displayed() {
            overlay.fade_out(host);
            overlay.conceal(host);
        }
        self.pointer_over_overlay = false;
        self.phase = PreviewPhase::Hidden;
    }

    /// Drop all timers and flags; used on teardown
    pub fn reset<H: HostPage>(&mut self, host: &mut H) {
        self.cancel_pending_hide(host);
        if self.fade_running {
            host.cancel(TimerId::FadeCleanup);
            self.fade_running = false;
        }
        self.pointer_over_overlay = false;
        self.phase = PreviewPhase::Hidden;
    }

    fn schedule_hide<H: HostPage>(
        &mut self,
        host: &mut H,
        phase: PreviewPhase,
        bypass_pointer_guard: bool,
    ) {
        // Replace, never queue: a new request supersedes the pending one
        host.cancel(TimerId::Hide);
        let delay = match phase {
            PreviewPhase::HidingSlow => self.tunables.slow_hide(),
            _ => self.tunables.quick_hide(),
        };
        host.schedule(TimerId::Hide, delay);
        self.pending_hide = Some(PendingHide { bypass_pointer_guard });
        self.phase = phase;
    }

    fn cancel_pending_hide<H: HostPage>(&mut self, host: &mut H) {
        if self.pending_hide.take().is_some() {
            host.cancel(TimerId::Hide);
        }
    }
}
