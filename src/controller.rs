//! Lifecycle coordinator
//!
//! `PreviewController` owns the host binding, the feature flag, the overlay
//! surface, discovery and the timing controller, and is the single dispatch
//! point for host-fed events. It is an explicitly constructed object: no
//! module-level state, instantiable as many times as tests need.

use anyhow::Result;
use tracing::{error, info};

use crate::discovery::ThumbnailDiscovery;
use crate::host::{HostPage, PageEvent, TimerId};
use crate::overlay::OverlaySurface;
use crate::settings::{FeatureFlag, PreviewTunables};
use crate::timing::TimingController;

pub struct PreviewController<H: HostPage, F: FeatureFlag> {
    host: H,
    flag: F,
    overlay: Option<OverlaySurface>,
    discovery: ThumbnailDiscovery,
    timing: TimingController,
    initialized: bool,
}

impl<H: HostPage, F: FeatureFlag> PreviewController<H, F> {
    pub fn new(host: H, flag: F) -> Self {
        Self::with_tunables(host, flag, PreviewTunables::default())
    }

    pub fn with_tunables(host: H, flag: F, mut tunables: PreviewTunables) -> Self {
        tunables.validate_and_clamp();
        Self {
            host,
            flag,
            overlay: None,
            discovery: ThumbnailDiscovery::new(tunables.clone()),
            timing: TimingController::new(tunables),
            initialized: false,
        }
    }

    /// Current feature flag value
    pub fn is_enabled(&self) -> bool {
        self.flag.is_enabled()
    }

    /// Persist a new flag value and re-initialize to apply it. This is the
    /// entry point the settings UI calls on toggle.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.flag.set_enabled(enabled);
        self.reinit();
    }

    /// Initialize on demand. Idempotent: a no-op when already initialized.
    /// Does nothing at all (no overlay, no observer) while the flag is
    /// disabled. Failures are logged and never propagate to the host page.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        if !self.flag.is_enabled() {
            info!("Image preview disabled, skipping initialization");
            return;
        }
        match self.try_init() {
            Ok(()) => {
                self.initialized = true;
                info!(thumbnails = self.discovery.registry_len(), "Image preview initialized");
            }
            Err(e) => {
                error!(error = ?e, "Failed to initialize image preview");
            }
        }
    }

    fn try_init(&mut self) -> Result<()> {
        // Lazy: the overlay is created once per controller lifetime and
        // survives route changes until an explicit reinit
        if self.overlay.is_none() {
            self.overlay = Some(OverlaySurface::create(&mut self.host)?);
        }
        if let Err(e) = self.discovery.begin(&mut self.host) {
            // Do not leak a half-initialized surface
            if let Some(overlay) = self.overlay.take() {
                overlay.destroy(&mut self.host);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Tear down and initialize again. The only supported way to react to
    /// a feature-flag change at runtime.
    pub fn reinit(&mut self) {
        self.teardown();
        self.init();
    }

    /// Dispose every listener, disconnect the observer, cancel all timers,
    /// remove the overlay and clear the initialized flag
    pub fn teardown(&mut self) {
        self.discovery.teardown(&mut self.host);
        self.timing.reset(&mut self.host);
        if let Some(overlay) = self.overlay.take() {
            overlay.destroy(&mut self.host);
        }
        self.initialized = false;
    }

    /// Single dispatch for everything the host feeds back
    pub fn handle_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::ThumbnailEnter(thumbnail) => {
                // Sampled on every enter: a live toggle takes effect without
                // re-initializing discovery
                let enabled = self.flag.is_enabled();
                if let Some(overlay) = self.overlay.as_mut() {
                    self.timing
                        .on_thumbnail_enter(&mut self.host, overlay, thumbnail, enabled);
                }
            }
            PageEvent::ThumbnailLeave => {
                if let Some(overlay) = self.overlay.as_ref() {
                    self.timing.on_thumbnail_leave(&mut self.host, overlay);
                }
            }
            PageEvent::OverlayEnter | PageEvent::OverlayMove => {
                if let Some(overlay) = self.overlay.as_ref() {
                    self.timing.on_overlay_enter(&mut self.host, overlay);
                }
            }
            PageEvent::OverlayLeave => {
                if let Some(overlay) = self.overlay.as_ref() {
                    self.timing.on_overlay_leave(&mut self.host, overlay);
                }
            }
            PageEvent::OverlayClick | PageEvent::EscapePressed => {
                if let Some(overlay) = self.overlay.as_ref() {
                    self.timing.on_dismiss_request(&mut self.host, overlay);
                }
            }
            PageEvent::Frame => {
                if let Some(overlay) = self.overlay.as_mut() {
                    self.timing.on_frame(&mut self.host, overlay);
                }
            }
            PageEvent::Timer(TimerId::Hide) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    self.timing.on_hide_timer(&mut self.host, overlay);
                }
            }
            PageEvent::Timer(TimerId::FadeCleanup) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    self.timing.on_fade_cleanup(&mut self.host, overlay);
                }
            }
            PageEvent::Timer(TimerId::RetryScan) => {
                self.discovery.on_retry_tick(&mut self.host);
            }
            PageEvent::Mutations { thumbnails_added } => {
                self.discovery.on_mutations(&mut self.host, thumbnails_added);
            }
            PageEvent::ContentReady => {
                self.discovery.on_content_ready(&mut self.host);
            }
            PageEvent::RouteChanged => {
                // Client-side navigation: the initialized flag resets and
                // init runs again; the overlay and registry carry over, the
                // mutation observer picks up the re-rendered content
                self.initialized = false;
                self.init();
            }
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn discovery(&self) -> &ThumbnailDiscovery {
        &self.discovery
    }

    pub fn timing(&self) -> &TimingController {
        &self.timing
    }

    pub fn overlay(&self) -> Option<&OverlaySurface> {
        self.overlay.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
