//! Thumbnail discovery
//!
//! Wires hover listeners to thumbnail elements exactly once each, as they
//! appear. Three signals race toward a single readiness resolution: the
//! initial synchronous scan, a bounded fixed-interval retry (the content
//! root may not exist at start), and an explicit content-ready notification
//! from the host. Whichever resolves first suppresses the rest; exhausting
//! the retry bound still resolves readiness so the mutation observer alone
//! carries discovery forward.

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::host::{HostPage, HoverZone, ListenerHandle, NodeId, ObserverHandle, TimerId};
use crate::settings::PreviewTunables;

#[derive(Debug)]
pub struct ThumbnailDiscovery {
    /// Thumbnails already wired with hover listeners, by element identity
    registry: HashSet<NodeId>,
    /// Disposer per attached listener, invoked in bulk on teardown
    disposers: Vec<ListenerHandle>,
    observer: Option<ObserverHandle>,
    retries_left: u32,
    retry_pending: bool,
    ready: bool,
    tunables: PreviewTunables,
}

impl ThumbnailDiscovery {
    pub fn new(tunables: PreviewTunables) -> Self {
        Self {
            registry: HashSet::new(),
            disposers: Vec::new(),
            observer: None,
            retries_left: tunables.max_scan_retries,
            retry_pending: false,
            ready: false,
            tunables,
        }
    }

    /// Number of thumbnails currently wired
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// Whether the readiness race has resolved
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Register the scoped mutation observer and run the immediate scan.
    /// When the scan comes up empty, the bounded retry timer starts.
    ///
    /// A content root that does not exist yet is not an error: observing is
    /// re-attempted on every retry tick and on content-ready notification.
    pub fn begin<H: HostPage>(&mut self, host: &mut H) -> Result<()> {
        self.try_observe(host)?;

        let found = self.scan(host);
        if found > 0 {
            self.resolve_ready(host, "initial scan");
        } else if !self.ready {
            self.retries_left = self.tunables.max_scan_retries;
            self.schedule_retry(host);
        }
        Ok(())
    }

    /// Wire every unregistered thumbnail currently present. Idempotent:
    /// registry membership skips already-wired elements.
    pub fn scan<H: HostPage>(&mut self, host: &mut H) -> usize {
        let mut wired = 0;
        for thumbnail in host.find_thumbnails() {
            if !self.registry.insert(thumbnail) {
                continue;
            }
            let target = host.hover_target(thumbnail);
            self.disposers.push(host.attach_hover(target, HoverZone::Thumbnail));
            wired += 1;
        }
        if wired > 0 {
            debug!(wired, total = self.registry.len(), "Wired thumbnails");
        }
        wired
    }

    fn try_observe<H: HostPage>(&mut self, host: &mut H) -> Result<()> {
        if self.observer.is_some() || !host.content_root_ready() {
            return Ok(());
        }
        let observer = host
            .observe_mutations()
            .context("Failed to observe content root mutations")?;
        self.observer = Some(observer);
        Ok(())
    }

    /// The retry timer fired
    pub fn on_retry_tick<H: HostPage>(&mut self, host: &mut H) {
        self.retry_pending = false;
        if self.ready {
            return;
        }
        if let Err(e) = self.try_observe(host) {
            error!(error = ?e, "Retrying without a mutation observer");
        }
        if self.scan(host) > 0 {
            self.resolve_ready(host, "retry scan");
            return;
        }
        self.retries_left = self.retries_left.saturating_sub(1);
        if self.retries_left == 0 {
            // Observer-only mode from here on
            warn!("No thumbnails found within the retry bound, relying on mutation observer");
            self.resolve_ready(host, "retry bound exhausted");
        } else {
            self.schedule_retry(host);
        }
    }

    /// A mutation batch arrived; rescan when it may contain thumbnails
    pub fn on_mutations<H: HostPage>(&mut self, host: &mut H, thumbnails_added: bool) {
        if !thumbnails_added {
            return;
        }
        if self.scan(host) > 0 && !self.ready {
            self.resolve_ready(host, "mutation batch");
        }
    }

    /// Explicit readiness notification from the host (document loaded or
    /// primary data fetch completed)
    pub fn on_content_ready<H: HostPage>(&mut self, host: &mut H) {
        if self.ready {
            return;
        }
        if let Err(e) = self.try_observe(host) {
            error!(error = ?e, "Content ready but mutation observer unavailable");
        }
        self.scan(host);
        self.resolve_ready(host, "content ready notification");
    }

    /// Detach every listener, stop the observer, cancel the retry timer
    /// and empty the registry
    pub fn teardown<H: HostPage>(&mut self, host: &mut H) {
        for disposer in self.disposers.drain(..) {
            host.detach(disposer);
        }
        if let Some(observer) = self.observer.take() {
            host.disconnect(observer);
        }
        if self.retry_pending {
            host.cancel(TimerId::RetryScan);
            self.retry_pending = false;
        }
        self.registry.clear();
        self.retries_left = self.tunables.max_scan_retries;
        self.ready = false;
    }

    fn schedule_retry<H: HostPage>(&mut self, host: &mut H) {
        host.schedule(TimerId::RetryScan, self.tunables.retry_interval());
        self.retry_pending = true;
    }

    fn resolve_ready<H: HostPage>(&mut self, host: &mut H, trigger: &str) {
        if self.ready {
            return;
        }
        self.ready = true;
        if self.retry_pending {
            host.cancel(TimerId::RetryScan);
            self.retry_pending = false;
        }
        info!(trigger, thumbnails = self.registry.len(), "Thumbnail discovery ready");
    }
}
