//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the preview engine, providing a single source of truth for constant values.

/// Overlay placement constants (pixels unless noted)
pub mod layout {
    /// Horizontal gap between the source thumbnail and the overlay
    pub const SPACING: f64 = 15.0;

    /// Margin reserved at the right viewport edge
    pub const RIGHT_MARGIN: f64 = 20.0;

    /// Minimum distance from the top viewport edge
    pub const TOP_MARGIN: f64 = 10.0;

    /// Minimum distance from the bottom viewport edge
    pub const BOTTOM_MARGIN: f64 = 30.0;

    /// Fraction of the viewport height available to the overlay
    pub const HEIGHT_RATIO: f64 = 0.7;
}

/// Show/hide debounce timing constants
pub mod timing {
    /// Quick hide delay in milliseconds (absorbs thumbnail-to-overlay pointer travel)
    pub const QUICK_HIDE_MS: u64 = 50;

    /// Slow hide delay in milliseconds (user-driven dismiss requests)
    pub const SLOW_HIDE_MS: u64 = 300;

    /// Opacity fade duration in milliseconds
    pub const FADE_MS: u64 = 200;
}

/// Initial-scan retry policy constants
pub mod scan {
    /// Interval between retry scans in milliseconds
    pub const RETRY_INTERVAL_MS: u64 = 100;

    /// Maximum number of retry scans before giving up on the initial scan
    pub const MAX_RETRIES: u32 = 20;
}

/// Host page markup contract
///
/// The engine itself never touches selectors; these are the canonical names
/// a concrete page binding uses to identify the elements it reports.
pub mod page {
    /// CSS class identifying thumbnail `img` elements
    pub const THUMBNAIL_CLASS: &str = "torrent-list__thumbnail";

    /// Selector for the dynamic content root the mutation observer is scoped to
    pub const CONTENT_ROOT_SELECTOR: &str = "#root";

    /// Class of the wrapper ancestor that receives hover listeners when present
    pub const WRAPPER_CLASS: &str = "ant-image";

    /// Persisted key for the feature flag
    pub const FLAG_KEY: &str = "image_preview_enabled";
}

/// Settings file location
pub mod settings {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "hover-preview";

    /// Settings file name
    pub const FILENAME: &str = "settings.json";
}

/// Bounds used when clamping loaded tunables to safe ranges
pub mod validation {
    /// Maximum placement margin or spacing value
    pub const MAX_MARGIN: f64 = 500.0;

    /// Maximum debounce or fade delay in milliseconds
    pub const MAX_DELAY_MS: u64 = 10_000;

    /// Maximum number of initial-scan retries
    pub const MAX_SCAN_RETRIES: u32 = 600;
}
