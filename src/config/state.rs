// Application state module
// Owns the configuration and the slide store shared by every request

use super::types::Config;
use crate::slides::SlideStore;

/// Application state
///
/// Built once before the listener is bound and shared through `Arc`.
/// Nothing in it changes after startup, so handlers read it without locks.
pub struct AppState {
    pub config: Config,
    pub slides: SlideStore,
}

impl AppState {
    pub const fn new(config: Config, slides: SlideStore) -> Self {
        Self { config, slides }
    }
}
