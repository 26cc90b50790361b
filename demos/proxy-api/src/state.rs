use btc_social_pulse::{AsyncSocialPulse, Settings};

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Request pipeline. Dispatches the blocking LunarCrush calls to the
    /// blocking thread pool internally.
    pub pulse: AsyncSocialPulse,

    /// Settings the process was started with.
    pub settings: Settings,
}
