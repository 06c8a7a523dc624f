//! Bot-mitigation challenge integration (Cloudflare Turnstile)
//!
//! Provider access, the wait for the provider script, the per-widget
//! lifecycle and the gate's token cache live here; the Yew components in
//! [`crate::components`] only wire them to the DOM.

pub mod modes;
pub mod provider;
pub mod readiness;
pub mod token_cache;
pub mod turnstile;
pub mod widget;

pub use modes::{GateDecision, gate_decision, gate_options, interactive_options};
pub use provider::{
    Appearance, ChallengeProvider, Execution, ProviderError, RenderOptions, WidgetId, WidgetSize,
    WidgetTheme,
};
pub use readiness::{
    BrowserTimer, CancelHandle, PollPolicy, Sleep, cancellable, wait_for_provider,
};
pub use token_cache::{
    BrowserStorage, CachedToken, KeyValueStore, MemoryStorage, StorageError, TokenCache, now_ms,
};
pub use turnstile::{Turnstile, mount_in_background};
pub use widget::{WidgetControls, WidgetHandle, WidgetRef, WidgetState};
