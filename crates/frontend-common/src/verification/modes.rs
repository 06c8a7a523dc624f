//! The two ways a challenge is used on the site
//!
//! * interactive: a visible widget whose token goes straight to the caller,
//! * gate: an invisible page-level check whose token goes to the cache.

use std::rc::Rc;

use super::provider::{Appearance, ChallengeProvider, RenderOptions, WidgetSize};
use super::token_cache::{CachedToken, KeyValueStore, TokenCache};
use super::widget::{WidgetControls, WidgetHandle};
use crate::config::VerificationConfig;

/// Render options for the interactive widget.
pub fn interactive_options(
    site_key: &str,
    config: &VerificationConfig,
    on_token: impl Fn(String) + 'static,
) -> RenderOptions {
    RenderOptions::new(site_key)
        .theme(config.theme)
        .size(WidgetSize::Normal)
        .on_success(on_token)
}

/// What the gate does on mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No site key configured
    Disabled,
    /// A fresh token is cached; nothing to mount
    Satisfied(CachedToken),
    /// Run the invisible challenge
    Verify { site_key: String },
}

/// Decide whether the gate needs to run, purging an expired cache entry.
pub fn gate_decision<S: KeyValueStore>(
    config: &VerificationConfig,
    cache: &TokenCache<S>,
    now_ms: u64,
) -> GateDecision {
    let Some(site_key) = config.site_key.clone() else {
        return GateDecision::Disabled;
    };

    match cache.valid_token(now_ms) {
        Some(token) => GateDecision::Satisfied(token),
        None => GateDecision::Verify { site_key },
    }
}

/// Render options for the gate: the token is cached, errors reset the widget.
pub fn gate_options<P, S>(
    site_key: &str,
    config: &VerificationConfig,
    handle: &WidgetHandle<P>,
    cache: Rc<TokenCache<S>>,
    clock: fn() -> u64,
) -> RenderOptions
where
    P: ChallengeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let handle = handle.clone();
    RenderOptions::new(site_key)
        .theme(config.theme)
        .size(WidgetSize::Normal)
        .appearance(Appearance::Execute)
        .on_success(move |token| {
            if let Err(err) = cache.save(&token, clock()) {
                tracing::error!(error = %err, "failed to cache verification token");
            }
        })
        .on_error(move || {
            if let Err(err) = handle.reset() {
                tracing::debug!(error = %err, "nothing to reset after verification error");
            }
        })
}
