//! Page-level invisible verification

use std::rc::Rc;

use yew::prelude::*;

use crate::config::{TurnstileConfig, VerificationConfig};
use crate::verification::{
    BrowserStorage, GateDecision, TokenCache, Turnstile, WidgetHandle, gate_decision,
    gate_options, mount_in_background, now_ms,
};

const HIDDEN_CONTAINER: &str =
    "position: fixed; bottom: 20px; right: 20px; z-index: 9999; visibility: hidden;";

#[derive(Properties, Clone, PartialEq)]
pub struct VerificationGateProps {
    pub config: VerificationConfig,
}

/// Runs the challenge in execute mode and caches the token for later page
/// loads. Skips the challenge while a cached token is fresh.
#[function_component(VerificationGate)]
pub fn verification_gate(props: &VerificationGateProps) -> Html {
    let container = use_node_ref();

    {
        let container = container.clone();
        use_effect_with(props.config.clone(), move |config| {
            let cache = Rc::new(TokenCache::<BrowserStorage>::default());

            let teardown: Box<dyn FnOnce()> = match gate_decision(config, &*cache, now_ms()) {
                GateDecision::Disabled => Box::new(|| ()),
                GateDecision::Satisfied(cached) => {
                    tracing::debug!(
                        created_at_ms = cached.created_at_ms,
                        "cached verification token still fresh"
                    );
                    Box::new(|| ())
                }
                GateDecision::Verify { site_key } => {
                    match container.cast::<web_sys::Element>() {
                        Some(element) => {
                            let handle: WidgetHandle<Turnstile> = WidgetHandle::new();
                            let options =
                                gate_options(&site_key, config, &handle, cache, now_ms);
                            let task = mount_in_background(handle.clone(), element, options);

                            Box::new(move || {
                                task.cancel();
                                handle.release();
                            })
                        }
                        None => {
                            tracing::warn!("verification gate container missing");
                            Box::new(|| ())
                        }
                    }
                }
            };
            teardown
        });
    }

    if !props.config.is_enabled() {
        return html! {};
    }

    html! {
        <div
            ref={container}
            id={TurnstileConfig::GATE_CONTAINER_ID}
            style={HIDDEN_CONTAINER}
        />
    }
}
