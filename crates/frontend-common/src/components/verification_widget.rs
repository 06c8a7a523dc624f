//! Interactive Turnstile widget

use std::rc::Rc;

use yew::prelude::*;

use crate::config::{TurnstileConfig, VerificationConfig};
use crate::verification::{
    Turnstile, WidgetHandle, WidgetRef, interactive_options, mount_in_background,
};

#[derive(Properties, Clone, PartialEq)]
pub struct VerificationWidgetProps {
    pub config: VerificationConfig,
    /// Receives each solved token unchanged
    pub on_token: Callback<String>,
    /// Filled with the widget's controls while it is mounted
    #[prop_or_default]
    pub widget_ref: WidgetRef,
}

/// Renders the challenge once the Turnstile script is available.
///
/// Renders nothing when no site key is configured.
#[function_component(VerificationWidget)]
pub fn verification_widget(props: &VerificationWidgetProps) -> Html {
    let container = use_node_ref();

    // Latest callback, so a new closure from the parent does not remount the widget
    let on_token = use_mut_ref(|| props.on_token.clone());
    *on_token.borrow_mut() = props.on_token.clone();

    {
        let container = container.clone();
        let widget_ref = props.widget_ref.clone();
        use_effect_with(props.config.clone(), move |config| {
            let teardown: Box<dyn FnOnce()> = match (
                config.site_key.as_deref(),
                container.cast::<web_sys::Element>(),
            ) {
                (Some(site_key), Some(element)) => {
                    let handle: WidgetHandle<Turnstile> = WidgetHandle::new();
                    widget_ref.attach(Rc::new(handle.clone()));

                    let options = interactive_options(site_key, config, move |token| {
                        let callback = on_token.borrow().clone();
                        callback.emit(token);
                    });
                    let task = mount_in_background(handle.clone(), element, options);

                    Box::new(move || {
                        task.cancel();
                        handle.release();
                        widget_ref.detach();
                    })
                }
                _ => Box::new(|| ()),
            };
            teardown
        });
    }

    if !props.config.is_enabled() {
        return html! {};
    }

    html! {
        <div ref={container} id={TurnstileConfig::WIDGET_CONTAINER_ID} />
    }
}
