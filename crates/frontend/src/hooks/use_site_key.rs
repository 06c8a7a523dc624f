use blog_frontend_common::SiteConfigService;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Key baked in at build time, used when the backend does not provide one
const BUILD_SITE_KEY: Option<&str> = option_env!("TURNSTILE_SITE_KEY");

/// Turnstile site key from the backend's site configuration.
///
/// `None` until the configuration arrives, and when neither the backend nor
/// the build provides a key.
#[hook]
pub fn use_site_key() -> Option<String> {
    let site_key = use_state(|| None::<String>);

    {
        let site_key = site_key.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let key = match SiteConfigService::from_window().fetch().await {
                    Ok(config) => config.turnstile_site_key(BUILD_SITE_KEY),
                    Err(err) => {
                        tracing::warn!(error = %err, "site config unavailable");
                        BUILD_SITE_KEY.map(str::to_string)
                    }
                };
                tracing::debug!(enabled = key.is_some(), "verification configured");
                site_key.set(key);
            });
        });
    }

    (*site_key).clone()
}
