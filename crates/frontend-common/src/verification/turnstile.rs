//! Bindings to the Cloudflare Turnstile script (`window.turnstile`)

use std::cell::RefCell;
use std::collections::HashMap;

use js_sys::{Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::provider::{ChallengeProvider, ProviderError, RenderOptions, WidgetId};
use super::readiness::{BrowserTimer, CancelHandle, PollPolicy, cancellable};
use super::widget::WidgetHandle;

#[wasm_bindgen]
extern "C" {
    /// The object the Turnstile script installs on `window`
    #[derive(Clone, Debug)]
    pub type TurnstileApi;

    #[wasm_bindgen(method, catch, js_name = render)]
    fn render_widget(
        this: &TurnstileApi,
        container: &web_sys::Element,
        options: &Object,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = reset)]
    fn reset_widget(this: &TurnstileApi, widget_id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = remove)]
    fn remove_widget(this: &TurnstileApi, widget_id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getResponse)]
    fn widget_response(this: &TurnstileApi, widget_id: &str) -> Option<String>;
}

/// Closures handed to the script; they must outlive the widget
struct RetainedCallbacks {
    _success: Option<Closure<dyn FnMut(String)>>,
    _error: Option<Closure<dyn FnMut()>>,
}

/// Turnstile provider backed by the global script
pub struct Turnstile {
    api: TurnstileApi,
    callbacks: RefCell<HashMap<WidgetId, RetainedCallbacks>>,
}

impl Turnstile {
    /// Returns the provider once the script has installed `window.turnstile`.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let api = Reflect::get(&window, &JsValue::from_str("turnstile")).ok()?;
        if api.is_undefined() || api.is_null() {
            return None;
        }

        Some(Self {
            api: api.unchecked_into(),
            callbacks: RefCell::default(),
        })
    }
}

impl ChallengeProvider for Turnstile {
    type Container = web_sys::Element;

    fn render(
        &self,
        container: &web_sys::Element,
        options: RenderOptions,
    ) -> Result<WidgetId, ProviderError> {
        let (object, callbacks) = options_object(&options)?;

        let widget_id = self
            .api
            .render_widget(container, &object)
            .map_err(|err| ProviderError::Render(js_error(&err)))?
            .as_string()
            .map(WidgetId::new)
            .ok_or_else(|| ProviderError::Render("render did not return a widget id".into()))?;

        self.callbacks
            .borrow_mut()
            .insert(widget_id.clone(), callbacks);
        Ok(widget_id)
    }

    fn reset(&self, widget: &WidgetId) {
        if let Err(err) = self.api.reset_widget(widget.as_str()) {
            tracing::warn!(%widget, error = %js_error(&err), "turnstile reset failed");
        }
    }

    fn remove(&self, widget: &WidgetId) {
        if let Err(err) = self.api.remove_widget(widget.as_str()) {
            tracing::warn!(%widget, error = %js_error(&err), "turnstile remove failed");
        }
        self.callbacks.borrow_mut().remove(widget);
    }

    fn get_response(&self, widget: &WidgetId) -> Option<String> {
        self.api.widget_response(widget.as_str())
    }
}

fn options_object(options: &RenderOptions) -> Result<(Object, RetainedCallbacks), ProviderError> {
    let object = Object::new();
    set_option(&object, "sitekey", &JsValue::from_str(&options.site_key))?;
    set_option(&object, "theme", &JsValue::from_str(options.theme.as_str()))?;
    set_option(&object, "size", &JsValue::from_str(options.size.as_str()))?;
    if let Some(execution) = options.execution {
        set_option(&object, "execution", &JsValue::from_str(execution.as_str()))?;
    }
    if let Some(appearance) = options.appearance {
        set_option(&object, "appearance", &JsValue::from_str(appearance.as_str()))?;
    }

    let success = options.on_success.clone().map(|callback| {
        Closure::<dyn FnMut(String)>::new(move |token: String| callback(token))
    });
    if let Some(closure) = &success {
        set_option(&object, "callback", closure.as_ref())?;
    }

    let error = options
        .on_error
        .clone()
        .map(|callback| Closure::<dyn FnMut()>::new(move || callback()));
    if let Some(closure) = &error {
        set_option(&object, "error-callback", closure.as_ref())?;
    }

    Ok((
        object,
        RetainedCallbacks {
            _success: success,
            _error: error,
        },
    ))
}

fn set_option(object: &Object, key: &str, value: &JsValue) -> Result<(), ProviderError> {
    Reflect::set(object, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| ProviderError::Render(js_error(&err)))
}

fn js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Mount `handle` into `container` once the script is loaded, without blocking
/// the render. Cancelling the returned handle drops the wait and its timers.
pub fn mount_in_background(
    handle: WidgetHandle<Turnstile>,
    container: web_sys::Element,
    options: RenderOptions,
) -> CancelHandle {
    let (task, cancel) = cancellable(async move {
        let timer = BrowserTimer;
        handle
            .mount_when_ready(
                Turnstile::from_window,
                &timer,
                PollPolicy::default(),
                container,
                options,
            )
            .await;
    });
    wasm_bindgen_futures::spawn_local(task);
    cancel
}
