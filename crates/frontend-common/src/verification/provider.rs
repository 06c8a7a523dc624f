//! Challenge provider abstraction
//!
//! The Turnstile script exposes four calls on `window.turnstile`. Components
//! talk to it through [`ChallengeProvider`] so the lifecycle can be driven by
//! a scripted provider in tests.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::theme::Theme;

/// Opaque id returned by the provider for a mounted widget
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider script never appeared on the page
    #[error("challenge provider unavailable after {waited_ms} ms")]
    Unavailable { waited_ms: u32 },

    /// The provider threw while rendering
    #[error("challenge provider failed to render: {0}")]
    Render(String),

    /// No widget is mounted
    #[error("no widget is mounted")]
    NotMounted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidgetTheme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl WidgetTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetTheme::Light => "light",
            WidgetTheme::Dark => "dark",
            WidgetTheme::Auto => "auto",
        }
    }
}

impl From<Theme> for WidgetTheme {
    fn from(theme: Theme) -> Self {
        if theme.is_dark() {
            WidgetTheme::Dark
        } else {
            WidgetTheme::Light
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidgetSize {
    #[default]
    Normal,
    Compact,
}

impl WidgetSize {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetSize::Normal => "normal",
            WidgetSize::Compact => "compact",
        }
    }
}

/// When the challenge runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Execution {
    Render,
    Execute,
}

impl Execution {
    pub fn as_str(self) -> &'static str {
        match self {
            Execution::Render => "render",
            Execution::Execute => "execute",
        }
    }
}

/// When the widget becomes visible
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Appearance {
    Always,
    Execute,
    InteractionOnly,
}

impl Appearance {
    pub fn as_str(self) -> &'static str {
        match self {
            Appearance::Always => "always",
            Appearance::Execute => "execute",
            Appearance::InteractionOnly => "interaction-only",
        }
    }
}

pub type TokenCallback = Rc<dyn Fn(String)>;
pub type ErrorCallback = Rc<dyn Fn()>;

/// Options passed to the provider's `render`
#[derive(Clone)]
pub struct RenderOptions {
    pub site_key: String,
    pub theme: WidgetTheme,
    pub size: WidgetSize,
    pub execution: Option<Execution>,
    pub appearance: Option<Appearance>,
    pub on_success: Option<TokenCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl RenderOptions {
    pub fn new(site_key: impl Into<String>) -> Self {
        Self {
            site_key: site_key.into(),
            theme: WidgetTheme::default(),
            size: WidgetSize::default(),
            execution: None,
            appearance: None,
            on_success: None,
            on_error: None,
        }
    }

    pub fn theme(mut self, theme: impl Into<WidgetTheme>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn size(mut self, size: WidgetSize) -> Self {
        self.size = size;
        self
    }

    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = Some(execution);
        self
    }

    pub fn appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn on_success(mut self, callback: impl Fn(String) + 'static) -> Self {
        self.on_success = Some(Rc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_error = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("site_key", &self.site_key)
            .field("theme", &self.theme)
            .field("size", &self.size)
            .field("execution", &self.execution)
            .field("appearance", &self.appearance)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// The four calls a challenge provider offers
pub trait ChallengeProvider {
    /// Element type the widget is rendered into
    type Container;

    fn render(
        &self,
        container: &Self::Container,
        options: RenderOptions,
    ) -> Result<WidgetId, ProviderError>;

    fn reset(&self, widget: &WidgetId);

    fn remove(&self, widget: &WidgetId);

    fn get_response(&self, widget: &WidgetId) -> Option<String>;
}
