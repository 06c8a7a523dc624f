//! Theme context definition

use gloo::storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use yew::prelude::*;

/// Local storage key for the persisted theme
pub(super) const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ThemeContext {
    pub theme: Theme,
}

pub enum ThemeAction {
    Set(Theme),
    Toggle,
}

pub type ThemeHandle = UseReducerHandle<ThemeContext>;

impl Reducible for ThemeContext {
    type Action = ThemeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let theme = match action {
            ThemeAction::Set(theme) => theme,
            ThemeAction::Toggle => self.theme.toggle(),
        };

        if let Err(err) = LocalStorage::set(THEME_KEY, theme) {
            tracing::debug!(error = %err, "could not persist theme");
        }
        update_document_theme(theme);

        Rc::new(Self { theme })
    }
}

/// Toggle the `dark` class on `<html>` so Tailwind `dark:` variants apply.
pub fn update_document_theme(theme: Theme) {
    let Some(root) = gloo::utils::document()
        .document_element()
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return;
    };

    let class_list = root.class_list();
    let result = if theme.is_dark() {
        class_list.add_1("dark")
    } else {
        class_list.remove_1("dark")
    };
    if result.is_err() {
        tracing::debug!(?theme, "failed to update document theme class");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_light_and_dark() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert!(Theme::Dark.is_dark());
    }

    #[test]
    fn theme_is_stored_as_json_string() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"Dark\"");
        let theme: Theme = serde_json::from_str("\"Light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }
}
