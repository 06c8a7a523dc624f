//! Theme provider component

use super::context::{
    THEME_KEY, Theme, ThemeAction, ThemeContext, ThemeHandle, update_document_theme,
};
use gloo::storage::{LocalStorage, Storage};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ThemeProviderProps {
    pub children: Children,
}

#[function_component(ThemeProvider)]
pub fn theme_provider(props: &ThemeProviderProps) -> Html {
    let theme = use_reducer(|| {
        let theme = LocalStorage::get::<Theme>(THEME_KEY).unwrap_or_default();
        update_document_theme(theme);
        ThemeContext { theme }
    });

    // Follow the system preference until the user picks a theme
    {
        let theme = theme.clone();
        use_effect_with((), move |_| {
            let has_saved_theme = LocalStorage::raw()
                .get_item(THEME_KEY)
                .ok()
                .flatten()
                .is_some();

            if !has_saved_theme
                && let Ok(Some(query)) =
                    gloo::utils::window().match_media("(prefers-color-scheme: dark)")
                && query.matches()
            {
                theme.dispatch(ThemeAction::Set(Theme::Dark));
            }
            || ()
        });
    }

    html! {
        <ContextProvider<ThemeHandle> context={theme}>
            { props.children.clone() }
        </ContextProvider<ThemeHandle>>
    }
}

/// Current theme, or the default when rendered outside a [`ThemeProvider`].
#[hook]
pub fn use_theme() -> Theme {
    use_context::<ThemeHandle>().map_or_else(Theme::default, |handle| handle.theme)
}
