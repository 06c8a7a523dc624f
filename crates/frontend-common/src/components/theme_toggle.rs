//! Light/dark switch for the page header

use yew::prelude::*;

use crate::theme::{ThemeAction, ThemeHandle};

#[function_component(ThemeToggle)]
pub fn theme_toggle() -> Html {
    let Some(theme) = use_context::<ThemeHandle>() else {
        return html! {};
    };

    let is_dark = theme.theme.is_dark();
    let onclick = Callback::from(move |_: MouseEvent| theme.dispatch(ThemeAction::Toggle));

    html! {
        <button
            class="p-2 rounded-md text-gray-600 dark:text-gray-300 hover:bg-gray-100 dark:hover:bg-gray-700 transition-colors"
            title={if is_dark { "Switch to light mode" } else { "Switch to dark mode" }}
            {onclick}
        >
            {if is_dark { "☀" } else { "☾" }}
        </button>
    }
}
