use blog_frontend_common::{
    ThemeProvider, ThemeToggle, VerificationConfig, VerificationGate, use_theme,
};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::ArticlesPage;
use crate::hooks::use_site_key;

#[derive(Clone, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/page/:page")]
    Page { page: u32 },
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <ThemeProvider>
            <BrowserRouter>
                <AppContent />
            </BrowserRouter>
        </ThemeProvider>
    }
}

#[function_component(AppContent)]
fn app_content() -> Html {
    let theme = use_theme();
    let site_key = use_site_key();
    let config = VerificationConfig::new(site_key, theme);

    let render = {
        let config = config.clone();
        move |route: Route| switch(route, config.clone())
    };

    html! {
        <div class="min-h-screen flex flex-col bg-gray-50 dark:bg-gray-900">
            <header class="flex items-center justify-between p-4 bg-white dark:bg-gray-800 shadow-sm">
                <Link<Route> to={Route::Home} classes="text-2xl font-bold text-gray-900 dark:text-white">
                    {"Blog"}
                </Link<Route>>
                <ThemeToggle />
            </header>
            <main class="flex-1 p-6">
                <Switch<Route> {render} />
            </main>
            <VerificationGate config={config} />
        </div>
    }
}

fn switch(route: Route, config: VerificationConfig) -> Html {
    match route {
        Route::Home => html! { <ArticlesPage page={1} {config} /> },
        Route::Page { page } => html! { <ArticlesPage {page} {config} /> },
        Route::NotFound => html! {
            <div class="text-center text-gray-500 dark:text-gray-400">{"Page not found"}</div>
        },
    }
}
