use blog_frontend_common::{ApiError, ArticleListView, VerificationConfig};
use yew::prelude::*;
use yew_router::prelude::*;

use super::{CommentDraft, CommentForm};
use crate::app::Route;

#[derive(Properties, Clone, PartialEq)]
pub struct ArticlesPageProps {
    pub page: u32,
    pub config: VerificationConfig,
}

#[function_component(ArticlesPage)]
pub fn articles_page(props: &ArticlesPageProps) -> Html {
    let navigator = use_navigator();
    let error = use_state(|| None::<ApiError>);

    // A new page starts without the previous page's failure
    {
        let error = error.clone();
        use_effect_with(props.page, move |_| error.set(None));
    }

    let on_page_change = Callback::from(move |page: u32| {
        let Some(navigator) = &navigator else {
            return;
        };
        if page <= 1 {
            navigator.push(&Route::Home);
        } else {
            navigator.push(&Route::Page { page });
        }
    });

    let on_error = {
        let error = error.clone();
        Callback::from(move |err: ApiError| error.set(Some(err)))
    };

    let on_comment = Callback::from(|draft: CommentDraft| {
        tracing::info!(
            chars = draft.content.chars().count(),
            verified = draft.token.is_some(),
            "comment submitted"
        );
    });

    html! {
        <>
            if let Some(err) = &*error {
                <div
                    class="mb-4 p-4 rounded-lg bg-red-50 dark:bg-red-900/20 text-red-700 dark:text-red-300"
                    role="alert"
                >
                    {
                        if err.is_not_found() {
                            "This page does not exist.".to_string()
                        } else {
                            format!("Failed to load articles: {err}")
                        }
                    }
                </div>
            }
            <ArticleListView
                page={props.page.max(1)}
                {on_page_change}
                on_error={Some(on_error)}
            />
            <div class="w-full md:w-[90%] lg:w-[68%] xl:w-[73%] mx-auto">
                <CommentForm config={props.config.clone()} on_submit={on_comment} />
            </div>
        </>
    }
}
