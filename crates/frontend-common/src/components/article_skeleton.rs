//! Placeholder cards shown while a page of articles loads

use yew::prelude::*;

use crate::cn;

#[derive(Properties, Clone, PartialEq)]
pub struct ArticleSkeletonProps {
    /// Number of placeholder cards
    #[prop_or(3)]
    pub rows: usize,
    #[prop_or(String::from("Loading articles"))]
    pub label: String,
}

const BAR: &str = "rounded bg-gray-200 dark:bg-gray-700";

#[function_component(ArticleSkeleton)]
pub fn article_skeleton(props: &ArticleSkeletonProps) -> Html {
    html! {
        <div class="flex flex-col gap-5 animate-pulse" role="status" aria-busy="true">
            <span class="sr-only">{&props.label}</span>
            { for (0..props.rows).map(|row| html! {
                <div key={row} class="flex flex-col md:flex-row overflow-hidden rounded-lg bg-white dark:bg-gray-800 shadow-sm">
                    <div class="md:w-2/5 h-48 shrink-0 bg-gray-200 dark:bg-gray-700" />
                    <div class="flex flex-col gap-3 p-6 w-full">
                        <div class={cn!(BAR, "h-6 w-3/4")} />
                        <div class={cn!(BAR, "h-4 w-full")} />
                        <div class={cn!(BAR, "h-4 w-5/6")} />
                        <div class={cn!(BAR, "h-3 w-1/3 mt-auto")} />
                    </div>
                </div>
            }) }
        </div>
    }
}
