//! Article summaries in the listing

use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::services::Article;

#[derive(Properties, Clone, PartialEq)]
pub struct ArticleCardsProps {
    pub articles: Vec<Article>,
}

#[function_component(ArticleCards)]
pub fn article_cards(props: &ArticleCardsProps) -> Html {
    if props.articles.is_empty() {
        return html! {
            <div class="text-center py-16 text-gray-500 dark:text-gray-400">{"No articles yet"}</div>
        };
    }

    html! {
        <div class="flex flex-col gap-5">
            { for props.articles.iter().map(|article| html! {
                <ArticleCard key={article.id} article={article.clone()} />
            }) }
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct ArticleCardProps {
    article: Article,
}

#[function_component(ArticleCard)]
fn article_card(props: &ArticleCardProps) -> Html {
    let article = &props.article;
    let href = format!("/article/{}", article.id);
    let date = article.create_time.as_deref().and_then(display_date);

    html! {
        <article class="flex flex-col md:flex-row overflow-hidden rounded-lg bg-white dark:bg-gray-800 shadow-sm hover:shadow-md transition-shadow">
            if let Some(cover) = &article.cover {
                <a href={href.clone()} class="md:w-2/5 h-48 md:h-auto shrink-0">
                    <img src={cover.clone()} alt={article.title.clone()} class="w-full h-full object-cover" loading="lazy" />
                </a>
            }
            <div class="flex flex-col gap-3 p-6 min-w-0">
                <a href={href} class="text-xl font-semibold text-gray-900 dark:text-white hover:text-blue-500 line-clamp-2">
                    {&article.title}
                </a>
                if let Some(description) = &article.description {
                    <p class="text-sm text-gray-600 dark:text-gray-400 line-clamp-3">{description}</p>
                }
                <div class="flex flex-wrap items-center gap-4 mt-auto text-xs text-gray-500 dark:text-gray-400">
                    if let Some(date) = date {
                        <span>{date}</span>
                    }
                    <span>{format!("{} views", article.view)}</span>
                    <span>{format!("{} comments", article.comment)}</span>
                    { for article.categories.iter().map(|category| html! {
                        <span key={category.id} class="px-2 py-0.5 rounded bg-blue-50 dark:bg-blue-900 text-blue-800 dark:text-blue-200">
                            {&category.name}
                        </span>
                    }) }
                </div>
            </div>
        </article>
    }
}

/// `create_time` arrives as milliseconds since the epoch; show it as a date.
fn display_date(raw: &str) -> Option<String> {
    let millis = raw.trim().parse::<f64>().ok()?;
    let date = js_sys::Date::new(&JsValue::from_f64(millis));
    if date.get_time().is_nan() {
        return None;
    }
    let iso = String::from(date.to_iso_string());
    iso.get(..10).map(str::to_string)
}
