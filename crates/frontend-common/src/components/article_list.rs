//! Paged article listing

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{ArticleCards, ArticleSkeleton, Pagination};
use crate::cn;
use crate::services::{ApiError, ArticleApiService, ArticlePage};

/// Width steps of the listing column
const LAYOUT: &str = "w-full md:w-[90%] lg:w-[68%] xl:w-[73%] mx-auto transition-width";

#[derive(Properties, Clone, PartialEq)]
pub struct ArticleListProps {
    /// 1-based page to show
    pub page: u32,
    /// Fired with the page the reader picked in the pagination control
    #[prop_or_default]
    pub on_page_change: Callback<u32>,
    /// Receives fetch failures; the list itself does not retry
    #[prop_or_default]
    pub on_error: Option<Callback<ApiError>>,
    #[prop_or_default]
    pub class: String,
    #[prop_or_else(ArticleApiService::from_window)]
    pub service: ArticleApiService,
}

pub enum Msg {
    Fetch,
    Loaded {
        page: u32,
        result: Result<ArticlePage, ApiError>,
    },
}

/// Result of applying a finished fetch
#[derive(Debug, PartialEq, Eq)]
enum Settled {
    /// Answer for a page that is no longer requested
    Stale,
    Shown,
    Failed(ApiError),
}

/// What the list shows for the requested page
#[derive(Debug, Default, PartialEq, Eq)]
struct Listing {
    data: Option<ArticlePage>,
    loading: bool,
}

impl Listing {
    fn start(&mut self) {
        self.loading = true;
    }

    fn settle(
        &mut self,
        requested: u32,
        loaded: u32,
        result: Result<ArticlePage, ApiError>,
    ) -> Settled {
        if loaded != requested {
            return Settled::Stale;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                Settled::Shown
            }
            Err(err) => {
                self.data = None;
                Settled::Failed(err)
            }
        }
    }

    /// `(current, total_pages)` for the pagination control, once data is in
    fn pagination(&self, requested: u32) -> Option<(u32, u32)> {
        self.data.as_ref().map(|data| (requested, data.total_pages))
    }
}

pub struct ArticleListView {
    listing: Listing,
}

impl Component for ArticleListView {
    type Message = Msg;
    type Properties = ArticleListProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Fetch);
        Self {
            listing: Listing {
                data: None,
                loading: true,
            },
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if props.page != old_props.page || props.service != old_props.service {
            ctx.link().send_message(Msg::Fetch);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Fetch => {
                self.listing.start();
                let page = ctx.props().page;
                let service = ctx.props().service.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let result = service.fetch_article_page(page).await;
                    link.send_message(Msg::Loaded { page, result });
                });

                true
            }
            Msg::Loaded { page, result } => {
                match self.listing.settle(ctx.props().page, page, result) {
                    Settled::Stale => false,
                    Settled::Shown => true,
                    Settled::Failed(err) => {
                        tracing::error!(page, error = %err, "failed to load article page");
                        if let Some(on_error) = &ctx.props().on_error {
                            on_error.emit(err);
                        }
                        true
                    }
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();

        let body = match (&self.listing.data, self.listing.pagination(props.page)) {
            (Some(data), Some((page, total))) => html! {
                <>
                    <ArticleCards articles={data.items.clone()} />
                    <Pagination
                        {page}
                        {total}
                        on_change={props.on_page_change.clone()}
                        class="flex justify-center mt-5"
                    />
                </>
            },
            _ if self.listing.loading => html! { <ArticleSkeleton /> },
            _ => html! {},
        };

        html! {
            <div class={cn!(LAYOUT, &props.class)}>
                { body }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::pagination::page_label;

    fn page_of(page: u32, total_pages: u32) -> ArticlePage {
        ArticlePage {
            items: Vec::new(),
            total_pages,
            total: u64::from(total_pages) * 10,
            page,
            size: 10,
        }
    }

    #[test]
    fn loaded_page_drives_the_pagination() {
        let mut listing = Listing::default();
        listing.start();

        assert_eq!(listing.settle(3, 3, Ok(page_of(3, 7))), Settled::Shown);

        assert!(!listing.loading);
        let (current, total) = listing.pagination(3).unwrap();
        assert_eq!(page_label(current, total), "3 / 7");
    }

    #[test]
    fn fetch_error_is_returned_unchanged() {
        let mut listing = Listing::default();
        listing.start();
        let err = ApiError::from_status(500, "boom".into());

        assert_eq!(listing.settle(2, 2, Err(err.clone())), Settled::Failed(err));
        assert!(!listing.loading);
        assert_eq!(listing.pagination(2), None);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut listing = Listing::default();
        listing.start();
        listing.settle(1, 1, Ok(page_of(1, 4)));

        // Page 2 requested; page 1 answers again late
        listing.start();
        assert_eq!(listing.settle(2, 1, Ok(page_of(1, 9))), Settled::Stale);
        assert!(listing.loading);
        assert_eq!(listing.data, Some(page_of(1, 4)));

        assert_eq!(listing.settle(2, 2, Ok(page_of(2, 4))), Settled::Shown);
        assert_eq!(listing.pagination(2), Some((2, 4)));
    }
}
