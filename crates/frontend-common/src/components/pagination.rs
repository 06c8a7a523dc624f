//! Page navigation for listings

use yew::prelude::*;

use crate::cn;

/// One slot in the rendered page strip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

/// Keep `page` within `1..=total_pages`; an empty listing still has page 1.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Pages to show around `current`: first and last are always present,
/// `siblings` neighbours on each side, gaps collapsed into ellipses.
pub fn page_window(current: u32, total_pages: u32, siblings: u32) -> Vec<PageSlot> {
    let total = total_pages.max(1);
    let current = clamp_page(current, total);

    // first + last + current + 2 * siblings + 2 ellipses
    if total <= 2 * siblings + 5 {
        return (1..=total).map(PageSlot::Page).collect();
    }

    let left = current.saturating_sub(siblings).max(2);
    let right = (current + siblings).min(total - 1);

    let mut slots = vec![PageSlot::Page(1)];
    if left > 2 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.extend((left..=right).map(PageSlot::Page));
    if right < total - 1 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.push(PageSlot::Page(total));
    slots
}

/// Position summary, e.g. `3 / 7`
pub fn page_label(current: u32, total_pages: u32) -> String {
    let total = total_pages.max(1);
    format!("{} / {total}", clamp_page(current, total))
}

#[derive(Properties, Clone, PartialEq)]
pub struct PaginationProps {
    pub page: u32,
    pub total: u32,
    pub on_change: Callback<u32>,
    #[prop_or(1)]
    pub siblings: u32,
    #[prop_or_default]
    pub class: String,
}

const BUTTON: &str = "min-w-9 h-9 px-3 rounded-md text-sm transition-colors";
const IDLE: &str = "bg-white dark:bg-gray-800 text-gray-700 dark:text-gray-300 hover:bg-gray-100 dark:hover:bg-gray-700";
const ACTIVE: &str = "bg-blue-500 text-white hover:bg-blue-500 dark:bg-blue-500 dark:text-white";
const DISABLED: &str = "opacity-50 cursor-not-allowed hover:bg-white dark:hover:bg-gray-800";

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let total = props.total.max(1);
    let current = clamp_page(props.page, total);

    // Only in-range pages other than the current one are ever emitted
    let go_to = |target: u32| {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| {
            if (1..=total).contains(&target) && target != current {
                on_change.emit(target);
            }
        })
    };

    let slots = page_window(current, total, props.siblings);

    html! {
        <nav class={cn!("flex items-center gap-2", &props.class)} aria-label="Pagination">
            <button
                class={cn!(BUTTON, IDLE, (DISABLED, current == 1))}
                disabled={current == 1}
                onclick={go_to(current.saturating_sub(1))}
            >
                {"‹"}
            </button>
            { for slots.into_iter().enumerate().map(|(idx, slot)| match slot {
                PageSlot::Page(page) => html! {
                    <button
                        key={page}
                        class={cn!(BUTTON, IDLE, (ACTIVE, page == current))}
                        aria-current={(page == current).then_some("page")}
                        onclick={go_to(page)}
                    >
                        {page}
                    </button>
                },
                PageSlot::Ellipsis => html! {
                    <span key={format!("gap-{idx}")} class="px-1 text-gray-500 dark:text-gray-400">{"…"}</span>
                },
            }) }
            <button
                class={cn!(BUTTON, IDLE, (DISABLED, current == total))}
                disabled={current == total}
                onclick={go_to(current + 1)}
            >
                {"›"}
            </button>
            <span class="ml-2 text-sm text-gray-500 dark:text-gray-400">
                {page_label(current, total)}
            </span>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageSlot::{Ellipsis, Page};

    #[test]
    fn clamps_out_of_range_pages() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(9, 5), 5);
        assert_eq!(clamp_page(3, 5), 3);
        assert_eq!(clamp_page(3, 0), 1);
    }

    #[test]
    fn short_listings_show_every_page() {
        assert_eq!(page_window(2, 4, 1), vec![Page(1), Page(2), Page(3), Page(4)]);
        assert_eq!(page_window(1, 0, 1), vec![Page(1)]);
    }

    #[test]
    fn long_listings_collapse_gaps() {
        assert_eq!(
            page_window(10, 20, 1),
            vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
        );
        assert_eq!(page_window(1, 20, 1), vec![Page(1), Page(2), Ellipsis, Page(20)]);
        assert_eq!(page_window(20, 20, 1), vec![Page(1), Ellipsis, Page(19), Page(20)]);
    }

    #[test]
    fn window_never_leaves_the_valid_range() {
        for total in 1..30 {
            for current in 0..35 {
                for slot in page_window(current, total, 1) {
                    if let Page(page) = slot {
                        assert!((1..=total).contains(&page), "page {page} of {total}");
                    }
                }
            }
        }
    }

    #[test]
    fn label_shows_position_within_range() {
        assert_eq!(page_label(3, 7), "3 / 7");
        assert_eq!(page_label(9, 7), "7 / 7");
        assert_eq!(page_label(1, 0), "1 / 1");
    }

    #[test]
    fn current_page_always_appears() {
        for current in 1..=20 {
            assert!(page_window(current, 20, 2).contains(&Page(current)));
        }
    }
}
