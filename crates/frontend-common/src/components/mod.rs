mod article_cards;
mod article_list;
mod article_skeleton;
mod pagination;
mod theme_toggle;
mod verification_gate;
mod verification_widget;

pub use article_cards::ArticleCards;
pub use article_list::ArticleListView;
pub use article_skeleton::ArticleSkeleton;
pub use pagination::{PageSlot, Pagination, clamp_page, page_label, page_window};
pub use theme_toggle::ThemeToggle;
pub use verification_gate::VerificationGate;
pub use verification_widget::VerificationWidget;
