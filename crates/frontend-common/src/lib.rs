pub mod components;
pub mod config;
pub mod services;
pub mod theme;
pub mod utils;
pub mod verification;

pub use components::{
    ArticleListView, ArticleSkeleton, Pagination, ThemeToggle, VerificationGate, VerificationWidget,
};
pub use config::{SiteConfig, VerificationConfig};
pub use services::{ApiError, Article, ArticleApiService, ArticlePage, SiteConfigService};
pub use theme::{Theme, ThemeContext, ThemeProvider, use_theme};
pub use utils::{ClassValue, merge_classes};
pub use verification::{WidgetControls, WidgetRef};
