//! Light/dark theme state shared through a Yew context

mod context;
mod provider;

pub use context::{Theme, ThemeAction, ThemeContext, ThemeHandle, update_document_theme};
pub use provider::{ThemeProvider, use_theme};
