mod articles_page;
mod comment_form;

pub use articles_page::ArticlesPage;
pub use comment_form::{CommentDraft, CommentForm};
