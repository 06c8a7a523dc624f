//! Article listing API

use serde::{Deserialize, Serialize};

use super::{ApiError, base_url, get_json};
use crate::config::ApiConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// Article summary as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default, alias = "createTime")]
    pub create_time: Option<String>,
    #[serde(default)]
    pub view: u64,
    #[serde(default)]
    pub comment: u64,
    #[serde(default, alias = "cateList")]
    pub categories: Vec<Category>,
    #[serde(default, alias = "tagList")]
    pub tags: Vec<Tag>,
}

/// One page of the article listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    #[serde(default, alias = "result")]
    pub items: Vec<Article>,
    #[serde(default, alias = "pages")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

/// Client for the article listing endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleApiService {
    base_url: String,
    page_size: u32,
}

impl ArticleApiService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_size: ApiConfig::ARTICLE_PAGE_SIZE,
        }
    }

    /// Service pointed at the origin serving the page
    pub fn from_window() -> Self {
        Self::new(base_url())
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            ApiConfig::ARTICLE_PAGE_PATH
        )
    }

    fn query(&self, page: u32) -> Result<Vec<(&'static str, String)>, ApiError> {
        if page == 0 {
            return Err(ApiError::BadRequest("page numbers start at 1".to_string()));
        }
        Ok(vec![
            ("page", page.to_string()),
            ("size", self.page_size.to_string()),
        ])
    }

    /// Fetch page `page` (1-based). Errors are returned to the caller untouched.
    pub async fn fetch_article_page(&self, page: u32) -> Result<ArticlePage, ApiError> {
        let query = self.query(page)?;
        tracing::debug!(page, "fetching article page");

        let mut result: ArticlePage = get_json(&self.endpoint(), &query).await?;
        if result.page == 0 {
            result.page = page;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parse_envelope;

    #[test]
    fn endpoint_joins_base_and_path() {
        assert_eq!(
            ArticleApiService::new("https://blog.example/api/").endpoint(),
            "https://blog.example/api/article"
        );
        assert_eq!(ArticleApiService::new("").endpoint(), "/article");
    }

    #[test]
    fn query_carries_page_and_size() {
        let service = ArticleApiService::new("").with_page_size(5);
        assert_eq!(
            service.query(3).unwrap(),
            vec![("page", "3".to_string()), ("size", "5".to_string())]
        );
        assert!(matches!(service.query(0), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn backend_page_shape_decodes() {
        let body = r#"{
            "code": 200,
            "message": "ok",
            "data": {
                "result": [
                    {
                        "id": 12,
                        "title": "Writing a blog in Rust",
                        "description": "notes",
                        "createTime": "1717171717000",
                        "view": 40,
                        "cateList": [{"id": 1, "name": "dev"}],
                        "tagList": []
                    },
                    {"id": 13, "title": "Untitled"}
                ],
                "pages": 4,
                "total": 38,
                "page": 2,
                "size": 10
            }
        }"#;

        let page: ArticlePage = parse_envelope(body).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.page, 2);
        assert_eq!(page.items[0].create_time.as_deref(), Some("1717171717000"));
        assert_eq!(page.items[0].categories[0].name, "dev");
        assert_eq!(page.items[1].view, 0);
        assert_eq!(page.items[1].description, None);
    }

    #[test]
    fn canonical_field_names_decode_too() {
        let page: ArticlePage =
            serde_json::from_str(r#"{"items":[],"total_pages":1}"#).unwrap();
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
