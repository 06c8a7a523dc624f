//! Backend API services

pub mod articles;
pub mod error;
pub mod site_config;

pub use articles::{Article, ArticleApiService, ArticlePage, Category, Tag};
pub use error::ApiError;
pub use site_config::SiteConfigService;

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Response envelope used by every backend endpoint
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Codes 0 and 200 mean success; anything else is reported as an error.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !matches!(self.code, 0 | 200) {
            return Err(ApiError::Api {
                code: self.code,
                message: self.message,
            });
        }
        self.data
            .ok_or_else(|| ApiError::Parse("response envelope has no data".to_string()))
    }
}

/// Decode an envelope body and unwrap its payload
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<ApiResponse<T>>(body)?.into_result()
}

/// Origin of the page, so API paths resolve against the serving host
pub(crate) fn base_url() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

/// GET `url` and decode the enveloped JSON payload
pub(crate) async fn get_json<T: DeserializeOwned>(
    url: &str,
    query: &[(&str, String)],
) -> Result<T, ApiError> {
    let response = gloo_net::http::Request::get(url)
        .query(query.iter().map(|(key, value)| (*key, value.as_str())))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !response.ok() {
        return Err(ApiError::from_status(status, body));
    }

    parse_envelope(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success_codes_unwrap_data() {
        let value: u32 = parse_envelope(r#"{"code":200,"message":"ok","data":7}"#).unwrap();
        assert_eq!(value, 7);
        let value: u32 = parse_envelope(r#"{"data":8}"#).unwrap();
        assert_eq!(value, 8);
    }

    #[test]
    fn envelope_failure_code_is_an_api_error() {
        let err = parse_envelope::<u32>(r#"{"code":400,"message":"bad page","data":null}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Api {
                code: 400,
                message: "bad page".into()
            }
        );
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(parse_envelope::<u32>("<html>"), Err(ApiError::Parse(_))));
        assert!(matches!(
            parse_envelope::<u32>(r#"{"code":200}"#),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn empty_error_body_gets_a_message() {
        assert_eq!(
            ApiError::from_status(502, String::new()).to_string(),
            "Server error 502: Unknown error"
        );
        assert!(ApiError::from_status(404, "missing".into()).is_not_found());
    }
}
