//! # Product API
//!
//! Boundary to the product-creation endpoint. Photos leave the slot set as
//! [`ProductImages`] and travel as base64 data URIs:
//!
//! ```json
//! {
//!   "name": "Desk lamp",
//!   "price": 24.5,
//!   "image_url": "data:image/jpeg;base64,...",
//!   "images": ["data:image/jpeg;base64,..."]
//! }
//! ```
//!
//! Authentication is explicit: every call takes the seller's [`Session`].

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use log::info;
use reqwest::Client;
use serde_json::{Value, json};

use crate::config::ApiConfig;
use crate::error::{PhotoError, PhotoResult};
use crate::processing::JPEG_MIME;
use crate::slots::ProductImages;

/// `data:<mime>;base64,<payload>`
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Authenticated seller session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Session(***)")
    }
}

/// Non-photo fields of the product form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Option<String>,
    pub stock: u32,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            category: None,
            stock: 1,
        }
    }

    pub fn validate(&self) -> PhotoResult<()> {
        if self.name.trim().is_empty() {
            return Err(PhotoError::config("name", "", "must not be empty"));
        }
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(PhotoError::config(
                "price",
                self.price.to_string(),
                "must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// `{ image_url, images }` fragment. `image_url` is null when the payload has
/// no primary photo.
pub fn images_json(images: &ProductImages) -> Value {
    let image_url = images
        .primary
        .as_deref()
        .map(|bytes| data_uri(JPEG_MIME, bytes));
    let extras: Vec<String> = images
        .extras
        .iter()
        .map(|bytes| data_uri(JPEG_MIME, bytes))
        .collect();

    json!({
        "image_url": image_url,
        "images": extras,
    })
}

/// JSON body for the product-creation endpoint.
pub fn build_product_body(draft: &ProductDraft, images: &ProductImages) -> Value {
    let mut body = images_json(images);
    body["name"] = json!(draft.name);
    body["description"] = json!(draft.description);
    body["price"] = json!(draft.price);
    body["category"] = json!(draft.category);
    body["stock"] = json!(draft.stock);
    body
}

/// Product persistence collaborator.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Create a product and return the created record as sent back by the server.
    async fn create_product(&self, session: &Session, body: &Value) -> PhotoResult<Value>;
}

/// Validate the draft and photos, then hand them to `api`.
///
/// Products are listed with their primary photo, so a payload without one is
/// rejected before any request is made.
pub async fn submit_product(
    api: &dyn ProductApi,
    session: &Session,
    draft: &ProductDraft,
    images: &ProductImages,
) -> PhotoResult<Value> {
    draft.validate()?;
    if images.primary.is_none() {
        return Err(PhotoError::MissingPrimary);
    }
    let body = build_product_body(draft, images);
    let created = api.create_product(session, &body).await?;
    info!(
        "product '{}' created with {} photo(s)",
        draft.name,
        images.len()
    );
    Ok(created)
}

/// HTTP client for `POST {base_url}/products`.
#[derive(Debug, Clone)]
pub struct ProductApiClient {
    config: ApiConfig,
    http: Client,
}

impl ProductApiClient {
    pub fn new(config: ApiConfig) -> PhotoResult<Self> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl ProductApi for ProductApiClient {
    async fn create_product(&self, session: &Session, body: &Value) -> PhotoResult<Value> {
        let response = self
            .http
            .post(self.config.endpoint("products"))
            .header(reqwest::header::AUTHORIZATION, session.bearer())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PhotoError::api(
                "create_product",
                Some(status.as_u16()),
                if detail.is_empty() {
                    status.to_string()
                } else {
                    detail
                },
            ));
        }

        Ok(response.json::<Value>().await?)
    }
}
