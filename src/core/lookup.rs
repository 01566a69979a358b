//! Outbound client for the Open Food Facts API.
//!
//! Each call is one independent request: no retry, no cache and no
//! deduplication of identical lookups. The client identifier configured at
//! construction is sent as `User-Agent` on every request.

use crate::{
    config::server::ServiceConfig,
    core::food::{FoodItem, OffProduct, OffProductResponse, OffSearchResponse},
    errors::{Error, Result},
};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, instrument, warn};

/// Food database client shared by the HTTP API and the bot.
#[derive(Debug, Clone)]
pub struct FoodLookup {
    client: Client,
    base_url: Url,
    page_size: u32,
}

impl FoodLookup {
    /// Creates a client for the database at `base_url`.
    pub fn new(base_url: &str, user_agent: &str, page_size: u32) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| Error::Config {
            message: format!("Invalid food database URL {base_url}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("Food database URL {base_url} cannot be used as a base"),
            });
        }

        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url,
            page_size,
        })
    }

    /// Creates a client from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(
            &config.food_api_url,
            &config.food_api_user_agent,
            config.search_page_size,
        )
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Free-text search. Records without a name are dropped.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<FoodItem>> {
        let url = self.endpoint(&["cgi", "search.pl"]);
        let page_size = self.page_size.to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Food search failed upstream with status {status}");
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let payload: OffSearchResponse = response.json().await?;
        let received = payload.products.len();
        let items: Vec<FoodItem> = payload
            .products
            .into_iter()
            .filter_map(OffProduct::into_food_item)
            .collect();

        debug!(received, kept = items.len(), "Food search mapped");
        Ok(items)
    }

    /// Looks up a single product by barcode.
    #[instrument(skip(self))]
    pub async fn by_barcode(&self, barcode: &str) -> Result<FoodItem> {
        let file = format!("{barcode}.json");
        let url = self.endpoint(&["api", "v2", "product", &file]);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::FoodNotFound);
        }
        if !status.is_success() {
            warn!("Barcode lookup failed upstream with status {status}");
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let payload: OffProductResponse = response.json().await?;
        if payload.status == Some(0) {
            return Err(Error::FoodNotFound);
        }

        payload
            .product
            .and_then(OffProduct::into_food_item)
            .ok_or(Error::FoodNotFound)
    }
}
