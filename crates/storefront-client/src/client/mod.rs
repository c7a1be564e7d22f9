//! HTTP client for the storefront's AJAX cart endpoints.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use storefront_core::{CartSnapshot, StorefrontConfig};

use crate::error::ClientError;

/// Read endpoint for the current cart.
pub const CART_PATH: &str = "/cart.js";

/// Form-encoded add-to-cart endpoint.
pub const CART_ADD_PATH: &str = "/cart/add.js";

/// Client for `GET /cart.js` and `POST /cart/add.js`.
///
/// Every non-2xx status is a typed error. There is no retry: a failed cart
/// call is simply dropped by the widgets and the next user action or cart
/// event tries again.
#[derive(Debug, Clone)]
pub struct CartClient {
    client: Client,
    origin: Url,
}

impl CartClient {
    /// Creates a client for the store at `base_url` with the given timeout and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if no origin can be derived from `base_url`.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let origin = store_origin(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, origin })
    }

    /// Creates a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// See [`CartClient::new`].
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// The store origin requests are sent to.
    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Absolute URL of a store-relative `path`.
    fn endpoint(&self, path: &str) -> Result<String, ClientError> {
        self.origin
            .join(path)
            .map(String::from)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.origin.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    /// Fetches the current cart.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] for any non-2xx status.
    /// - [`ClientError::Http`] on network or TLS failure.
    /// - [`ClientError::Deserialize`] if the body is not a JSON object.
    pub async fn fetch_cart(&self) -> Result<CartSnapshot, ClientError> {
        let url = self.endpoint(CART_PATH)?;
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let cart = serde_json::from_str::<CartSnapshot>(&body).map_err(|e| {
            ClientError::Deserialize {
                context: format!("cart from {url}"),
                source: e,
            }
        })?;
        tracing::debug!(items = cart.items.len(), "fetched cart");
        Ok(cart)
    }

    /// Adds the line described by the form `fields` (at least `id`, usually
    /// `quantity` and any `properties[...]`) and returns the JSON payload the
    /// store answers with.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] for any non-2xx status, including
    ///   the 422 a store sends for sold-out variants.
    /// - [`ClientError::Http`] on network or TLS failure.
    /// - [`ClientError::Deserialize`] if the success body is not JSON.
    pub async fn add_to_cart(&self, fields: &[(String, String)]) -> Result<Value, ClientError> {
        let url = self.endpoint(CART_ADD_PATH)?;
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(fields)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| ClientError::Deserialize {
            context: format!("add-to-cart response from {url}"),
            source: e,
        })
    }
}

/// Scheme, host and port of `base_url`. The cart endpoints live at the store
/// root whatever page the configured URL points to.
fn store_origin(base_url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason,
    };
    let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(invalid("URL has no host origin".to_owned()));
    }
    Url::parse(&origin.ascii_serialization()).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
