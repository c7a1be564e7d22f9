//! The storefront calls the widgets make.

use std::future::Future;

use serde_json::Value;
use storefront_client::{CartClient, ClientError};
use storefront_core::CartSnapshot;

/// Cart endpoints used by the widgets.
///
/// Implemented by [`CartClient`] for real stores; tests substitute an
/// in-memory fake.
pub trait CartApi {
    /// `GET /cart.js`.
    fn fetch_cart(&self) -> impl Future<Output = Result<CartSnapshot, ClientError>>;

    /// `POST /cart/add.js` with form-encoded `fields`.
    fn add_to_cart(
        &self,
        fields: &[(String, String)],
    ) -> impl Future<Output = Result<Value, ClientError>>;
}

impl CartApi for CartClient {
    fn fetch_cart(&self) -> impl Future<Output = Result<CartSnapshot, ClientError>> {
        CartClient::fetch_cart(self)
    }

    fn add_to_cart(
        &self,
        fields: &[(String, String)],
    ) -> impl Future<Output = Result<Value, ClientError>> {
        CartClient::add_to_cart(self, fields)
    }
}
