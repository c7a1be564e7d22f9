pub mod client;
pub mod error;

pub use client::{CartClient, CART_ADD_PATH, CART_PATH};
pub use error::ClientError;
