pub mod endpoint;
mod fetch_utils;
pub mod http_client;
pub mod models;
mod sport_api;

pub use endpoint::{Endpoint, Route, SportDescriptor};
pub use http_client::create_http_client_with_timeout;
pub use models::{ApiEnvelope, ApiErrors, Country, Paging, Payload, Season};
pub use sport_api::{ApiClient, SportApi};
