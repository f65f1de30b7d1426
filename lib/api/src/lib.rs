//! HTTP surface for DogMatch
//!
//! A thin actix-web adapter over the predictor cache: request parsing,
//! error-to-status mapping and response envelopes.

pub mod rest;

pub use rest::{configure, example_input, AppState, RestApi, API_VERSION};
