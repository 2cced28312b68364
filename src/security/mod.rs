//! Security-sensitive helpers
//!
//! Currently just API key storage; the provider key never lives in the
//! config file.

pub mod keyring;

pub use keyring::{delete_api_key, get_api_key, has_api_key, set_api_key};
