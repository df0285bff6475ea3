//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for communicating with external APIs.

pub mod center_directory_client;

pub use center_directory_client::HttpCenterDirectory;
