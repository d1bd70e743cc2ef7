//! City service records: domain types, repository backends and the store.
//!
//! The store validates input and delegates each operation to a
//! [`repository::CityServiceRepository`], which performs it atomically.

pub mod domain;
pub mod fingerprint;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{CityService, CityServicePatch, NewCityService};
pub use service::{CityServiceStore, Conditional};
