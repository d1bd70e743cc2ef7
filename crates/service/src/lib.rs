//! Service layer for city services and products.
//! - `city_service`: the authoritative record store over pluggable backends.
//! - `notifier`: best-effort fan-out of change events to attached listeners.
//! - `product`: catalogue CRUD on top of `models`.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod city_service;
pub mod notifier;
pub mod product;
