//! SeaORM entities and persistence helpers for the city services schema.

pub mod errors;
pub mod db;
pub mod city_service;
pub mod product;

#[cfg(test)]
mod tests;
