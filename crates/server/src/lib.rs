pub mod routes;
pub mod startup;
pub mod state;
pub mod errors;
pub mod graphql;
pub mod ws;
pub mod openapi;

pub use startup::serve;
