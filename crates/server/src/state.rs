use std::sync::Arc;

use service::city_service::CityServiceStore;
use service::notifier::ChangeNotifier;
use service::product::ProductService;

use crate::graphql::{build_schema, CitySchema};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: CityServiceStore,
    pub products: ProductService,
    pub notifier: Arc<ChangeNotifier>,
    pub schema: CitySchema,
    /// Mount point of the API routes, e.g. `/api/v1` (empty for root).
    pub api_prefix: String,
}

impl AppState {
    pub fn new(
        services: CityServiceStore,
        products: ProductService,
        notifier: Arc<ChangeNotifier>,
        api_prefix: impl Into<String>,
    ) -> Self {
        let schema = build_schema(services.clone());
        Self { services, products, notifier, schema, api_prefix: api_prefix.into() }
    }
}
