//! Read-only GraphQL projection of the city service store.
//!
//! ```graphql
//! type Service { id: Int!, name: String!, type: String }
//! type Query { services: [Service!]!, service(id: Int!): Service }
//! ```

use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema, SimpleObject};
use axum::extract::{rejection::JsonRejection, State};
use axum::response::Html;
use axum::Json;
use service::city_service::{CityService, CityServiceStore};
use service::errors::ServiceError;

use crate::{errors::ApiError, state::AppState};

pub type CitySchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Service")]
pub struct ServiceObject {
    pub id: i32,
    pub name: String,
    #[graphql(name = "type")]
    pub service_type: Option<String>,
}

impl From<CityService> for ServiceObject {
    fn from(s: CityService) -> Self {
        Self { id: s.id, name: s.name, service_type: s.service_type }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All city services.
    async fn services(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ServiceObject>> {
        let store = ctx.data::<CityServiceStore>()?;
        Ok(store.list().await?.into_iter().map(ServiceObject::from).collect())
    }

    /// One city service, or null if the id is unknown.
    async fn service(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<Option<ServiceObject>> {
        let store = ctx.data::<CityServiceStore>()?;
        match store.get_by_id(id).await {
            Ok(s) => Ok(Some(s.into())),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn build_schema(store: CityServiceStore) -> CitySchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription).data(store).finish()
}

pub async fn graphql_handler(
    State(state): State<AppState>,
    body: Result<Json<async_graphql::Request>, JsonRejection>,
) -> Result<Json<async_graphql::Response>, ApiError> {
    let Json(req) = body?;
    Ok(Json(state.schema.execute(req).await))
}

/// Interactive GraphiQL page pointed at this server's endpoint.
pub async fn graphiql(State(state): State<AppState>) -> Html<String> {
    let endpoint = format!("{}/graphql", state.api_prefix);
    Html(GraphiQLSource::build().endpoint(&endpoint).finish())
}
