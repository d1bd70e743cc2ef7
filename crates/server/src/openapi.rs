use axum::Json;
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorBodyDoc { pub error: String }

#[derive(Serialize, ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(Serialize, ToSchema)]
pub struct CityServiceDoc {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct NewCityServiceDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CityServicePatchDoc {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductDoc { pub id: i32, pub name: String }

#[derive(Serialize, ToSchema)]
pub struct ProductInputDoc {
    /// 2..=50 characters
    pub name: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "City Services API"),
    paths(
        crate::routes::health,
        crate::routes::city_services::list,
        crate::routes::city_services::get_by_name,
        crate::routes::city_services::create,
        crate::routes::city_services::update,
        crate::routes::city_services::delete,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBodyDoc,
            MessageDoc,
            CityServiceDoc,
            NewCityServiceDoc,
            CityServicePatchDoc,
            ProductDoc,
            ProductInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "city_services", description = "City service records; paths are relative to the API prefix"),
        (name = "products")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
