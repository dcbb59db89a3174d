use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Any JSON document; the store does not interpret its structure.
#[derive(ToSchema)]
#[schema(value_type = Object, example = json!({"name": "georgina", "food": "marzipan"}))]
pub struct JsonDocument(pub serde_json::Value);

#[derive(ToSchema)]
pub struct StoredOutputDoc {
    #[schema(example = "group1/users/georgina")]
    pub key: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Storage API", version = "1.0"),
    paths(
        crate::routes::health,
        crate::routes::keys::store_value,
        crate::routes::keys::fetch_value,
        crate::routes::keys::delete_value,
    ),
    components(
        schemas(
            HealthResponse,
            JsonDocument,
            StoredOutputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "store", description = "Store a value"),
        (name = "fetch", description = "Retrieve a value"),
        (name = "delete", description = "Delete a key"),
    )
)]
pub struct ApiDoc;
