//! Typed calls against the three backend services
//!
//! Thin request builders over [`ApiClient`]; all response/error shaping
//! happens in the client. Write bodies are wrapped in the `{ "data": ... }`
//! envelope the backends expect.

use serde_json::Value;

use crate::domain::auth::{LoginData, LoginRequest};
use crate::domain::product::{NoteUpdateRequest, PaginatedData, Product, ProductFilterParams};
use crate::domain::resources::ResourcesData;
use crate::infrastructure::http_client::{ApiBase, ApiClient, ApiError, RequestEnvelope};

/// `GET /resources` - the full taxonomy payload
pub async fn fetch_resources(client: &ApiClient) -> Result<ResourcesData, ApiError> {
    client.get_json(ApiBase::Resource, "/resources", &[]).await
}

/// `GET /products/cs` - paginated CS product search for the applied filter set
pub async fn search_products(
    client: &ApiClient,
    filters: &ProductFilterParams,
) -> Result<PaginatedData<Product>, ApiError> {
    client
        .get_json(ApiBase::Admin, "/products/cs", &filters.query_pairs())
        .await
}

/// `POST /products/cs` - create/update/delete one CS note pair
pub async fn update_note(
    client: &ApiClient,
    request: &NoteUpdateRequest,
) -> Result<Value, ApiError> {
    client
        .post_json(
            ApiBase::Admin,
            "/products/cs",
            Some(&RequestEnvelope { data: request }),
        )
        .await
}

/// `POST /account/signin`
pub async fn sign_in(client: &ApiClient, request: &LoginRequest) -> Result<LoginData, ApiError> {
    client
        .post_json(
            ApiBase::Identity,
            "/account/signin",
            Some(&RequestEnvelope { data: request }),
        )
        .await
}

/// `POST /account/logout` - body-less; local sign-out proceeds even if this fails
pub async fn sign_out(client: &ApiClient) -> Result<Value, ApiError> {
    client
        .post_json::<Value, Value>(ApiBase::Identity, "/account/logout", None)
        .await
}
