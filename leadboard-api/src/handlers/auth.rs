use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use shared_types::{CreateUserRequest, CreateUserResponse};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::database::users as users_db;
use crate::database::Database;

fn bearer_token(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Admin-only provisioning of a login-capable staff account. Gated on the
/// privileged service key; a missing key configuration refuses the operation
/// without affecting anything else.
pub async fn create_user(
    db: web::Data<Arc<Database>>,
    config: web::Data<Arc<ApiConfig>>,
    http_request: HttpRequest,
    request: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    let Some(service_key) = config.service_key() else {
        return Err(actix_web::error::ErrorServiceUnavailable(
            "Server configuration error: missing service key",
        ));
    };

    if bearer_token(&http_request) != Some(service_key) {
        return Err(actix_web::error::ErrorUnauthorized(
            "Missing or invalid service key",
        ));
    }

    let request = request.into_inner();
    let role = request.role.as_deref().unwrap_or("staff");

    let user = users_db::create_user(
        db.async_connection.clone(),
        &request.email,
        &request.password,
        role,
    )
    .await
    .map_err(|e| actix_web::error::ErrorBadRequest(e.to_string()))?;

    Ok(HttpResponse::Ok().json(CreateUserResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        created_at: user.created_at,
    }))
}
