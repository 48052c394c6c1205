use actix_web::{web, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::sync::Arc;

use crate::database::leads as leads_db;
use crate::database::Database;
use crate::leads::{analytics, normalize};

pub async fn get_analytics(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let rows = leads_db::fetch_all_rows(db.async_connection.clone())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let leads: Vec<_> = rows.into_iter().map(normalize::normalize).collect();
    let data = analytics::aggregate(&leads, Utc::now());

    Ok(HttpResponse::Ok().json(data))
}
