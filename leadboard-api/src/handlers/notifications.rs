use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::NotificationsResponse;
use std::sync::Arc;

use crate::jobs::sync_bridge::RealtimeBridge;

pub async fn list_notifications(
    bridge: web::Data<Arc<RealtimeBridge>>,
) -> ActixResult<HttpResponse> {
    let notifications = bridge.recent_notifications().await;
    Ok(HttpResponse::Ok().json(NotificationsResponse { notifications }))
}
