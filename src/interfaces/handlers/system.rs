use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use std::time::Duration;

use crate::constants::START_TIME;

#[get("/health")]
pub async fn health_check() -> impl Responder {
    let uptime_secs = (Utc::now() - *START_TIME).num_seconds().max(0) as u64;

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "uptime": format_duration(Duration::from_secs(uptime_secs)).to_string(),
        "started_at": START_TIME.to_rfc3339(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
