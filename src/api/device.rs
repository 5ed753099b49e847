//! Endpoints consumed by the biometric terminals. Authenticated by a static
//! API key; every response is a display-safe payload, never a protocol fault.

use std::time::Duration;

use actix_web::{FromRequest, HttpRequest, HttpResponse, Responder, dev::Payload, web};
use chrono::Datelike;
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::config::Config;
use crate::device::channel::LogChannel;
use crate::device::feedback::DeviceFeedback;
use crate::error::AppError;
use crate::service::biometric::{self, BiometricSyncAck, BiometricSyncData};
use crate::service::dedup::MokaDedupStore;
use crate::service::punch::{self, PunchRequest};

/// X-Api-Key guard for the device scope.
pub struct ApiKey;

impl FromRequest for ApiKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let config = match req.app_data::<web::Data<Config>>() {
            Some(c) => c,
            None => return ready(Err(AppError::Internal(anyhow::anyhow!("config missing")))),
        };

        let provided = req
            .headers()
            .get("X-Api-Key")
            .and_then(|h| h.to_str().ok());

        match provided {
            Some(key) if key == config.device_api_key => ready(Ok(ApiKey)),
            _ => ready(Err(AppError::Unauthorized)),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PunchPayload {
    pub request_id: Option<String>,
    #[schema(example = 12)]
    pub sensor_index: i64,
    /// Unix seconds from the device RTC.
    pub timestamp_device: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollResultPayload {
    pub request_id: Option<String>,
    pub user_id: i64,
    pub sensor_index: i64,
    pub success: bool,
    pub template_data: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TimeResponsePayload {
    pub unix: i64,
    #[schema(example = "02/03/2026 08:00:00")]
    pub formatted: String,
}

fn device_safe(request_id: Option<String>, err: AppError) -> DeviceFeedback {
    match err {
        AppError::Database(e) => {
            error!(error = %e, "punch failed on database");
            DeviceFeedback::internal_error(request_id)
        }
        AppError::Internal(e) => {
            error!(error = %e, "punch failed internally");
            DeviceFeedback::internal_error(request_id)
        }
        other => DeviceFeedback::rejected(request_id, &other.to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/device/punch",
    request_body = PunchPayload,
    responses((status = 200, body = DeviceFeedback)),
    tag = "Device"
)]
pub async fn register_punch(
    _key: ApiKey,
    pool: web::Data<MySqlPool>,
    dedup: web::Data<MokaDedupStore>,
    config: web::Data<Config>,
    payload: web::Json<PunchPayload>,
) -> impl Responder {
    let payload = payload.into_inner();
    let request_id = payload.request_id.clone();

    let outcome = punch::ingest(
        pool.get_ref(),
        dedup.get_ref(),
        config.get_ref(),
        PunchRequest {
            request_id: payload.request_id,
            sensor_index: payload.sensor_index,
            timestamp_device: payload.timestamp_device,
        },
    )
    .await;

    let feedback = match outcome {
        Ok(outcome) => {
            let first_name = outcome.user_name.split_whitespace().next().unwrap_or("Usuario");
            DeviceFeedback::punch_accepted(
                request_id,
                first_name,
                outcome.record.record_type,
                outcome.record.record_datetime,
            )
        }
        Err(err) => device_safe(request_id, err),
    };

    HttpResponse::Ok().json(feedback)
}

#[utoipa::path(
    post,
    path = "/device/enroll",
    request_body = EnrollResultPayload,
    responses((status = 200, body = DeviceFeedback)),
    tag = "Device"
)]
pub async fn enroll_biometric(
    _key: ApiKey,
    pool: web::Data<MySqlPool>,
    payload: web::Json<EnrollResultPayload>,
) -> impl Responder {
    let payload = payload.into_inner();
    let request_id = payload.request_id.clone();

    if !payload.success {
        let message = payload.error.as_deref().unwrap_or("Falha no sensor");
        return HttpResponse::Ok().json(DeviceFeedback::enroll_failed(request_id, message));
    }

    let saved = biometric::save_enrolled(
        pool.get_ref(),
        payload.user_id,
        payload.sensor_index,
        payload.template_data.as_deref(),
    )
    .await;

    let feedback = match saved {
        Ok(_) => DeviceFeedback::enroll_ok(request_id, payload.sensor_index),
        Err(AppError::Database(e)) => {
            error!(error = %e, "enroll failed on database");
            DeviceFeedback::internal_error(request_id)
        }
        Err(err) => DeviceFeedback::enroll_failed(request_id, &err.to_string()),
    };

    HttpResponse::Ok().json(feedback)
}

#[utoipa::path(
    get,
    path = "/device/sync",
    responses((status = 200, body = [BiometricSyncData])),
    tag = "Device"
)]
pub async fn sync_templates(
    _key: ApiKey,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, AppError> {
    let templates = biometric::templates_for_sync(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(templates))
}

/// The device entered SYNC mode; stream every template through the channel
/// in the background, throttled.
#[utoipa::path(
    post,
    path = "/device/sync/start",
    responses((status = 202, description = "Fan-out started")),
    tag = "Device"
)]
pub async fn sync_start(
    _key: ApiKey,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let pool = pool.get_ref().clone();
    let throttle = Duration::from_millis(config.sync_throttle_ms);

    actix_web::rt::spawn(async move {
        if let Err(e) = biometric::push_all_templates(&pool, &LogChannel, throttle).await {
            error!(error = %e, "biometric sync fan-out aborted");
        }
    });

    HttpResponse::Accepted().json(serde_json::json!({"status": "sync started"}))
}

#[utoipa::path(
    post,
    path = "/device/sync/ack",
    request_body = BiometricSyncAck,
    responses((status = 200)),
    tag = "Device"
)]
pub async fn sync_ack(
    _key: ApiKey,
    pool: web::Data<MySqlPool>,
    payload: web::Json<BiometricSyncAck>,
) -> Result<impl Responder, AppError> {
    biometric::process_sync_ack(pool.get_ref(), &payload).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "success"})))
}

/// Server clock so terminals can sync their RTC.
#[utoipa::path(
    get,
    path = "/device/time",
    responses((status = 200, body = TimeResponsePayload)),
    tag = "Device"
)]
pub async fn device_time(_key: ApiKey, config: web::Data<Config>) -> impl Responder {
    let now = config.now_local();
    HttpResponse::Ok().json(TimeResponsePayload {
        unix: now.timestamp(),
        formatted: format!(
            "{:02}/{:02}/{} {}",
            now.day(),
            now.month(),
            now.year(),
            now.format("%H:%M:%S")
        ),
    })
}
