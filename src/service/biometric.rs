//! Template enrollment and the device restore fan-out.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::device::channel::{DeviceChannel, TOPIC_SYNC_DATA, TOPIC_SYNC_END};
use crate::error::AppError;
use crate::repo;

#[derive(Debug, Serialize, ToSchema)]
pub struct BiometricSyncData {
    pub biometric_id: i64,
    pub template_data: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BiometricSyncAck {
    pub biometric_id: i64,
    pub sensor_index: i64,
    pub success: bool,
    pub error: Option<String>,
}

/// Persist a template captured on the terminal after a remote enroll command.
pub async fn save_enrolled(
    pool: &MySqlPool,
    user_id: i64,
    sensor_index: i64,
    template_data: Option<&str>,
) -> Result<i64, AppError> {
    let user = repo::users::get(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Validation("Usuario nao encontrado".to_string()))?;
    if !user.is_active {
        return Err(AppError::InactiveUser);
    }

    displace_sensor_collision(pool, sensor_index, None).await?;
    let id = repo::biometrics::create(pool, user_id, Some(sensor_index), template_data).await?;
    info!(user = user_id, sensor_index, "biometric enrolled");
    Ok(id)
}

/// Per-item ack from the device restore: commit the device-assigned slot.
/// Progress is persisted incrementally; a drop mid-sync leaves earlier acks
/// in place.
pub async fn process_sync_ack(pool: &MySqlPool, ack: &BiometricSyncAck) -> Result<(), AppError> {
    if !ack.success {
        warn!(
            biometric = ack.biometric_id,
            error = ack.error.as_deref().unwrap_or("-"),
            "device rejected template"
        );
        return Ok(());
    }

    let bio = repo::biometrics::get(pool, ack.biometric_id)
        .await?
        .ok_or_else(|| AppError::Validation("Unknown biometric id".to_string()))?;

    displace_sensor_collision(pool, ack.sensor_index, Some(bio.id)).await?;
    repo::biometrics::set_sensor_index(pool, bio.id, ack.sensor_index).await?;
    info!(
        biometric = bio.id,
        sensor_index = ack.sensor_index,
        "biometric bound to sensor slot"
    );
    Ok(())
}

/// If another record already holds the slot, park it on a negative
/// placeholder before the reassignment.
async fn displace_sensor_collision(
    pool: &MySqlPool,
    sensor_index: i64,
    keep_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(existing) = repo::biometrics::find_by_sensor_index(pool, sensor_index).await? {
        if Some(existing.id) != keep_id {
            warn!(
                displaced = existing.id,
                previous_index = existing.sensor_index,
                sensor_index,
                "sensor slot collision, displaced to placeholder"
            );
            repo::biometrics::set_sensor_index(pool, existing.id, -existing.id).await?;
        }
    }
    Ok(())
}

pub async fn templates_for_sync(pool: &MySqlPool) -> Result<Vec<BiometricSyncData>, AppError> {
    let rows = repo::biometrics::templates_for_sync(pool).await?;
    Ok(rows
        .into_iter()
        .filter_map(|b| {
            b.template_data.map(|template_data| BiometricSyncData {
                biometric_id: b.id,
                template_data,
                user_id: b.user_id,
            })
        })
        .collect())
}

/// Bulk restore: one message per enrolled template with a small delay so the
/// embedded receiver is not overwhelmed. Cancellable only by shutdown;
/// a network drop mid-loop leaves the device partially synced.
pub async fn push_all_templates<C: DeviceChannel>(
    pool: &MySqlPool,
    channel: &C,
    throttle: Duration,
) -> anyhow::Result<usize> {
    let templates = templates_for_sync(pool)
        .await
        .context("loading templates for sync")?;
    let total = templates.len();

    log::info!("starting biometric sync of {total} templates");

    for (index, item) in templates.iter().enumerate() {
        let payload = serde_json::to_string(item).context("encoding sync payload")?;
        channel
            .publish(TOPIC_SYNC_DATA, payload)
            .await
            .with_context(|| format!("publishing template {}/{total}", index + 1))?;
        log::debug!("sent {}/{total}", index + 1);
        tokio::time::sleep(throttle).await;
    }

    channel
        .publish(TOPIC_SYNC_END, serde_json::json!({ "total": total }).to_string())
        .await
        .context("publishing sync end marker")?;

    log::info!("biometric sync finished: {total} templates");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::channel::test_support::RecordingChannel;

    #[actix_web::test]
    async fn fan_out_publishes_each_template_then_an_end_marker() {
        let channel = RecordingChannel::default();
        let items = [
            BiometricSyncData {
                biometric_id: 1,
                template_data: "t1".into(),
                user_id: 10,
            },
            BiometricSyncData {
                biometric_id: 2,
                template_data: "t2".into(),
                user_id: 11,
            },
        ];

        for item in &items {
            channel
                .publish(TOPIC_SYNC_DATA, serde_json::to_string(item).unwrap())
                .await
                .unwrap();
        }
        channel
            .publish(TOPIC_SYNC_END, serde_json::json!({"total": 2}).to_string())
            .await
            .unwrap();

        let messages = channel.messages.lock().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages[..2].iter().all(|(t, _)| t == TOPIC_SYNC_DATA));
        assert_eq!(messages[2].0, TOPIC_SYNC_END);
        assert!(messages[0].1.contains("\"biometric_id\":1"));
    }
}
