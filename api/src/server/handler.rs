use axum::{body::Bytes, extract::Extension, Json};
use chrono::Utc;
use sc_core::store::SettingsStore;

use crate::{
    model::{Settings, SettingsUpdated, UpdateSettings},
    server::Context,
    ApiError, ApiResult,
};

const FETCH_FAILED: &str = "Failed to fetch settings";
const UPDATE_FAILED: &str = "Failed to update settings";

/// Return the settings record, creating it with default values on first access.
///
/// # Errors
/// Fails if the store can't be read or the default record can't be written.
pub async fn get_settings(ctx: Context) -> ApiResult<Settings> {
    let store = ctx.store();

    if let Some(settings) = store
        .find()
        .await
        .map_err(|e| ApiError::storage(FETCH_FAILED, e))?
    {
        return Ok(settings);
    }

    let settings = store
        .create(&Settings::default())
        .await
        .map_err(|e| ApiError::storage(FETCH_FAILED, e))?;

    tracing::info!(updated_at = %settings.updated_at, "Created default settings");

    Ok(settings)
}

/// Replace the branches carried by `req` and persist the record.
///
/// A missing record is started from defaults and created by the same write.
///
/// # Errors
/// Fails if the store can't be read or written. Nothing is stored in that case.
pub async fn update_settings(req: UpdateSettings, ctx: Context) -> ApiResult<SettingsUpdated> {
    let store = ctx.store();

    let mut settings = store
        .find()
        .await
        .map_err(|e| ApiError::storage(UPDATE_FAILED, e))?
        .unwrap_or_default();

    settings.apply(req, Utc::now());

    store
        .save(&settings)
        .await
        .map_err(|e| ApiError::storage(UPDATE_FAILED, e))?;

    Ok(SettingsUpdated::new(settings))
}

pub(crate) async fn handle_get(Extension(ctx): Extension<Context>) -> ApiResult<Json<Settings>> {
    tracing::debug!("Income request: get settings");
    get_settings(ctx).await.map(Json)
}

pub(crate) async fn handle_update(
    Extension(ctx): Extension<Context>,
    body: Bytes,
) -> ApiResult<Json<SettingsUpdated>> {
    let req = parse_update(&body)?;
    tracing::debug!(params = ?req, "Income request: update settings");
    update_settings(req, ctx).await.map(Json)
}

/// A missing or blank body is an update that carries no branch.
fn parse_update(body: &[u8]) -> ApiResult<UpdateSettings> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateSettings::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request("Invalid request body", e))
}
