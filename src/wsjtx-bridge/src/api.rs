// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! JSON HTTP API over the bridge.

use std::fmt;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::error;

use wsjtx_core::{Bridge, BridgeError, QsoLogEntry, StorageError, TransportError};

pub type SharedBridge = Arc<Mutex<Bridge>>;

/// Per-server state handed to every handler.
pub struct ApiContext {
    pub bridge: SharedBridge,
    pub recent_decodes_limit: usize,
}

/// Failure payload: always HTTP 400 with `{error: true, message}`.
#[derive(Debug)]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(json!({
            "error": true,
            "message": self.message,
        }))
    }
}

impl From<BridgeError> for ApiError {
    fn from(e: BridgeError) -> Self {
        if !matches!(e, BridgeError::InvalidInput(_)) {
            error!("request failed: {}", e);
        }
        Self::bad_request(e.to_string())
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        BridgeError::from(e).into()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        BridgeError::from(e).into()
    }
}

/// Accepts `1/0`, `true/false`, `on/off`, `yes/no`; absent or blank means
/// `default`.
fn parse_flag(name: &str, value: Option<&str>, default: bool) -> Result<bool, ApiError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(ApiError::bad_request(format!(
            "invalid {name} parameter: {other}"
        ))),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[get("/api/status")]
pub async fn status_api(ctx: web::Data<ApiContext>) -> Result<HttpResponse, ApiError> {
    let mut bridge = ctx.bridge.lock().await;
    bridge.process_one_event().await?;
    let log_count = bridge.log_entries()?.len();
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "rig": bridge.rig_status(),
        "ptt_engaged": bridge.is_ptt_engaged(),
        "log_count": log_count,
        "automation_enabled": bridge.is_automation_enabled(),
    })))
}

#[derive(Deserialize)]
pub struct PttForm {
    pub engage: Option<String>,
}

#[post("/api/ptt")]
pub async fn set_ptt(
    form: web::Form<PttForm>,
    ctx: web::Data<ApiContext>,
) -> Result<HttpResponse, ApiError> {
    let engage = parse_flag("engage", form.engage.as_deref(), true)?;
    let mut bridge = ctx.bridge.lock().await;
    let engaged = if engage {
        bridge.engage_ptt().await?
    } else {
        bridge.release_ptt()
    };
    Ok(HttpResponse::Ok().json(json!({ "ptt_engaged": engaged })))
}

#[derive(Deserialize)]
pub struct TransmitForm {
    pub message: Option<String>,
    pub call_sign: Option<String>,
    pub grid: Option<String>,
    pub mode: Option<String>,
    pub rst_sent: Option<String>,
    pub rst_recv: Option<String>,
    pub notes: Option<String>,
}

impl TransmitForm {
    /// A log entry only when every required contact field is filled in.
    fn log_entry(&self, timestamp: i64) -> Option<QsoLogEntry> {
        Some(QsoLogEntry {
            call_sign: non_empty(&self.call_sign)?.to_ascii_uppercase(),
            grid: non_empty(&self.grid)?,
            mode: non_empty(&self.mode)?,
            report_sent: non_empty(&self.rst_sent)?,
            report_received: non_empty(&self.rst_recv)?,
            timestamp,
            notes: non_empty(&self.notes),
        })
    }
}

#[post("/api/transmit")]
pub async fn transmit(
    form: web::Form<TransmitForm>,
    ctx: web::Data<ApiContext>,
) -> Result<HttpResponse, ApiError> {
    let message = non_empty(&form.message)
        .ok_or_else(|| ApiError::bad_request("message is required"))?;
    let entry = form.log_entry(chrono::Utc::now().timestamp());

    let mut bridge = ctx.bridge.lock().await;
    let outcome = bridge.transmit(&message, entry.as_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": outcome.ok,
        "ptt": outcome.ptt_engaged,
        "logged": outcome.logged,
        "log_error": outcome.log_error,
    })))
}

#[get("/api/logs")]
pub async fn logs(ctx: web::Data<ApiContext>) -> Result<HttpResponse, ApiError> {
    let entries = ctx.bridge.lock().await.log_entries()?;
    Ok(HttpResponse::Ok().json(json!({ "entries": entries })))
}

#[derive(Deserialize)]
pub struct AutomationForm {
    pub enable: Option<String>,
}

#[post("/api/automation/toggle")]
pub async fn toggle_automation(
    form: web::Form<AutomationForm>,
    ctx: web::Data<ApiContext>,
) -> Result<HttpResponse, ApiError> {
    let enable = parse_flag("enable", form.enable.as_deref(), false)?;
    let mut bridge = ctx.bridge.lock().await;
    let enabled = if enable {
        bridge.enable_automation()
    } else {
        bridge.disable_automation()
    };
    Ok(HttpResponse::Ok().json(json!({ "automation_enabled": enabled })))
}

#[get("/api/automation/status")]
pub async fn automation_status(ctx: web::Data<ApiContext>) -> Result<HttpResponse, ApiError> {
    let mut bridge = ctx.bridge.lock().await;
    let last_processed = bridge.process_one_event().await?;
    Ok(HttpResponse::Ok().json(json!({
        "enabled": bridge.is_automation_enabled(),
        "step": bridge.automation_state().step(),
        "dx_call": bridge.automation_state().current_dx_call(),
        "recent_decodes": bridge.recent_decodes(ctx.recent_decodes_limit),
        "last_processed": last_processed,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    )
    .service(status_api)
    .service(set_ptt)
    .service(transmit)
    .service(logs)
    .service(toggle_automation)
    .service(automation_status);
}
