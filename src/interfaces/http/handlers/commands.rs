//! Command handlers: remote start/stop, authorize start/stop, CDR
//! submission
//!
//! Each command resolves its EVSE through the full pool/station pipeline,
//! raises the request event, runs the domain operation, then raises the
//! paired completion event carrying the outcome.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::application::charging::{auth_start, auth_stop, remote_start, remote_stop, send_cdr};
use crate::application::charging::AuthDecision;
use crate::application::resolve::{resolve, RN, RN_POOL_STATION_EVSE};
use crate::domain::identifiers::{ChargingSessionId, EMobilityProviderId, EvseId};
use crate::domain::models::ChargeDetailRecord;
use crate::interfaces::http::dto::{
    AuthRequest, AuthResponseDto, CdrRequest, CdrResponse, ErrorDto, RemoteStartRequest,
    RemoteStartResponse, RemoteStopResponse,
};
use crate::interfaces::http::error::domain_error_response;
use crate::interfaces::http::router::ApiState;
use crate::notifications::{event_names, EventOccurrence};

use super::networks::internal_error;

/// Remotely start a session on an EVSE
#[utoipa::path(
    post,
    path = "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/RemoteStart",
    tag = "Commands",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("pool_id" = String, Path, description = "Charging pool ID"),
        ("station_id" = String, Path, description = "Charging station ID"),
        ("evse_id" = String, Path, description = "EVSE ID")
    ),
    request_body = RemoteStartRequest,
    responses(
        (status = 200, description = "Session started", body = RemoteStartResponse),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto),
        (status = 409, description = "EVSE unavailable", body = ErrorDto)
    )
)]
pub async fn post_remote_start(
    State(state): State<ApiState>,
    Path((network_id, pool_id, station_id, evse_id)): Path<(String, String, String, String)>,
    Json(request): Json<RemoteStartRequest>,
) -> Response {
    let chain = match resolve(
        &state.directory,
        RN_POOL_STATION_EVSE,
        &[&network_id, &pool_id, &station_id, &evse_id],
    ) {
        Ok(chain) => chain,
        Err(failure) => return failure.into_response(),
    };
    let (Some(network), Some(evse)) = (chain.network(), chain.evse()) else {
        return internal_error();
    };

    let request_json = json!({
        "network": network.id.to_string(),
        "evse": evse.id.to_string(),
        "provider_id": request.provider_id.clone(),
        "auth_token": request.auth_token.clone(),
    });
    state.bus.publish(EventOccurrence::request(
        event_names::REMOTE_EVSE_START,
        request_json.clone(),
    ));

    let provider_id = match request
        .provider_id
        .as_deref()
        .map(EMobilityProviderId::parse)
        .transpose()
    {
        Ok(provider_id) => provider_id,
        Err(err) => return domain_error_response(&err.into()),
    };

    match remote_start(network, evse, provider_id, request.auth_token.clone()) {
        Ok(session) => {
            let response = RemoteStartResponse {
                session_id: session.id.to_string(),
                evse_id: evse.id.to_string(),
                status: "Started".to_string(),
            };
            state.bus.publish(EventOccurrence::request_response(
                event_names::REMOTE_EVSE_STARTED,
                request_json,
                json!({ "session_id": response.session_id.clone(), "status": "Started" }),
            ));
            Json(response).into_response()
        }
        Err(err) => {
            state.bus.publish(EventOccurrence::error_response(
                event_names::REMOTE_EVSE_STARTED,
                json!({ "description": err.to_string() }),
            ));
            domain_error_response(&err)
        }
    }
}

/// Remotely stop the active session on an EVSE
#[utoipa::path(
    post,
    path = "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/RemoteStop",
    tag = "Commands",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("pool_id" = String, Path, description = "Charging pool ID"),
        ("station_id" = String, Path, description = "Charging station ID"),
        ("evse_id" = String, Path, description = "EVSE ID")
    ),
    responses(
        (status = 200, description = "Session stopped", body = RemoteStopResponse),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity or no active session", body = ErrorDto)
    )
)]
pub async fn post_remote_stop(
    State(state): State<ApiState>,
    Path((network_id, pool_id, station_id, evse_id)): Path<(String, String, String, String)>,
) -> Response {
    let chain = match resolve(
        &state.directory,
        RN_POOL_STATION_EVSE,
        &[&network_id, &pool_id, &station_id, &evse_id],
    ) {
        Ok(chain) => chain,
        Err(failure) => return failure.into_response(),
    };
    let (Some(network), Some(evse)) = (chain.network(), chain.evse()) else {
        return internal_error();
    };

    let request_json = json!({
        "network": network.id.to_string(),
        "evse": evse.id.to_string(),
    });
    state.bus.publish(EventOccurrence::request(
        event_names::REMOTE_EVSE_STOP,
        request_json.clone(),
    ));

    match remote_stop(network, evse) {
        Ok(session) => {
            let response = RemoteStopResponse {
                session_id: session.id.to_string(),
                evse_id: evse.id.to_string(),
                status: "Stopped".to_string(),
            };
            state.bus.publish(EventOccurrence::request_response(
                event_names::REMOTE_EVSE_STOPPED,
                request_json,
                json!({ "session_id": response.session_id.clone(), "status": "Stopped" }),
            ));
            Json(response).into_response()
        }
        Err(err) => {
            state.bus.publish(EventOccurrence::error_response(
                event_names::REMOTE_EVSE_STOPPED,
                json!({ "description": err.to_string() }),
            ));
            domain_error_response(&err)
        }
    }
}

/// Authorize a token for starting at an EVSE
#[utoipa::path(
    post,
    path = "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/AuthStart",
    tag = "Commands",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("pool_id" = String, Path, description = "Charging pool ID"),
        ("station_id" = String, Path, description = "Charging station ID"),
        ("evse_id" = String, Path, description = "EVSE ID")
    ),
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authorization decision", body = AuthResponseDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn post_auth_start(
    State(state): State<ApiState>,
    Path((network_id, pool_id, station_id, evse_id)): Path<(String, String, String, String)>,
    Json(request): Json<AuthRequest>,
) -> Response {
    let chain = match resolve(
        &state.directory,
        RN_POOL_STATION_EVSE,
        &[&network_id, &pool_id, &station_id, &evse_id],
    ) {
        Ok(chain) => chain,
        Err(failure) => return failure.into_response(),
    };
    let (Some(network), Some(evse)) = (chain.network(), chain.evse()) else {
        return internal_error();
    };

    let request_json = json!({
        "network": network.id.to_string(),
        "evse": evse.id.to_string(),
        "auth_token": request.auth_token.clone(),
    });
    state.bus.publish(EventOccurrence::request(
        event_names::AUTH_EVSE_START,
        request_json.clone(),
    ));

    let decision = auth_start(evse, &request.auth_token);
    let session_id = match decision {
        AuthDecision::Accepted => Some(ChargingSessionId::random().to_string()),
        _ => None,
    };

    state.bus.publish(EventOccurrence::request_response(
        event_names::AUTH_EVSE_STARTED,
        request_json,
        json!({ "decision": decision.to_string(), "session_id": session_id.clone() }),
    ));

    Json(AuthResponseDto::new(decision, session_id)).into_response()
}

/// Authorize a token for stopping at an EVSE
#[utoipa::path(
    post,
    path = "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/AuthStop",
    tag = "Commands",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("pool_id" = String, Path, description = "Charging pool ID"),
        ("station_id" = String, Path, description = "Charging station ID"),
        ("evse_id" = String, Path, description = "EVSE ID")
    ),
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authorization decision", body = AuthResponseDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn post_auth_stop(
    State(state): State<ApiState>,
    Path((network_id, pool_id, station_id, evse_id)): Path<(String, String, String, String)>,
    Json(request): Json<AuthRequest>,
) -> Response {
    let chain = match resolve(
        &state.directory,
        RN_POOL_STATION_EVSE,
        &[&network_id, &pool_id, &station_id, &evse_id],
    ) {
        Ok(chain) => chain,
        Err(failure) => return failure.into_response(),
    };
    let (Some(network), Some(evse)) = (chain.network(), chain.evse()) else {
        return internal_error();
    };

    let request_json = json!({
        "network": network.id.to_string(),
        "evse": evse.id.to_string(),
        "auth_token": request.auth_token.clone(),
    });
    state.bus.publish(EventOccurrence::request(
        event_names::AUTH_EVSE_STOP,
        request_json.clone(),
    ));

    let decision = auth_stop(evse, &request.auth_token);
    let session_id = match decision {
        AuthDecision::Accepted => evse.current_session().map(|s| s.to_string()),
        _ => None,
    };

    state.bus.publish(EventOccurrence::request_response(
        event_names::AUTH_EVSE_STOPPED,
        request_json,
        json!({ "decision": decision.to_string(), "session_id": session_id.clone() }),
    ));

    Json(AuthResponseDto::new(decision, session_id)).into_response()
}

/// Submit a charge detail record
#[utoipa::path(
    post,
    path = "/RNs/{network_id}/ChargeDetailRecords",
    tag = "Commands",
    params(("network_id" = String, Path, description = "Roaming network ID")),
    request_body = CdrRequest,
    responses(
        (status = 200, description = "CDR accepted", body = CdrResponse),
        (status = 400, description = "Invalid identifier or CDR", body = ErrorDto),
        (status = 404, description = "Unknown network", body = ErrorDto)
    )
)]
pub async fn post_cdr(
    State(state): State<ApiState>,
    Path(network_id): Path<String>,
    Json(request): Json<CdrRequest>,
) -> Response {
    let chain = match resolve(&state.directory, RN, &[&network_id]) {
        Ok(chain) => chain,
        Err(failure) => return failure.into_response(),
    };
    let Some(network) = chain.network() else {
        return internal_error();
    };

    let request_json = match serde_json::to_value(&request) {
        Ok(value) => value,
        Err(_) => return internal_error(),
    };
    state.bus.publish(EventOccurrence::request(
        event_names::SEND_CDR,
        request_json.clone(),
    ));

    let cdr = {
        let session_id = ChargingSessionId::parse(&request.session_id);
        let evse_id = EvseId::parse(&request.evse_id);
        match (session_id, evse_id) {
            (Ok(session_id), Ok(evse_id)) => ChargeDetailRecord {
                session_id,
                evse_id,
                energy_kwh: request.energy_kwh,
                started_at: request.started_at,
                stopped_at: request.stopped_at,
            },
            (Err(err), _) | (_, Err(err)) => {
                state.bus.publish(EventOccurrence::error_response(
                    event_names::CDR_SENT,
                    json!({ "description": err.to_string() }),
                ));
                return domain_error_response(&err.into());
            }
        }
    };

    match send_cdr(network, &cdr) {
        Ok(()) => {
            let response = CdrResponse {
                session_id: cdr.session_id.to_string(),
                status: "Forwarded".to_string(),
            };
            state.bus.publish(EventOccurrence::request_response(
                event_names::CDR_SENT,
                request_json,
                json!({ "session_id": response.session_id.clone(), "status": "Forwarded" }),
            ));
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            state.bus.publish(EventOccurrence::error_response(
                event_names::CDR_SENT,
                json!({ "description": err.to_string() }),
            ));
            domain_error_response(&err)
        }
    }
}
