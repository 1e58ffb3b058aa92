//! Roaming network handlers: network listing and the network-scoped
//! children (sessions, reservations, providers, EVSE status snapshots)

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::application::charging::evse_status_snapshot;
use crate::application::resolve::{resolve, RN, RN_PROVIDER, RN_RESERVATION, RN_SESSION};
use crate::interfaces::http::dto::{
    ErrorDto, EvseStatusEntryDto, NetworkDto, ProviderDto, ReservationDto, SessionDto,
};
use crate::interfaces::http::router::ApiState;
use crate::notifications::{event_names, EventOccurrence};

/// List all roaming networks
#[utoipa::path(
    get,
    path = "/RNs",
    tag = "RoamingNetworks",
    responses(
        (status = 200, description = "All roaming networks", body = [NetworkDto])
    )
)]
pub async fn list_networks(State(state): State<ApiState>) -> Json<Vec<NetworkDto>> {
    let mut networks: Vec<NetworkDto> = state
        .directory
        .network_ids()
        .iter()
        .filter_map(|id| state.directory.roaming_network(id))
        .map(|n| NetworkDto::from(n.as_ref()))
        .collect();
    networks.sort_by(|a, b| a.id.cmp(&b.id));
    Json(networks)
}

/// Roaming network details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}",
    tag = "RoamingNetworks",
    params(("network_id" = String, Path, description = "Roaming network ID")),
    responses(
        (status = 200, description = "Network details", body = NetworkDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown network", body = ErrorDto)
    )
)]
pub async fn get_network(
    State(state): State<ApiState>,
    Path(network_id): Path<String>,
) -> Response {
    match resolve(&state.directory, RN, &[&network_id]) {
        Ok(chain) => match chain.network() {
            Some(network) => Json(NetworkDto::from(network.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// Charging session details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/ChargingSessions/{session_id}",
    tag = "ChargingSessions",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("session_id" = String, Path, description = "Charging session ID")
    ),
    responses(
        (status = 200, description = "Session details", body = SessionDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_session(
    State(state): State<ApiState>,
    Path((network_id, session_id)): Path<(String, String)>,
) -> Response {
    match resolve(&state.directory, RN_SESSION, &[&network_id, &session_id]) {
        Ok(chain) => match chain.session() {
            Some(session) => Json(SessionDto::from(session.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// Reservation details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/Reservations/{reservation_id}",
    tag = "Reservations",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("reservation_id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation details", body = ReservationDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_reservation(
    State(state): State<ApiState>,
    Path((network_id, reservation_id)): Path<(String, String)>,
) -> Response {
    match resolve(
        &state.directory,
        RN_RESERVATION,
        &[&network_id, &reservation_id],
    ) {
        Ok(chain) => match chain.reservation() {
            Some(reservation) => Json(ReservationDto::from(reservation.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// E-mobility provider details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/EMobilityProviders/{provider_id}",
    tag = "EMobilityProviders",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("provider_id" = String, Path, description = "Provider ID")
    ),
    responses(
        (status = 200, description = "Provider details", body = ProviderDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_provider(
    State(state): State<ApiState>,
    Path((network_id, provider_id)): Path<(String, String)>,
) -> Response {
    match resolve(&state.directory, RN_PROVIDER, &[&network_id, &provider_id]) {
        Ok(chain) => match chain.provider() {
            Some(provider) => Json(ProviderDto::from(provider.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// Network-wide EVSE status snapshot
///
/// Raises `GetEVSEsStatusRequest` for the attached sinks.
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/EVSEs/Status",
    tag = "EVSEs",
    params(("network_id" = String, Path, description = "Roaming network ID")),
    responses(
        (status = 200, description = "Status of every EVSE in the network", body = [EvseStatusEntryDto]),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown network", body = ErrorDto)
    )
)]
pub async fn get_evses_status(
    State(state): State<ApiState>,
    Path(network_id): Path<String>,
) -> Response {
    match resolve(&state.directory, RN, &[&network_id]) {
        Ok(chain) => {
            let Some(network) = chain.network() else {
                return internal_error();
            };

            state.bus.publish(EventOccurrence::request(
                event_names::GET_EVSES_STATUS_REQUEST,
                json!({ "network": network.id.to_string() }),
            ));

            let mut entries: Vec<EvseStatusEntryDto> = evse_status_snapshot(network)
                .into_iter()
                .map(|(id, status)| EvseStatusEntryDto {
                    evse_id: id.to_string(),
                    status: status.to_string(),
                })
                .collect();
            entries.sort_by(|a, b| a.evse_id.cmp(&b.evse_id));
            Json(entries).into_response()
        }
        Err(failure) => failure.into_response(),
    }
}

/// A resolved chain missing the entity its own pipeline guarantees is a
/// wiring bug, not a client error.
pub(super) fn internal_error() -> Response {
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "description": "Internal error" })),
    )
        .into_response()
}
