//! Pool-scoped handlers: pools, stations, EVSEs

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::resolve::{resolve, RN_POOL, RN_POOL_STATION, RN_POOL_STATION_EVSE};
use crate::interfaces::http::dto::{ErrorDto, EvseDto, PoolDto, StationDto};
use crate::interfaces::http::router::ApiState;

use super::networks::internal_error;

/// Charging pool details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/ChargingPools/{pool_id}",
    tag = "ChargingPools",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("pool_id" = String, Path, description = "Charging pool ID")
    ),
    responses(
        (status = 200, description = "Pool details", body = PoolDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_pool(
    State(state): State<ApiState>,
    Path((network_id, pool_id)): Path<(String, String)>,
) -> Response {
    match resolve(&state.directory, RN_POOL, &[&network_id, &pool_id]) {
        Ok(chain) => match chain.pool() {
            Some(pool) => Json(PoolDto::from(pool.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// Charging station details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}",
    tag = "ChargingStations",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("pool_id" = String, Path, description = "Charging pool ID"),
        ("station_id" = String, Path, description = "Charging station ID")
    ),
    responses(
        (status = 200, description = "Station details", body = StationDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_station(
    State(state): State<ApiState>,
    Path((network_id, pool_id, station_id)): Path<(String, String, String)>,
) -> Response {
    match resolve(
        &state.directory,
        RN_POOL_STATION,
        &[&network_id, &pool_id, &station_id],
    ) {
        Ok(chain) => match chain.station() {
            Some(station) => Json(StationDto::from(station.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// EVSE details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}",
    tag = "EVSEs",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("pool_id" = String, Path, description = "Charging pool ID"),
        ("station_id" = String, Path, description = "Charging station ID"),
        ("evse_id" = String, Path, description = "EVSE ID")
    ),
    responses(
        (status = 200, description = "EVSE details", body = EvseDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_evse(
    State(state): State<ApiState>,
    Path((network_id, pool_id, station_id, evse_id)): Path<(String, String, String, String)>,
) -> Response {
    match resolve(
        &state.directory,
        RN_POOL_STATION_EVSE,
        &[&network_id, &pool_id, &station_id, &evse_id],
    ) {
        Ok(chain) => match chain.evse() {
            Some(evse) => Json(EvseDto::from(evse.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}
