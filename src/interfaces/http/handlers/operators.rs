//! Operator-scoped handlers: operators, brands, station groups

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::resolve::{resolve, RN_OPERATOR, RN_OPERATOR_BRAND, RN_OPERATOR_GROUP};
use crate::interfaces::http::dto::{BrandDto, ErrorDto, GroupDto, OperatorDto};
use crate::interfaces::http::router::ApiState;

use super::networks::internal_error;

/// Charging station operator details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/ChargingStationOperators/{operator_id}",
    tag = "Operators",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("operator_id" = String, Path, description = "Operator ID")
    ),
    responses(
        (status = 200, description = "Operator details", body = OperatorDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_operator(
    State(state): State<ApiState>,
    Path((network_id, operator_id)): Path<(String, String)>,
) -> Response {
    match resolve(&state.directory, RN_OPERATOR, &[&network_id, &operator_id]) {
        Ok(chain) => match chain.operator() {
            Some(operator) => Json(OperatorDto::from(operator.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// Brand details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/ChargingStationOperators/{operator_id}/Brands/{brand_id}",
    tag = "Operators",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("operator_id" = String, Path, description = "Operator ID"),
        ("brand_id" = String, Path, description = "Brand ID")
    ),
    responses(
        (status = 200, description = "Brand details", body = BrandDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_brand(
    State(state): State<ApiState>,
    Path((network_id, operator_id, brand_id)): Path<(String, String, String)>,
) -> Response {
    match resolve(
        &state.directory,
        RN_OPERATOR_BRAND,
        &[&network_id, &operator_id, &brand_id],
    ) {
        Ok(chain) => match chain.brand() {
            Some(brand) => Json(BrandDto::from(brand.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}

/// Charging station group details
#[utoipa::path(
    get,
    path = "/RNs/{network_id}/ChargingStationOperators/{operator_id}/ChargingStationGroups/{group_id}",
    tag = "Operators",
    params(
        ("network_id" = String, Path, description = "Roaming network ID"),
        ("operator_id" = String, Path, description = "Operator ID"),
        ("group_id" = String, Path, description = "Station group ID")
    ),
    responses(
        (status = 200, description = "Group details", body = GroupDto),
        (status = 400, description = "Invalid identifier", body = ErrorDto),
        (status = 404, description = "Unknown entity", body = ErrorDto)
    )
)]
pub async fn get_station_group(
    State(state): State<ApiState>,
    Path((network_id, operator_id, group_id)): Path<(String, String, String)>,
) -> Response {
    match resolve(
        &state.directory,
        RN_OPERATOR_GROUP,
        &[&network_id, &operator_id, &group_id],
    ) {
        Ok(chain) => match chain.station_group() {
            Some(group) => Json(GroupDto::from(group.as_ref())).into_response(),
            None => internal_error(),
        },
        Err(failure) => failure.into_response(),
    }
}
