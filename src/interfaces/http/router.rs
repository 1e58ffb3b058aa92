//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::directory::SharedEntityDirectory;
use crate::notifications::bus::SharedEventBus;
use crate::notifications::sinks::PushStreamSink;

use super::dto::*;
use super::handlers::{commands, health, networks, operators, pools};
use super::metrics::{http_metrics_middleware, prometheus_metrics};
use super::ws::ws_events_handler;

/// Shared state for all API handlers
#[derive(Clone)]
pub struct ApiState {
    pub directory: SharedEntityDirectory,
    pub bus: SharedEventBus,
    pub push: Arc<PushStreamSink>,
    pub prometheus: PrometheusHandle,
    pub started_at: Instant,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Networks and network-scoped children
        networks::list_networks,
        networks::get_network,
        networks::get_session,
        networks::get_reservation,
        networks::get_provider,
        networks::get_evses_status,
        // Operators
        operators::get_operator,
        operators::get_brand,
        operators::get_station_group,
        // Pools
        pools::get_pool,
        pools::get_station,
        pools::get_evse,
        // Commands
        commands::post_remote_start,
        commands::post_remote_stop,
        commands::post_auth_start,
        commands::post_auth_stop,
        commands::post_cdr,
    ),
    components(schemas(
        health::HealthResponse,
        ErrorDto,
        NetworkDto,
        OperatorDto,
        BrandDto,
        GroupDto,
        PoolDto,
        StationDto,
        EvseDto,
        SessionDto,
        ReservationDto,
        ProviderDto,
        EvseStatusEntryDto,
        RemoteStartRequest,
        RemoteStartResponse,
        RemoteStopResponse,
        AuthRequest,
        AuthResponseDto,
        CdrRequest,
        CdrResponse,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "RoamingNetworks", description = "Roaming network inventory"),
        (name = "Operators", description = "Operators, brands and station groups"),
        (name = "ChargingPools", description = "Charging pools"),
        (name = "ChargingStations", description = "Charging stations"),
        (name = "EVSEs", description = "EVSEs and status"),
        (name = "ChargingSessions", description = "Charging sessions"),
        (name = "Reservations", description = "Reservations"),
        (name = "EMobilityProviders", description = "E-mobility providers"),
        (name = "Commands", description = "Remote and authorize operations")
    )
)]
struct ApiDoc;

/// Build the API router with all routes, layers and documentation.
pub fn create_api_router(
    directory: SharedEntityDirectory,
    bus: SharedEventBus,
    push: Arc<PushStreamSink>,
    prometheus: PrometheusHandle,
) -> Router {
    let state = ApiState {
        directory,
        bus,
        push,
        prometheus,
        started_at: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route("/metrics", get(prometheus_metrics))
        .route("/events/stream", get(ws_events_handler))
        .route("/RNs", get(networks::list_networks))
        .route("/RNs/{network_id}", get(networks::get_network))
        .route(
            "/RNs/{network_id}/ChargingStationOperators/{operator_id}",
            get(operators::get_operator),
        )
        .route(
            "/RNs/{network_id}/ChargingStationOperators/{operator_id}/Brands/{brand_id}",
            get(operators::get_brand),
        )
        .route(
            "/RNs/{network_id}/ChargingStationOperators/{operator_id}/ChargingStationGroups/{group_id}",
            get(operators::get_station_group),
        )
        .route(
            "/RNs/{network_id}/ChargingPools/{pool_id}",
            get(pools::get_pool),
        )
        .route(
            "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}",
            get(pools::get_station),
        )
        .route(
            "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}",
            get(pools::get_evse),
        )
        .route(
            "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/RemoteStart",
            post(commands::post_remote_start),
        )
        .route(
            "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/RemoteStop",
            post(commands::post_remote_stop),
        )
        .route(
            "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/AuthStart",
            post(commands::post_auth_start),
        )
        .route(
            "/RNs/{network_id}/ChargingPools/{pool_id}/ChargingStations/{station_id}/EVSEs/{evse_id}/AuthStop",
            post(commands::post_auth_stop),
        )
        .route(
            "/RNs/{network_id}/EVSEs/Status",
            get(networks::get_evses_status),
        )
        .route(
            "/RNs/{network_id}/ChargingSessions/{session_id}",
            get(networks::get_session),
        )
        .route(
            "/RNs/{network_id}/Reservations/{reservation_id}",
            get(networks::get_reservation),
        )
        .route(
            "/RNs/{network_id}/EMobilityProviders/{provider_id}",
            get(networks::get_provider),
        )
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
