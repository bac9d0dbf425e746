//! HTTP server for the Dineview API.
//!
//! # API Endpoints
//!
//! | Method | Path                | Description                            |
//! |--------|---------------------|----------------------------------------|
//! | GET    | `/health`           | Health check and dataset summary       |
//! | GET    | `/api/locations`    | Location choices                       |
//! | GET    | `/api/cuisines`     | Cuisine choices (`?location=`)         |
//! | GET    | `/api/restaurants`  | Restaurant choices (`?location=&cuisine=`) |
//! | POST   | `/api/explore`      | Summary table and chart payloads       |
//! | GET    | `/api/logs`         | SSE stream of pipeline logs            |

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::types::{
    error_response, CuisineQuery, DatasetMetadata, ExploreResponse, OptionsResponse,
    RestaurantQuery,
};
use crate::error::{ServerError, ServerResult};
use crate::logging;
use crate::transform::pipeline::Explorer;
use crate::transform::selector::Selection;

/// Shared, read-only state handed to every handler.
pub type AppState = Arc<Explorer>;

type ApiError = (StatusCode, Json<Value>);

/// Build the router around an explorer.
pub fn router(explorer: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/locations", get(list_locations))
        .route("/api/cuisines", get(list_cuisines))
        .route("/api/restaurants", get(list_restaurants))
        .route("/api/explore", post(explore))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(explorer)
}

/// Serve the API until the process exits.
pub async fn start_server(explorer: Explorer, port: u16) -> ServerResult<()> {
    let app = router(Arc::new(explorer));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    logging::success(format!("Dineview server running on http://localhost:{}", port));
    logging::info_indent("GET  /api/locations | /api/cuisines | /api/restaurants", 1);
    logging::info_indent("POST /api/explore", 1);
    logging::info_indent("GET  /api/logs (SSE), /health", 1);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health(State(explorer): State<AppState>) -> Json<Value> {
    let table = explorer.table();
    Json(json!({
        "status": "ok",
        "service": "dineview",
        "version": env!("CARGO_PKG_VERSION"),
        "dataset": DatasetMetadata::new(explorer.source(), table.len(), table.wrapped_cells),
    }))
}

async fn list_locations(State(explorer): State<AppState>) -> Json<OptionsResponse> {
    Json(explorer.locations().into())
}

async fn list_cuisines(
    State(explorer): State<AppState>,
    Query(query): Query<CuisineQuery>,
) -> Json<OptionsResponse> {
    Json(explorer.cuisines(&query.location).into())
}

async fn list_restaurants(
    State(explorer): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> Json<OptionsResponse> {
    Json(explorer.restaurants(&query.location, &query.cuisine).into())
}

async fn explore(
    State(explorer): State<AppState>,
    Json(selection): Json<Selection>,
) -> Result<Json<ExploreResponse>, ApiError> {
    let outcome = explorer
        .explore(&selection)
        .map_err(|e| api_error(ServerError::from_pipeline(e)))?;

    Ok(Json(outcome.into()))
}

fn api_error(err: ServerError) -> ApiError {
    logging::error(format!("Explore failed: {}", err));
    let status = match err {
        ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error_response(&err.to_string())))
}

async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(logging::BROADCASTER.subscribe()).filter_map(|result| {
        // Lagged receivers just skip the dropped entries.
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawRow, RawTable};

    fn state() -> AppState {
        let row = |name: &str, cuisine: &str, price: f64| RawRow {
            name: Some(name.into()),
            location: Some("Adyar".into()),
            cuisine: Some(cuisine.into()),
            top_dishes: Some("['Dosa']".into()),
            features: Some("['AC']".into()),
            price_for_two: Some(price),
            dining_rating: Some(4.0),
            delivery_rating: Some(3.0),
            ..Default::default()
        };
        Arc::new(Explorer::from_raw(&RawTable::new(
            vec![],
            vec![
                row("A", "['Indian','Chinese']", 400.0),
                row("B", "['Indian']", 250.0),
            ],
        )))
    }

    #[tokio::test]
    async fn test_option_endpoints() {
        let Json(locations) = list_locations(State(state())).await;
        assert_eq!(locations.options, vec!["Adyar"]);

        let Json(cuisines) = list_cuisines(
            State(state()),
            Query(CuisineQuery {
                location: "Adyar".into(),
            }),
        )
        .await;
        assert_eq!(cuisines.options, vec!["Chinese", "Indian"]);

        let Json(names) = list_restaurants(
            State(state()),
            Query(RestaurantQuery {
                location: "Adyar".into(),
                cuisine: "Indian".into(),
            }),
        )
        .await;
        assert_eq!(names.options, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_explore_ready() {
        let selection = Selection::new("Adyar", "Indian", vec!["A".into(), "B".into()]);
        let Json(response) = explore(State(state()), Json(selection)).await.unwrap();

        assert_eq!(response.status, "ready");
        assert_eq!(response.restaurants.len(), 2);
        let charts = response.charts.unwrap();
        assert_eq!(charts.price.points[0].price, Some(400.0));
    }

    #[tokio::test]
    async fn test_explore_prompt() {
        let selection = Selection::new("Adyar", "Indian", vec![]);
        let Json(response) = explore(State(state()), Json(selection)).await.unwrap();

        assert_eq!(response.status, "prompt");
        assert!(response.charts.is_none());
    }

    #[tokio::test]
    async fn test_explore_bad_request() {
        let selection = Selection::new("Mylapore", "Indian", vec!["A".into()]);
        let (status, Json(body)) = explore(State(state()), Json(selection)).await.unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Invalid request: Unknown location: Mylapore");
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health(State(state())).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["dataset"]["sourceRows"], 2);
        assert_eq!(body["dataset"]["normalizedRows"], 3);
    }
}
