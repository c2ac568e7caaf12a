//! Pass-through proxies for the WV GIS ArcGIS REST services the map draws
//! from.

use crate::finventory::APP_USER_AGENT;
use axum::{http::StatusCode, response::IntoResponse, Json};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, instrument};

const COUNTIES_URL: &str = "https://services.wvgis.wvu.edu/arcgis/rest/services/Boundaries/wv_political_boundary/MapServer/0/query?where=1%3D1&outFields=*&outSR=4326&f=geojson";

const TROUT_STREAMS_URL: &str = "https://services.wvgis.wvu.edu/arcgis/rest/services/Applications/dnrRec_fishing/MapServer/4/query?where=1%3D1&outFields=*&outSR=4326&f=geojson";

async fn fetch_geojson(url: &str) -> anyhow::Result<Value> {
    let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

    let response = client.get(url).send().await?.error_for_status()?;

    Ok(response.json().await?)
}

#[utoipa::path(
    get,
    path= "/layers/counties",
    responses (
        (status = 200, description = "County boundaries as GeoJSON", content_type = "application/json"),
        (status = 500, description = "Upstream GIS service failed"),
    ),
    tag= "layers"
)]
#[instrument]
pub async fn counties() -> impl IntoResponse {
    match fetch_geojson(COUNTIES_URL).await {
        Ok(geojson) => (StatusCode::OK, Json(geojson)),
        Err(err) => {
            error!("Error fetching county data: {}", err);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch county data" })),
            )
        }
    }
}

#[utoipa::path(
    get,
    path= "/layers/trout-streams",
    responses (
        (status = 200, description = "Trout streams as GeoJSON", content_type = "application/json"),
        (status = 500, description = "Upstream GIS service failed"),
    ),
    tag= "layers"
)]
#[instrument]
pub async fn trout_streams() -> impl IntoResponse {
    match fetch_geojson(TROUT_STREAMS_URL).await {
        Ok(geojson) => (StatusCode::OK, Json(geojson)),
        Err(err) => {
            error!("Error fetching trout stream data: {}", err);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch trout stream data" })),
            )
        }
    }
}
