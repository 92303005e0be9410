use axum::extract;
use axum::response::Json;
use netainfo_service::aggregation::AggregationKey;
use netainfo_service::charts::Figure;
use netainfo_service::service::DashboardService;
use serde::{Deserialize, Serialize};

use crate::utils::sentry::ConfigureScope;

use super::ResponseError;

/// Query parameters of the charts request.
///
/// Every parameter falls back to the initial dropdown selection when omitted.
#[derive(Debug, Default, Deserialize)]
pub struct ChartsQueryParams {
    pub year: Option<String>,
    pub dimension: Option<String>,
    pub result: Option<String>,
}

impl ChartsQueryParams {
    fn into_key(self, default: AggregationKey) -> Result<AggregationKey, ResponseError> {
        let year = self.year.unwrap_or_else(|| default.year.to_string());
        let dimension = self.dimension.as_deref().unwrap_or(default.dimension.as_str());
        let result = self.result.as_deref().unwrap_or(default.result.as_str());
        Ok(AggregationKey::parse(&year, dimension, result)?)
    }
}

/// The criminal cases, assets and age figures for one filter selection.
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub key: AggregationKey,
    pub figures: [Figure; 3],
}

pub async fn handle_charts_request(
    extract::State(service): extract::State<DashboardService>,
    extract::Query(params): extract::Query<ChartsQueryParams>,
) -> Result<Json<ChartsResponse>, ResponseError> {
    let key = params.into_key(service.filter_options().default)?;
    key.configure_scope();

    let figures = service.on_filters_changed(key).await;
    Ok(Json(ChartsResponse { key, figures }))
}
