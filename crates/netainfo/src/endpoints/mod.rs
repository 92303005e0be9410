use axum::Router;
use axum::routing::get;
use netainfo_service::service::DashboardService;
use sentry::integrations::tower::{NewSentryLayer, SentryHttpLayer};
use tower::ServiceBuilder;

mod charts;
mod error;
mod filters;
mod metrics;

pub use charts::ChartsResponse;
pub use error::ResponseError;
use metrics::MetricsLayer;

use charts::handle_charts_request as charts;
use filters::list_filters as filters;

pub async fn healthcheck() -> &'static str {
    netainfo_service::metric!(counter("healthcheck") += 1);
    "ok"
}

pub fn create_app(service: DashboardService) -> Router {
    // The layers here go "top to bottom" according to the reading order here.
    let layer = ServiceBuilder::new()
        .layer(NewSentryLayer::new_from_top())
        .layer(SentryHttpLayer::new().enable_transaction())
        .layer(MetricsLayer);
    Router::new()
        .route("/charts", get(charts))
        .route("/filters", get(filters))
        .with_state(service)
        .layer(layer)
        // the healthcheck is last, as it will bypass all the middlewares
        .route("/healthcheck", get(healthcheck))
}
