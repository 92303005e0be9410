use axum::extract;
use axum::response::Json;
use netainfo_service::service::{DashboardService, FilterOptions};

/// Lists the values of the year, dimension and result dropdowns.
pub async fn list_filters(
    extract::State(service): extract::State<DashboardService>,
) -> Json<FilterOptions> {
    Json(service.filter_options().clone())
}
