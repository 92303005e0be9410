use netainfo_service::aggregation::AggregationKey;
use sentry::Scope;

/// Write own data to [`sentry::Scope`], only the subset that is considered useful for debugging.
pub trait ConfigureScope {
    /// Writes information to the given scope.
    fn to_scope(&self, scope: &mut Scope);

    /// Configures the current scope.
    fn configure_scope(&self) {
        sentry::configure_scope(|scope| self.to_scope(scope));
    }
}

impl ConfigureScope for AggregationKey {
    fn to_scope(&self, scope: &mut Scope) {
        scope.set_tag("filters.year", self.year);
        scope.set_tag("filters.dimension", self.dimension);
        scope.set_tag("filters.result", self.result.as_str());
    }
}
