use common::analytics::{PlatformAnalytics, StorageSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsKind {
    #[default]
    Platform,
    Storage,
}

/// Query parameters for analytics.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// `platform` (default) or `storage`.
    #[serde(rename = "type", default)]
    #[param(inline)]
    pub kind: AnalyticsKind,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum AnalyticsReport {
    Platform(PlatformAnalytics),
    Storage(StorageSummary),
}
