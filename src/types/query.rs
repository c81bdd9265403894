use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

/// Inclusive date range, RFC 3339 timestamps
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// Start of the range
    pub inicio: DateTime<Utc>,
    /// End of the range
    pub fin: DateTime<Utc>,
}

/// Free-text search term
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TextQuery {
    pub texto: String,
}
