//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON, unknown enum values and rule violations are all
/// rejected with 400 and the standard error body.
///
/// ```rust,ignore
/// async fn create_area(ValidatedJson(input): ValidatedJson<CreateCommonArea>) {
///     // input.max_capacity is already within 1..=1000
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Rejected request body: {}", e.body_text());
            AppError::validation(e.body_text())
        })?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Join the rule messages, sorted by field for stable output
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateCommonArea;

    #[test]
    fn test_messages_come_from_rules() {
        let input = CreateCommonArea {
            name: "Gimnasio".to_string(),
            description: "corta".to_string(),
            location: "Torre A, sótano".to_string(),
            max_capacity: 0,
            opening_hours: "Lunes a viernes".to_string(),
            status: Default::default(),
        };
        let errors = input.validate().unwrap_err();

        assert_eq!(
            format_validation_errors(&errors),
            "Description must have 10 to 1000 characters, Capacity must be between 1 and 1000"
        );
    }
}
