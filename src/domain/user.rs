//! Resident and staff accounts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Digits plus the separators people type in phone numbers
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-\s()]*$").expect("phone pattern is valid"));

string_enum! {
    /// Identity document type
    DocumentType, "document type", default = Cc {
        Cc => "CC",
        Ce => "CE",
        Ti => "TI",
        Pp => "PP",
        Nit => "NIT",
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub document_type: DocumentType,
    pub document_number: String,
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    /// Names of the roles currently assigned and active
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "first_names last_names"
    pub fn full_name(&self) -> String {
        full_name(&self.first_names, &self.last_names)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

pub(crate) fn full_name(first_names: &str, last_names: &str) -> String {
    format!("{} {}", first_names, last_names)
}

/// Data required to insert a user row
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub document_type: DocumentType,
    pub document_number: String,
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

/// Field changes applied to an existing user; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub document_type: Option<DocumentType>,
    pub document_number: Option<String>,
    pub first_names: Option<String>,
    pub last_names: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub password_hash: Option<String>,
    pub active: Option<bool>,
}

/// User creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[schema(example = "CC")]
    pub document_type: DocumentType,
    #[validate(length(min = 6, max = 20, message = "Document number must have 6 to 20 characters"))]
    #[schema(example = "1032456789")]
    pub document_number: String,
    #[validate(length(min = 2, max = 50, message = "First names must have 2 to 50 characters"))]
    #[schema(example = "María Fernanda")]
    pub first_names: String,
    #[validate(length(min = 2, max = 50, message = "Last names must have 2 to 50 characters"))]
    #[schema(example = "Rojas Pérez")]
    pub last_names: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 150, message = "Email must have at most 150 characters")
    )]
    #[schema(example = "maria.rojas@example.com")]
    pub email: String,
    #[validate(
        length(max = 15, message = "Phone must have at most 15 characters"),
        regex(path = *PHONE_PATTERN, message = "Phone may only contain digits, +, -, spaces and parentheses")
    )]
    #[schema(example = "+57 300 1234567")]
    pub phone: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// Full user replacement request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    pub document_type: DocumentType,
    #[validate(length(min = 6, max = 20, message = "Document number must have 6 to 20 characters"))]
    pub document_number: String,
    #[validate(length(min = 2, max = 50, message = "First names must have 2 to 50 characters"))]
    pub first_names: String,
    #[validate(length(min = 2, max = 50, message = "Last names must have 2 to 50 characters"))]
    pub last_names: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 150, message = "Email must have at most 150 characters")
    )]
    pub email: String,
    #[validate(
        length(max = 15, message = "Phone must have at most 15 characters"),
        regex(path = *PHONE_PATTERN, message = "Phone may only contain digits, +, -, spaces and parentheses")
    )]
    pub phone: Option<String>,
    /// New password, kept unchanged when omitted
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl UpdateUser {
    /// Split into field changes and the plain-text password (if any)
    pub fn into_changes(self) -> (UserChanges, Option<String>) {
        let changes = UserChanges {
            document_type: Some(self.document_type),
            document_number: Some(self.document_number),
            first_names: Some(self.first_names),
            last_names: Some(self.last_names),
            email: Some(self.email),
            phone: Some(self.phone),
            password_hash: None,
            active: None,
        };
        (changes, self.password)
    }
}

/// Partial user update request; only present fields are applied
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PatchUser {
    pub document_type: Option<DocumentType>,
    #[validate(length(min = 6, max = 20, message = "Document number must have 6 to 20 characters"))]
    pub document_number: Option<String>,
    #[validate(length(min = 2, max = 50, message = "First names must have 2 to 50 characters"))]
    pub first_names: Option<String>,
    #[validate(length(min = 2, max = 50, message = "Last names must have 2 to 50 characters"))]
    pub last_names: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 150, message = "Email must have at most 150 characters")
    )]
    pub email: Option<String>,
    #[validate(
        length(max = 15, message = "Phone must have at most 15 characters"),
        regex(path = *PHONE_PATTERN, message = "Phone may only contain digits, +, -, spaces and parentheses")
    )]
    pub phone: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub active: Option<bool>,
}

impl PatchUser {
    pub fn into_changes(self) -> (UserChanges, Option<String>) {
        let changes = UserChanges {
            document_type: self.document_type,
            document_number: self.document_number,
            first_names: self.first_names,
            last_names: self.last_names,
            email: self.email,
            phone: self.phone.map(Some),
            password_hash: None,
            active: self.active,
        };
        (changes, self.password)
    }
}

/// Password change request (requires the current password)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePassword {
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Administrative password reset request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPassword {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub document_type: DocumentType,
    #[schema(example = "1032456789")]
    pub document_number: String,
    pub first_names: String,
    pub last_names: String,
    #[schema(example = "María Fernanda Rojas Pérez")]
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    #[schema(example = json!(["PROPIETARIO"]))]
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id,
            document_type: user.document_type,
            document_number: user.document_number,
            first_names: user.first_names,
            last_names: user.last_names,
            email: user.email,
            phone: user.phone,
            active: user.active,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Aggregate user counts
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserStatistics {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    /// Users per document type
    pub by_document_type: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateUser {
        CreateUser {
            document_type: DocumentType::Cc,
            document_number: "1032456789".to_string(),
            first_names: "María".to_string(),
            last_names: "Rojas".to_string(),
            email: "maria@example.com".to_string(),
            phone: Some("+57 300 1234567".to_string()),
            password: "SecurePass123".to_string(),
        }
    }

    #[test]
    fn test_create_user_valid() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_create_user_rejects_short_document() {
        let mut request = create_request();
        request.document_number = "123".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_user_rejects_letters_in_phone() {
        let mut request = create_request();
        request.phone = Some("300-CALL-ME".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_user_rejects_phone_over_fifteen_characters() {
        let mut request = create_request();
        request.phone = Some("+57 (300) 123-45".to_string());
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_document_type_wire_values() {
        assert_eq!(DocumentType::Nit.as_str(), "NIT");
        assert_eq!("PP".parse::<DocumentType>().unwrap(), DocumentType::Pp);
        assert!("cc".parse::<DocumentType>().is_err());
        assert_eq!(
            serde_json::from_str::<DocumentType>("\"CE\"").unwrap(),
            DocumentType::Ce
        );
    }

    #[test]
    fn test_patch_only_sets_present_fields() {
        let patch = PatchUser {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let (changes, password) = patch.into_changes();
        assert_eq!(changes.email.as_deref(), Some("new@example.com"));
        assert!(changes.first_names.is_none());
        assert!(changes.phone.is_none());
        assert!(password.is_none());
    }

    #[test]
    fn test_full_update_clears_missing_phone() {
        let update = UpdateUser {
            document_type: DocumentType::Cc,
            document_number: "1032456789".to_string(),
            first_names: "María".to_string(),
            last_names: "Rojas".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            password: None,
        };
        let (changes, _) = update.into_changes();
        assert_eq!(changes.phone, Some(None));
    }
}
