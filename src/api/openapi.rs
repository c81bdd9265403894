//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    apartment_handler, assignment_handler, auth_handler, common_area_handler,
    correspondence_handler, parking_handler, request_handler, role_handler, user_handler,
};
use crate::domain::{
    Apartment, ApartmentInput, AreaStatus, AssignmentPolicy, AssignmentStats, ChangePassword,
    CommonArea, Correspondence, CorrespondenceInput, CorrespondenceKind, CorrespondenceStatus,
    CreateAssignment, CreateCommonArea, CreateRole, CreateServiceRequest, CreateUser,
    DeliverCorrespondence, DocumentType, ExclusiveRoles, OccupancyStatus, ParkingInput,
    ParkingSpot, PatchRole, PatchUser, RequestKind, RequestStatus, ResetPassword, Role,
    RoleAssignment, RoleIds, RoleStatistics, ServiceRequest, SpotType, UpdateAssignment,
    UpdateCommonArea, UpdateRole, UpdateServiceRequest, UpdateUser, UserIds, UserResponse,
    UserStatistics,
};
use crate::errors::ErrorResponse;
use crate::services::TokenResponse;
use crate::types::CountResponse;

/// OpenAPI documentation for the Arkania API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Arkania API",
        version = "0.1.0",
        description = "Residential complex administration: residents, roles, apartments, parking, common areas, correspondence and service requests",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::me,
        user_handler::create_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::patch_user,
        user_handler::delete_user,
        user_handler::reactivate_user,
        user_handler::get_by_document,
        user_handler::get_by_email,
        user_handler::list_active_users,
        user_handler::list_inactive_users,
        user_handler::search_users,
        user_handler::users_by_role,
        user_handler::users_without_roles,
        user_handler::users_with_multiple_roles,
        user_handler::users_created_between,
        user_handler::exists_by_document,
        user_handler::exists_by_email,
        user_handler::can_delete,
        user_handler::change_password,
        user_handler::reset_password,
        user_handler::statistics,
        role_handler::create_role,
        role_handler::list_roles,
        role_handler::get_role,
        role_handler::update_role,
        role_handler::patch_role,
        role_handler::delete_role,
        role_handler::reactivate_role,
        role_handler::get_by_name,
        role_handler::get_by_name_ignore_case,
        role_handler::list_active_roles,
        role_handler::list_inactive_roles,
        role_handler::search_by_description,
        role_handler::roles_with_permission,
        role_handler::get_permissions,
        role_handler::set_permissions,
        role_handler::add_permission,
        role_handler::remove_permission,
        role_handler::has_permission,
        role_handler::users_with_role,
        role_handler::count_users_with_role,
        role_handler::can_delete,
        role_handler::roles_of_user,
        role_handler::roles_without_users,
        role_handler::roles_with_min_users,
        role_handler::roles_created_between,
        role_handler::exists_by_name,
        role_handler::exists_active_by_name,
        role_handler::statistics,
        role_handler::initialize_default_roles,
        assignment_handler::create_assignment,
        assignment_handler::assign,
        assignment_handler::get_assignment,
        assignment_handler::list_assignments,
        assignment_handler::update_assignment,
        assignment_handler::delete_assignment,
        assignment_handler::get_by_pair,
        assignment_handler::get_active_by_pair,
        assignment_handler::list_by_user,
        assignment_handler::list_active_by_user,
        assignment_handler::list_by_role,
        assignment_handler::list_active_by_role,
        assignment_handler::activate,
        assignment_handler::deactivate,
        assignment_handler::activate_pair,
        assignment_handler::deactivate_pair,
        assignment_handler::unassign,
        assignment_handler::list_active,
        assignment_handler::list_inactive,
        assignment_handler::created_between,
        assignment_handler::updated_between,
        assignment_handler::user_has_role,
        assignment_handler::exists,
        assignment_handler::exists_active,
        assignment_handler::can_assign,
        assignment_handler::can_unassign,
        assignment_handler::assign_roles_to_user,
        assignment_handler::unassign_roles_from_user,
        assignment_handler::replace_user_roles,
        assignment_handler::assign_role_to_users,
        assignment_handler::unassign_role_from_users,
        assignment_handler::count_assignments,
        assignment_handler::count_roles_of_user,
        assignment_handler::count_users_of_role,
        assignment_handler::statistics,
        assignment_handler::user_history,
        assignment_handler::role_history,
        assignment_handler::policy,
        apartment_handler::list_apartments,
        apartment_handler::get_apartment,
        apartment_handler::create_apartment,
        apartment_handler::update_apartment,
        apartment_handler::delete_apartment,
        parking_handler::list_spots,
        parking_handler::get_spot,
        parking_handler::create_spot,
        parking_handler::update_spot,
        parking_handler::delete_spot,
        common_area_handler::list_areas,
        common_area_handler::get_area,
        common_area_handler::create_area,
        common_area_handler::update_area,
        common_area_handler::delete_area,
        common_area_handler::active_areas,
        common_area_handler::areas_by_status,
        common_area_handler::search_areas,
        common_area_handler::count_by_status,
        correspondence_handler::create_item,
        correspondence_handler::list_items,
        correspondence_handler::get_item,
        correspondence_handler::update_item,
        correspondence_handler::delete_item,
        correspondence_handler::by_recipient,
        correspondence_handler::pending_for_recipient,
        correspondence_handler::by_status,
        correspondence_handler::by_kind,
        correspondence_handler::by_kind_and_status,
        correspondence_handler::received_between,
        correspondence_handler::picked_up_by,
        correspondence_handler::recorded_by,
        correspondence_handler::pending,
        correspondence_handler::stale_pending,
        correspondence_handler::mark_delivered,
        request_handler::list_requests,
        request_handler::get_request,
        request_handler::create_request,
        request_handler::update_request,
        request_handler::delete_request,
        request_handler::created_between,
        request_handler::resolved_between,
        request_handler::by_statuses,
        request_handler::by_kinds,
        request_handler::search_description,
        request_handler::by_statuses_and_kinds,
    ),
    components(
        schemas(
            ErrorResponse,
            CountResponse,
            auth_handler::LoginRequest,
            TokenResponse,
            DocumentType,
            UserResponse,
            CreateUser,
            UpdateUser,
            PatchUser,
            ChangePassword,
            ResetPassword,
            UserStatistics,
            Role,
            CreateRole,
            UpdateRole,
            PatchRole,
            RoleStatistics,
            role_handler::PermissionsRequest,
            RoleAssignment,
            CreateAssignment,
            UpdateAssignment,
            RoleIds,
            UserIds,
            AssignmentStats,
            AssignmentPolicy,
            ExclusiveRoles,
            OccupancyStatus,
            Apartment,
            ApartmentInput,
            SpotType,
            ParkingSpot,
            ParkingInput,
            AreaStatus,
            CommonArea,
            CreateCommonArea,
            UpdateCommonArea,
            CorrespondenceKind,
            CorrespondenceStatus,
            Correspondence,
            CorrespondenceInput,
            DeliverCorrespondence,
            RequestKind,
            RequestStatus,
            ServiceRequest,
            CreateServiceRequest,
            UpdateServiceRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and current session"),
        (name = "Users", description = "Residents and staff"),
        (name = "Roles", description = "Roles and their permissions"),
        (name = "Role assignments", description = "Which user holds which role"),
        (name = "Apartments", description = "Apartments and owners"),
        (name = "Parking", description = "Parking spots"),
        (name = "Common areas", description = "Shared facilities"),
        (name = "Correspondence", description = "Mail and packages at the front desk"),
        (name = "Service requests", description = "Maintenance, complaints, bookings and inquiries")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for prefix in [
            "/api/auth/login",
            "/api/usuarios",
            "/api/roles",
            "/api/usuario-roles",
            "/api/apartamentos",
            "/api/parqueaderos",
            "/api/areas-comunes",
            "/api/correspondencias",
            "/api/solicitudes",
        ] {
            assert!(
                paths.iter().any(|p| p.starts_with(prefix)),
                "missing {prefix}"
            );
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
