use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::blood_requests::{
    dtos as blood_request_dtos, handlers as blood_request_handlers,
    models as blood_request_models,
};
use crate::features::geo::{dtos as geo_dtos, handlers as geo_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Admin
        blood_request_handlers::admin_handler::list_requests,
        blood_request_handlers::admin_handler::update_request_status,
        blood_request_handlers::admin_handler::get_request,
        // Donor
        blood_request_handlers::donor_handler::list_requests,
        blood_request_handlers::donor_handler::create_request,
        blood_request_handlers::donor_handler::get_request,
        // Geo
        geo_handlers::list_divisions,
        geo_handlers::list_districts,
        geo_handlers::list_upazilas,
    ),
    components(
        schemas(
            ErrorResponse,
            // Auth
            auth::dto::MeResponseDto,
            auth::dto::MeEnvelope,
            // Blood requests
            blood_request_models::BloodGroup,
            blood_request_models::BloodRequestStatus,
            blood_request_models::Urgency,
            blood_request_dtos::CreateBloodRequestDto,
            blood_request_dtos::UpdateRequestStatusDto,
            blood_request_dtos::BloodRequestDto,
            blood_request_dtos::RequestStatsDto,
            blood_request_dtos::RequestListResponse,
            blood_request_dtos::RequestResponse,
            // Geo
            geo_dtos::DivisionDto,
            geo_dtos::DistrictDto,
            geo_dtos::DivisionListResponse,
            geo_dtos::DistrictListResponse,
            geo_dtos::UpazilaListResponse,
        )
    ),
    tags(
        (name = "auth", description = "Current identity"),
        (name = "admin", description = "Request review and status changes (admin only)"),
        (name = "donor", description = "Browse open requests and submit new ones"),
        (name = "geo", description = "Bangladesh divisions, districts and upazilas (public)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Blood Request API",
        version = "0.1.0",
        description = "Blood donation request lifecycle service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
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
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_lists_request_endpoints() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/admin/requests"));
        assert!(paths.contains_key("/api/admin/requests/{id}"));
        assert!(paths.contains_key("/api/donor/requests"));
        assert!(paths.contains_key("/api/geo/districts/{district}/upazilas"));
        assert!(paths.contains_key("/api/auth/me"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
