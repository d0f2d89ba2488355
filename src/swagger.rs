use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::CustomerStatus;
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::customer::list_customers,
        handlers::customer::get_customer,
        handlers::customer::create_customer,
        handlers::customer::update_customer,
        handlers::customer::delete_customer,
        handlers::dashboard::get_stats,
        handlers::bulk_transfer::import_excel,
        handlers::bulk_transfer::export_excel,
    ),
    components(
        schemas(
            CustomerPayload,
            CustomerResponse,
            CustomerQuery,
            CustomerListResponse,
            CustomerStatus,
            DashboardStats,
            ImportSummary,
            MessageResponse,
            ErrorResponse,
            ApiError,
        )
    ),
    tags(
        (name = "customer", description = "Customer records"),
        (name = "dashboard", description = "Aggregate counts"),
        (name = "bulk-transfer", description = "Spreadsheet import and export"),
    ),
    info(
        title = "Customer Records API",
        version = "1.0.0",
        description = "Customer records REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
