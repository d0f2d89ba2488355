use crate::models::*;
use crate::services::CustomerService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customer",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Page size, at least 1 (default 10)"),
        ("status" = Option<String>, Query, description = "Active / Inactive / all"),
        ("category" = Option<String>, Query, description = "Exact category or all"),
        ("search" = Option<String>, Query, description = "Substring of store name, email or account id"),
        ("startDate" = Option<String>, Query, description = "Signup date lower bound (inclusive)"),
        ("endDate" = Option<String>, Query, description = "Signup date upper bound (inclusive)")
    ),
    responses(
        (status = 200, description = "One page of customers", body = CustomerListResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    )
)]
pub async fn list_customers(
    customer_service: web::Data<CustomerService>,
    query: web::Query<CustomerQuery>,
) -> Result<HttpResponse> {
    match customer_service.list_customers(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customer",
    params(
        ("id" = String, Path, description = "Numeric id or serial number")
    ),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn get_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match customer_service.get_customer(&path).await {
        Ok(customer) => Ok(HttpResponse::Ok().json(customer)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customer",
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn create_customer(
    customer_service: web::Data<CustomerService>,
    payload: web::Json<CustomerPayload>,
) -> Result<HttpResponse> {
    match customer_service.create_customer(payload.into_inner()).await {
        Ok(customer) => Ok(HttpResponse::Created().json(customer)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customer",
    params(
        ("id" = i32, Path, description = "Numeric id")
    ),
    request_body = CustomerPayload,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn update_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
    payload: web::Json<CustomerPayload>,
) -> Result<HttpResponse> {
    match customer_service
        .update_customer(path.into_inner(), payload.into_inner())
        .await
    {
        Ok(customer) => Ok(HttpResponse::Ok().json(customer)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customer",
    params(
        ("id" = i32, Path, description = "Numeric id")
    ),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn delete_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match customer_service.delete_customer(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new(
            "Customer deleted successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn customer_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn app_service() -> web::Data<CustomerService> {
        web::Data::new(CustomerService::new(
            memory_db().await,
            Duration::from_secs(5),
        ))
    }

    #[actix_web::test]
    async fn test_create_then_fetch_by_serial_and_id() {
        let app = test::init_service(
            App::new()
                .app_data(app_service().await)
                .configure(customer_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/customers")
            .set_json(json!({"storeName": "Acme", "signupDate": "2024-03-05"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["serialNumber"], "CUS000001");
        assert_eq!(created["signupDate"], "05 - MAR - 2024");

        for uri in ["/customers/CUS000001", "/customers/1"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["storeName"], "Acme", "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_missing_customer_maps_to_404_body() {
        let app = test::init_service(
            App::new()
                .app_data(app_service().await)
                .configure(customer_config),
        )
        .await;

        let req = test::TestRequest::delete().uri("/customers/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_delete_reports_message() {
        let app = test::init_service(
            App::new()
                .app_data(app_service().await)
                .configure(customer_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/customers")
            .set_json(json!({"storeName": "Acme"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/customers/{id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Customer deleted successfully");
    }

    #[actix_web::test]
    async fn test_list_reads_camel_case_query_and_returns_page_shape() {
        let app = test::init_service(
            App::new()
                .app_data(app_service().await)
                .configure(customer_config),
        )
        .await;

        for (name, status, signup) in [
            ("Early", "Active", "2024-01-15"),
            ("Inside", "Active", "2024-02-10"),
            ("Churned", "Inactive", "2024-02-12"),
            ("Edge", "Active", "2024-02-29"),
        ] {
            let req = test::TestRequest::post()
                .uri("/customers")
                .set_json(json!({"storeName": name, "status": status, "signupDate": signup}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/customers?status=Active&startDate=2024-02-01&endDate=2024-02-29&page=1&limit=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalCount"], 2);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["totalPages"], 2);
        let customers = body["customers"].as_array().unwrap();
        assert_eq!(customers.len(), 1);
        // newest first
        assert_eq!(customers[0]["storeName"], "Edge");
        assert_eq!(customers[0]["signupDate"], "29 - FEB - 2024");
    }

    #[actix_web::test]
    async fn test_list_rejects_unknown_status_filter() {
        let app = test::init_service(
            App::new()
                .app_data(app_service().await)
                .configure(customer_config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/customers?status=Paused")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
