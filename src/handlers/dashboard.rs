use crate::models::*;
use crate::services::DashboardService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "dashboard",
    responses(
        (status = 200, description = "Current counts and last month's movement", body = DashboardStats),
        (status = 504, description = "Database did not respond in time", body = ErrorResponse)
    )
)]
pub async fn get_stats(dashboard_service: web::Data<DashboardService>) -> Result<HttpResponse> {
    match dashboard_service.get_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(stats)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("/stats", web::get().to(get_stats)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CustomerService;
    use crate::test_support::{customer, memory_db};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;
    use std::time::Duration;

    #[actix_web::test]
    async fn test_stats_round_trip() {
        let db = memory_db().await;
        let customers = CustomerService::new(db.clone(), Duration::from_secs(5));
        customers.create_customer(customer("Acme")).await.unwrap();
        let mut dormant = customer("Globex");
        dormant.status = crate::entities::CustomerStatus::Inactive;
        customers.create_customer(dormant).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DashboardService::new(db, Duration::from_secs(5))))
                .configure(dashboard_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/dashboard/stats").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;

        assert_eq!(body["activeCustomers"], 1);
        assert_eq!(body["inactiveCustomers"], 1);
        // both rows were written today, outside last month's window
        assert_eq!(body["newSalesLastMonth"], 0);
        assert_eq!(body["trendAvailable"], false);
        assert!(body["periodStart"].is_string());
        assert!(body["periodEnd"].is_string());
    }
}
