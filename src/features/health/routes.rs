use axum::{routing::get, Router};

use crate::features::health::handler;

/// Create the health route (mounted both at the root and under `/api/v1`)
pub fn routes() -> Router {
    Router::new().route("/health", get(handler::health_check))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let server = TestServer::new(routes()).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "status": "ok", "service": "catalog-service" })
        );
    }
}
