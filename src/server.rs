use crate::collectors::Registry;
use axum::{
    extract::State,
    http::{
        header,
        StatusCode,
    },
    response::{
        Html,
        IntoResponse,
        Response,
    },
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::error;

const TEXT_EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub telemetry_path: String,
}

pub fn create_router(registry: Arc<Registry>, telemetry_path: &str) -> Router {
    let state = AppState {
        registry,
        telemetry_path: telemetry_path.to_string(),
    };

    Router::new()
        .route("/", get(landing))
        .route(telemetry_path, get(metrics))
        .with_state(state)
}

/// One scrape cycle per request; the puller drives the collection schedule.
async fn metrics(State(state): State<AppState>) -> Response {
    match state.registry.gather().await {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_EXPOSITION_CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            error!(error = %err, "rendering scrape failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "scrape failed\n").into_response()
        }
    }
}

async fn landing(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n\
         <head><title>Tencent Cloud Info Exporter</title></head>\n\
         <body>\n\
         <h1>Tencent cloud info exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        state.telemetry_path
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn landing_page_links_the_telemetry_path() {
        let state = AppState {
            registry: Arc::new(Registry::new()),
            telemetry_path: "/metrics".to_string(),
        };
        let Html(body) = landing(State(state)).await;
        assert!(body.contains("<a href='/metrics'>"));
    }
}
