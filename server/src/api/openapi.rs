//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{directory, health};
use crate::domain::directory::{Record, SearchMode};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OrgLens API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Personnel directory browser"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "directory", description = "Directory filtering, export, and persistence")
    ),
    paths(
        // Health
        health::health,
        // Directory
        directory::snapshot_info,
        directory::filter_options,
        directory::search_directory,
        directory::export_csv,
        directory::save_results,
    ),
    components(schemas(
        // Health
        health::HealthResponse,
        // Domain
        Record,
        SearchMode,
        // Directory types
        directory::types::SearchRequest,
        directory::types::OptionsResponse,
        directory::types::SearchStatus,
        directory::types::SearchResponse,
        directory::types::SaveRequest,
        directory::types::SaveResponse,
        directory::types::SnapshotResponse,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>OrgLens API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
