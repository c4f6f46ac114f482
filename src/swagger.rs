use rocket_okapi::swagger_ui::SwaggerUIConfig;

// Served at /swagger, reading the document generated for the /api mount
pub fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/openapi.json".to_string(),
        deep_linking: true,
        ..Default::default()
    }
}
