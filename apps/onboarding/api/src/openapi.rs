use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Onboarding API",
        version = "0.1.0",
        description = "User onboarding: nickname, gender, favourite genres and movie"
    )
)]
pub struct ApiDoc;

/// Full document for the API routes, titled with `PROJECT_NAME`.
///
/// The server entry for the prefix is added by `create_router`.
pub fn openapi(project_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(domain_users::ApiDoc::openapi());
    doc.info.title = project_name.to_string();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_contains_user_paths() {
        let doc = openapi("온보딩");

        assert_eq!(doc.info.title, "온보딩");
        for path in ["/users/", "/users/onboarding", "/users/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
