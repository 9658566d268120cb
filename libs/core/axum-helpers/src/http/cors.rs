use axum::http::{HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Creates a CORS layer restricted to the given origins.
///
/// # Returns
/// A configured `CorsLayer` with:
/// - Specified allowed origins
/// - Common HTTP methods (GET, POST, PUT, DELETE, PATCH, OPTIONS)
/// - Common headers (Content-Type, Authorization, Accept)
/// - Credentials allowed
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Creates a permissive CORS layer that allows any origin, method and header.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Builds the CORS layer from a comma-separated origin list.
///
/// `None` yields the permissive layer. A list that is empty after trimming or
/// contains an invalid header value is an error.
pub fn cors_layer_from_origins(origins: Option<&str>) -> io::Result<CorsLayer> {
    let Some(origins_str) = origins else {
        info!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
        return Ok(create_permissive_cors_layer());
    };

    let allowed_origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    info!("CORS configured with allowed origins: {}", origins_str);
    Ok(create_cors_layer(allowed_origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_origins_are_permissive() {
        assert!(cors_layer_from_origins(None).is_ok());
    }

    #[test]
    fn test_origin_list_is_parsed() {
        let layer = cors_layer_from_origins(Some("http://localhost:3000, https://example.com"));
        assert!(layer.is_ok());
    }

    #[test]
    fn test_blank_origin_list_is_rejected() {
        let err = cors_layer_from_origins(Some(" , ")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let err = cors_layer_from_origins(Some("http://bad\norigin")).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS_ALLOWED_ORIGIN"));
    }
}
