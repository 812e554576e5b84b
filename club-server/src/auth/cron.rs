//! Shared-secret check for scheduled jobs

use http::HeaderMap;
use http::header::AUTHORIZATION;
use shared::error::{AppError, ErrorCode};

use super::admin::password_matches;

/// Accepts `Authorization: Bearer <secret>` or `?secret=<secret>`.
/// Every caller is accepted when no secret is configured.
pub fn check_cron_secret(
    configured: Option<&str>,
    headers: &HeaderMap,
    query_secret: Option<&str>,
) -> Result<(), AppError> {
    let Some(expected) = configured.filter(|s| !s.is_empty()) else {
        return Ok(());
    };

    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let accepted = [bearer, query_secret]
        .into_iter()
        .flatten()
        .any(|given| password_matches(given, expected));
    if !accepted {
        tracing::warn!("Cron request with missing or wrong secret");
        return Err(AppError::new(ErrorCode::CronSecretInvalid));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_open_without_secret() {
        assert!(check_cron_secret(None, &HeaderMap::new(), None).is_ok());
        assert!(check_cron_secret(Some(""), &HeaderMap::new(), None).is_ok());
    }

    #[test]
    fn test_bearer_or_query() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert!(check_cron_secret(Some("abc"), &headers, None).is_ok());
        assert!(check_cron_secret(Some("abc"), &HeaderMap::new(), Some("abc")).is_ok());
    }

    #[test]
    fn test_wrong_secret() {
        let err = check_cron_secret(Some("abc"), &HeaderMap::new(), Some("abd")).unwrap_err();
        assert_eq!(err.code, ErrorCode::CronSecretInvalid);
        assert!(check_cron_secret(Some("abc"), &HeaderMap::new(), None).is_err());
    }
}
