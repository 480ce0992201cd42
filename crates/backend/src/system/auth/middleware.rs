use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use contracts::system::auth::AuthContext;

/// Доверенные заголовки обратного прокси
const EMPLOYEE_ID_HEADER: &str = "X-Employee-Id";
const EMPLOYEE_NAME_HEADER: &str = "X-Employee-Name";
const EMPLOYEE_ROLES_HEADER: &str = "X-Employee-Roles";

/// Middleware that requires an authenticated employee
///
/// Аутентификацию выполняет обратный прокси перед сервисом, сервис
/// доверяет его заголовкам. Запрос без корректного X-Employee-Id
/// отклоняется с 401.
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let employee_id = req
        .headers()
        .get(EMPLOYEE_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if employee_id <= 0 {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let display_name = req
        .headers()
        .get(EMPLOYEE_NAME_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let roles = req
        .headers()
        .get(EMPLOYEE_ROLES_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(parse_roles)
        .unwrap_or_default();

    // Add the employee context to request extensions for use in handlers
    let ctx = AuthContext {
        employee_id,
        display_name,
        roles,
    };
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Разбор списка ролей из заголовка (через запятую)
fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roles_splits_and_trims() {
        assert_eq!(
            parse_roles("hr_admin, trainer ,,viewer"),
            vec!["hr_admin", "trainer", "viewer"]
        );
        assert!(parse_roles("").is_empty());
        assert!(parse_roles(" , ").is_empty());
    }
}
