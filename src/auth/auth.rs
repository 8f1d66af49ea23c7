use crate::auth::jwt::{TokenType, verify_token};
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

/// Per-request session context, decoded from the bearer token.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized("Missing token"))?;

    let config = req.app_data::<Data<Config>>().ok_or_else(|| {
        tracing::error!("Config missing from app data");
        ApiError::Internal
    })?;

    let claims = verify_token(token, &config.jwt_secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        ApiError::Unauthorized("Invalid token")
    })?;

    if claims.token_type != TokenType::Access {
        return Err(ApiError::Unauthorized("Access token required"));
    }

    let role = Role::from_id(claims.role).ok_or(ApiError::Unauthorized("Invalid role"))?;

    Ok(AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
        role,
        employee_id: claims.employee_id,
    })
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin only"))
        }
    }

    pub fn require_hr_or_admin(&self) -> Result<(), ApiError> {
        if self.is_hr_or_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("HR/Admin only"))
        }
    }

    pub fn is_hr_or_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Hr)
    }

    /// The caller's own employee id.
    pub fn employee_id(&self) -> Result<u64, ApiError> {
        self.employee_id
            .ok_or(ApiError::Forbidden("No employee profile"))
    }

    /// Employees may only look at themselves; HR and admins at anyone.
    pub fn ensure_can_view(&self, employee_id: u64) -> Result<(), ApiError> {
        if self.is_hr_or_admin() || self.employee_id == Some(employee_id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Not allowed to view this employee"))
        }
    }

    /// Resolves an optional employee filter against the caller's rights.
    pub fn scope_to(&self, requested: Option<u64>) -> Result<u64, ApiError> {
        match requested {
            Some(id) => self.ensure_can_view(id).map(|_| id),
            None => self.employee_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Claims;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "SERVER_ADDR" => Some("127.0.0.1:0".to_string()),
            "DATABASE_URL" => Some("mysql://localhost/test".to_string()),
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn token(role: u8, employee_id: Option<u64>, token_type: TokenType) -> String {
        let claims = Claims {
            user_id: 11,
            sub: "jdoe".to_string(),
            role,
            exp: 4_102_444_800, // 2100-01-01
            jti: "test".to_string(),
            token_type,
            employee_id,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    async fn extract(header: Option<String>) -> Result<AuthUser, ApiError> {
        let mut req = TestRequest::default().app_data(Data::new(config()));
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let req = req.to_http_request();
        AuthUser::from_request(&req, &mut Payload::None).await
    }

    fn user(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser { user_id: 1, username: "u".to_string(), role, employee_id }
    }

    #[actix_web::test]
    async fn valid_access_token() {
        let auth = extract(Some(format!("Bearer {}", token(3, Some(1000), TokenType::Access))))
            .await
            .unwrap();

        assert_eq!(auth.user_id, 11);
        assert_eq!(auth.username, "jdoe");
        assert_eq!(auth.role, Role::Employee);
        assert_eq!(auth.employee_id, Some(1000));
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing token");
    }

    #[actix_web::test]
    async fn refresh_token_is_rejected() {
        let err = extract(Some(format!("Bearer {}", token(3, None, TokenType::Refresh))))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Access token required");
    }

    #[actix_web::test]
    async fn bad_signature_and_role_are_rejected() {
        let err = extract(Some("Bearer not-a-jwt".to_string())).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid token");

        let err = extract(Some(format!("Bearer {}", token(9, None, TokenType::Access))))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid role");
    }

    #[test]
    fn role_guards() {
        assert!(user(Role::Admin, None).require_admin().is_ok());
        assert!(user(Role::Hr, None).require_admin().is_err());
        assert!(user(Role::Hr, None).require_hr_or_admin().is_ok());
        assert!(user(Role::Employee, Some(5)).require_hr_or_admin().is_err());
    }

    #[test]
    fn employees_only_see_themselves() {
        let employee = user(Role::Employee, Some(5));
        assert!(employee.ensure_can_view(5).is_ok());
        assert!(employee.ensure_can_view(6).is_err());
        assert_eq!(employee.scope_to(None).unwrap(), 5);
        assert!(employee.scope_to(Some(6)).is_err());

        let hr = user(Role::Hr, None);
        assert_eq!(hr.scope_to(Some(6)).unwrap(), 6);
        assert!(hr.scope_to(None).is_err());
    }
}
