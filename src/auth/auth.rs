use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::config::Config;
use crate::error::AppError;
use crate::model::enums::Role;
use crate::models::Claims;

#[derive(Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub name: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(AppError::Unauthorized)),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(AppError::Internal(anyhow::anyhow!("config missing"))));
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(AppError::Unauthorized)),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(AppError::Unauthorized)),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            name: data.claims.sub,
            role,
        }))
    }
}

impl AuthUser {
    /// Manager tier or above.
    pub fn require_manager(&self) -> Result<(), AppError> {
        if matches!(self.role, Role::Manager | Role::Maintainer) {
            Ok(())
        } else {
            Err(AppError::forbidden("Manager only"))
        }
    }

    /// Highest privilege tier.
    pub fn require_maintainer(&self) -> Result<(), AppError> {
        if self.role == Role::Maintainer {
            Ok(())
        } else {
            Err(AppError::forbidden("Only Maintainers can do this"))
        }
    }

    /// The record's owner, or any manager-tier actor.
    pub fn require_self_or_manager(&self, owner_id: i64) -> Result<(), AppError> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            self.require_manager()
        }
    }
}
