use campus_core::{AuthClaims, AuthToken, IdentityId, Role, TokenError, TokenSigner};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct JwtConfig {
    pub jwt_secret: Secret<String>,
    pub token_ttl_in_seconds: i64,
}

impl JwtConfig {
    pub fn as_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

/// HS256 signer for identity tokens.
#[derive(Clone)]
pub struct JwtTokenSigner {
    config: JwtConfig,
}

impl JwtTokenSigner {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: IdentityId,
    pub role: Role,
    pub exp: usize,
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, claims: &AuthClaims) -> Result<AuthToken, TokenError> {
        let delta = chrono::Duration::try_seconds(self.config.token_ttl_in_seconds).ok_or(
            TokenError::UnexpectedError("Failed to create auth token duration".to_string()),
        )?;

        let exp = Utc::now()
            .checked_add_signed(delta)
            .ok_or(TokenError::UnexpectedError(
                "Duration out of range".to_string(),
            ))?
            .timestamp();

        let exp: usize = exp
            .try_into()
            .map_err(|_| TokenError::UnexpectedError("Failed to cast i64 to usize".to_string()))?;

        let claims = Claims {
            id: claims.id.clone(),
            role: claims.role,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.as_bytes()),
        )
        .map(AuthToken::new)
        .map_err(|e| TokenError::UnexpectedError(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.as_bytes()),
            &Validation::default(),
        )
        .map(|data| AuthClaims::new(data.claims.id, data.claims.role))
        .map_err(|_| TokenError::InvalidToken)
    }
}
