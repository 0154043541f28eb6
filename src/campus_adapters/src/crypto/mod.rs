mod argon2_password_hasher;
mod jwt_token_signer;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_signer::{Claims, JwtConfig, JwtTokenSigner};
