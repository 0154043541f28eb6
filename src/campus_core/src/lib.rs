pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    auth_token::{AuthClaims, AuthToken},
    email::{Email, EmailError},
    identity_id::{IdentityId, IdentityIdError},
    password::{MIN_RESET_PASSWORD_LENGTH, Password, PasswordError},
    reset_code::{ResetCode, ResetCodeError},
    reset_ticket::ResetTicket,
    role::{
        IDENTITY_ID_CONSTRAINT, IDENTITY_ID_TABLE, PASSWORD_FIELD, Role, RoleDescriptor,
        RoleError, describe,
    },
};

pub use ports::{
    records::{Record, RecordStore, RecordStoreError},
    repositories::{ResetTicketStore, ResetTicketStoreError},
    services::{
        Clock, EmailClient, EmailDeliveryError, HashingError, PasswordHasher, TokenError,
        TokenSigner,
    },
};
