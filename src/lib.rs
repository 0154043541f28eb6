//! # Campus - Role-Based Identity Library
//!
//! Facade crate that re-exports the public APIs of the identity components:
//! registration, login and password recovery for students, professors,
//! student affairs officers and administrators.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! campus = { path = "../campus" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Role`, `IdentityId`, `Email`, `ResetTicket`, etc.
//! - **Ports**: `RecordStore`, `ResetTicketStore`, `PasswordHasher`, `TokenSigner`, `EmailClient`
//! - **Use cases**: `RegisterUseCase`, `LoginUseCase`, `RequestResetUseCase`, etc.
//! - **Adapters**: `PostgresRecordStore`, `RedisResetTicketStore`, `PostmarkEmailClient`, etc.
//! - **Service**: `IdentityService` - the main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use campus_core::*;
}

// Re-export most commonly used core types at the root level
pub use campus_core::{
    AuthClaims, AuthToken, Email, IdentityId, Password, ResetCode, ResetTicket, Role,
    RoleDescriptor, describe,
};

// ============================================================================
// Ports
// ============================================================================

/// Storage and service port definitions
pub mod ports {
    pub use campus_core::{
        Clock, EmailClient, EmailDeliveryError, HashingError, PasswordHasher, Record, RecordStore,
        RecordStoreError, ResetTicketStore, ResetTicketStoreError, TokenError, TokenSigner,
    };
}

pub use ports::{EmailClient, RecordStore, ResetTicketStore};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use campus_application::*;
}

// Re-export use cases at root level
pub use campus_application::{
    LoginUseCase, RegisterUseCase, RequestResetUseCase, ResetPasswordUseCase, ResetPolicy,
    SweepResetTicketsUseCase, VerifyResetCodeUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use campus_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use campus_adapters::email::*;
    }

    /// Password hashing and token signing
    pub mod crypto {
        pub use campus_adapters::crypto::*;
    }

    /// Configuration
    pub mod config {
        pub use campus_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use campus_adapters::{
    crypto::{Argon2PasswordHasher, JwtTokenSigner},
    email::{MockEmailClient, PostmarkEmailClient},
    persistence::{
        HashMapRecordStore, HashMapResetTicketStore, PostgresRecordStore, RedisResetTicketStore,
    },
    time::SystemClock,
};

// ============================================================================
// Identity Service (Main Entry Point)
// ============================================================================

/// Main identity service
pub use campus_identity_service::{
    IdentityService, configure_postgresql, configure_redis, get_redis_client, init_tracing,
    spawn_reset_sweeper,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
