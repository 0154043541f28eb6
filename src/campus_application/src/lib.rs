pub mod lookup;
pub mod policy;
pub mod uniqueness;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use lookup::{LookupError, locate_identity_by_email};
pub use policy::ResetPolicy;
pub use uniqueness::{IdentityUniquenessChecker, UniquenessError};
pub use use_cases::{
    login::{LoginError, LoginUseCase},
    register::{Attributes, RegisterError, RegisterUseCase},
    request_reset::RequestResetUseCase,
    reset_error::ResetError,
    reset_password::ResetPasswordUseCase,
    sweep_reset_tickets::SweepResetTicketsUseCase,
    verify_reset_code::VerifyResetCodeUseCase,
};
