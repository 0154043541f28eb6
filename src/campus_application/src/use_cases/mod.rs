pub mod login;
pub mod register;
pub mod request_reset;
pub mod reset_error;
pub mod reset_password;
pub mod sweep_reset_tickets;
pub mod verify_reset_code;
