pub mod auth_token;
pub mod email;
pub mod identity_id;
pub mod password;
pub mod reset_code;
pub mod reset_ticket;
pub mod role;
