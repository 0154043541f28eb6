pub mod env {
    pub const ENV_PREFIX: &str = "CAMPUS";
    pub const ENV_SEPARATOR: &str = "__";
}

pub mod files {
    pub const BASE: &str = "config/base";
    pub const LOCAL: &str = "config/local";
}

pub mod defaults {
    pub const REDIS_HOST_NAME: &str = "127.0.0.1";
    pub const TOKEN_TTL_IN_SECONDS: i64 = 600;
    pub const CODE_TTL_IN_MINUTES: i64 = 15;
    pub const SWEEP_INTERVAL_IN_SECONDS: u64 = 300;
    pub const MIN_PASSWORD_LENGTH: usize = campus_core::MIN_RESET_PASSWORD_LENGTH;

    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
        pub const SENDER: &str = "no-reply@campus.edu";
        pub const TIMEOUT_IN_MILLIS: u64 = 10_000;
    }
}
