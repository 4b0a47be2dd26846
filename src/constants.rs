pub mod pagination {

    pub const DEFAULT_PAGE: u64 = 1;

    pub const DEFAULT_PER_PAGE: u64 = 20;

    pub const MAX_PER_PAGE: u64 = 100;

    /// SQLite binds OFFSET as a signed 64-bit integer.
    pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();
}

pub mod auth {

    pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 30;

    pub const MIN_JWT_SECRET_LEN: usize = 32;

    pub const MIN_PASSWORD_LEN: usize = 8;

    pub const TOKEN_TYPE: &str = "bearer";
}

pub mod ingest {
    use std::time::Duration;

    pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 30;

    pub const DEFAULT_CONNECT_DELAY: Duration = Duration::from_secs(2);

    /// Rows per multi-row INSERT; keeps well under SQLite's bound-variable limit.
    pub const INSERT_CHUNK_SIZE: usize = 500;

    pub const UNKNOWN_SHOW_TYPE: &str = "Unknown";
}
