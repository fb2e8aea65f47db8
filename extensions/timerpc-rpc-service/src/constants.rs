/// Host the reference server binds to when none is given.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Port the reference server binds to, and the client dials, by default.
pub const DEFAULT_SERVER_PORT: u16 = 1234;
