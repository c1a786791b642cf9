// Standardized error codes returned in the `error_code` field of API error bodies

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod authentication {
    pub const MISSING_CREDENTIALS: &str = "AUTH_2001";
    pub const TOKEN_INVALID: &str = "AUTH_2002";
}

pub mod authorization {
    pub const MISSING_ROLE: &str = "AUTHZ_3002";
}

pub mod database {
    pub const CONNECTION_FAILED: &str = "DB_4001";
    pub const QUERY_FAILED: &str = "DB_4002";
    pub const CONSTRAINT_VIOLATION: &str = "DB_4003";
}

pub mod not_found {
    pub const PATIENT_NOT_FOUND: &str = "NOT_FOUND_5001";
    pub const APPOINTMENT_NOT_FOUND: &str = "NOT_FOUND_5002";
}

pub mod conflict {
    pub const PATIENT_CREATION_RACE: &str = "CONFLICT_6001";
}
