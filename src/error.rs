use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures reported by a vendor fetch.
///
/// `NoData` is a vendor that answered but has nothing for the VIN; the
/// remaining variants are transport or protocol failures.
#[derive(Error, Debug)]
pub enum VendorError {
    #[error("no data for VIN {vin}")]
    NoData { vin: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unusable response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid VIN '{vin}': expected 17 characters")]
    InvalidVin { vin: String },

    #[error("device {device_id} not found: {reason}")]
    DeviceNotFound { device_id: String, reason: String },

    #[error("{vendor} fetch failed for VIN {vin}: {source}")]
    Vendor {
        vendor: &'static str,
        vin: String,
        source: VendorError,
    },

    #[error("reverse geocoding failed: {0}")]
    Geocode(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("queue error: {0}")]
    Queue(String),

    // Facade throttles; callers map these to 4xx-equivalent responses.
    #[error("offer already requested in the last {days} days")]
    AlreadyRequested { days: i64 },

    #[error("last offer request errored; still inside the throttle window")]
    LastRequestErrored,

    #[error("offers are not supported in {country}")]
    OffersUnsupported { country: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
