// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors produced by the persistence layer.
///
/// Conditions callers are expected to handle (duplicates, missing rows,
/// unavailable slots) get their own variants. Everything else Diesel
/// reports collapses into the broad infrastructure variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database reported an error not covered by a specific variant.
    DatabaseError(String),
    /// Opening the database connection failed.
    DatabaseConnectionFailed(String),
    /// Running migrations failed.
    MigrationFailed(String),
    /// A query could not be executed.
    QueryFailed(String),
    /// Backend setup failed before any query ran.
    InitializationError(String),
    /// The connection refuses to enforce foreign keys.
    ForeignKeyEnforcementNotEnabled,
    /// Another user already holds this email address.
    DuplicateUser { email: String },
    /// Another resource already holds this name.
    DuplicateResource { name: String },
    /// No user matched the lookup.
    UserNotFound(String),
    /// No resource matched the lookup.
    ResourceNotFound(String),
    /// No booking matched the lookup.
    BookingNotFound(String),
    /// The slot collides with an existing booking on the resource.
    SlotUnavailable { resource_id: i64 },
    /// A record of unspecified kind was missing.
    NotFound(String),
    /// Anything that fits nowhere else.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => write!(f, "Database connection failed: {msg}"),
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::DuplicateUser { email } => {
                write!(f, "User with email '{email}' already exists")
            }
            Self::DuplicateResource { name } => {
                write!(f, "Resource with name '{name}' already exists")
            }
            Self::UserNotFound(msg) => write!(f, "User not found: {msg}"),
            Self::ResourceNotFound(msg) => write!(f, "Resource not found: {msg}"),
            Self::BookingNotFound(msg) => write!(f, "Booking not found: {msg}"),
            Self::SlotUnavailable { resource_id } => {
                write!(f, "Resource {resource_id} is not available for the requested slot")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Diesel's `NotFound` is the one result worth a variant of its own.
/// Everything else is reported as a database error.
impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound(String::from("Record not found")),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

/// Connection failures keep Diesel's own description.
impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
