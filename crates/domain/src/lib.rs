//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod import_validation;
mod interchange;
mod lead;
mod principal;
mod security;

pub use import_validation::{
    ImportEntityKind, PHONE_MIN_LENGTH, ValidationResult, is_email_shaped, is_phone_long_enough,
    validate_import,
};
pub use interchange::{CellValue, Row, decode_rows, encode_rows};
pub use lead::{DEFAULT_LEAD_STATUS, LEAD_EXPORT_COLUMNS, Lead, LeadInput};
pub use principal::Principal;
pub use security::{
    OwnershipDecision, Permission, Role, check_ownership, has_any_permission, has_permission,
    permissions_for,
};
