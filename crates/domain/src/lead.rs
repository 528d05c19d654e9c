use chrono::{DateTime, Utc};
use leadline_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CellValue, Row, is_email_shaped, is_phone_long_enough};

/// Column order used when leads are exported.
pub const LEAD_EXPORT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "email",
    "phone",
    "company",
    "status",
    "owner_id",
    "created_at",
];

/// Status assigned when none is supplied.
pub const DEFAULT_LEAD_STATUS: &str = "new";

/// Editable lead fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadInput {
    /// Lead display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional company name.
    pub company: Option<String>,
    /// Optional pipeline status.
    pub status: Option<String>,
}

impl LeadInput {
    /// Maps a decoded import row onto lead fields. Unknown columns are ignored.
    #[must_use]
    pub fn from_row(row: &Row<String>) -> Self {
        Self {
            name: row.get("name").cloned().unwrap_or_default(),
            email: row.get("email").cloned(),
            phone: row.get("phone").cloned(),
            company: row.get("company").cloned(),
            status: row.get("status").cloned(),
        }
    }
}

/// Sales lead owned by one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    id: Uuid,
    name: NonEmptyString,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    status: String,
    owner_id: NonEmptyString,
    created_at: DateTime<Utc>,
}

impl Lead {
    /// Creates a new lead owned by `owner_id`.
    pub fn new(input: LeadInput, owner_id: impl Into<String>) -> AppResult<Self> {
        let fields = ValidatedFields::try_from(input)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            company: fields.company,
            status: fields.status,
            owner_id: NonEmptyString::new(owner_id)?,
            created_at: Utc::now(),
        })
    }

    /// Replaces editable fields, keeping identity, owner and creation time.
    pub fn apply(&mut self, input: LeadInput) -> AppResult<()> {
        let fields = ValidatedFields::try_from(input)?;

        self.name = fields.name;
        self.email = fields.email;
        self.phone = fields.phone;
        self.company = fields.company;
        self.status = fields.status;
        Ok(())
    }

    /// Returns the lead identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the lead name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the phone number, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the company, if any.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the pipeline status.
    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_str()
    }

    /// Returns the owning principal id.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        self.owner_id.as_str()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Projects the lead into an export row.
    #[must_use]
    pub fn to_row(&self) -> Row<CellValue> {
        Row::new()
            .with("id", self.id.to_string())
            .with("name", self.name.as_str())
            .with("email", self.email.clone())
            .with("phone", self.phone.clone())
            .with("company", self.company.clone())
            .with("status", self.status.as_str())
            .with("owner_id", self.owner_id.as_str())
            .with("created_at", self.created_at)
    }
}

struct ValidatedFields {
    name: NonEmptyString,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    status: String,
}

impl TryFrom<LeadInput> for ValidatedFields {
    type Error = AppError;

    fn try_from(input: LeadInput) -> Result<Self, Self::Error> {
        let name = NonEmptyString::new(input.name.trim())
            .map_err(|_| AppError::Validation("lead name must not be empty".to_owned()))?;

        let email = normalize_optional(input.email);
        if let Some(email) = email.as_deref() {
            if !is_email_shaped(email) {
                return Err(AppError::Validation(format!(
                    "lead email '{email}' has invalid format"
                )));
            }
        }

        let phone = normalize_optional(input.phone);
        if let Some(phone) = phone.as_deref() {
            if !is_phone_long_enough(phone) {
                return Err(AppError::Validation(format!(
                    "lead phone '{phone}' is too short"
                )));
            }
        }

        Ok(Self {
            name,
            email,
            phone,
            company: normalize_optional(input.company),
            status: normalize_optional(input.status)
                .unwrap_or_else(|| DEFAULT_LEAD_STATUS.to_owned()),
        })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
