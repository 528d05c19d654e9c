use std::fmt::{Display, Formatter};
use std::str::FromStr;

use leadline_core::AppError;
use serde::{Deserialize, Serialize};

use crate::Principal;

/// Roles a principal can hold. Exactly one per principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Team lead with access to every record.
    Manager,
    /// Works their own leads.
    SalesRep,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::SalesRep => "sales_rep",
            Self::Viewer => "viewer",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Admin, Role::Manager, Role::SalesRep, Role::Viewer];

        ALL
    }

    /// Returns whether the role bypasses record ownership checks.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "sales_rep" => Ok(Self::SalesRep),
            "viewer" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Permissions enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows creating leads.
    LeadCreate,
    /// Allows reading leads owned by the principal.
    LeadReadOwn,
    /// Allows reading every lead.
    LeadReadAll,
    /// Allows updating leads owned by the principal.
    LeadUpdateOwn,
    /// Allows updating every lead.
    LeadUpdateAll,
    /// Allows deleting leads.
    LeadDelete,
    /// Allows bulk importing leads from delimited text.
    LeadImport,
    /// Allows bulk exporting leads to delimited text.
    LeadExport,
    /// Allows creating contacts.
    ContactCreate,
    /// Allows reading contacts.
    ContactRead,
    /// Allows updating contacts.
    ContactUpdate,
    /// Allows deleting contacts.
    ContactDelete,
    /// Allows creating opportunities.
    OpportunityCreate,
    /// Allows reading opportunities.
    OpportunityRead,
    /// Allows updating opportunities.
    OpportunityUpdate,
    /// Allows deleting opportunities.
    OpportunityDelete,
    /// Allows reading reports and dashboards.
    ReportRead,
    /// Allows managing user accounts and role assignment.
    UserManage,
    /// Allows reading audit log entries.
    AuditRead,
    /// Allows changing system settings.
    SettingsManage,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeadCreate => "lead.create",
            Self::LeadReadOwn => "lead.read.own",
            Self::LeadReadAll => "lead.read.all",
            Self::LeadUpdateOwn => "lead.update.own",
            Self::LeadUpdateAll => "lead.update.all",
            Self::LeadDelete => "lead.delete",
            Self::LeadImport => "lead.import",
            Self::LeadExport => "lead.export",
            Self::ContactCreate => "contact.create",
            Self::ContactRead => "contact.read",
            Self::ContactUpdate => "contact.update",
            Self::ContactDelete => "contact.delete",
            Self::OpportunityCreate => "opportunity.create",
            Self::OpportunityRead => "opportunity.read",
            Self::OpportunityUpdate => "opportunity.update",
            Self::OpportunityDelete => "opportunity.delete",
            Self::ReportRead => "report.read",
            Self::UserManage => "user.manage",
            Self::AuditRead => "audit.read",
            Self::SettingsManage => "settings.manage",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        ALL_PERMISSIONS
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

const ALL_PERMISSIONS: &[Permission] = &[
    Permission::LeadCreate,
    Permission::LeadReadOwn,
    Permission::LeadReadAll,
    Permission::LeadUpdateOwn,
    Permission::LeadUpdateAll,
    Permission::LeadDelete,
    Permission::LeadImport,
    Permission::LeadExport,
    Permission::ContactCreate,
    Permission::ContactRead,
    Permission::ContactUpdate,
    Permission::ContactDelete,
    Permission::OpportunityCreate,
    Permission::OpportunityRead,
    Permission::OpportunityUpdate,
    Permission::OpportunityDelete,
    Permission::ReportRead,
    Permission::UserManage,
    Permission::AuditRead,
    Permission::SettingsManage,
];

const MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::LeadCreate,
    Permission::LeadReadOwn,
    Permission::LeadReadAll,
    Permission::LeadUpdateOwn,
    Permission::LeadUpdateAll,
    Permission::LeadDelete,
    Permission::LeadImport,
    Permission::LeadExport,
    Permission::ContactCreate,
    Permission::ContactRead,
    Permission::ContactUpdate,
    Permission::ContactDelete,
    Permission::OpportunityCreate,
    Permission::OpportunityRead,
    Permission::OpportunityUpdate,
    Permission::OpportunityDelete,
    Permission::ReportRead,
    Permission::AuditRead,
];

const SALES_REP_PERMISSIONS: &[Permission] = &[
    Permission::LeadCreate,
    Permission::LeadReadOwn,
    Permission::LeadUpdateOwn,
    Permission::LeadImport,
    Permission::ContactCreate,
    Permission::ContactRead,
    Permission::ContactUpdate,
    Permission::OpportunityCreate,
    Permission::OpportunityRead,
    Permission::OpportunityUpdate,
    Permission::ReportRead,
];

const VIEWER_PERMISSIONS: &[Permission] = &[
    Permission::LeadReadAll,
    Permission::ContactRead,
    Permission::OpportunityRead,
    Permission::ReportRead,
];

/// Returns the static permission set granted to a role.
///
/// The table is compiled in and total over [`Role`]; nothing can change it at
/// runtime.
#[must_use]
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ALL_PERMISSIONS,
        Role::Manager => MANAGER_PERMISSIONS,
        Role::SalesRep => SALES_REP_PERMISSIONS,
        Role::Viewer => VIEWER_PERMISSIONS,
    }
}

/// Returns whether the role holds the permission.
#[must_use]
pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// Returns whether the role holds at least one of the permissions.
///
/// An empty request is never satisfied.
#[must_use]
pub fn has_any_permission(role: Role, permissions: &[Permission]) -> bool {
    permissions
        .iter()
        .any(|permission| has_permission(role, *permission))
}

/// Outcome of comparing a principal with a record owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipDecision {
    /// Principal is elevated or owns the record.
    Allowed,
    /// Principal neither owns the record nor holds an elevated role.
    Forbidden,
}

impl OwnershipDecision {
    /// Returns whether access was granted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Decides access to one record instance from its recorded owner.
///
/// Admin and Manager bypass ownership. Everyone else must match the owner id;
/// a record with no recorded owner is only reachable by elevated roles.
#[must_use]
pub fn check_ownership(principal: &Principal, owner_id: Option<&str>) -> OwnershipDecision {
    if principal.role().is_elevated() {
        return OwnershipDecision::Allowed;
    }

    match owner_id {
        Some(owner_id) if owner_id == principal.id() => OwnershipDecision::Allowed,
        _ => OwnershipDecision::Forbidden,
    }
}
