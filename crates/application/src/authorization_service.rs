use leadline_core::{AppError, AppResult};
use leadline_domain::{
    OwnershipDecision, Permission, Principal, Role, check_ownership, has_any_permission,
    has_permission,
};
use tracing::warn;

/// Inputs of one authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorizationRequest {
    /// Alternative permissions; holding any one of them is enough.
    pub required: Vec<Permission>,
    /// Recorded owner of the target record, when the decision is per-record.
    pub owner_id: Option<String>,
}

impl AuthorizationRequest {
    /// Requires at least one of the given permissions.
    #[must_use]
    pub fn any_of(permissions: &[Permission]) -> Self {
        Self {
            required: permissions.to_vec(),
            owner_id: None,
        }
    }

    /// Adds an ownership check against the given owner id.
    #[must_use]
    pub fn owned_by(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

/// Why an authenticated principal was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// The role holds none of the required permissions.
    MissingPermission,
    /// The principal neither owns the record nor holds an elevated role.
    NotOwner,
}

impl ForbiddenReason {
    /// Returns a stable label for logs and messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingPermission => "missing_permission",
            Self::NotOwner => "not_owner",
        }
    }
}

/// Result of an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Operation may proceed.
    Allow,
    /// No authenticated principal was supplied.
    DenyUnauthenticated {
        /// Permissions the operation required.
        required: Vec<Permission>,
    },
    /// Principal is authenticated but not allowed.
    DenyForbidden {
        /// Permissions the operation required.
        required: Vec<Permission>,
        /// Role the principal actually holds.
        role: Role,
        /// Which check failed.
        reason: ForbiddenReason,
    },
}

impl AccessDecision {
    /// Returns whether the operation may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into the shared error taxonomy.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::DenyUnauthenticated { required } => Err(AppError::Unauthorized(format!(
                "authentication required for [{}]",
                join_permissions(&required)
            ))),
            Self::DenyForbidden {
                required,
                role,
                reason,
            } => Err(AppError::Forbidden(match reason {
                ForbiddenReason::MissingPermission => format!(
                    "role '{role}' holds none of the required permissions [{}]",
                    join_permissions(&required)
                ),
                ForbiddenReason::NotOwner => format!(
                    "role '{role}' may only access its own records for [{}]",
                    join_permissions(&required)
                ),
            })),
        }
    }
}

fn join_permissions(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(Permission::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Record visibility resolved for one principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    /// Every record.
    All,
    /// Only records the principal owns.
    Own,
}

/// Application service for role-based authorization checks.
///
/// Stateless: every answer comes from the compiled permission matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService;

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns whether the role holds the permission.
    #[must_use]
    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        has_permission(role, permission)
    }

    /// Decides whether an optional principal may perform an operation.
    ///
    /// An empty `required` list skips the permission check, leaving only the
    /// authentication and ownership checks.
    #[must_use]
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        request: &AuthorizationRequest,
    ) -> AccessDecision {
        let Some(principal) = principal else {
            return AccessDecision::DenyUnauthenticated {
                required: request.required.clone(),
            };
        };

        if !request.required.is_empty() && !has_any_permission(principal.role(), &request.required)
        {
            return self.forbid(principal, request, ForbiddenReason::MissingPermission);
        }

        if let Some(owner_id) = request.owner_id.as_deref() {
            if check_ownership(principal, Some(owner_id)) == OwnershipDecision::Forbidden {
                return self.forbid(principal, request, ForbiddenReason::NotOwner);
            }
        }

        AccessDecision::Allow
    }

    /// Ensures the principal holds at least one of the permissions.
    pub fn require_any(&self, principal: &Principal, permissions: &[Permission]) -> AppResult<()> {
        self.authorize(Some(principal), &AuthorizationRequest::any_of(permissions))
            .into_result()
    }

    /// Resolves whether the principal sees all records or only its own.
    pub fn record_scope(
        &self,
        principal: &Principal,
        all_scope: Permission,
        own_scope: Permission,
    ) -> AppResult<RecordScope> {
        if has_permission(principal.role(), all_scope) {
            return Ok(RecordScope::All);
        }

        self.require_any(principal, &[own_scope, all_scope])?;
        Ok(RecordScope::Own)
    }

    /// Ensures the principal may touch one record.
    ///
    /// Holding `all_scope` grants access outright; otherwise `own_scope` is
    /// required together with the ownership guard.
    pub fn require_record_access(
        &self,
        principal: &Principal,
        all_scope: Permission,
        own_scope: Permission,
        owner_id: &str,
    ) -> AppResult<()> {
        match self.record_scope(principal, all_scope, own_scope)? {
            RecordScope::All => Ok(()),
            RecordScope::Own => self
                .authorize(
                    Some(principal),
                    &AuthorizationRequest::any_of(&[own_scope]).owned_by(owner_id),
                )
                .into_result(),
        }
    }

    fn forbid(
        &self,
        principal: &Principal,
        request: &AuthorizationRequest,
        reason: ForbiddenReason,
    ) -> AccessDecision {
        warn!(
            principal_id = principal.id(),
            role = principal.role().as_str(),
            required = %join_permissions(&request.required),
            reason = reason.as_str(),
            "access denied"
        );

        AccessDecision::DenyForbidden {
            required: request.required.clone(),
            role: principal.role(),
            reason,
        }
    }
}
