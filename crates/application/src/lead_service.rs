use std::sync::Arc;

use leadline_core::{AppError, AppResult};
use leadline_domain::{
    ImportEntityKind, LEAD_EXPORT_COLUMNS, Lead, LeadInput, Permission, Principal, decode_rows,
    encode_rows, validate_import,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{AuthorizationRequest, AuthorizationService, LeadListQuery, LeadRepository, RecordScope};

/// Outcome of one lead import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Whether every row passed validation.
    pub valid: bool,
    /// Row-numbered validation messages.
    pub errors: Vec<String>,
    /// Number of leads stored.
    pub imported: usize,
}

/// Application service for lead records, CSV export and import.
#[derive(Clone)]
pub struct LeadService {
    repository: Arc<dyn LeadRepository>,
    authorization_service: AuthorizationService,
}

impl LeadService {
    /// Creates a new lead service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn LeadRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            repository,
            authorization_service,
        }
    }

    /// Lists leads visible to the actor.
    pub async fn list_leads(&self, actor: &Principal) -> AppResult<Vec<Lead>> {
        let scope = self.authorization_service.record_scope(
            actor,
            Permission::LeadReadAll,
            Permission::LeadReadOwn,
        )?;

        let query = match scope {
            RecordScope::All => LeadListQuery::default(),
            RecordScope::Own => LeadListQuery {
                owner_id: Some(actor.id().to_owned()),
            },
        };

        self.repository.list_leads(query).await
    }

    /// Creates a lead owned by the actor.
    pub async fn create_lead(&self, actor: &Principal, input: LeadInput) -> AppResult<Lead> {
        self.authorization_service
            .require_any(actor, &[Permission::LeadCreate])?;

        let lead = Lead::new(input, actor.id())?;
        self.repository.insert_lead(lead.clone()).await?;

        info!(lead_id = %lead.id(), owner_id = lead.owner_id(), "lead created");
        Ok(lead)
    }

    /// Returns one lead the actor may read.
    pub async fn get_lead(&self, actor: &Principal, lead_id: Uuid) -> AppResult<Lead> {
        self.authorization_service.require_any(
            actor,
            &[Permission::LeadReadAll, Permission::LeadReadOwn],
        )?;

        let lead = self.require_lead(lead_id).await?;
        self.authorization_service.require_record_access(
            actor,
            Permission::LeadReadAll,
            Permission::LeadReadOwn,
            lead.owner_id(),
        )?;

        Ok(lead)
    }

    /// Replaces the editable fields of one lead.
    pub async fn update_lead(
        &self,
        actor: &Principal,
        lead_id: Uuid,
        input: LeadInput,
    ) -> AppResult<Lead> {
        self.authorization_service.require_any(
            actor,
            &[Permission::LeadUpdateAll, Permission::LeadUpdateOwn],
        )?;

        let mut lead = self.require_lead(lead_id).await?;
        self.authorization_service.require_record_access(
            actor,
            Permission::LeadUpdateAll,
            Permission::LeadUpdateOwn,
            lead.owner_id(),
        )?;

        lead.apply(input)?;
        self.repository.update_lead(lead.clone()).await?;
        Ok(lead)
    }

    /// Deletes one lead.
    pub async fn delete_lead(&self, actor: &Principal, lead_id: Uuid) -> AppResult<()> {
        self.authorization_service
            .require_any(actor, &[Permission::LeadDelete])?;

        let lead = self.require_lead(lead_id).await?;
        self.authorization_service
            .authorize(
                Some(actor),
                &AuthorizationRequest::any_of(&[Permission::LeadDelete]).owned_by(lead.owner_id()),
            )
            .into_result()?;

        self.repository.delete_lead(lead_id).await?;
        info!(lead_id = %lead_id, actor = actor.id(), "lead deleted");
        Ok(())
    }

    /// Exports every lead as delimited text with a fixed column order.
    pub async fn export_leads(&self, actor: &Principal) -> AppResult<String> {
        self.authorization_service
            .require_any(actor, &[Permission::LeadExport])?;

        let leads = self.repository.list_leads(LeadListQuery::default()).await?;
        let rows: Vec<_> = leads.iter().map(Lead::to_row).collect();

        debug!(rows = rows.len(), "exporting leads");
        Ok(encode_rows(&rows, Some(LEAD_EXPORT_COLUMNS)))
    }

    /// Decodes, validates and stores leads owned by the actor.
    ///
    /// Any validation error rejects the whole batch and nothing is stored.
    pub async fn import_leads(&self, actor: &Principal, text: &str) -> AppResult<ImportReport> {
        self.authorization_service
            .require_any(actor, &[Permission::LeadImport])?;

        let rows = decode_rows(text);
        debug!(rows = rows.len(), "decoded import rows");

        let kind = ImportEntityKind::Lead;
        let validation = validate_import(kind, &rows);
        if !validation.valid {
            info!(
                entity = kind.as_str(),
                errors = validation.errors.len(),
                actor = actor.id(),
                "lead import rejected"
            );
            return Ok(ImportReport {
                valid: false,
                errors: validation.errors,
                imported: 0,
            });
        }

        let leads = rows
            .iter()
            .map(|row| Lead::new(LeadInput::from_row(row), actor.id()))
            .collect::<AppResult<Vec<_>>>()?;
        let imported = leads.len();

        if imported > 0 {
            self.repository.insert_leads(leads).await?;
        }

        info!(
            entity = kind.as_str(),
            imported,
            actor = actor.id(),
            "lead import stored"
        );
        Ok(ImportReport {
            valid: true,
            errors: Vec::new(),
            imported,
        })
    }

    async fn require_lead(&self, lead_id: Uuid) -> AppResult<Lead> {
        self.repository
            .find_lead(lead_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("lead '{lead_id}' does not exist")))
    }
}
