use async_trait::async_trait;
use leadline_core::AppResult;
use leadline_domain::Lead;
use uuid::Uuid;

/// Filter applied when listing leads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadListQuery {
    /// Restricts results to one owner when set.
    pub owner_id: Option<String>,
}

/// Repository port for lead persistence.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Stores one new lead.
    async fn insert_lead(&self, lead: Lead) -> AppResult<()>;

    /// Stores a batch of new leads. Either all are stored or none.
    async fn insert_leads(&self, leads: Vec<Lead>) -> AppResult<()>;

    /// Finds one lead by id.
    async fn find_lead(&self, lead_id: Uuid) -> AppResult<Option<Lead>>;

    /// Lists leads ordered by creation time.
    async fn list_leads(&self, query: LeadListQuery) -> AppResult<Vec<Lead>>;

    /// Replaces a stored lead.
    async fn update_lead(&self, lead: Lead) -> AppResult<()>;

    /// Deletes one lead.
    async fn delete_lead(&self, lead_id: Uuid) -> AppResult<()>;
}
