use std::collections::HashMap;

use async_trait::async_trait;
use leadline_application::{LeadListQuery, LeadRepository};
use leadline_core::{AppError, AppResult};
use leadline_domain::Lead;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory lead repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<HashMap<Uuid, Lead>>,
}

impl InMemoryLeadRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn insert_lead(&self, lead: Lead) -> AppResult<()> {
        let mut leads = self.leads.write().await;

        if leads.contains_key(&lead.id()) {
            return Err(AppError::Conflict(format!(
                "lead '{}' already exists",
                lead.id()
            )));
        }

        leads.insert(lead.id(), lead);
        Ok(())
    }

    async fn insert_leads(&self, batch: Vec<Lead>) -> AppResult<()> {
        let mut leads = self.leads.write().await;

        if let Some(duplicate) = batch.iter().find(|lead| leads.contains_key(&lead.id())) {
            return Err(AppError::Conflict(format!(
                "lead '{}' already exists",
                duplicate.id()
            )));
        }

        leads.extend(batch.into_iter().map(|lead| (lead.id(), lead)));
        Ok(())
    }

    async fn find_lead(&self, lead_id: Uuid) -> AppResult<Option<Lead>> {
        Ok(self.leads.read().await.get(&lead_id).cloned())
    }

    async fn list_leads(&self, query: LeadListQuery) -> AppResult<Vec<Lead>> {
        let leads = self.leads.read().await;

        let mut values: Vec<Lead> = leads
            .values()
            .filter(|lead| {
                query
                    .owner_id
                    .as_deref()
                    .is_none_or(|owner_id| lead.owner_id() == owner_id)
            })
            .cloned()
            .collect();
        values.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(values)
    }

    async fn update_lead(&self, lead: Lead) -> AppResult<()> {
        let mut leads = self.leads.write().await;

        let Some(stored) = leads.get_mut(&lead.id()) else {
            return Err(AppError::NotFound(format!(
                "lead '{}' does not exist",
                lead.id()
            )));
        };

        *stored = lead;
        Ok(())
    }

    async fn delete_lead(&self, lead_id: Uuid) -> AppResult<()> {
        if self.leads.write().await.remove(&lead_id).is_none() {
            return Err(AppError::NotFound(format!(
                "lead '{lead_id}' does not exist"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use leadline_application::{LeadListQuery, LeadRepository};
    use leadline_core::AppError;
    use leadline_domain::{Lead, LeadInput};

    use super::InMemoryLeadRepository;

    fn lead(name: &str, owner_id: &str) -> Lead {
        Lead::new(
            LeadInput {
                name: name.to_owned(),
                ..LeadInput::default()
            },
            owner_id,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn list_filters_by_owner() {
        let repository = InMemoryLeadRepository::new();
        assert!(
            repository
                .insert_leads(vec![lead("Ann", "rep-a"), lead("Bo", "rep-b")])
                .await
                .is_ok()
        );

        let all = repository.list_leads(LeadListQuery::default()).await;
        assert_eq!(all.map(|leads| leads.len()).ok(), Some(2));

        let own = repository
            .list_leads(LeadListQuery {
                owner_id: Some("rep-b".to_owned()),
            })
            .await
            .unwrap_or_default();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].name(), "Bo");
    }

    #[tokio::test]
    async fn duplicate_batch_is_rejected_whole() {
        let repository = InMemoryLeadRepository::new();
        let existing = lead("Ann", "rep-a");
        assert!(repository.insert_lead(existing.clone()).await.is_ok());

        let result = repository
            .insert_leads(vec![lead("Bo", "rep-a"), existing])
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        let stored = repository
            .list_leads(LeadListQuery::default())
            .await
            .unwrap_or_default();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_lead() {
        let repository = InMemoryLeadRepository::new();
        let missing = lead("Ann", "rep-a");

        assert!(matches!(
            repository.update_lead(missing.clone()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repository.delete_lead(missing.id()).await,
            Err(AppError::NotFound(_))
        ));

        assert!(repository.insert_lead(missing.clone()).await.is_ok());
        assert!(repository.delete_lead(missing.id()).await.is_ok());
        assert_eq!(repository.find_lead(missing.id()).await.ok(), Some(None));
    }
}
