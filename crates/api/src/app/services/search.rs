use std::collections::HashMap;

use dealerhub_audit::{AuditAction, NewAuditEntry};
use dealerhub_core::DealerId;
use dealerhub_search::{SearchIndexEntry, SearchQuery, search};

use crate::app::errors::ApiError;
use crate::context::{ClientIp, PrincipalContext};

use super::AppServices;

impl AppServices {
    /// Search every tenant's employees, then customers, in creation order.
    ///
    /// A query too short to run returns nothing and is not audited; any
    /// query that runs is audited once, whether or not it matched.
    pub async fn search(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        raw: &str,
    ) -> Result<Vec<SearchIndexEntry>, ApiError> {
        let Some(query) = SearchQuery::parse(raw) else {
            return Ok(Vec::new());
        };

        let dealer_names: HashMap<DealerId, String> = self
            .store
            .list_dealers()
            .await?
            .into_iter()
            .map(|d| (d.id, d.company_name))
            .collect();
        let owner_name = |id: DealerId| dealer_names.get(&id).map(String::as_str).unwrap_or_default();

        let employees = self.store.list_employees(None).await?;
        let customers = self.store.list_customers(None).await?;
        let entries = employees
            .iter()
            .map(|e| SearchIndexEntry::from_employee(e, owner_name(e.dealer_id)))
            .chain(
                customers
                    .iter()
                    .map(|c| SearchIndexEntry::from_customer(c, owner_name(c.dealer_id))),
            );
        let results = search(&query, entries);

        let mut entry = NewAuditEntry::new(
            principal.actor(ip),
            AuditAction::Search,
            format!("Searched for: \"{}\"", query.raw()),
        );
        if let Some(dealer_id) = principal.identity().dealer_id() {
            entry = entry.scoped_to(dealer_id);
        }
        self.audit.record(entry).await;

        Ok(results)
    }
}
