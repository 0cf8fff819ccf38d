use crate::errors::{AppError, ResultExt, MSG_DATASTORE_UPDATE};
use crate::models::{Lead, LeadStatus, IA_OFF};
use crate::phone::generate_candidates;
use crate::store::LeadStore;
use std::sync::Arc;

pub const MSG_PHONE_REQUIRED: &str = "Telefone é obrigatório";
pub const MSG_PHONE_NOT_FOUND: &str = "Telefone não encontrado";
pub const MSG_ALREADY_OFF: &str = "IA já estava desativada";
pub const MSG_DISABLED: &str = "IA desativada com sucesso!";

/// Result of a successful `disable_ai` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DisableOutcome {
    /// Whether an update was written.
    pub changed: bool,
    pub message: &'static str,
    /// `ia_on_off` as read before the update.
    pub previous_status: Option<String>,
    /// The lead as read, with `ia_on_off` set to `OFF`.
    pub lead: Lead,
}

/// Phone-based lead lookup and the AI toggle built on it.
///
/// Holds no mutable state; every call is one read plus at most one write.
#[derive(Clone)]
pub struct LeadLookupService {
    store: Arc<dyn LeadStore>,
}

impl LeadLookupService {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    /// Finds the lead stored under any canonical form of `raw`.
    ///
    /// Returns `Ok(None)` without touching the datastore when `raw` yields no
    /// candidates. With several matching rows the first one returned wins.
    pub async fn find_by_phone(&self, raw: &str) -> Result<Option<Lead>, AppError> {
        let candidates = generate_candidates(raw);
        if candidates.is_empty() {
            tracing::info!("No phone candidates for input '{}', skipping lookup", raw);
            return Ok(None);
        }

        tracing::debug!("Phone candidates for '{}': {:?}", raw, candidates);
        let leads = self.store.find_by_phones(&candidates).await?;

        if leads.len() > 1 {
            tracing::debug!(
                "{} leads matched {:?}, using the first",
                leads.len(),
                candidates
            );
        }

        Ok(leads.into_iter().next())
    }

    /// Switches the AI assistant off for the lead matching `raw`.
    ///
    /// Idempotent: a lead already `OFF` is returned as-is with no write.
    pub async fn disable_ai(&self, raw: Option<&str>) -> Result<DisableOutcome, AppError> {
        let lead = self.lookup_required(raw).await?;
        let previous_status = lead.ia_on_off.clone();

        if lead.is_ia_off() {
            tracing::info!("AI already disabled for lead {}", lead.id);
            return Ok(DisableOutcome {
                changed: false,
                message: MSG_ALREADY_OFF,
                previous_status,
                lead,
            });
        }

        self.store
            .update_ia_status(&lead.id, IA_OFF)
            .await
            .context(MSG_DATASTORE_UPDATE)?;

        tracing::info!(
            "AI disabled for lead {} (was {:?})",
            lead.id,
            previous_status
        );

        Ok(DisableOutcome {
            changed: true,
            message: MSG_DISABLED,
            previous_status,
            lead: lead.with_ia_status(IA_OFF),
        })
    }

    /// Current `nome`/`telefone`/`ia_on_off` of the lead matching `raw`.
    pub async fn get_status(&self, raw: Option<&str>) -> Result<LeadStatus, AppError> {
        let lead = self.lookup_required(raw).await?;
        Ok(lead.status())
    }

    /// Shared validation and lookup path of the two operations.
    async fn lookup_required(&self, raw: Option<&str>) -> Result<Lead, AppError> {
        let raw = raw
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation(MSG_PHONE_REQUIRED.to_string()))?;

        self.find_by_phone(raw)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_PHONE_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MSG_DATASTORE_READ;
    use crate::models::LeadId;
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        leads: Mutex<Vec<Lead>>,
        queries: Mutex<Vec<Vec<String>>>,
        updates: Mutex<Vec<(LeadId, String)>>,
        fail_reads: bool,
        fail_updates: bool,
    }

    impl FakeStore {
        fn with(leads: Vec<Lead>) -> Self {
            Self {
                leads: Mutex::new(leads),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl LeadStore for FakeStore {
        async fn find_by_phones(&self, candidates: &[String]) -> Result<Vec<Lead>, AppError> {
            self.queries.lock().unwrap().push(candidates.to_vec());
            if self.fail_reads {
                return Err(AppError::datastore("connection refused"));
            }
            Ok(self
                .leads
                .lock()
                .unwrap()
                .iter()
                .filter(|l| candidates.contains(&l.telefone))
                .cloned()
                .collect())
        }

        async fn update_ia_status(&self, id: &LeadId, status: &str) -> Result<(), AppError> {
            if self.fail_updates {
                return Err(AppError::datastore("permission denied"));
            }
            self.updates
                .lock()
                .unwrap()
                .push((id.clone(), status.to_string()));
            for lead in self.leads.lock().unwrap().iter_mut() {
                if &lead.id == id {
                    lead.ia_on_off = Some(status.to_string());
                }
            }
            Ok(())
        }
    }

    fn lead(id: i64, telefone: &str, status: &str) -> Lead {
        Lead {
            id: LeadId::Int(id),
            nome: Some("Maria".to_string()),
            telefone: telefone.to_string(),
            ia_on_off: Some(status.to_string()),
            extra: Map::new(),
        }
    }

    fn service(store: &Arc<FakeStore>) -> LeadLookupService {
        LeadLookupService::new(store.clone())
    }

    #[tokio::test]
    async fn test_empty_input_skips_datastore() {
        let store = Arc::new(FakeStore::with(vec![lead(1, "", "ON")]));
        let result = service(&store).find_by_phone("").await.unwrap();

        assert!(result.is_none());
        assert!(store.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_matches_stored_form_without_nine() {
        let store = Arc::new(FakeStore::with(vec![lead(7, "551188887777", "ON")]));
        let found = service(&store)
            .find_by_phone("(11) 98888-7777")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, LeadId::Int(7));
        assert_eq!(
            store.queries.lock().unwrap()[0],
            vec!["5511988887777".to_string(), "551188887777".to_string()]
        );
    }

    #[tokio::test]
    async fn test_first_row_wins() {
        let store = Arc::new(FakeStore::with(vec![
            lead(2, "5511988887777", "ON"),
            lead(3, "551188887777", "OFF"),
        ]));
        let found = service(&store)
            .find_by_phone("11988887777")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, LeadId::Int(2));
    }

    #[tokio::test]
    async fn test_disable_ai_writes_once_then_is_idempotent() {
        let store = Arc::new(FakeStore::with(vec![lead(7, "551188887777", "ON")]));
        let svc = service(&store);

        let first = svc.disable_ai(Some("11 8888-7777")).await.unwrap();
        assert!(first.changed);
        assert_eq!(first.message, MSG_DISABLED);
        assert_eq!(first.previous_status.as_deref(), Some("ON"));
        assert_eq!(first.lead.ia_on_off.as_deref(), Some("OFF"));
        assert_eq!(
            *store.updates.lock().unwrap(),
            vec![(LeadId::Int(7), "OFF".to_string())]
        );

        let second = svc.disable_ai(Some("11 8888-7777")).await.unwrap();
        assert!(!second.changed);
        assert_eq!(second.message, MSG_ALREADY_OFF);
        assert_eq!(second.lead.ia_on_off.as_deref(), Some("OFF"));
        assert_eq!(store.updates.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disable_ai_unknown_status_is_switched_off() {
        let store = Arc::new(FakeStore::with(vec![lead(9, "5511988887777", "PAUSADO")]));
        let outcome = service(&store)
            .disable_ai(Some("11988887777"))
            .await
            .unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.previous_status.as_deref(), Some("PAUSADO"));
    }

    #[tokio::test]
    async fn test_disable_ai_validation_and_not_found() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);

        assert_eq!(
            svc.disable_ai(None).await.unwrap_err(),
            AppError::Validation(MSG_PHONE_REQUIRED.to_string())
        );
        assert_eq!(
            svc.disable_ai(Some("11988887777")).await.unwrap_err(),
            AppError::NotFound(MSG_PHONE_NOT_FOUND.to_string())
        );
        // Unusable input is a miss, not a full-table match
        assert_eq!(
            svc.disable_ai(Some("abc")).await.unwrap_err(),
            AppError::NotFound(MSG_PHONE_NOT_FOUND.to_string())
        );
        assert_eq!(store.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_phone_is_a_miss_without_query() {
        let store = Arc::new(FakeStore::with(vec![lead(1, "5511988887777", "ON")]));
        let svc = service(&store);

        assert_eq!(
            svc.disable_ai(Some("   ")).await.unwrap_err(),
            AppError::NotFound(MSG_PHONE_NOT_FOUND.to_string())
        );
        assert_eq!(
            svc.get_status(Some(" ")).await.unwrap_err(),
            AppError::NotFound(MSG_PHONE_NOT_FOUND.to_string())
        );
        assert!(store.queries.lock().unwrap().is_empty());
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_datastore_failures_are_labelled() {
        let store = Arc::new(FakeStore {
            fail_reads: true,
            ..FakeStore::with(vec![lead(1, "5511988887777", "ON")])
        });
        assert_eq!(
            service(&store)
                .disable_ai(Some("11988887777"))
                .await
                .unwrap_err(),
            AppError::Datastore {
                message: MSG_DATASTORE_READ.to_string(),
                detail: "connection refused".to_string(),
            }
        );

        let store = Arc::new(FakeStore {
            fail_updates: true,
            ..FakeStore::with(vec![lead(1, "5511988887777", "ON")])
        });
        assert_eq!(
            service(&store)
                .disable_ai(Some("11988887777"))
                .await
                .unwrap_err(),
            AppError::Datastore {
                message: MSG_DATASTORE_UPDATE.to_string(),
                detail: "permission denied".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_get_status_is_read_only() {
        let store = Arc::new(FakeStore::with(vec![lead(4, "551133334444", "ON")]));
        let status = service(&store)
            .get_status(Some("11 3333-4444"))
            .await
            .unwrap();

        assert_eq!(status.telefone, "551133334444");
        assert_eq!(status.ia_on_off.as_deref(), Some("ON"));
        assert!(store.updates.lock().unwrap().is_empty());
    }
}
