//! Local mirrors of the remote collections.
//!
//! A store only changes after the backend confirms a mutation. A failed call
//! leaves the collection exactly as it was.

pub mod resource;

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{ApiRequest, Transport};
use crate::errors::TrackerError;
use crate::index::Index;
use crate::models::cover_letter::CoverLetter;
use crate::models::{Identified, RecordId};
use crate::session::Session;

pub use resource::{Applications, CoverLetters, Jobs, Resource, Resumes};

pub type JobStore = CollectionStore<Jobs>;
pub type ApplicationStore = CollectionStore<Applications>;
pub type ResumeStore = CollectionStore<Resumes>;
pub type CoverLetterStore = CollectionStore<CoverLetters>;

pub struct CollectionStore<R: Resource> {
    transport: Arc<dyn Transport>,
    items: Vec<R::Entity>,
    ids: Index<RecordId>,
    parents: Index<RecordId>,
    loaded: bool,
}

impl<R: Resource> CollectionStore<R> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            items: Vec::new(),
            ids: Index::default(),
            parents: Index::default(),
            loaded: false,
        }
    }

    /// Entities in server order, followed by any created since the last load.
    pub fn items(&self) -> &[R::Entity] {
        &self.items
    }

    pub fn get(&self, id: RecordId) -> Option<&R::Entity> {
        self.ids.lookup(&self.items, &id)
    }

    /// First entity, in collection order, that belongs to `parent`.
    pub fn first_for_parent(&self, parent: RecordId) -> Option<&R::Entity> {
        self.parents.lookup(&self.items, &parent)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces the collection with the server's.
    pub async fn load(&mut self, session: &Session) -> Result<&[R::Entity], TrackerError> {
        let request = ApiRequest::get(R::list_path()).with_session(session);
        let items: Vec<R::Entity> = self.transport.send(request).await?.decode()?;

        debug!("Loaded {} {} record(s)", items.len(), R::NAME);
        self.items = items;
        self.loaded = true;
        self.reindex();
        Ok(&self.items)
    }

    pub async fn create(
        &mut self,
        session: &Session,
        draft: &R::Draft,
    ) -> Result<&R::Entity, TrackerError> {
        let request = R::create_request(draft)?.with_session(session);
        let created: R::Entity = self.transport.send(request).await?.decode()?;

        info!("Created {} {}", R::NAME, created.id());
        let pos = self.items.len();
        // First occurrence wins if the server ever echoes a duplicate id.
        self.ids.insert(created.id(), pos);
        if let Some(parent) = R::parent_id(&created) {
            self.parents.insert(parent, pos);
        }
        self.items.push(created);
        Ok(&self.items[pos])
    }

    pub async fn update(
        &mut self,
        session: &Session,
        id: RecordId,
        patch: &R::Patch,
    ) -> Result<&R::Entity, TrackerError> {
        let pos = self.position(id)?;
        let request = R::update_request(id, patch)?.with_session(session);
        let updated: R::Entity = self.transport.send(request).await?.decode()?;

        if updated.id() != id {
            return Err(TrackerError::Parse(format!(
                "update of {} {id} returned record {}",
                R::NAME,
                updated.id()
            )));
        }

        info!("Updated {} {id}", R::NAME);
        let moved = R::parent_id(&self.items[pos]) != R::parent_id(&updated);
        self.items[pos] = updated;
        if moved {
            self.parents = Index::build(&self.items, R::parent_id);
        }
        Ok(&self.items[pos])
    }

    /// Deletes on the backend, then drops the local copy. Callers confirm
    /// with the user before calling.
    pub async fn delete(&mut self, session: &Session, id: RecordId) -> Result<R::Entity, TrackerError> {
        let pos = self.position(id)?;
        let request = ApiRequest::delete(R::delete_path(id)).with_session(session);
        self.transport.send(request).await?.into_result()?;

        info!("Deleted {} {id}", R::NAME);
        let removed = self.items.remove(pos);
        self.reindex();
        Ok(removed)
    }

    fn position(&self, id: RecordId) -> Result<usize, TrackerError> {
        self.ids
            .position(&id)
            .ok_or_else(|| TrackerError::NotFound(format!("{} {id} is not loaded", R::NAME)))
    }

    fn reindex(&mut self) {
        self.ids = Index::by_id(&self.items);
        self.parents = Index::build(&self.items, R::parent_id);
    }
}

impl CoverLetterStore {
    /// The application's first cover letter.
    pub fn first_for_application(&self, application_id: RecordId) -> Option<&CoverLetter> {
        self.first_for_parent(application_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{self, ScriptedTransport};
    use crate::api::Method;
    use crate::models::application::{ApplicationDraft, ApplicationPatch};
    use crate::models::job::JobDraft;
    use crate::models::status::ApplicationStatus;
    use serde_json::{json, Value};

    fn application(id: i64, title: &str, status: &str) -> Value {
        json!({"id": id, "title": title, "job_id": 1, "status": status, "resume_id": null})
    }

    async fn loaded_applications(transport: &Arc<ScriptedTransport>) -> ApplicationStore {
        transport.respond(
            200,
            json!([
                application(3, "Third", "Applied"),
                application(2, "Second", "Pending"),
                application(1, "First", "Interview"),
            ]),
        );
        let mut store = ApplicationStore::new(transport.clone());
        store.load(&testing::session()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_load_keeps_server_order() {
        let transport = ScriptedTransport::new();
        let store = loaded_applications(&transport).await;

        let ids: Vec<i64> = store.items().iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(store.is_loaded());
        assert_eq!(store.get(RecordId(2)).unwrap().title, "Second");

        let sent = transport.requests();
        assert_eq!(sent[0].path, "/api/applications/list");
        assert_eq!(sent[0].session_cookie.as_deref(), Some("session=test-cookie"));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_items() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        transport.respond(401, json!({"error": "Unauthorized"}));

        let err = store.load(&testing::session()).await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_collection_unchanged() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        let before = store.items().to_vec();

        transport.respond(500, json!({"error": "Internal server error"}));
        let patch = ApplicationPatch {
            status: Some(Some(ApplicationStatus::Rejected)),
            ..Default::default()
        };
        let err = store
            .update(&testing::session(), RecordId(2), &patch)
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::RequestFailed { status: 500, .. }));
        assert_eq!(store.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_update_replaces_only_target() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        let before = store.items().to_vec();

        transport.respond(200, application(2, "Second", "Rejected"));
        let patch = ApplicationPatch {
            status: Some(Some(ApplicationStatus::Rejected)),
            ..Default::default()
        };
        store
            .update(&testing::session(), RecordId(2), &patch)
            .await
            .unwrap();

        assert_eq!(store.items()[0], before[0]);
        assert_eq!(store.items()[2], before[2]);
        assert_eq!(store.items()[1].status, Some(ApplicationStatus::Rejected));

        let sent = transport.requests();
        assert_eq!(sent[1].method, Method::Put);
        assert_eq!(sent[1].path, "/api/applications/update/2");
        assert_eq!(sent[1].json_body(), Some(&json!({"status": "Rejected"})));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found_without_request() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;

        let err = store
            .update(&testing::session(), RecordId(42), &ApplicationPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_update_with_mismatched_id_is_rejected() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        transport.respond(200, application(9, "Other", "Applied"));

        let err = store
            .update(&testing::session(), RecordId(2), &ApplicationPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
        assert_eq!(store.get(RecordId(2)).unwrap().title, "Second");
    }

    #[tokio::test]
    async fn test_create_validates_before_network() {
        let transport = ScriptedTransport::new();
        let mut store = JobStore::new(transport.clone());

        let err = store
            .create(&testing::session(), &JobDraft::new("Engineer", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref msg) if msg.contains("company")));
        assert!(transport.requests().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_appends_confirmed_entity() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        transport.respond(201, application(4, "Fourth", "Pending"));

        let created = store
            .create(&testing::session(), &ApplicationDraft::new("Fourth", RecordId(1)))
            .await
            .unwrap();
        assert_eq!(created.id, RecordId(4));
        assert_eq!(store.len(), 4);
        assert_eq!(store.items()[3].id, RecordId(4));
        assert!(store.get(RecordId(4)).is_some());
    }

    #[tokio::test]
    async fn test_failed_create_leaves_collection_unchanged() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        transport.respond(400, json!({"error": "Missing job_id"}));

        let result = store
            .create(&testing::session(), &ApplicationDraft::new("Fourth", RecordId(1)))
            .await;
        assert!(result.is_err());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_removes_and_reindexes() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        transport.respond(200, json!({"message": "Application deleted"}));

        let removed = store
            .delete(&testing::session(), RecordId(3))
            .await
            .unwrap();
        assert_eq!(removed.title, "Third");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(RecordId(1)).unwrap().title, "First");
        assert!(store.get(RecordId(3)).is_none());
        assert_eq!(transport.requests()[1].method, Method::Delete);
        assert_eq!(transport.requests()[1].path, "/api/applications/delete/3");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_entity() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        transport.respond(404, json!({"error": "Application not found"}));

        assert!(store.delete(&testing::session(), RecordId(3)).await.is_err());
        assert_eq!(store.len(), 3);
        assert!(store.get(RecordId(3)).is_some());
    }

    #[tokio::test]
    async fn test_transport_failure_reaches_caller_and_keeps_items() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;
        let before = store.items().to_vec();
        transport.respond_with(Err(TrackerError::Parse("connection reset".to_string())));

        let err = store.load(&testing::session()).await.unwrap_err();
        assert!(matches!(err, TrackerError::Parse(ref msg) if msg == "connection reset"));
        assert_eq!(store.items(), before.as_slice());
        assert_eq!(store.get(RecordId(2)).unwrap().title, "Second");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found_without_request() {
        let transport = ScriptedTransport::new();
        let mut store = loaded_applications(&transport).await;

        let err = store
            .delete(&testing::session(), RecordId(42))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(store.len(), 3);
    }

    fn letter(id: i64, application_id: i64) -> Value {
        json!({"id": id, "title": format!("Letter {id}"), "language": "English", "application_id": application_id})
    }

    #[tokio::test]
    async fn test_application_index_follows_mutations() {
        let transport = ScriptedTransport::new();
        transport.respond(200, json!([letter(10, 7), letter(11, 7)]));
        let mut store = CoverLetterStore::new(transport.clone());
        let session = testing::session();
        store.load(&session).await.unwrap();
        assert_eq!(store.first_for_application(RecordId(7)).unwrap().id, RecordId(10));
        assert!(store.first_for_application(RecordId(8)).is_none());

        transport.respond(201, letter(12, 8));
        let draft = crate::models::cover_letter::CoverLetterDraft::new(
            "Letter 12",
            RecordId(8),
            crate::models::document::Document::Text("Dear Globex".to_string()),
        );
        store.create(&session, &draft).await.unwrap();
        assert_eq!(store.first_for_application(RecordId(8)).unwrap().id, RecordId(12));

        transport.respond(200, letter(10, 9));
        let patch = crate::models::cover_letter::CoverLetterPatch {
            application_id: Some(RecordId(9)),
            ..Default::default()
        };
        store.update(&session, RecordId(10), &patch).await.unwrap();
        assert_eq!(store.first_for_application(RecordId(7)).unwrap().id, RecordId(11));
        assert_eq!(store.first_for_application(RecordId(9)).unwrap().id, RecordId(10));

        transport.respond(200, json!({"message": "Cover letter deleted"}));
        store.delete(&session, RecordId(11)).await.unwrap();
        assert!(store.first_for_application(RecordId(7)).is_none());
        assert_eq!(store.get(RecordId(12)).unwrap().application_id, RecordId(8));
    }
}
