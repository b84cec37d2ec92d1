//! Communiques: announcements targeted at member categories.
//!
//! Managers (choir admins and committee members) see every communique in
//! scope, drafts included. Everyone else sees only published ones addressed
//! to one of their categories, or to everybody.

use std::sync::Arc;

use async_trait::async_trait;

use super::within_scope;
use crate::repository::CommuniqueRepository;
use common::{AppError, AppResult};
use domain::{
    can_manage_communiques, ensure_not_blank, ChoirScope, Communique, CommuniqueChanges,
    NewCommunique, Principal,
};

#[async_trait]
pub trait CommuniqueService: Send + Sync {
    async fn list_communiques(
        &self,
        actor: &Principal,
        scope: ChoirScope,
    ) -> AppResult<Vec<Communique>>;

    async fn get_communique(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        id: i32,
    ) -> AppResult<Communique>;

    async fn create_communique(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        communique: NewCommunique,
    ) -> AppResult<Communique>;

    async fn update_communique(
        &self,
        scope: ChoirScope,
        id: i32,
        changes: CommuniqueChanges,
    ) -> AppResult<Communique>;

    /// Publishing an already published communique keeps its first timestamp
    async fn publish_communique(&self, scope: ChoirScope, id: i32) -> AppResult<Communique>;

    async fn delete_communique(&self, scope: ChoirScope, id: i32) -> AppResult<()>;
}

pub struct CommuniqueManager {
    repo: Arc<dyn CommuniqueRepository>,
}

impl CommuniqueManager {
    pub fn new(repo: Arc<dyn CommuniqueRepository>) -> Self {
        Self { repo }
    }

    async fn scoped(&self, scope: ChoirScope, id: i32) -> AppResult<Communique> {
        within_scope(scope, self.repo.find_by_id(id).await?)
    }
}

fn visible_to(actor: &Principal, communique: &Communique) -> bool {
    can_manage_communiques(actor) || communique.visible_to_member(&actor.categories)
}

#[async_trait]
impl CommuniqueService for CommuniqueManager {
    async fn list_communiques(
        &self,
        actor: &Principal,
        scope: ChoirScope,
    ) -> AppResult<Vec<Communique>> {
        let communiques = self.repo.list(scope).await?;
        Ok(communiques
            .into_iter()
            .filter(|c| visible_to(actor, c))
            .collect())
    }

    async fn get_communique(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        id: i32,
    ) -> AppResult<Communique> {
        let communique = self.scoped(scope, id).await?;
        if !visible_to(actor, &communique) {
            return Err(AppError::NotFound);
        }
        Ok(communique)
    }

    async fn create_communique(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        mut communique: NewCommunique,
    ) -> AppResult<Communique> {
        ensure_not_blank(&communique.title, "title")?;
        ensure_not_blank(&communique.content, "content")?;
        communique.choir_id = scope.assign(communique.choir_id);
        communique.author_id = actor.member_id();

        let created = self.repo.create(communique).await?;
        tracing::info!(
            communique_id = created.id,
            published = created.is_published(),
            "Communique created"
        );
        Ok(created)
    }

    async fn update_communique(
        &self,
        scope: ChoirScope,
        id: i32,
        changes: CommuniqueChanges,
    ) -> AppResult<Communique> {
        self.scoped(scope, id).await?;
        if let Some(title) = &changes.title {
            ensure_not_blank(title, "title")?;
        }
        if let Some(content) = &changes.content {
            ensure_not_blank(content, "content")?;
        }
        self.repo.update(id, changes).await
    }

    async fn publish_communique(&self, scope: ChoirScope, id: i32) -> AppResult<Communique> {
        self.scoped(scope, id).await?;
        self.repo.publish(id).await
    }

    async fn delete_communique(&self, scope: ChoirScope, id: i32) -> AppResult<()> {
        self.scoped(scope, id).await?;
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCommuniqueRepository;
    use crate::service::test_support::{as_admin, as_member};
    use chrono::Utc;
    use domain::{Category, Role};

    fn communique(id: i32, targets: Vec<Category>, published: bool) -> Communique {
        let now = Utc::now();
        Communique {
            id,
            choir_id: Some(1),
            title: format!("Notice {}", id),
            content: "Rehearsal moved to Friday".to_string(),
            target_categories: targets,
            published_at: published.then_some(now),
            author_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn repo_with_board() -> MockCommuniqueRepository {
        let mut repo = MockCommuniqueRepository::new();
        repo.expect_list().returning(|_| {
            Ok(vec![
                communique(1, vec![], true),
                communique(2, vec![Category::Musician], true),
                communique(3, vec![Category::Singer], false),
                communique(4, vec![Category::Singer], true),
            ])
        });
        repo
    }

    #[tokio::test]
    async fn singer_sees_published_notices_addressed_to_them() {
        let service = CommuniqueManager::new(Arc::new(repo_with_board()));
        let actor = as_member(5, Role::ChoirMember, vec![Category::Singer]);

        let visible = service
            .list_communiques(&actor, ChoirScope::Choir(1))
            .await
            .unwrap();
        let ids: Vec<i32> = visible.iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn committee_sees_drafts_too() {
        let service = CommuniqueManager::new(Arc::new(repo_with_board()));
        let actor = as_member(5, Role::ChoirMember, vec![Category::Committee]);

        let visible = service
            .list_communiques(&actor, ChoirScope::Choir(1))
            .await
            .unwrap();

        assert_eq!(visible.len(), 4);
    }

    #[tokio::test]
    async fn hidden_draft_reads_as_missing() {
        let mut repo = MockCommuniqueRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(communique(id, vec![], false))));

        let service = CommuniqueManager::new(Arc::new(repo));
        let actor = as_member(5, Role::ChoirMember, vec![Category::Singer]);
        let result = service.get_communique(&actor, ChoirScope::Choir(1), 3).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn admin_author_is_not_recorded() {
        let mut repo = MockCommuniqueRepository::new();
        repo.expect_create().returning(|new| {
            assert_eq!(new.author_id, None);
            assert_eq!(new.choir_id, Some(2));
            let mut created = communique(10, new.target_categories, new.publish);
            created.choir_id = new.choir_id;
            Ok(created)
        });

        let service = CommuniqueManager::new(Arc::new(repo));
        let created = service
            .create_communique(
                &as_admin(Role::ChoirAdmin, Some(2)),
                ChoirScope::Choir(2),
                NewCommunique {
                    choir_id: None,
                    title: "Retreat".to_string(),
                    content: "Bring a blanket".to_string(),
                    target_categories: vec![],
                    author_id: Some(77),
                    publish: true,
                },
            )
            .await
            .unwrap();

        assert!(created.is_published());
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let mut repo = MockCommuniqueRepository::new();
        repo.expect_create().never();

        let service = CommuniqueManager::new(Arc::new(repo));
        let result = service
            .create_communique(
                &as_member(1, Role::ChoirAdmin, vec![]),
                ChoirScope::All,
                NewCommunique {
                    choir_id: None,
                    title: "   ".to_string(),
                    content: "x".to_string(),
                    target_categories: vec![],
                    author_id: None,
                    publish: false,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
