//! Event repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::event::{self, ActiveModel, Entity as EventEntity};
use super::{choir_condition, day_bounds};
use common::{AppError, AppResult, OptionExt};
use domain::{ChoirScope, Event, EventChanges, EventFilter, NewEvent};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events inside `scope`, soonest first
    async fn list(&self, scope: ChoirScope, filter: EventFilter) -> AppResult<Vec<Event>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Event>>;

    async fn create(&self, event: NewEvent) -> AppResult<Event>;

    async fn update(&self, id: i32, changes: EventChanges) -> AppResult<Event>;

    /// Attendance recorded for the event goes with it.
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for EventStore {
    async fn list(&self, scope: ChoirScope, filter: EventFilter) -> AppResult<Vec<Event>> {
        let models = EventEntity::find()
            .filter(choir_condition(event::Column::ChoirId, scope))
            .filter(day_bounds(event::Column::StartsAt, filter.from, filter.to))
            .order_by_asc(event::Column::StartsAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Event::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Event>> {
        let result = EventEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Event::from))
    }

    async fn create(&self, event: NewEvent) -> AppResult<Event> {
        let active_model = ActiveModel {
            choir_id: Set(event.choir_id),
            title: Set(event.title),
            event_type: Set(event.event_type),
            location: Set(event.location),
            starts_at: Set(event.starts_at),
            ends_at: Set(event.ends_at),
            description: Set(event.description),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Event::from(model))
    }

    async fn update(&self, id: i32, changes: EventChanges) -> AppResult<Event> {
        let event = EventEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = event.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(event_type) = changes.event_type {
            active.event_type = Set(event_type);
        }
        if let Some(location) = changes.location {
            active.location = Set(Some(location));
        }
        if let Some(starts_at) = changes.starts_at {
            active.starts_at = Set(starts_at);
        }
        if let Some(ends_at) = changes.ends_at {
            active.ends_at = Set(Some(ends_at));
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Event::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = EventEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
