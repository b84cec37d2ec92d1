//! Financial transaction repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::choir_condition;
use super::entities::transaction::{self, ActiveModel, Entity as TransactionEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{ChoirScope, NewTransaction, Transaction, TransactionChanges, TransactionFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Most recent first
    async fn list(
        &self,
        scope: ChoirScope,
        filter: TransactionFilter,
    ) -> AppResult<Vec<Transaction>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Transaction>>;

    async fn create(&self, transaction: NewTransaction) -> AppResult<Transaction>;

    async fn update(&self, id: i32, changes: TransactionChanges) -> AppResult<Transaction>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct TransactionStore {
    db: DatabaseConnection,
}

impl TransactionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn list(
        &self,
        scope: ChoirScope,
        filter: TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        let mut query =
            TransactionEntity::find().filter(choir_condition(transaction::Column::ChoirId, scope));

        if let Some(kind) = filter.transaction_type {
            query = query.filter(transaction::Column::TransactionType.eq(kind));
        }
        if let Some(category) = filter.category {
            query = query.filter(transaction::Column::Category.eq(category));
        }
        if let Some(from) = filter.from {
            query = query.filter(transaction::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transaction::Column::TransactionDate.lte(to));
        }

        let models = query
            .order_by_desc(transaction::Column::TransactionDate)
            .order_by_desc(transaction::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Transaction>> {
        let result = TransactionEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Transaction::from))
    }

    async fn create(&self, transaction: NewTransaction) -> AppResult<Transaction> {
        let active_model = ActiveModel {
            choir_id: Set(transaction.choir_id),
            transaction_type: Set(transaction.transaction_type),
            category: Set(transaction.category),
            amount: Set(transaction.amount),
            currency: Set(transaction.currency),
            description: Set(transaction.description),
            contributor_id: Set(transaction.contributor_id),
            transaction_date: Set(transaction.transaction_date),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Transaction::from(model))
    }

    async fn update(&self, id: i32, changes: TransactionChanges) -> AppResult<Transaction> {
        let existing = TransactionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = existing.into();
        if let Some(kind) = changes.transaction_type {
            active.transaction_type = Set(kind);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(amount) = changes.amount {
            active.amount = Set(amount);
        }
        if let Some(currency) = changes.currency {
            active.currency = Set(currency);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(contributor_id) = changes.contributor_id {
            active.contributor_id = Set(Some(contributor_id));
        }
        if let Some(date) = changes.transaction_date {
            active.transaction_date = Set(date);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Transaction::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = TransactionEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
