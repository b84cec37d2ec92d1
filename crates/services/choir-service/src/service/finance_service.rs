//! Income and expense ledger.

use std::sync::Arc;

use async_trait::async_trait;

use super::within_scope;
use crate::repository::TransactionRepository;
use common::AppResult;
use domain::{
    ensure_date_range, ChoirScope, FinancialSummary, NewTransaction, Transaction,
    TransactionChanges, TransactionFilter, DEFAULT_CURRENCY,
};

#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn list_transactions(
        &self,
        scope: ChoirScope,
        filter: TransactionFilter,
    ) -> AppResult<Vec<Transaction>>;

    async fn get_transaction(&self, scope: ChoirScope, id: i32) -> AppResult<Transaction>;

    async fn create_transaction(
        &self,
        scope: ChoirScope,
        transaction: NewTransaction,
    ) -> AppResult<Transaction>;

    async fn update_transaction(
        &self,
        scope: ChoirScope,
        id: i32,
        changes: TransactionChanges,
    ) -> AppResult<Transaction>;

    async fn delete_transaction(&self, scope: ChoirScope, id: i32) -> AppResult<()>;

    /// Income, expense and balance per currency over the filtered ledger
    async fn summary(
        &self,
        scope: ChoirScope,
        filter: TransactionFilter,
    ) -> AppResult<FinancialSummary>;
}

pub struct TransactionManager {
    repo: Arc<dyn TransactionRepository>,
}

impl TransactionManager {
    pub fn new(repo: Arc<dyn TransactionRepository>) -> Self {
        Self { repo }
    }
}

fn check_filter(filter: &TransactionFilter) -> AppResult<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        ensure_date_range(from, to, "Transaction period")?;
    }
    Ok(())
}

#[async_trait]
impl TransactionService for TransactionManager {
    async fn list_transactions(
        &self,
        scope: ChoirScope,
        filter: TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        check_filter(&filter)?;
        self.repo.list(scope, filter).await
    }

    async fn get_transaction(&self, scope: ChoirScope, id: i32) -> AppResult<Transaction> {
        within_scope(scope, self.repo.find_by_id(id).await?)
    }

    async fn create_transaction(
        &self,
        scope: ChoirScope,
        mut transaction: NewTransaction,
    ) -> AppResult<Transaction> {
        transaction.currency = match transaction.currency.trim() {
            "" => DEFAULT_CURRENCY.to_string(),
            code => code.to_uppercase(),
        };
        transaction.validate()?;
        transaction.choir_id = scope.assign(transaction.choir_id);

        let created = self.repo.create(transaction).await?;
        tracing::info!(
            transaction_id = created.id,
            amount = %created.amount,
            currency = %created.currency,
            "Transaction recorded"
        );
        Ok(created)
    }

    async fn update_transaction(
        &self,
        scope: ChoirScope,
        id: i32,
        mut changes: TransactionChanges,
    ) -> AppResult<Transaction> {
        self.get_transaction(scope, id).await?;
        if let Some(currency) = changes.currency.as_mut() {
            *currency = currency.trim().to_uppercase();
        }
        changes.validate()?;
        self.repo.update(id, changes).await
    }

    async fn delete_transaction(&self, scope: ChoirScope, id: i32) -> AppResult<()> {
        self.get_transaction(scope, id).await?;
        self.repo.delete(id).await?;
        tracing::info!(transaction_id = id, "Transaction deleted");
        Ok(())
    }

    async fn summary(
        &self,
        scope: ChoirScope,
        filter: TransactionFilter,
    ) -> AppResult<FinancialSummary> {
        check_filter(&filter)?;
        let transactions = self.repo.list(scope, filter).await?;
        Ok(FinancialSummary::from_transactions(&transactions))
    }
}
