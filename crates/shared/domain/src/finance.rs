//! Financial transactions and their per-currency summary.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")
)]
pub enum TransactionType {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "INCOME"))]
    Income,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "EXPENSE"))]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_category")
)]
pub enum TransactionCategory {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "CONTRIBUTION"))]
    Contribution,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "DONATION"))]
    Donation,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "OFFERING"))]
    Offering,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "EVENT"))]
    Event,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "EQUIPMENT"))]
    Equipment,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "TRANSPORT"))]
    Transport,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "UNIFORM"))]
    Uniform,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "OTHER"))]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Transaction {
    pub id: i32,
    pub choir_id: Option<i32>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "15000.00"))]
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub contributor_id: Option<i32>,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub choir_id: Option<i32>,
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub contributor_id: Option<i32>,
    pub transaction_date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive_amount(self.amount)?;
        ensure_currency_code(&self.currency)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub transaction_type: Option<TransactionType>,
    pub category: Option<TransactionCategory>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub contributor_id: Option<i32>,
    pub transaction_date: Option<NaiveDate>,
}

impl TransactionChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(amount) = self.amount {
            ensure_positive_amount(amount)?;
        }
        if let Some(currency) = &self.currency {
            ensure_currency_code(currency)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category: Option<TransactionCategory>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub fn ensure_positive_amount(amount: Decimal) -> DomainResult<()> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::validation("Amount must be greater than zero"));
    }
    Ok(())
}

/// Three uppercase ASCII letters, e.g. `RWF`.
pub fn ensure_currency_code(currency: &str) -> DomainResult<()> {
    if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(DomainError::validation(format!(
            "'{}' is not a three-letter currency code",
            currency
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CurrencyTotals {
    pub currency: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub income: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub expense: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FinancialSummary {
    pub transaction_count: usize,
    pub totals: Vec<CurrencyTotals>,
}

impl FinancialSummary {
    /// Totals are kept per currency, sorted by currency code. Amounts in
    /// different currencies are never added together.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut by_currency: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
        for tx in transactions {
            let entry = by_currency
                .entry(tx.currency.as_str())
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            match tx.transaction_type {
                TransactionType::Income => entry.0 += tx.amount,
                TransactionType::Expense => entry.1 += tx.amount,
            }
        }

        let totals = by_currency
            .into_iter()
            .map(|(currency, (income, expense))| CurrencyTotals {
                currency: currency.to_string(),
                income,
                expense,
                balance: income - expense,
            })
            .collect();

        Self {
            transaction_count: transactions.len(),
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn tx(kind: TransactionType, amount: &str, currency: &str) -> Transaction {
        Transaction {
            id: 1,
            choir_id: Some(1),
            transaction_type: kind,
            category: TransactionCategory::Contribution,
            amount: Decimal::from_str(amount).unwrap(),
            currency: currency.to_string(),
            description: None,
            contributor_id: None,
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn summary_balances_per_currency() {
        let summary = FinancialSummary::from_transactions(&[
            tx(TransactionType::Income, "1000.50", "RWF"),
            tx(TransactionType::Expense, "200.25", "RWF"),
            tx(TransactionType::Income, "10", "USD"),
        ]);

        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.totals.len(), 2);
        assert_eq!(summary.totals[0].currency, "RWF");
        assert_eq!(summary.totals[0].balance, Decimal::from_str("800.25").unwrap());
        assert_eq!(summary.totals[1].currency, "USD");
        assert_eq!(summary.totals[1].expense, Decimal::ZERO);
    }

    #[test]
    fn amounts_must_be_positive() {
        assert!(ensure_positive_amount(Decimal::ZERO).is_err());
        assert!(ensure_positive_amount(Decimal::new(-5, 0)).is_err());
        assert!(ensure_positive_amount(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn currency_codes_are_three_uppercase_letters() {
        assert!(ensure_currency_code("RWF").is_ok());
        assert!(ensure_currency_code("rwf").is_err());
        assert!(ensure_currency_code("EURO").is_err());
    }

    #[test]
    fn type_field_is_serialized_as_type() {
        let json = serde_json::to_value(tx(TransactionType::Expense, "5", "RWF")).unwrap();
        assert_eq!(json["type"], "EXPENSE");
        assert_eq!(json["amount"], "5");
    }
}
