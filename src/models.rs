// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Currency;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const DESCRIPTION_MAX: usize = 30;
pub const CATEGORY_MAX: usize = 30;
pub const CATEGORY_NAME_MAX: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Error)]
#[error("Invalid transaction type '{0}' (expected 'income' or 'expense')")]
pub struct InvalidTransactionType(pub String);

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = InvalidTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(InvalidTransactionType(other.to_string())),
        }
    }
}

/// Point-in-time conversion stored alongside a transaction. Immutable once
/// written; later rate changes never touch it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionSnapshot {
    pub amount_cents: i64,
    pub currency: Currency,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub r#type: TransactionType,
    pub amount_cents: i64,
    pub currency: Currency,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub converted: Option<ConversionSnapshot>,
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("Validation failed: {}", render(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A submitted transaction before persistence. Currency and type are already
/// closed-set enums here; free-form input is rejected at the parse boundary.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub r#type: TransactionType,
    pub amount_cents: i64,
    pub currency: Currency,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl TransactionDraft {
    /// Collect every field violation; nothing is persisted when this fails.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.amount_cents <= 0 {
            errors.push(FieldError {
                field: "amount",
                message: "Amount must be greater than zero".into(),
            });
        }
        check_category(&self.category, &mut errors);
        check_description(self.description.as_deref(), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// Partial update; only supplied fields are validated and written.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub r#type: Option<TransactionType>,
    pub amount_cents: Option<i64>,
    pub currency: Option<Currency>,
    pub category: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.r#type.is_none()
            && self.amount_cents.is_none()
            && self.currency.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if let Some(cents) = self.amount_cents {
            if cents <= 0 {
                errors.push(FieldError {
                    field: "amount",
                    message: "Amount must be greater than zero".into(),
                });
            }
        }
        if let Some(cat) = &self.category {
            check_category(cat, &mut errors);
        }
        if let Some(desc) = &self.description {
            if !desc.is_empty() {
                check_description(Some(desc), &mut errors);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

fn check_category(category: &str, errors: &mut Vec<FieldError>) {
    if category.trim().is_empty() {
        errors.push(FieldError {
            field: "category",
            message: "Category is required".into(),
        });
    } else if category.chars().count() > CATEGORY_MAX {
        errors.push(FieldError {
            field: "category",
            message: format!("Limit is {} characters", CATEGORY_MAX),
        });
    }
}

fn check_description(description: Option<&str>, errors: &mut Vec<FieldError>) {
    if let Some(desc) = description {
        if desc.chars().count() > DESCRIPTION_MAX {
            errors.push(FieldError {
                field: "description",
                message: format!(
                    "Description too long, limit is {} characters",
                    DESCRIPTION_MAX
                ),
            });
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub r#type: TransactionType,
}
