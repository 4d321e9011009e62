// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of supported currencies. Every currency-indexed lookup in the
/// crate matches exhaustively on this enum, so adding a currency is a
/// compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Brl,
}

#[derive(Debug, Error)]
#[error("Unsupported currency '{0}' (expected USD, EUR or BRL)")]
pub struct UnsupportedCurrency(pub String);

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Brl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Brl => "BRL",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Brl => "R$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = UnsupportedCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "BRL" => Ok(Currency::Brl),
            other => Err(UnsupportedCurrency(other.to_string())),
        }
    }
}

/// Exchange rates relative to USD (1 USD = `rate` units of the currency).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateTable {
    pub usd: f64,
    pub eur: f64,
    pub brl: f64,
}

impl RateTable {
    pub fn rate(&self, ccy: Currency) -> f64 {
        match ccy {
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
            Currency::Brl => self.brl,
        }
    }
}

/// Approximate rates used when the remote fetch fails and no cache exists.
pub const FALLBACK_RATES: RateTable = RateTable {
    usd: 1.0,
    eur: 0.92,
    brl: 5.0,
};
