// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Currency;
use crate::models::ConversionSnapshot;
use crate::rates::RateProvider;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conversion {
    pub converted_cents: i64,
    pub rate: f64,
}

/// Convert an integer-cents amount between currencies via the USD hub.
///
/// Same-currency conversion short-circuits to identity without touching the
/// rate cache. The converted amount is rounded to the nearest cent, so
/// round-tripping A->B->A can drift by one cent per hop; that loss is
/// accepted, not corrected.
pub fn convert(
    provider: &RateProvider,
    amount_cents: i64,
    from: Currency,
    to: Currency,
) -> Conversion {
    if from == to {
        return Conversion {
            converted_cents: amount_cents,
            rate: 1.0,
        };
    }
    let rates = provider.get_rates();
    let in_usd = amount_cents as f64 / rates.rate(from);
    Conversion {
        converted_cents: (in_usd * rates.rate(to)).round() as i64,
        rate: rates.rate(to) / rates.rate(from),
    }
}

/// Convert and capture the effective rate with the provider's clock. The
/// returned snapshot is a historical fact: once stored with a transaction it
/// is never recomputed from later rates.
pub fn convert_with_snapshot(
    provider: &RateProvider,
    amount_cents: i64,
    from: Currency,
    to: Currency,
) -> ConversionSnapshot {
    let c = convert(provider, amount_cents, from, to);
    ConversionSnapshot {
        amount_cents: c.converted_cents,
        currency: to,
        rate: c.rate,
        timestamp: provider.now(),
    }
}
