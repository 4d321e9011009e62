// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{FALLBACK_RATES, RateTable};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};

/// Cached tables are served without a network hit for one hour.
const RATE_TTL_SECS: i64 = 3600;
/// A fallback table stored after a failed first fetch stays valid for five
/// minutes only, so the next caller retries the remote source soon.
const FALLBACK_RETRY_SECS: i64 = 300;

const RATES_URL: &str = "https://api.frankfurter.app/latest?from=USD&to=EUR,BRL";

type FetchFn = Box<dyn Fn() -> Result<RateTable> + Send + Sync>;
type ClockFn = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct CachedRates {
    table: RateTable,
    fetched_at: DateTime<Utc>,
}

/// Exchange rate source with a TTL cache. The fetch function and the clock
/// are injected so the cache policy is testable without network access.
pub struct RateProvider {
    fetch: FetchFn,
    clock: ClockFn,
    cache: Mutex<Option<CachedRates>>,
}

impl RateProvider {
    pub fn new(fetch: FetchFn, clock: ClockFn) -> Self {
        Self {
            fetch,
            clock,
            cache: Mutex::new(None),
        }
    }

    /// Provider backed by the live frankfurter.app endpoint.
    pub fn live() -> Self {
        Self::new(Box::new(fetch_remote_rates), Box::new(Utc::now))
    }

    /// Provider that always serves the given table. Handy for tests and
    /// offline use.
    pub fn fixed(table: RateTable) -> Self {
        Self::new(Box::new(move || Ok(table)), Box::new(Utc::now))
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Current rate table. Never errors: on fetch failure the stale cache is
    /// served if one exists (its timestamp untouched, so the next call
    /// retries), otherwise the hardcoded fallback table is stored with a
    /// shortened validity window and returned.
    pub fn get_rates(&self) -> RateTable {
        let now = self.now();
        {
            let cache = self.lock();
            if let Some(c) = cache.as_ref() {
                if now - c.fetched_at < Duration::seconds(RATE_TTL_SECS) {
                    return c.table;
                }
            }
        }

        // Fetch outside the lock. Two concurrent refreshes may both hit the
        // remote source; the last write wins, which is fine for idempotent
        // reads of an external table.
        match (self.fetch)() {
            Ok(table) => {
                let mut cache = self.lock();
                *cache = Some(CachedRates {
                    table,
                    fetched_at: now,
                });
                table
            }
            Err(err) => {
                eprintln!("warning: exchange rate fetch failed: {err:#}");
                let mut cache = self.lock();
                if let Some(c) = cache.as_ref() {
                    return c.table;
                }
                *cache = Some(CachedRates {
                    table: FALLBACK_RATES,
                    fetched_at: now - Duration::seconds(RATE_TTL_SECS - FALLBACK_RETRY_SECS),
                });
                FALLBACK_RATES
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CachedRates>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: RemoteRates,
}

#[derive(Debug, Deserialize)]
struct RemoteRates {
    #[serde(rename = "EUR")]
    eur: Option<f64>,
    #[serde(rename = "BRL")]
    brl: Option<f64>,
}

fn fetch_remote_rates() -> Result<RateTable> {
    let client = crate::utils::http_client()?;
    let resp = client.get(RATES_URL).send()?.error_for_status()?;
    let body: LatestRates = resp.json().context("Malformed exchange rate payload")?;
    Ok(RateTable {
        usd: 1.0,
        eur: body.rates.eur.unwrap_or(FALLBACK_RATES.eur),
        brl: body.rates.brl.unwrap_or(FALLBACK_RATES.brl),
    })
}
