// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use ledgerly::amount::parse_display_amount;
use ledgerly::convert::{convert, convert_with_snapshot};
use ledgerly::currency::{Currency, RateTable};
use ledgerly::rates::RateProvider;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const TABLE: RateTable = RateTable {
    usd: 1.0,
    eur: 0.92,
    brl: 0.19,
};

#[test]
fn identity_conversion_never_touches_the_rate_source() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = fetches.clone();
    let provider = RateProvider::new(
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(TABLE)
        }),
        Box::new(Utc::now),
    );

    for ccy in Currency::ALL {
        let c = convert(&provider, 123_456, ccy, ccy);
        assert_eq!(c.converted_cents, 123_456);
        assert_eq!(c.rate, 1.0);
    }
    assert_eq!(fetches.load(Ordering::SeqCst), 0);
}

#[test]
fn brl_amount_to_usd_end_to_end() {
    let provider = RateProvider::fixed(TABLE);
    let cents = parse_display_amount("R$ 45,50").unwrap();
    assert_eq!(cents, 4550);

    let c = convert(&provider, cents, Currency::Brl, Currency::Usd);
    // 4550 / 0.19 = 23947.37 -> 23947 cents
    assert_eq!(c.converted_cents, 23947);
    assert!((c.rate - 1.0 / 0.19).abs() < 1e-12);
}

#[test]
fn round_trip_drift_is_bounded() {
    let provider = RateProvider::fixed(TABLE);
    for cents in [1i64, 99, 4550, 123_456, 99_999_999] {
        let there = convert(&provider, cents, Currency::Usd, Currency::Eur);
        let back = convert(&provider, there.converted_cents, Currency::Eur, Currency::Usd);
        assert!(
            (back.converted_cents - cents).abs() <= 2,
            "round trip of {} drifted to {}",
            cents,
            back.converted_cents
        );
    }
}

#[test]
fn snapshot_carries_the_provider_clock() {
    let ts = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    let provider = RateProvider::new(Box::new(|| Ok(TABLE)), Box::new(move || ts));

    let s = convert_with_snapshot(&provider, 1000, Currency::Eur, Currency::Usd);
    assert_eq!(s.currency, Currency::Usd);
    assert_eq!(s.timestamp, ts);
    // 1000 / 0.92 = 1086.96 -> 1087
    assert_eq!(s.amount_cents, 1087);
}
