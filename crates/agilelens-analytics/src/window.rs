// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of AgileLens.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use agilelens_types::{PricePeriod, PriceWindow};
use chrono::{DateTime, TimeDelta, Utc};

use crate::TOP_N;
use crate::statistics::sorted_by_price;

/// How far back `past_24h` reaches
const LOOKBACK: TimeDelta = TimeDelta::hours(24);

/// Split periods around `now`
///
/// With overlapping periods the last one containing `now` is reported as
/// current. `upcoming` covers `[now, now + hours_ahead)` ordered by start,
/// `past_24h` keeps the input order.
#[must_use]
pub fn current_and_upcoming(
    periods: &[PricePeriod],
    now: DateTime<Utc>,
    hours_ahead: u32,
) -> PriceWindow {
    // Saturate instead of overflowing on far-out look-aheads
    let cutoff = now
        .checked_add_signed(TimeDelta::hours(i64::from(hours_ahead)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let lookback = now
        .checked_sub_signed(LOOKBACK)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut current = None;
    let mut upcoming = Vec::new();
    let mut past_24h = Vec::new();

    for period in periods {
        if period.contains(now) {
            current = Some(period);
        }
        if period.valid_from >= now && period.valid_from < cutoff {
            upcoming.push(period.clone());
        }
        if period.valid_from >= lookback && period.valid_from < now {
            past_24h.push(period.clone());
        }
    }

    upcoming.sort_by_key(|p| p.valid_from);
    let best_upcoming = sorted_by_price(&upcoming).into_iter().take(TOP_N).collect();
    let has_negative_upcoming = upcoming.iter().any(PricePeriod::is_negative);

    PriceWindow {
        current: current.cloned(),
        upcoming,
        past_24h,
        best_upcoming,
        has_negative_upcoming,
    }
}
