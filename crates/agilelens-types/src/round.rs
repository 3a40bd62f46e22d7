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

//! Output rounding applied at serialization time.
//!
//! Money values (pence, pounds) go out with 2 decimals, energy values (kWh)
//! with 3. Use through `#[serde(serialize_with = "...")]`.

use chrono::NaiveDate;
use serde::Serializer;
use serde::ser::SerializeMap;
use std::collections::BTreeMap;

#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn money<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

pub fn energy<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 3))
}

pub fn energy_by_date<S: Serializer>(
    values: &BTreeMap<NaiveDate, f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(values.len()))?;
    for (date, kwh) in values {
        map.serialize_entry(date, &round_to(*kwh, 3))?;
    }
    map.end()
}
