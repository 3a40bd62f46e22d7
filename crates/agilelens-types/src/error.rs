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

//! Errors raised while ingesting raw series

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("record starting {start} must end after it starts (ends {end})")]
    EmptyInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("non-finite {field} in record starting {start}")]
    NonFinite {
        field: &'static str,
        start: DateTime<Utc>,
    },

    #[error("malformed series payload: {0}")]
    Payload(String),
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Payload(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
