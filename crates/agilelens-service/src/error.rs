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

use agilelens_analytics::UnknownSummaryPeriod;
use agilelens_types::IngestError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures fetching raw series, passed through unchanged and never retried
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("authentication rejected by upstream")]
    Unauthorized,

    #[error("invalid upstream payload: {0}")]
    Payload(#[from] IngestError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Identifiers a computation needs are not configured
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    UnknownPeriod(#[from] UnknownSummaryPeriod),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
