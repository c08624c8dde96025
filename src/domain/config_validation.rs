//! Pipeline configuration.
//!
//! Reads and validates every section before any data is touched.

use crate::domain::error::CandlelabError;
use crate::domain::feature_table::Column;
use crate::domain::fetch::{FetchRequest, DEFAULT_PACING};
use crate::domain::length::{IndicatorName, LengthOverrides};
use crate::domain::timeframe::Timeframe;
use crate::ports::config_port::ConfigPort;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

pub const DEFAULT_LENGTH: i64 = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct HawkesConfig {
    pub kappa: f64,
    pub source: Column,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub fetch: FetchRequest,
    pub pacing: Duration,
    pub resample: Option<Timeframe>,
    pub default_length: i64,
    pub overrides: LengthOverrides,
    pub hawkes: Option<HawkesConfig>,
}

pub fn build_pipeline_config(config: &dyn ConfigPort) -> Result<PipelineConfig, CandlelabError> {
    let data_path = PathBuf::from(required(config, "data", "path")?);
    let symbol = required(config, "data", "symbol")?;
    let timeframe = parse_timeframe(&required(config, "data", "timeframe")?, "data")?;

    let since = parse_datetime(&required(config, "data", "since")?, "since")?;
    let until = match config.get_string("data", "until") {
        Some(s) => parse_datetime(&s, "until")?,
        None => DateTime::<Utc>::from(SystemTime::now()),
    };
    if since >= until {
        return Err(invalid("data", "since", "since must be before until"));
    }

    let pacing = parse_pacing(config)?;

    let resample = config
        .get_string("resample", "timeframe")
        .map(|s| parse_timeframe(&s, "resample"))
        .transpose()?;

    let default_length = optional_length(config, "length")?.unwrap_or(DEFAULT_LENGTH);
    let mut overrides = LengthOverrides::default();
    for name in IndicatorName::ALL {
        if let Some(length) = optional_length(config, name.config_key())? {
            overrides.set(name, length);
        }
    }

    Ok(PipelineConfig {
        data_path,
        fetch: FetchRequest {
            symbol,
            timeframe,
            since,
            until,
        },
        pacing,
        resample,
        default_length,
        overrides,
        hawkes: build_hawkes_config(config)?,
    })
}

/// `[hawkes]` is optional; when present `kappa` is required. Its sign is
/// left for the decay engine to reject.
fn build_hawkes_config(config: &dyn ConfigPort) -> Result<Option<HawkesConfig>, CandlelabError> {
    let Some(raw) = config.get_string("hawkes", "kappa") else {
        return Ok(None);
    };
    let kappa: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("hawkes", "kappa", "kappa must be a number"))?;

    let source = match config.get_string("hawkes", "source") {
        Some(s) => s
            .parse::<Column>()
            .map_err(|e| invalid("hawkes", "source", &e.to_string()))?,
        None => "close".parse::<Column>()?,
    };

    Ok(Some(HawkesConfig { kappa, source }))
}

fn parse_pacing(config: &dyn ConfigPort) -> Result<Duration, CandlelabError> {
    let Some(raw) = config.get_string("data", "pacing_ms") else {
        return Ok(DEFAULT_PACING);
    };
    let ms: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("data", "pacing_ms", "pacing_ms must be an integer"))?;
    u64::try_from(ms)
        .map(Duration::from_millis)
        .map_err(|_| invalid("data", "pacing_ms", "pacing_ms must be non-negative"))
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, CandlelabError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(CandlelabError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> CandlelabError {
    CandlelabError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Any integer is accepted; the indicator library rejects bad windows.
fn optional_length(config: &dyn ConfigPort, key: &str) -> Result<Option<i64>, CandlelabError> {
    config
        .get_string("indicators", key)
        .map(|s| {
            s.trim()
                .parse::<i64>()
                .map_err(|_| invalid("indicators", key, "length must be an integer"))
        })
        .transpose()
}

fn parse_timeframe(value: &str, section: &str) -> Result<Timeframe, CandlelabError> {
    value
        .parse()
        .map_err(|e: crate::domain::timeframe::ParseTimeframeError| {
            invalid(section, "timeframe", &e.to_string())
        })
}

/// RFC 3339 (`2024-01-01T00:00:00Z`) or a bare date at midnight UTC.
fn parse_datetime(value: &str, key: &str) -> Result<DateTime<Utc>, CandlelabError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| {
            invalid(
                "data",
                key,
                &format!("invalid {key} format, expected RFC 3339 or YYYY-MM-DD"),
            )
        })
}
