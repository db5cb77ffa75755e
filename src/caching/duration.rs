//! Caching metadata attached to interface methods.
//!
//! Durations are written in clock form, `[d.]hh:mm[:ss[.fffffff]]`, or as a
//! plain number of days. They are kept unparsed on the method descriptor and
//! resolved once, when a proxy is generated.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DAYS_ONLY: Regex = Regex::new(r"^(\d+)$").unwrap();
    static ref CLOCK: Regex =
        Regex::new(r"^(?:(\d+)\.)?(\d+):(\d+)(?::(\d+)(?:\.(\d{1,7}))?)?$").unwrap();
}

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Declared caching metadata of a single method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCaching {
    source: CachingSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CachingSource {
    Declared(String),
    Components { hours: u64, minutes: u64, seconds: u64 },
}

impl Default for ClientCaching {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientCaching {
    /// Zero duration; combine with `hours`/`minutes`/`seconds`.
    pub fn new() -> Self {
        Self {
            source: CachingSource::Components {
                hours: 0,
                minutes: 0,
                seconds: 0,
            },
        }
    }

    /// Keep a duration string for resolution at proxy-creation time.
    pub fn from_declared(value: impl Into<String>) -> Self {
        Self {
            source: CachingSource::Declared(value.into()),
        }
    }

    pub fn hours(self, hours: u64) -> Self {
        let (_, minutes, seconds) = self.components();
        self.with_components(hours, minutes, seconds)
    }

    pub fn minutes(self, minutes: u64) -> Self {
        let (hours, _, seconds) = self.components();
        self.with_components(hours, minutes, seconds)
    }

    pub fn seconds(self, seconds: u64) -> Self {
        let (hours, minutes, _) = self.components();
        self.with_components(hours, minutes, seconds)
    }

    /// The raw declared string, if the metadata came from one.
    pub fn declared(&self) -> Option<&str> {
        match &self.source {
            CachingSource::Declared(s) => Some(s),
            CachingSource::Components { .. } => None,
        }
    }

    /// Resolve into a concrete duration.
    pub fn resolve(&self) -> Result<Duration, String> {
        match &self.source {
            CachingSource::Declared(s) => parse_caching_duration(s),
            CachingSource::Components {
                hours,
                minutes,
                seconds,
            } => hours
                .checked_mul(3600)
                .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
                .and_then(|hm| hm.checked_add(*seconds))
                .map(Duration::from_secs)
                .ok_or_else(|| "duration overflows".to_string()),
        }
    }

    // Components of a declared string are dropped when switching to component
    // form; an unparseable string contributes zeros.
    fn components(&self) -> (u64, u64, u64) {
        match &self.source {
            CachingSource::Components {
                hours,
                minutes,
                seconds,
            } => (*hours, *minutes, *seconds),
            CachingSource::Declared(_) => {
                let secs = self.resolve().map(|d| d.as_secs()).unwrap_or(0);
                (secs / 3600, (secs % 3600) / 60, secs % 60)
            }
        }
    }

    fn with_components(self, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            source: CachingSource::Components {
                hours,
                minutes,
                seconds,
            },
        }
    }
}

/// Parse a duration string such as `"01:00:00"`, `"00:05"`, `"1.12:00:00"`,
/// `"00:00:01.5"` or `"2"` (days).
pub fn parse_caching_duration(input: &str) -> Result<Duration, String> {
    let value = input.trim();
    if value.is_empty() {
        return Err("empty duration".to_string());
    }

    if let Some(caps) = DAYS_ONLY.captures(value) {
        let days = parse_number(caps.get(1).map(|m| m.as_str()))?;
        return days
            .checked_mul(SECS_PER_DAY)
            .map(Duration::from_secs)
            .ok_or_else(|| "duration overflows".to_string());
    }

    let caps = CLOCK
        .captures(value)
        .ok_or_else(|| "expected [d.]hh:mm[:ss[.fffffff]] or a number of days".to_string())?;

    let days = caps
        .get(1)
        .map(|m| parse_number(Some(m.as_str())))
        .transpose()?
        .unwrap_or(0);
    let hours = parse_number(caps.get(2).map(|m| m.as_str()))?;
    let minutes = parse_number(caps.get(3).map(|m| m.as_str()))?;
    let seconds = caps
        .get(4)
        .map(|m| parse_number(Some(m.as_str())))
        .transpose()?
        .unwrap_or(0);

    if hours > 23 {
        return Err(format!("hours out of range: {hours}"));
    }
    if minutes > 59 {
        return Err(format!("minutes out of range: {minutes}"));
    }
    if seconds > 59 {
        return Err(format!("seconds out of range: {seconds}"));
    }

    // Fraction is expressed in 100ns ticks, padded to seven digits.
    let nanos = match caps.get(5) {
        Some(m) => {
            let padded = format!("{:0<7}", m.as_str());
            parse_number(Some(&padded))? * 100
        }
        None => 0,
    };

    let secs = days
        .checked_mul(SECS_PER_DAY)
        .and_then(|d| d.checked_add(hours * 3600 + minutes * 60 + seconds))
        .ok_or_else(|| "duration overflows".to_string())?;
    Ok(Duration::new(secs, nanos as u32))
}

fn parse_number(text: Option<&str>) -> Result<u64, String> {
    let text = text.ok_or_else(|| "missing component".to_string())?;
    text.parse::<u64>()
        .map_err(|e| format!("invalid number '{text}': {e}"))
}
