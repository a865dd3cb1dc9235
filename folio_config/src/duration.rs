use std::{ops::Deref, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// A duration written as whitespace separated `<number><unit>` parts, e.g.
/// `"1d 2h 3m 4s"` or `"500ms"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid duration")]
pub struct InvalidDuration;

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Duration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(parse_part)
            .try_fold(std::time::Duration::ZERO, |acc, part| {
                acc.checked_add(part?).ok_or(InvalidDuration)
            })
            .map(Self)
    }
}

fn parse_part(part: &str) -> Result<std::time::Duration, InvalidDuration> {
    let split = part
        .find(|c: char| !c.is_ascii_digit())
        .ok_or(InvalidDuration)?;
    let (value, unit) = part.split_at(split);
    let value = value.parse::<u64>().map_err(|_| InvalidDuration)?;

    if unit == "ms" {
        return Ok(std::time::Duration::from_millis(value));
    }

    let seconds_per_unit = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return Err(InvalidDuration),
    };

    value
        .checked_mul(seconds_per_unit)
        .map(std::time::Duration::from_secs)
        .ok_or(InvalidDuration)
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
