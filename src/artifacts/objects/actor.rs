//! Author and committer identities
//!
//! ## Format
//!
//! ```text
//! Name <email>                         actor
//! Name <email> <timestamp> <timezone>  signature, e.g. "A U Thor <a@u.com> 1210193388 -0400"
//! ```
//!
//! The timezone is `[+-]HHMM` and is stored as signed seconds east of UTC.

use crate::errors::{Error, Result};
use derive_new::new;

/// A named, emailed party recorded as author or committer
#[derive(Debug, Clone, Eq, PartialEq, Hash, new)]
pub struct Actor {
    name: String,
    email: String,
}

impl Actor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Decode `Name <email>`
    ///
    /// The email must be the last thing on the line and the brackets must be
    /// balanced; anything else is a format error rather than a truncated actor.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim_end();
        let email_start = value
            .find('<')
            .ok_or_else(|| Error::format(0, format!("actor without '<': {value:?}")))?;
        let email_end = value
            .rfind('>')
            .ok_or_else(|| Error::format(0, format!("actor without '>': {value:?}")))?;

        if email_end < email_start || email_end + 1 != value.len() {
            return Err(Error::format(0, format!("malformed actor: {value:?}")));
        }

        let email = &value[email_start + 1..email_end];
        if email.contains(['<', '>']) {
            return Err(Error::format(0, format!("malformed actor email: {value:?}")));
        }

        Ok(Actor {
            name: value[..email_start].trim().to_string(),
            email: email.to_string(),
        })
    }
}

impl TryFrom<&str> for Actor {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Actor::parse(value)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Actor plus the moment they acted
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Signature {
    actor: Actor,
    /// Unix timestamp in seconds
    timestamp: i64,
    /// Seconds east of UTC
    tz_offset: i32,
}

impl Signature {
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn tz_offset(&self) -> i32 {
        self.tz_offset
    }

    /// Local time of the signature
    ///
    /// # Returns
    ///
    /// `None` only if the timestamp is outside chrono's representable range
    pub fn datetime(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        let offset = chrono::FixedOffset::east_opt(self.tz_offset)?;
        chrono::DateTime::from_timestamp(self.timestamp, 0).map(|utc| utc.with_timezone(&offset))
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        match self.datetime() {
            Some(datetime) => datetime.format("%a %b %-d %H:%M:%S %Y %z").to_string(),
            None => format!("{} {}", self.timestamp, format_tz_offset(self.tz_offset)),
        }
    }

    /// Decode `Name <email> <timestamp> <[+-]HHMM>`
    pub fn parse(value: &str) -> Result<Self> {
        // Split from the right: the name may contain spaces, the tail never does
        let parts: Vec<&str> = value.trim_end().rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(Error::format(0, format!("signature too short: {value:?}")));
        }

        let tz_offset = parse_tz_offset(parts[0])?;
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| Error::parse(0, format!("invalid timestamp {:?}", parts[1])))?;
        let actor = Actor::parse(parts[2])?;

        Ok(Signature {
            actor,
            timestamp,
            tz_offset,
        })
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.actor,
            self.timestamp,
            format_tz_offset(self.tz_offset)
        )
    }
}

/// Convert `[+-]HHMM` into signed seconds east of UTC
pub fn parse_tz_offset(value: &str) -> Result<i32> {
    let invalid = || Error::parse(0, format!("invalid timezone offset {value:?}"));

    let (sign, digits) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    Ok(sign * (hours * 3600 + minutes * 60))
}

pub fn format_tz_offset(offset: i32) -> String {
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.unsigned_abs();
    format!("{sign}{:02}{:02}", offset / 3600, (offset % 3600) / 60)
}
