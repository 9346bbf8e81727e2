use std::{fmt, str::FromStr};

use anyhow::{bail, Context};

/// Whether a cancelled appointment keeps its slot out of the open list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelledSlotPolicy {
    /// Every stored appointment counts as booked, whatever its status.
    Block,
    /// Cancelled appointments free their slot again.
    Release,
}

impl Default for CancelledSlotPolicy {
    fn default() -> Self {
        CancelledSlotPolicy::Block
    }
}

impl FromStr for CancelledSlotPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(CancelledSlotPolicy::Block),
            "release" => Ok(CancelledSlotPolicy::Release),
            other => bail!("unknown cancelled slot policy '{}'", other),
        }
    }
}

impl fmt::Display for CancelledSlotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelledSlotPolicy::Block => f.write_str("block"),
            CancelledSlotPolicy::Release => f.write_str("release"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind: String,
    pub pool_size: u32,
    pub session_ttl_secs: i64,
    pub cancelled_slots: CancelledSlotPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "booking.db".to_string(),
            bind: "127.0.0.1:8080".to_string(),
            pool_size: 8,
            session_ttl_secs: 3600,
            cancelled_slots: CancelledSlotPolicy::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(url) = lookup("DATABASE_URL") {
            settings.database_url = url;
        }
        if let Some(bind) = lookup("BIND_ADDR") {
            settings.bind = bind;
        }
        if let Some(size) = lookup("DB_POOL_SIZE") {
            settings.pool_size = size.parse().context("DB_POOL_SIZE must be a number")?;
            if settings.pool_size == 0 {
                bail!("DB_POOL_SIZE must be at least 1");
            }
        }
        if let Some(ttl) = lookup("SESSION_TTL_SECS") {
            settings.session_ttl_secs = ttl.parse().context("SESSION_TTL_SECS must be a number")?;
        }
        if let Some(policy) = lookup("CANCELLED_SLOTS") {
            settings.cancelled_slots = policy.parse().context("CANCELLED_SLOTS")?;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.bind, "127.0.0.1:8080");
        assert_eq!(settings.session_ttl_secs, 3600);
        assert_eq!(settings.cancelled_slots, CancelledSlotPolicy::Block);
    }

    #[test]
    fn overrides_are_read() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "/tmp/x.db"),
            ("CANCELLED_SLOTS", "Release"),
            ("SESSION_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url, "/tmp/x.db");
        assert_eq!(settings.cancelled_slots, CancelledSlotPolicy::Release);
        assert_eq!(settings.session_ttl_secs, 60);
    }

    #[test]
    fn bad_values_fail_startup() {
        assert!(Settings::from_lookup(lookup(&[("CANCELLED_SLOTS", "maybe")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("DB_POOL_SIZE", "0")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("SESSION_TTL_SECS", "soon")])).is_err());
    }
}
