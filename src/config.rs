use serde::Deserialize;

/// bcrypt work factor applied to new credentials unless overridden.
pub const DEFAULT_HASH_COST: u32 = 10;

// bcrypt rejects costs outside this range.
const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Unset means accounts live in process memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub hash_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let db_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let hash_cost = parse_hash_cost(std::env::var("PASSWORD_HASH_COST").ok().as_deref())?;
        Ok(Self {
            database_url,
            db_max_connections,
            hash_cost,
        })
    }
}

fn parse_hash_cost(raw: Option<&str>) -> anyhow::Result<u32> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_HASH_COST);
    };
    let cost: u32 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("PASSWORD_HASH_COST must be an integer, got {raw:?}"))?;
    anyhow::ensure!(
        (MIN_HASH_COST..=MAX_HASH_COST).contains(&cost),
        "PASSWORD_HASH_COST must be within {}..={}, got {}",
        MIN_HASH_COST,
        MAX_HASH_COST,
        cost
    );
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_cost_defaults_to_ten() {
        assert_eq!(parse_hash_cost(None).unwrap(), 10);
    }

    #[test]
    fn hash_cost_accepts_bcrypt_range() {
        assert_eq!(parse_hash_cost(Some("4")).unwrap(), 4);
        assert_eq!(parse_hash_cost(Some(" 12 ")).unwrap(), 12);
    }

    #[test]
    fn hash_cost_rejects_garbage_and_out_of_range() {
        assert!(parse_hash_cost(Some("ten")).is_err());
        assert!(parse_hash_cost(Some("3")).is_err());
        assert!(parse_hash_cost(Some("32")).is_err());
    }
}
