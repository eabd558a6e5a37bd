use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};

use crate::models::EntityKind;

#[derive(Parser, Debug)]
#[command(name = "bizdash")]
#[command(about = "Terminal dashboard for business categories, locations, suppliers and roles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides BIZDASH_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Business to administer (overrides BIZDASH_BUSINESS_ID)
    #[arg(long, global = true)]
    pub business_id: Option<i64>,

    /// Bearer token (overrides BIZDASH_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Launch the interactive dashboard (default)
    Tui,

    /// Print every record of one kind
    List {
        /// categories, locations, suppliers or roles
        entity: String,
    },

    /// Validate and submit a new record
    Create {
        /// categories, locations, suppliers or roles
        entity: String,

        /// Field value as key=value; repeatable
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

impl Commands {
    pub fn parse_entity(entity: &str) -> Result<EntityKind> {
        EntityKind::parse(entity).ok_or_else(|| {
            anyhow!(
                "Unsupported entity: {}. Supported entities: categories, locations, suppliers, roles",
                entity
            )
        })
    }

    /// Collect `key=value` pairs; later keys win
    pub fn parse_assignments(pairs: &[String]) -> Result<HashMap<String, String>> {
        let mut values = HashMap::new();
        for pair in pairs {
            let Some((key, value)) = pair.split_once('=') else {
                bail!("Expected KEY=VALUE, got: {}", pair);
            };
            let key = key.trim();
            if key.is_empty() {
                bail!("Empty field name in: {}", pair);
            }
            values.insert(key.to_string(), value.to_string());
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_tui() {
        let cli = Cli::parse_from(["bizdash"]);
        assert!(cli.command.is_none());
        assert!(cli.business_id.is_none());
    }

    #[test]
    fn test_create_with_assignments_and_globals() {
        let cli = Cli::parse_from([
            "bizdash",
            "create",
            "suppliers",
            "--set",
            "name=Ali",
            "-s",
            "mobile_no=923411415567",
            "--business-id",
            "7",
        ]);
        assert_eq!(cli.business_id, Some(7));
        match cli.command {
            Some(Commands::Create { entity, set }) => {
                assert_eq!(Commands::parse_entity(&entity).unwrap(), EntityKind::Supplier);
                let values = Commands::parse_assignments(&set).unwrap();
                assert_eq!(values["name"], "Ali");
                assert_eq!(values["mobile_no"], "923411415567");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_assignment_errors() {
        assert!(Commands::parse_assignments(&["name".to_string()]).is_err());
        assert!(Commands::parse_assignments(&["=x".to_string()]).is_err());
        let values = Commands::parse_assignments(&["note=a=b".to_string()]).unwrap();
        assert_eq!(values["note"], "a=b");
    }

    #[test]
    fn test_unknown_entity() {
        assert!(Commands::parse_entity("widgets").is_err());
    }
}
