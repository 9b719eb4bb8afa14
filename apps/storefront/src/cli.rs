//! # Command Line
//!
//! ```text
//! zaynar [--config <path>] [--db <path>] [--policy merge|reject]
//!        [--ephemeral] [--json] <command>
//!
//!   catalog                     list products
//!   show                        print the bag
//!   add <product-id>            add one unit
//!   add-named <name> <price>    add by display name at the shown price
//!   remove <index>              remove a line
//!   set-qty <index> <qty>       set a line's quantity (0 removes)
//!   clear                       empty the bag
//!   exec <json>                 dispatch raw JSON command(s)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zaynar_core::{CartCommand, DuplicatePolicy, Money};

use crate::commands::cart::parse_commands;
use crate::error::AppResult;
use crate::state::StorefrontConfig;

/// `zaynar` arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "zaynar", about = "Zaynar storefront shopping bag", version)]
pub struct Cli {
    /// Config file. Defaults to `zaynar.toml` in the platform config dir.
    #[arg(long, value_name = "path", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite file holding the cart snapshot.
    #[arg(long, value_name = "path", global = true)]
    pub db: Option<PathBuf>,

    /// What adding an already-present product does.
    #[arg(long, value_name = "merge|reject", global = true)]
    pub policy: Option<DuplicatePolicy>,

    /// Keep the cart in memory for this invocation only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the products in the catalog.
    Catalog,

    /// Print the bag.
    Show,

    /// Add one unit of a product by id.
    Add {
        #[arg(value_name = "product-id")]
        product_id: String,
    },

    /// Add a product by display name at the shown price.
    AddNamed { name: String, price: Money },

    /// Remove the line at a position.
    Remove { index: usize },

    /// Set the quantity of the line at a position (0 removes it).
    SetQty { index: usize, quantity: u32 },

    /// Empty the bag.
    Clear,

    /// Dispatch a JSON command, or a JSON array of commands.
    Exec {
        #[arg(id = "exec_json", value_name = "json")]
        json: String,
    },
}

impl Cli {
    /// Applies command-line overrides on top of file and environment config.
    pub fn apply_to(&self, config: &mut StorefrontConfig) {
        if let Some(db) = &self.db {
            config.storage.database_path = Some(db.clone());
        }
        if let Some(policy) = self.policy {
            config.cart.duplicate_policy = policy;
        }
        if self.ephemeral {
            config.storage.ephemeral = true;
        }
    }
}

impl Command {
    /// Cart commands to dispatch. Empty for read-only subcommands.
    pub fn cart_commands(&self) -> AppResult<Vec<CartCommand>> {
        let command = match self {
            Command::Catalog | Command::Show => return Ok(Vec::new()),
            Command::Exec { json } => return parse_commands(json),
            Command::Add { product_id } => CartCommand::AddItem {
                product_id: product_id.clone(),
            },
            Command::AddNamed { name, price } => CartCommand::AddNamed {
                name: name.clone(),
                price: *price,
            },
            Command::Remove { index } => CartCommand::RemoveItem { index: *index },
            Command::SetQty { index, quantity } => CartCommand::UpdateQuantity {
                index: *index,
                quantity: *quantity,
            },
            Command::Clear => CartCommand::Clear,
        };
        Ok(vec![command])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_named_price() {
        let cli =
            Cli::try_parse_from(["zaynar", "add-named", "Heritage Tan Wallet", "$45"]).unwrap();
        assert_eq!(
            cli.command.cart_commands().unwrap(),
            vec![CartCommand::AddNamed {
                name: "Heritage Tan Wallet".to_string(),
                price: Money::from_major(45),
            }]
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "zaynar", "add", "wallet-tan", "--policy", "reject", "--json",
        ])
        .unwrap();
        assert_eq!(cli.policy, Some(DuplicatePolicy::Reject));
        assert!(cli.json);

        let mut config = StorefrontConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.cart.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_invalid_price_is_rejected() {
        assert!(Cli::try_parse_from(["zaynar", "add-named", "Watch", "12.345"]).is_err());
    }

    #[test]
    fn test_read_only_commands() {
        let cli = Cli::try_parse_from(["zaynar", "show"]).unwrap();
        assert!(cli.command.cart_commands().unwrap().is_empty());
    }

    #[test]
    fn test_set_qty() {
        let cli = Cli::try_parse_from(["zaynar", "set-qty", "1", "0"]).unwrap();
        assert_eq!(
            cli.command.cart_commands().unwrap(),
            vec![CartCommand::UpdateQuantity { index: 1, quantity: 0 }]
        );
    }
}
