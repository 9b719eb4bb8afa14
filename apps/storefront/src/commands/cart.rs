//! # Cart Commands
//!
//! Runs cart commands against a [`CartStore`] and renders the bag drawer.
//!
//! ## Drawer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Your bag (3)                                                          │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  [0] Rolex Land-Dweller               x2      $500.00                  │
//! │  [1] Heritage Tan Wallet              x1       $45.00                  │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  Subtotal                                     $545.00                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index in brackets is what `zaynar remove` and `zaynar set-qty` take.

use serde::Serialize;
use tracing::{debug, warn};
use zaynar_core::{CartCommand, CartPhase, CartTotals, LineItem};

use crate::error::{AppError, AppResult, ErrorBody};
use crate::state::{CartStore, ChangeFlag, CommandOutcome, CommandReport, DisplaySettings};

/// Cart contents plus totals, as `--json` prints them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
    pub phase: CartPhase,
}

impl From<&CartStore> for CartResponse {
    fn from(store: &CartStore) -> Self {
        CartResponse {
            items: store.items().to_vec(),
            totals: store.compute_totals(),
            phase: store.phase(),
        }
    }
}

/// What `exec --json` prints: one report per command that ran, and the
/// error that stopped the batch, if any.
#[derive(Debug, Clone, Serialize)]
pub struct ExecResponse {
    pub reports: Vec<CommandReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Decodes one JSON command, or a JSON array of them.
///
/// ```json
/// {"type":"add_item","product_id":"wallet-tan"}
/// [{"type":"add_item","product_id":"wallet-tan"},{"type":"clear"}]
/// ```
pub fn parse_commands(json: &str) -> AppResult<Vec<CartCommand>> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| AppError::Command(e.to_string()))?;

    let commands = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|command| vec![command])
    };

    commands.map_err(|e| AppError::Command(e.to_string()))
}

/// Dispatches `commands` in order and renders the result.
///
/// The drawer is re-rendered only when `flag` saw a change; otherwise the
/// output holds just the notices (duplicate, ignored, persistence warning).
///
/// A command that fails stops the batch. Commands before it stay applied
/// and persisted, so their reports are kept and the failure is printed as
/// one more notice.
pub async fn execute(
    store: &mut CartStore,
    flag: &ChangeFlag,
    commands: Vec<CartCommand>,
    display: &DisplaySettings,
    json: bool,
) -> AppResult<String> {
    let mut reports = Vec::with_capacity(commands.len());
    let mut failure = None;
    for command in commands {
        match store.dispatch(command).await {
            Ok(report) => {
                debug!(outcome = ?report.outcome, "Command finished");
                reports.push(report);
            }
            Err(e) => {
                warn!(error = %e, completed = reports.len(), "Command failed, stopping batch");
                failure = Some(e);
                break;
            }
        }
    }

    if json {
        let response = ExecResponse {
            reports,
            error: failure.as_ref().map(AppError::body),
        };
        return Ok(serde_json::to_string_pretty(&response)?);
    }

    let mut lines: Vec<String> = reports.iter().filter_map(notice).collect();
    if let Some(e) = &failure {
        lines.push(format!("error: {}", e));
    }
    if flag.take() {
        lines.push(render_drawer(store, display));
    }
    Ok(lines.join("\n"))
}

/// Renders the current cart (`zaynar show`).
pub fn show(store: &CartStore, display: &DisplaySettings, json: bool) -> AppResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&CartResponse::from(store))?);
    }
    Ok(render_drawer(store, display))
}

/// One-line message for outcomes the shopper should hear about.
pub fn notice(report: &CommandReport) -> Option<String> {
    let message = match &report.outcome {
        CommandOutcome::Duplicate { name } => Some(format!("{} is already in your bag.", name)),
        CommandOutcome::UnknownProduct => Some("No such product; nothing added.".to_string()),
        CommandOutcome::OutOfRange => Some("No item at that position.".to_string()),
        CommandOutcome::Rejected => {
            Some("Each item can only be added once to this bag.".to_string())
        }
        _ => None,
    };

    match (&report.persist_error, message) {
        (Some(err), Some(msg)) => Some(format!("{}\nwarning: cart not saved: {}", msg, err)),
        (Some(err), None) => Some(format!("warning: cart not saved: {}", err)),
        (None, msg) => msg,
    }
}

/// Renders the bag drawer as text.
pub fn render_drawer(store: &CartStore, display: &DisplaySettings) -> String {
    if store.phase() == CartPhase::Empty {
        return display.empty_message.clone();
    }

    let symbol = display.currency_symbol.as_str();
    let totals = store.compute_totals();
    let rule = "-".repeat(60);

    let mut out = Vec::with_capacity(store.items().len() + 4);
    out.push(format!("Your bag ({})", totals.item_count));
    out.push(rule.clone());
    for (index, item) in store.items().iter().enumerate() {
        out.push(format!(
            "[{}] {:<32} x{:<4} {:>12}",
            index,
            item.name,
            item.quantity,
            item.line_total().format_with(symbol)
        ));
    }
    out.push(rule);
    out.push(format!(
        "{:<44} {:>12}",
        "Subtotal",
        totals.subtotal.format_with(symbol)
    ));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zaynar_core::{Catalog, CoreError, DuplicatePolicy, Money};
    use zaynar_db::MemorySnapshotStore;

    fn store(policy: DuplicatePolicy) -> (CartStore, Arc<ChangeFlag>) {
        let flag = Arc::new(ChangeFlag::new());
        let store = CartStore::new(
            Arc::new(Catalog::storefront()),
            Arc::new(MemorySnapshotStore::new()),
            policy,
        )
        .with_observer(flag.clone());
        (store, flag)
    }

    #[test]
    fn test_parse_single_and_batch() {
        let one = parse_commands(r#"{"type":"add_item","product_id":"wallet-tan"}"#).unwrap();
        assert_eq!(
            one,
            vec![CartCommand::AddItem {
                product_id: "wallet-tan".to_string()
            }]
        );

        let many = parse_commands(r#"[{"type":"clear"},{"type":"remove_item","index":2}]"#)
            .unwrap();
        assert_eq!(many.len(), 2);

        assert!(matches!(
            parse_commands(r#"{"type":"checkout"}"#),
            Err(AppError::Command(_))
        ));
    }

    #[test]
    fn test_empty_drawer_shows_placeholder() {
        let (store, _) = store(DuplicatePolicy::Merge);
        assert_eq!(
            render_drawer(&store, &DisplaySettings::default()),
            "Your bag is empty."
        );
    }

    #[tokio::test]
    async fn test_execute_renders_drawer_after_change() {
        let (mut store, flag) = store(DuplicatePolicy::Merge);
        let commands = vec![
            CartCommand::AddItem {
                product_id: "rolex-green".to_string(),
            },
            CartCommand::AddItem {
                product_id: "rolex-green".to_string(),
            },
        ];

        let out = execute(&mut store, &flag, commands, &DisplaySettings::default(), false)
            .await
            .unwrap();
        assert!(out.starts_with("Your bag (2)"));
        assert!(out.contains("Rolex Land-Dweller"));
        assert!(out.contains("$500.00"));
    }

    #[tokio::test]
    async fn test_execute_duplicate_prints_notice_only() {
        let (mut store, flag) = store(DuplicatePolicy::Reject);
        let add = CartCommand::AddNamed {
            name: "Heritage Tan Wallet".to_string(),
            price: Money::from_major(45),
        };
        execute(&mut store, &flag, vec![add.clone()], &DisplaySettings::default(), false)
            .await
            .unwrap();

        let out = execute(&mut store, &flag, vec![add], &DisplaySettings::default(), false)
            .await
            .unwrap();
        assert_eq!(out, "Heritage Tan Wallet is already in your bag.");
    }

    #[tokio::test]
    async fn test_execute_json_reports() {
        let (mut store, flag) = store(DuplicatePolicy::Merge);
        let out = execute(
            &mut store,
            &flag,
            vec![CartCommand::RemoveItem { index: 3 }],
            &DisplaySettings::default(),
            true,
        )
        .await
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["reports"][0]["outcome"]["kind"], "out_of_range");
        assert_eq!(json["reports"][0]["phase"], "empty");
        assert!(json.get("error").is_none());
    }

    fn batch_with_failing_middle() -> Vec<CartCommand> {
        vec![
            CartCommand::AddItem {
                product_id: "rolex-green".to_string(),
            },
            CartCommand::UpdateQuantity {
                index: 0,
                quantity: 1000,
            },
            CartCommand::AddItem {
                product_id: "wallet-tan".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_execute_failure_keeps_earlier_commands() {
        let (mut store, flag) = store(DuplicatePolicy::Merge);
        let display = DisplaySettings::default();

        let out = execute(&mut store, &flag, batch_with_failing_middle(), &display, false)
            .await
            .unwrap();

        let expected = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert!(out.starts_with(&format!("error: {}", expected)));
        assert!(out.contains("Your bag (1)"));
        assert!(out.contains("Rolex Land-Dweller"));
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_execute_json_failure_keeps_reports() {
        let (mut store, flag) = store(DuplicatePolicy::Merge);

        let out = execute(
            &mut store,
            &flag,
            batch_with_failing_middle(),
            &DisplaySettings::default(),
            true,
        )
        .await
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["reports"].as_array().unwrap().len(), 1);
        assert_eq!(json["reports"][0]["outcome"]["kind"], "added");
        assert_eq!(json["error"]["code"], "CART_ERROR");
    }

    #[test]
    fn test_notice_includes_persist_warning() {
        let report = CommandReport {
            outcome: CommandOutcome::Added { index: 0 },
            phase: CartPhase::NonEmpty,
            totals: CartTotals::default(),
            persist_error: Some("Storage error: unavailable".to_string()),
        };
        assert_eq!(
            notice(&report).as_deref(),
            Some("warning: cart not saved: Storage error: unavailable")
        );
    }
}
