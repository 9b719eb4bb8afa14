//! # Catalog Commands
//!
//! Lists the products a shopper can add.

use zaynar_core::{Catalog, Product};

use crate::error::AppResult;
use crate::state::DisplaySettings;

/// Renders the catalog (`zaynar catalog`).
pub fn list(catalog: &Catalog, display: &DisplaySettings, json: bool) -> AppResult<String> {
    if json {
        let products: Vec<&Product> = catalog.iter().collect();
        return Ok(serde_json::to_string_pretty(&products)?);
    }

    let lines: Vec<String> = catalog
        .iter()
        .map(|p| {
            format!(
                "{:<16} {:<32} {:>12}",
                p.id,
                p.name,
                p.price.format_with(&display.currency_symbol)
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_text() {
        let out = list(&Catalog::storefront(), &DisplaySettings::default(), false).unwrap();
        assert_eq!(out.lines().count(), 8);
        assert!(out.lines().any(|l| l.starts_with("patek-silver") && l.ends_with("$450.00")));
    }

    #[test]
    fn test_list_json_uses_snapshot_field_names() {
        let out = list(&Catalog::storefront(), &DisplaySettings::default(), true).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 8);
        assert!(json[0].get("img").is_some());
    }
}
