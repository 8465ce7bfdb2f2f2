//! Catalog configuration: parsing, normalization, and loading.
//!
//! The TOML shape maps category names to product lists:
//!
//! ```toml
//! [categories.Electronics]
//! [[categories.Electronics.products]]
//! name = "Wireless Headphones"
//! description = "Over-ear, noise cancelling"
//! price = "120.50"
//! stock = 40
//! ```
//!
//! Key behaviors:
//! - Normalization trims category keys and product fields, rejects empties,
//!   validates prices as two-digit decimals, and de-duplicates products per
//!   category while preserving order.
//! - Duplicate product names within a category can be dropped or treated as
//!   an error via [`DuplicateProductPolicy`].
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_catalog_str`]
//! - Parse + normalize from a file path: [`load_catalog_path`]
//! - Normalization with explicit policy: [`normalize_catalog_with_policy`]

use std::collections::HashSet;
use std::mem;

use anyhow::{Context, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use toml::from_str;

use crate::money;

/// Top-level catalog mapping category names to their product lists.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Map of category name -> configuration. Keys are trimmed during
    /// normalization; insertion order is preserved.
    pub categories: IndexMap<String, CategoryCfg>,
}

/// Product list for one category.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryCfg {
    /// Products in this category.
    #[serde(default)]
    pub products: Vec<ProductCfg>,
}

/// One product entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProductCfg {
    /// Display name; unique within its category after normalization.
    pub name: String,
    /// Optional description; cleared to `None` when blank.
    pub description: Option<String>,
    /// Decimal price string with at most two fractional digits ("120.50").
    pub price: String,
    /// Initial stock for newly created products. Ignored on products that
    /// already exist: live stock belongs to the stock guard.
    #[serde(default)]
    pub stock: i32,
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default)]
pub struct NormalizationReport {
    /// Number of category keys that changed when trimming.
    pub categories_renamed: usize,
    /// Count of removed duplicate products (by name within a category).
    pub products_deduped: usize,
    /// Count of blank descriptions cleared to `None`.
    pub descriptions_cleared: usize,
}

/// Policy for duplicate product names within one category.
#[derive(Copy, Clone, Debug)]
pub enum DuplicateProductPolicy {
    /// Keep the first occurrence, drop the rest.
    Drop,
    /// Treat as an error.
    Error,
}

/// Normalize a catalog in place with an explicit duplicate-product policy.
///
/// What normalization does:
/// - Trim category keys; reject empty or duplicate keys after trimming
/// - Trim product names; reject empties
/// - Validate each price parses as a non-negative two-digit decimal
/// - Reject negative stock
/// - Clear blank descriptions to `None`
/// - De-duplicate products by name within a category (`Drop` vs `Error`)
pub fn normalize_catalog_with_policy(
    cat: &mut Catalog,
    policy: DuplicateProductPolicy,
) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    let mut rebuilt: IndexMap<String, CategoryCfg> = IndexMap::new();
    let old = mem::take(&mut cat.categories);

    for (raw_name, mut cfg) in old {
        let name = raw_name.trim().to_string();
        if name.is_empty() {
            bail!("category name cannot be empty after trimming");
        }
        if name != raw_name {
            report.categories_renamed += 1;
        }
        if rebuilt.contains_key(&name) {
            bail!("duplicate category after normalization: {name}");
        }

        let before_len = cfg.products.len();
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(before_len);

        for mut p in mem::take(&mut cfg.products) {
            p.name = p.name.trim().to_string();
            if p.name.is_empty() {
                bail!("product name cannot be empty after trimming (category {name})");
            }

            let cents = money::parse_price_cents(&p.price)
                .with_context(|| format!("product {:?} in category {name}", p.name))?;
            if cents < 0 {
                bail!("product {:?} has a negative price", p.name);
            }
            if p.stock < 0 {
                bail!("product {:?} has negative stock", p.name);
            }

            if let Some(desc) = &p.description {
                let trimmed = desc.trim();
                if trimmed.is_empty() {
                    p.description = None;
                    report.descriptions_cleared += 1;
                } else if trimmed != desc {
                    p.description = Some(trimmed.to_string());
                }
            }

            if seen.insert(p.name.clone()) {
                out.push(p);
            } else {
                match policy {
                    DuplicateProductPolicy::Drop => report.products_deduped += 1,
                    DuplicateProductPolicy::Error => {
                        bail!("duplicate product {:?} in category {name}", p.name);
                    }
                }
            }
        }

        cfg.products = out;
        rebuilt.insert(name, cfg);
    }

    cat.categories = rebuilt;
    Ok(report)
}

/// Normalize with [`DuplicateProductPolicy::Drop`], silently dropping
/// duplicate products.
pub fn normalize_catalog(cat: &mut Catalog) -> anyhow::Result<NormalizationReport> {
    normalize_catalog_with_policy(cat, DuplicateProductPolicy::Drop)
}

/// Parse and normalize a catalog from a TOML string.
pub fn load_catalog_str(toml_str: &str) -> anyhow::Result<Catalog> {
    let mut cat: Catalog = from_str(toml_str).context("failed to parse catalog TOML")?;
    let _report = normalize_catalog(&mut cat).context("normalize_catalog failed")?;
    Ok(cat)
}

/// Read a catalog TOML file from disk, parse, and normalize it.
pub fn load_catalog_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<Catalog> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read catalog file {}", path.as_ref().display()))?;
    load_catalog_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk() -> Catalog {
        let mut categories: IndexMap<String, CategoryCfg> = IndexMap::new();
        categories.insert(
            " Electronics ".into(),
            CategoryCfg {
                products: vec![
                    ProductCfg {
                        name: " Wireless Headphones ".into(),
                        description: Some("  ".into()),
                        price: "120.50".into(),
                        stock: 40,
                    },
                    ProductCfg {
                        name: "Wireless Headphones".into(),
                        description: None,
                        price: "99.00".into(),
                        stock: 10,
                    }, // dup name -> dropped
                    ProductCfg {
                        name: "Bluetooth Speaker".into(),
                        description: Some("Portable".into()),
                        price: "45.00".into(),
                        stock: 15,
                    },
                ],
            },
        );
        Catalog { categories }
    }

    #[test]
    fn trims_and_dedupes() {
        let mut cat = mk();
        let report = normalize_catalog(&mut cat).unwrap();

        let (name, cfg) = cat.categories.first().unwrap();
        assert_eq!(name, "Electronics");
        assert_eq!(report.categories_renamed, 1);
        assert_eq!(report.products_deduped, 1);
        assert_eq!(report.descriptions_cleared, 1);

        assert_eq!(cfg.products.len(), 2);
        assert_eq!(cfg.products[0].name, "Wireless Headphones");
        assert_eq!(cfg.products[0].description, None);
        assert_eq!(cfg.products[0].price, "120.50"); // first occurrence wins
        assert_eq!(cfg.products[1].name, "Bluetooth Speaker");
    }

    #[test]
    fn duplicate_product_as_error() {
        let mut cat = mk();
        let err =
            normalize_catalog_with_policy(&mut cat, DuplicateProductPolicy::Error).unwrap_err();
        assert!(err.to_string().contains("duplicate product"));
    }

    #[test]
    fn duplicate_category_collision_errors() {
        let mut cat = mk();
        cat.categories
            .insert("Electronics".into(), CategoryCfg::default());
        let err = normalize_catalog(&mut cat).unwrap_err();
        assert!(err.to_string().contains("duplicate category"));
    }

    #[test]
    fn bad_price_errors_with_context() {
        let toml_str = r#"
            [categories.Books]
            [[categories.Books.products]]
            name = "Mystery Novel"
            price = "15.005"
        "#;
        let mut cat: Catalog = toml::from_str(toml_str).unwrap();
        let err = normalize_catalog(&mut cat).unwrap_err();
        assert!(format!("{err:#}").contains("Mystery Novel"));
    }

    #[test]
    fn load_catalog_str_round_trip() {
        let toml_str = r#"
            [categories.Toys]
            [[categories.Toys.products]]
            name = "Lego Set"
            description = "Bricks"
            price = "55.25"
            stock = 30

            [categories.Groceries]
            [[categories.Groceries.products]]
            name = "Pasta Pack"
            price = "4.75"
            stock = 120
        "#;
        let cat = load_catalog_str(toml_str).unwrap();
        assert_eq!(cat.categories.len(), 2);
        assert_eq!(cat.categories["Toys"].products[0].name, "Lego Set");
        assert_eq!(cat.categories["Groceries"].products[0].stock, 120);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn category_keys_trimmed_and_unique(
            names in proptest::collection::vec("[a-zA-Z]{1,8}", 1..5),
        ) {
            let mut cat = Catalog { categories: IndexMap::new() };
            for (i, n) in names.iter().enumerate() {
                let key = if i % 2 == 0 { format!(" {n}") } else { format!("{n}  ") };
                cat.categories.insert(key, CategoryCfg::default());
            }

            if normalize_catalog(&mut cat).is_ok() {
                for key in cat.categories.keys() {
                    prop_assert_eq!(key.trim(), key.as_str());
                    prop_assert!(!key.is_empty());
                }
            }
            // a trim collision is allowed to error; property holds for success cases
        }
    }
}
