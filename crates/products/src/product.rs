use serde::{Deserialize, Serialize};

use inventario_core::validate::{
    optional_positive, patch_text, require_non_negative, require_positive, require_present,
    require_text,
};
use inventario_core::{
    DomainResult, Lifecycle, Resource, active_flag, filter, merge_nullable, nullable,
};

/// Product: a sellable catalogue item identified by a unique SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "nombre")]
    pub name: String,
    pub sku: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precioCosto")]
    pub cost_price: Option<f64>,
    #[serde(rename = "precioVenta")]
    pub sale_price: f64,
    #[serde(rename = "stockTotal")]
    pub total_stock: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precioCosto")]
    pub cost_price: Option<f64>,
    #[serde(rename = "precioVenta")]
    pub sale_price: Option<f64>,
    #[serde(rename = "stockTotal")]
    pub total_stock: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(rename = "descripcion", default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(rename = "precioCosto", default, deserialize_with = "nullable")]
    pub cost_price: Option<Option<f64>>,
    #[serde(rename = "precioVenta")]
    pub sale_price: Option<f64>,
    #[serde(rename = "stockTotal")]
    pub total_stock: Option<i32>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

/// List criteria. `min_sale_price` keeps products priced at or above the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(rename = "precioVenta")]
    pub min_sale_price: Option<f64>,
}

impl Resource for Product {
    type Draft = NewProduct;
    type Patch = ProductPatch;
    type Filter = ProductFilter;

    const NAME: &'static str = "product";
    const COLLECTION: &'static str = "productos";
    const RETIRED: Lifecycle = Lifecycle::Inactive;
    const UNIQUE_FIELD: Option<&'static str> = Some("sku");

    fn validate(draft: NewProduct) -> DomainResult<Self> {
        let name = require_text(draft.name, "nombre")?;
        let sku = require_text(draft.sku, "sku")?;
        let sale_price = require_positive(require_present(draft.sale_price, "precioVenta")?, "precioVenta")?;

        Ok(Self {
            name,
            sku,
            description: draft.description,
            cost_price: optional_positive(draft.cost_price, "precioCosto")?,
            sale_price,
            total_stock: require_non_negative(draft.total_stock.unwrap_or(0), "stockTotal")?,
        })
    }

    fn apply_patch(self, lifecycle: Lifecycle, patch: ProductPatch) -> DomainResult<(Self, Lifecycle)> {
        let name = patch_text(patch.name, "nombre")?;
        let sku = patch_text(patch.sku, "sku")?;
        if let Some(cost) = patch.cost_price {
            optional_positive(cost, "precioCosto")?;
        }
        let sale_price = patch
            .sale_price
            .map(|p| require_positive(p, "precioVenta"))
            .transpose()?;
        let total_stock = patch
            .total_stock
            .map(|s| require_non_negative(s, "stockTotal"))
            .transpose()?;

        let next = Self {
            name: name.unwrap_or(self.name),
            sku: sku.unwrap_or(self.sku),
            description: merge_nullable(self.description, patch.description),
            cost_price: merge_nullable(self.cost_price, patch.cost_price),
            sale_price: sale_price.unwrap_or(self.sale_price),
            total_stock: total_stock.unwrap_or(self.total_stock),
        };
        Ok((next, active_flag(lifecycle, patch.active)))
    }

    fn matches(&self, f: &ProductFilter) -> bool {
        filter::contains_ci(Some(&self.name), f.name.as_deref())
            && filter::contains_ci(Some(&self.sku), f.sku.as_deref())
            && filter::at_least(Some(self.sale_price), f.min_sale_price)
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.sku)
    }
}
