use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use inventario_core::validate::{patch_text, require_positive, require_present};
use inventario_core::{
    CANCELLED_STATUS, DEFAULT_STATUS, DomainResult, EntityRef, Lifecycle, Resource, filter,
    merge_nullable, nullable, status_lifecycle,
};

/// Purchase: goods bought from a supplier into a warehouse.
///
/// `status` is free text (PENDIENTE, RECIBIDA, CANCELADA are the usual values).
/// Referenced supplier/product/warehouse ids are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(rename = "proveedor")]
    pub supplier: EntityRef,
    #[serde(rename = "producto")]
    pub product: EntityRef,
    #[serde(rename = "almacen")]
    pub warehouse: EntityRef,
    #[serde(rename = "cantidad")]
    pub quantity: i32,
    #[serde(rename = "precioUnitario")]
    pub unit_price: f64,
    #[serde(rename = "fechaCompra")]
    pub purchase_date: NaiveDateTime,
    #[serde(rename = "numeroFactura")]
    pub invoice_number: Option<String>,
    #[serde(rename = "estado")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPurchase {
    #[serde(rename = "proveedor")]
    pub supplier: Option<EntityRef>,
    #[serde(rename = "producto")]
    pub product: Option<EntityRef>,
    #[serde(rename = "almacen")]
    pub warehouse: Option<EntityRef>,
    #[serde(rename = "cantidad")]
    pub quantity: Option<i32>,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Option<f64>,
    #[serde(rename = "fechaCompra")]
    pub purchase_date: Option<NaiveDateTime>,
    #[serde(rename = "numeroFactura")]
    pub invoice_number: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchasePatch {
    #[serde(rename = "proveedor")]
    pub supplier: Option<EntityRef>,
    #[serde(rename = "producto")]
    pub product: Option<EntityRef>,
    #[serde(rename = "almacen")]
    pub warehouse: Option<EntityRef>,
    #[serde(rename = "cantidad")]
    pub quantity: Option<i32>,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Option<f64>,
    #[serde(rename = "fechaCompra")]
    pub purchase_date: Option<NaiveDateTime>,
    #[serde(rename = "numeroFactura", default, deserialize_with = "nullable")]
    pub invoice_number: Option<Option<String>>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
}

/// List criteria. `min_quantity` keeps purchases of at least that many units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseFilter {
    #[serde(rename = "estado")]
    pub status: Option<String>,
    #[serde(rename = "cantidad")]
    pub min_quantity: Option<i32>,
    #[serde(rename = "numeroFactura")]
    pub invoice_number: Option<String>,
}

impl Resource for Purchase {
    type Draft = NewPurchase;
    type Patch = PurchasePatch;
    type Filter = PurchaseFilter;

    const NAME: &'static str = "purchase";
    const COLLECTION: &'static str = "compras";
    const RETIRED: Lifecycle = Lifecycle::Cancelled;

    fn validate(draft: NewPurchase) -> DomainResult<Self> {
        let supplier = require_present(draft.supplier, "proveedor")?;
        let product = require_present(draft.product, "producto")?;
        let warehouse = require_present(draft.warehouse, "almacen")?;
        let quantity = require_positive(require_present(draft.quantity, "cantidad")?, "cantidad")?;
        let unit_price = require_positive(
            require_present(draft.unit_price, "precioUnitario")?,
            "precioUnitario",
        )?;
        let purchase_date = require_present(draft.purchase_date, "fechaCompra")?;
        let status = patch_text(draft.status, "estado")?.unwrap_or_else(|| DEFAULT_STATUS.to_string());

        Ok(Self {
            supplier,
            product,
            warehouse,
            quantity,
            unit_price,
            purchase_date,
            invoice_number: draft.invoice_number,
            status,
        })
    }

    fn apply_patch(self, lifecycle: Lifecycle, patch: PurchasePatch) -> DomainResult<(Self, Lifecycle)> {
        let quantity = patch
            .quantity
            .map(|q| require_positive(q, "cantidad"))
            .transpose()?;
        let unit_price = patch
            .unit_price
            .map(|p| require_positive(p, "precioUnitario"))
            .transpose()?;
        let status = patch_text(patch.status, "estado")?;
        let lifecycle = status.as_deref().map(status_lifecycle).unwrap_or(lifecycle);

        let next = Self {
            supplier: patch.supplier.unwrap_or(self.supplier),
            product: patch.product.unwrap_or(self.product),
            warehouse: patch.warehouse.unwrap_or(self.warehouse),
            quantity: quantity.unwrap_or(self.quantity),
            unit_price: unit_price.unwrap_or(self.unit_price),
            purchase_date: patch.purchase_date.unwrap_or(self.purchase_date),
            invoice_number: merge_nullable(self.invoice_number, patch.invoice_number),
            status: status.unwrap_or(self.status),
        };
        Ok((next, lifecycle))
    }

    fn matches(&self, f: &PurchaseFilter) -> bool {
        filter::contains_ci(Some(&self.status), f.status.as_deref())
            && filter::at_least(Some(self.quantity), f.min_quantity)
            && filter::contains_ci(self.invoice_number.as_deref(), f.invoice_number.as_deref())
    }

    fn initial_lifecycle(&self) -> Lifecycle {
        status_lifecycle(&self.status)
    }

    fn retire(self) -> Self {
        Self {
            status: CANCELLED_STATUS.to_string(),
            ..self
        }
    }
}
