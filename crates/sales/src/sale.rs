use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use inventario_core::validate::{patch_text, require_positive, require_present, require_text};
use inventario_core::{
    CANCELLED_STATUS, DEFAULT_STATUS, DomainResult, EntityRef, Lifecycle, Resource, filter,
    status_lifecycle,
};

/// Sale: goods shipped to a customer from a warehouse, keyed by a unique order number.
///
/// `status` is free text (PENDIENTE, ENVIADA, ENTREGADA, CANCELADA are the usual values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "cliente")]
    pub customer: EntityRef,
    #[serde(rename = "producto")]
    pub product: EntityRef,
    #[serde(rename = "almacen")]
    pub warehouse: EntityRef,
    #[serde(rename = "cantidad")]
    pub quantity: i32,
    #[serde(rename = "precioUnitario")]
    pub unit_price: f64,
    #[serde(rename = "fechaVenta")]
    pub sale_date: NaiveDateTime,
    #[serde(rename = "numeroPedido")]
    pub order_number: String,
    #[serde(rename = "estado")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSale {
    #[serde(rename = "cliente")]
    pub customer: Option<EntityRef>,
    #[serde(rename = "producto")]
    pub product: Option<EntityRef>,
    #[serde(rename = "almacen")]
    pub warehouse: Option<EntityRef>,
    #[serde(rename = "cantidad")]
    pub quantity: Option<i32>,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Option<f64>,
    #[serde(rename = "fechaVenta")]
    pub sale_date: Option<NaiveDateTime>,
    #[serde(rename = "numeroPedido")]
    pub order_number: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalePatch {
    #[serde(rename = "cliente")]
    pub customer: Option<EntityRef>,
    #[serde(rename = "producto")]
    pub product: Option<EntityRef>,
    #[serde(rename = "almacen")]
    pub warehouse: Option<EntityRef>,
    #[serde(rename = "cantidad")]
    pub quantity: Option<i32>,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Option<f64>,
    #[serde(rename = "fechaVenta")]
    pub sale_date: Option<NaiveDateTime>,
    #[serde(rename = "numeroPedido")]
    pub order_number: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
}

/// List criteria. `min_quantity` keeps sales of at least that many units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleFilter {
    #[serde(rename = "estado")]
    pub status: Option<String>,
    #[serde(rename = "cantidad")]
    pub min_quantity: Option<i32>,
    #[serde(rename = "numeroPedido")]
    pub order_number: Option<String>,
}

impl Resource for Sale {
    type Draft = NewSale;
    type Patch = SalePatch;
    type Filter = SaleFilter;

    const NAME: &'static str = "sale";
    const COLLECTION: &'static str = "ventas";
    const RETIRED: Lifecycle = Lifecycle::Cancelled;
    const UNIQUE_FIELD: Option<&'static str> = Some("numeroPedido");

    fn validate(draft: NewSale) -> DomainResult<Self> {
        let customer = require_present(draft.customer, "cliente")?;
        let product = require_present(draft.product, "producto")?;
        let warehouse = require_present(draft.warehouse, "almacen")?;
        let quantity = require_positive(require_present(draft.quantity, "cantidad")?, "cantidad")?;
        let unit_price = require_positive(
            require_present(draft.unit_price, "precioUnitario")?,
            "precioUnitario",
        )?;
        let sale_date = require_present(draft.sale_date, "fechaVenta")?;
        let order_number = require_text(draft.order_number, "numeroPedido")?;
        let status = patch_text(draft.status, "estado")?.unwrap_or_else(|| DEFAULT_STATUS.to_string());

        Ok(Self {
            customer,
            product,
            warehouse,
            quantity,
            unit_price,
            sale_date,
            order_number,
            status,
        })
    }

    fn apply_patch(self, lifecycle: Lifecycle, patch: SalePatch) -> DomainResult<(Self, Lifecycle)> {
        let quantity = patch
            .quantity
            .map(|q| require_positive(q, "cantidad"))
            .transpose()?;
        let unit_price = patch
            .unit_price
            .map(|p| require_positive(p, "precioUnitario"))
            .transpose()?;
        let order_number = patch_text(patch.order_number, "numeroPedido")?;
        let status = patch_text(patch.status, "estado")?;
        let lifecycle = status.as_deref().map(status_lifecycle).unwrap_or(lifecycle);

        let next = Self {
            customer: patch.customer.unwrap_or(self.customer),
            product: patch.product.unwrap_or(self.product),
            warehouse: patch.warehouse.unwrap_or(self.warehouse),
            quantity: quantity.unwrap_or(self.quantity),
            unit_price: unit_price.unwrap_or(self.unit_price),
            sale_date: patch.sale_date.unwrap_or(self.sale_date),
            order_number: order_number.unwrap_or(self.order_number),
            status: status.unwrap_or(self.status),
        };
        Ok((next, lifecycle))
    }

    fn matches(&self, f: &SaleFilter) -> bool {
        filter::contains_ci(Some(&self.status), f.status.as_deref())
            && filter::at_least(Some(self.quantity), f.min_quantity)
            && filter::contains_ci(Some(&self.order_number), f.order_number.as_deref())
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.order_number)
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
