use serde::{Deserialize, Serialize};

use inventario_core::validate::{
    optional_positive, patch_email, patch_text, require_email, require_text,
};
use inventario_core::{
    DomainResult, Lifecycle, Resource, active_flag, filter, merge_nullable, nullable,
};

/// Supplier: a party goods are purchased from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "pais")]
    pub country: Option<String>,
    #[serde(rename = "diasEntrega")]
    pub delivery_days: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSupplier {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "pais")]
    pub country: Option<String>,
    #[serde(rename = "diasEntrega")]
    pub delivery_days: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierPatch {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono", default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(rename = "pais", default, deserialize_with = "nullable")]
    pub country: Option<Option<String>>,
    #[serde(rename = "diasEntrega", default, deserialize_with = "nullable")]
    pub delivery_days: Option<Option<i32>>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

/// List criteria. `max_delivery_days` keeps suppliers that deliver within the given days.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierFilter {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "diasEntrega")]
    pub max_delivery_days: Option<i32>,
}

impl Resource for Supplier {
    type Draft = NewSupplier;
    type Patch = SupplierPatch;
    type Filter = SupplierFilter;

    const NAME: &'static str = "supplier";
    const COLLECTION: &'static str = "proveedores";
    const RETIRED: Lifecycle = Lifecycle::Inactive;

    fn validate(draft: NewSupplier) -> DomainResult<Self> {
        Ok(Self {
            name: require_text(draft.name, "nombre")?,
            email: require_email(draft.email, "email")?,
            phone: draft.phone,
            country: draft.country,
            delivery_days: optional_positive(draft.delivery_days, "diasEntrega")?,
        })
    }

    fn apply_patch(self, lifecycle: Lifecycle, patch: SupplierPatch) -> DomainResult<(Self, Lifecycle)> {
        let name = patch_text(patch.name, "nombre")?;
        let email = patch_email(patch.email, "email")?;
        if let Some(days) = patch.delivery_days {
            optional_positive(days, "diasEntrega")?;
        }

        let next = Self {
            name: name.unwrap_or(self.name),
            email: email.unwrap_or(self.email),
            phone: merge_nullable(self.phone, patch.phone),
            country: merge_nullable(self.country, patch.country),
            delivery_days: merge_nullable(self.delivery_days, patch.delivery_days),
        };
        Ok((next, active_flag(lifecycle, patch.active)))
    }

    fn matches(&self, f: &SupplierFilter) -> bool {
        filter::contains_ci(Some(&self.name), f.name.as_deref())
            && filter::contains_ci(Some(&self.email), f.email.as_deref())
            && filter::at_most(self.delivery_days, f.max_delivery_days)
    }
}
