use serde::{Deserialize, Serialize};

use inventario_core::validate::{patch_email, patch_text, require_email, require_text};
use inventario_core::{
    DomainResult, Lifecycle, Resource, active_flag, filter, merge_nullable, nullable,
};

/// Customer: a party goods are sold to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "ciudad")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCustomer {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "ciudad")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono", default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(rename = "direccion", default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    #[serde(rename = "ciudad", default, deserialize_with = "nullable")]
    pub city: Option<Option<String>>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerFilter {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "ciudad")]
    pub city: Option<String>,
}

impl Resource for Customer {
    type Draft = NewCustomer;
    type Patch = CustomerPatch;
    type Filter = CustomerFilter;

    const NAME: &'static str = "customer";
    const COLLECTION: &'static str = "clientes";
    const RETIRED: Lifecycle = Lifecycle::Inactive;

    fn validate(draft: NewCustomer) -> DomainResult<Self> {
        Ok(Self {
            name: require_text(draft.name, "nombre")?,
            email: require_email(draft.email, "email")?,
            phone: draft.phone,
            address: draft.address,
            city: draft.city,
        })
    }

    fn apply_patch(self, lifecycle: Lifecycle, patch: CustomerPatch) -> DomainResult<(Self, Lifecycle)> {
        let name = patch_text(patch.name, "nombre")?;
        let email = patch_email(patch.email, "email")?;

        let next = Self {
            name: name.unwrap_or(self.name),
            email: email.unwrap_or(self.email),
            phone: merge_nullable(self.phone, patch.phone),
            address: merge_nullable(self.address, patch.address),
            city: merge_nullable(self.city, patch.city),
        };
        Ok((next, active_flag(lifecycle, patch.active)))
    }

    fn matches(&self, f: &CustomerFilter) -> bool {
        filter::contains_ci(Some(&self.name), f.name.as_deref())
            && filter::contains_ci(Some(&self.email), f.email.as_deref())
            && filter::contains_ci(self.city.as_deref(), f.city.as_deref())
    }
}
