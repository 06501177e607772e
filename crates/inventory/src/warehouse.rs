use serde::{Deserialize, Serialize};

use inventario_core::validate::{
    optional_positive, patch_text, require_non_negative, require_text,
};
use inventario_core::{
    DomainResult, Lifecycle, Resource, active_flag, filter, merge_nullable, nullable,
};

/// Warehouse: a physical stock location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "capacidadMaxima")]
    pub max_capacity: Option<i32>,
    #[serde(rename = "stockActual")]
    pub current_stock: i32,
    #[serde(rename = "responsable")]
    pub manager: Option<String>,
}

/// Create payload for a warehouse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWarehouse {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "ubicacion")]
    pub location: Option<String>,
    #[serde(rename = "capacidadMaxima")]
    pub max_capacity: Option<i32>,
    #[serde(rename = "stockActual")]
    pub current_stock: Option<i32>,
    #[serde(rename = "responsable")]
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarehousePatch {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "ubicacion")]
    pub location: Option<String>,
    #[serde(rename = "capacidadMaxima", default, deserialize_with = "nullable")]
    pub max_capacity: Option<Option<i32>>,
    #[serde(rename = "stockActual")]
    pub current_stock: Option<i32>,
    #[serde(rename = "responsable", default, deserialize_with = "nullable")]
    pub manager: Option<Option<String>>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

/// List criteria. `min_capacity` keeps warehouses whose capacity is at least the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarehouseFilter {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "ubicacion")]
    pub location: Option<String>,
    #[serde(rename = "capacidadMaxima")]
    pub min_capacity: Option<i32>,
}

impl Resource for Warehouse {
    type Draft = NewWarehouse;
    type Patch = WarehousePatch;
    type Filter = WarehouseFilter;

    const NAME: &'static str = "warehouse";
    const COLLECTION: &'static str = "almacenes";
    const RETIRED: Lifecycle = Lifecycle::Inactive;

    fn validate(draft: NewWarehouse) -> DomainResult<Self> {
        Ok(Self {
            name: require_text(draft.name, "nombre")?,
            location: require_text(draft.location, "ubicacion")?,
            max_capacity: optional_positive(draft.max_capacity, "capacidadMaxima")?,
            current_stock: require_non_negative(draft.current_stock.unwrap_or(0), "stockActual")?,
            manager: draft.manager,
        })
    }

    fn apply_patch(self, lifecycle: Lifecycle, patch: WarehousePatch) -> DomainResult<(Self, Lifecycle)> {
        let name = patch_text(patch.name, "nombre")?;
        let location = patch_text(patch.location, "ubicacion")?;
        if let Some(Some(capacity)) = patch.max_capacity {
            optional_positive(Some(capacity), "capacidadMaxima")?;
        }
        let current_stock = patch
            .current_stock
            .map(|s| require_non_negative(s, "stockActual"))
            .transpose()?;

        let next = Self {
            name: name.unwrap_or(self.name),
            location: location.unwrap_or(self.location),
            max_capacity: merge_nullable(self.max_capacity, patch.max_capacity),
            current_stock: current_stock.unwrap_or(self.current_stock),
            manager: merge_nullable(self.manager, patch.manager),
        };
        Ok((next, active_flag(lifecycle, patch.active)))
    }

    fn matches(&self, f: &WarehouseFilter) -> bool {
        filter::contains_ci(Some(&self.name), f.name.as_deref())
            && filter::contains_ci(Some(&self.location), f.location.as_deref())
            && filter::at_least(self.max_capacity, f.min_capacity)
    }
}
