use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::category::{Category, CategoryTable};

/// Presence flag and latest file back-reference for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategorySlot {
    pub present: bool,
    pub file_id: Option<Uuid>,
}

/// Fixed-size category → slot mapping for a garment.
///
/// Readiness is always derived from the `present` flags and never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySlots {
    slots: [CategorySlot; 4],
}

impl CategorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> CategorySlot {
        self.slots[category.index()]
    }

    /// Mark a category present and point it at `file_id`. Returns the previous file id.
    pub fn set_present(&mut self, category: Category, file_id: Uuid) -> Option<Uuid> {
        let slot = &mut self.slots[category.index()];
        let previous = slot.file_id;
        slot.present = true;
        slot.file_id = Some(file_id);
        previous
    }

    /// Overwrite a slot as loaded from storage
    pub fn set_slot(&mut self, category: Category, slot: CategorySlot) {
        self.slots[category.index()] = slot;
    }

    pub fn is_ready(&self) -> bool {
        self.slots.iter().all(|slot| slot.present)
    }

    pub fn missing(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| !self.get(*c).present)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, CategorySlot)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Aggregate completion state of a garment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GarmentStatus {
    Incomplete { missing: Vec<Category> },
    Ready,
}

/// The long-lived anchor all category files attach to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garment {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slots: CategorySlots,
    /// Set once by the readiness claim; never cleared.
    pub triggered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Garment {
    pub fn new(id: Uuid, owner_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            name: name.into(),
            slots: CategorySlots::new(),
            triggered: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.slots.is_ready()
    }

    pub fn status(&self) -> GarmentStatus {
        if self.is_ready() {
            GarmentStatus::Ready
        } else {
            GarmentStatus::Incomplete {
                missing: self.slots.missing(),
            }
        }
    }
}

/// Category entry in a status response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryStatus {
    pub category: Category,
    /// File name that classifies into this category
    pub file_name: String,
    pub present: bool,
    pub file_id: Option<Uuid>,
}

/// Completion status of a garment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GarmentStatusResponse {
    pub garment_id: Uuid,
    pub ready: bool,
    pub triggered: bool,
    /// Categories still waiting for a file
    pub missing: Vec<Category>,
    pub categories: Vec<CategoryStatus>,
}

impl GarmentStatusResponse {
    pub fn new(garment: &Garment, table: &CategoryTable) -> Self {
        let (ready, missing) = match garment.status() {
            GarmentStatus::Ready => (true, Vec::new()),
            GarmentStatus::Incomplete { missing } => (false, missing),
        };

        Self {
            garment_id: garment.id,
            ready,
            triggered: garment.triggered,
            missing,
            categories: garment
                .slots
                .iter()
                .map(|(category, slot)| CategoryStatus {
                    category,
                    file_name: table.file_name_for(category).to_string(),
                    present: slot.present,
                    file_id: slot.file_id,
                })
                .collect(),
        }
    }
}
