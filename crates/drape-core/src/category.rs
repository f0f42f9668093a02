//! Garment file categories and the file-name classification table.
//!
//! A garment is complete once one file of every [`Category`] has been recorded.
//! The category set is closed; which file name maps to which category is data
//! held in a [`CategoryTable`] so deployments can rename deliverables without
//! touching the completion flow.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Required file role of a garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Material,
    Model,
    Metadata,
    Render,
}

impl Category {
    /// Every category, in column order.
    pub const ALL: [Category; 4] = [
        Category::Material,
        Category::Model,
        Category::Metadata,
        Category::Render,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Material => "material",
            Category::Model => "model",
            Category::Metadata => "metadata",
            Category::Render => "render",
        }
    }

    /// Name of the presence flag on the garment document.
    pub fn flag_name(&self) -> &'static str {
        match self {
            Category::Material => "material_flag",
            Category::Model => "model_flag",
            Category::Metadata => "metadata_flag",
            Category::Render => "render_flag",
        }
    }

    /// Name of the back-reference to the latest file record for this category.
    pub fn file_id_name(&self) -> &'static str {
        match self {
            Category::Material => "material_file_id",
            Category::Model => "model_file_id",
            Category::Metadata => "metadata_file_id",
            Category::Render => "render_file_id",
        }
    }

    /// File name used when no override is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Category::Material => "start_meshes.mtl",
            Category::Model => "start_meshes.obj",
            Category::Metadata => "start_meshes_meta_data.xml",
            Category::Render => "render_meshes.fbx",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Material => 0,
            Category::Model => 1,
            Category::Metadata => 2,
            Category::Render => 3,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "material" => Ok(Category::Material),
            "model" => Ok(Category::Model),
            "metadata" => Ok(Category::Metadata),
            "render" => Ok(Category::Render),
            _ => Err(anyhow::anyhow!("Invalid category: {}", s)),
        }
    }
}

/// Result of classifying an inbound file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Category(Category),
    Unclassified,
}

impl Classification {
    pub fn category(self) -> Option<Category> {
        match self {
            Classification::Category(category) => Some(category),
            Classification::Unclassified => None,
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub file_name: String,
    pub category: Category,
}

/// Exact file-name to category mapping.
///
/// Every category appears exactly once and file names are unique, so
/// classification is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

impl CategoryTable {
    /// Build a table from explicit entries.
    pub fn new(entries: Vec<CategoryEntry>) -> Result<Self, anyhow::Error> {
        for entry in &entries {
            if entry.file_name.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "File name for category {} must not be empty",
                    entry.category
                ));
            }
        }

        for category in Category::ALL {
            let count = entries.iter().filter(|e| e.category == category).count();
            if count != 1 {
                return Err(anyhow::anyhow!(
                    "Category {} must have exactly one file name, found {}",
                    category,
                    count
                ));
            }
        }

        for (i, entry) in entries.iter().enumerate() {
            if entries[i + 1..].iter().any(|e| e.file_name == entry.file_name) {
                return Err(anyhow::anyhow!(
                    "File name {} is mapped to more than one category",
                    entry.file_name
                ));
            }
        }

        Ok(Self { entries })
    }

    /// Build a table from per-category overrides, falling back to the defaults.
    pub fn with_overrides<F>(mut lookup: F) -> Result<Self, anyhow::Error>
    where
        F: FnMut(Category) -> Option<String>,
    {
        let entries = Category::ALL
            .iter()
            .map(|&category| CategoryEntry {
                file_name: lookup(category)
                    .unwrap_or_else(|| category.default_file_name().to_string()),
                category,
            })
            .collect();
        Self::new(entries)
    }

    /// Map a file name to its category. Total: never fails, never allocates.
    pub fn classify(&self, file_name: &str) -> Classification {
        self.entries
            .iter()
            .find(|entry| entry.file_name == file_name)
            .map(|entry| Classification::Category(entry.category))
            .unwrap_or(Classification::Unclassified)
    }

    pub fn file_name_for(&self, category: Category) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.file_name.as_str())
            .unwrap_or_else(|| category.default_file_name())
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            entries: Category::ALL
                .iter()
                .map(|&category| CategoryEntry {
                    file_name: category.default_file_name().to_string(),
                    category,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_table() {
        let table = CategoryTable::default();
        assert_eq!(
            table.classify("start_meshes.mtl"),
            Classification::Category(Category::Material)
        );
        assert_eq!(
            table.classify("start_meshes.obj"),
            Classification::Category(Category::Model)
        );
        assert_eq!(
            table.classify("start_meshes_meta_data.xml"),
            Classification::Category(Category::Metadata)
        );
        assert_eq!(
            table.classify("render_meshes.fbx"),
            Classification::Category(Category::Render)
        );
    }

    #[test]
    fn test_classify_rejects_everything_else() {
        let table = CategoryTable::default();
        for name in [
            "random.txt",
            "",
            "START_MESHES.OBJ",
            "start_meshes.obj ",
            "other/start_meshes.obj",
            "start_meshes",
            "meshes.fbx",
        ] {
            assert_eq!(table.classify(name), Classification::Unclassified, "{name:?}");
        }
    }

    #[test]
    fn test_overrides_replace_only_named_category() {
        let table = CategoryTable::with_overrides(|c| match c {
            Category::Render => Some("final_render.fbx".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(
            table.classify("final_render.fbx"),
            Classification::Category(Category::Render)
        );
        assert_eq!(table.classify("render_meshes.fbx"), Classification::Unclassified);
        assert_eq!(table.file_name_for(Category::Model), "start_meshes.obj");
    }

    #[test]
    fn test_duplicate_file_names_rejected() {
        let result = CategoryTable::with_overrides(|c| match c {
            Category::Render => Some("start_meshes.obj".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_category_rejected() {
        let result = CategoryTable::new(vec![CategoryEntry {
            file_name: "a.obj".to_string(),
            category: Category::Model,
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
            assert!(category.flag_name().starts_with(category.as_str()));
        }
        assert!("texture".parse::<Category>().is_err());
    }
}
