//! Keyword catalog: category name -> brand groups.
//!
//! The built-in catalog covers the delivery categories we track by default.
//! A JSON file with the same shape can replace it (`--catalog`).

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::BrandGroup;
use crate::error::AppError;

/// DataLab accepts at most this many keywords per group.
pub const MAX_KEYWORDS_PER_GROUP: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub groups: Vec<BrandGroup>,
}

/// Immutable category table, injected into the pipeline at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCatalog {
    categories: Vec<Category>,
}

impl KeywordCatalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, AppError> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file:
    /// `{ "categories": [{ "name": "...", "groups": [{ "groupName": "...", "keywords": [...] }] }] }`
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::config(format!("Failed to open catalog '{}': {e}", path.display()))
        })?;
        let catalog: KeywordCatalog = serde_json::from_reader(file).map_err(|e| {
            AppError::config(format!("Invalid catalog JSON '{}': {e}", path.display()))
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Category names in definition order.
    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn groups_for(&self, category: &str) -> Option<&[BrandGroup]> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.groups.as_slice())
    }

    /// Groups for every selected category, in selection order.
    ///
    /// A brand listed under several selected categories is queried once.
    pub fn groups_for_all<S: AsRef<str>>(&self, categories: &[S]) -> Result<Vec<BrandGroup>, AppError> {
        if categories.is_empty() {
            return Err(AppError::config("No categories selected."));
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for cat in categories {
            let cat = cat.as_ref();
            let groups = self.groups_for(cat).ok_or_else(|| {
                AppError::config(format!(
                    "Unknown category '{cat}'. Known: {}",
                    self.list_categories().join(", ")
                ))
            })?;
            for g in groups {
                if seen.insert(g.name.clone()) {
                    out.push(g.clone());
                }
            }
        }
        Ok(out)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.categories.is_empty() {
            return Err(AppError::config("Catalog has no categories."));
        }

        let mut names = HashSet::new();
        for cat in &self.categories {
            if cat.name.trim().is_empty() {
                return Err(AppError::config("Catalog category with an empty name."));
            }
            if !names.insert(cat.name.as_str()) {
                return Err(AppError::config(format!("Duplicate category '{}'.", cat.name)));
            }
            if cat.groups.is_empty() {
                return Err(AppError::config(format!("Category '{}' has no brand groups.", cat.name)));
            }
            let mut group_names = HashSet::new();
            for g in &cat.groups {
                if g.name.trim().is_empty() {
                    return Err(AppError::config(format!(
                        "Category '{}' has a group with an empty name.",
                        cat.name
                    )));
                }
                if !group_names.insert(g.name.as_str()) {
                    return Err(AppError::config(format!(
                        "Category '{}' lists group '{}' twice.",
                        cat.name, g.name
                    )));
                }
                if g.keywords.is_empty() || g.keywords.len() > MAX_KEYWORDS_PER_GROUP {
                    return Err(AppError::config(format!(
                        "Group '{}' must have 1-{MAX_KEYWORDS_PER_GROUP} keywords (got {}).",
                        g.name,
                        g.keywords.len()
                    )));
                }
                if g.keywords.iter().any(|k| k.trim().is_empty()) {
                    return Err(AppError::config(format!("Group '{}' has an empty keyword.", g.name)));
                }
            }
        }
        Ok(())
    }
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self {
            categories: vec![
                Category {
                    name: "pizza".to_string(),
                    groups: vec![
                        BrandGroup::new("피자헛", ["피자헛", "피자 헛", "pizzahut"]),
                        BrandGroup::new(
                            "도미노피자",
                            ["도미노피자", "도미도", "Domino", "Domino's Pizza", "도미노"],
                        ),
                        BrandGroup::new("미스터피자", ["미스터피자", "Mr피자", "Mr.Pizza"]),
                        BrandGroup::new("피자알볼로", ["피자알볼로", "알볼로", "알볼로피자"]),
                        BrandGroup::new("7번가피자", ["7번가피자", "세븐번가피자", "세븐가피자"]),
                        BrandGroup::new(
                            "피자나라치킨공주",
                            ["피자나라치킨공주", "피자나라 치킨공주", "피치공"],
                        ),
                        BrandGroup::new("파파존스피자", ["파파존스피자", "파파존스", "Papa John's"]),
                        BrandGroup::new("피자스쿨", ["피자스쿨", "피자 스쿨"]),
                    ],
                },
                Category {
                    name: "burger".to_string(),
                    groups: vec![
                        BrandGroup::new("맥도날드", ["맥도날드", "McDonald's", "맥날"]),
                        BrandGroup::new("버거킹", ["버거킹", "Burger King"]),
                        BrandGroup::new("롯데리아", ["롯데리아", "Lotteria"]),
                        BrandGroup::new(
                            "노브랜드버거",
                            ["노브랜드버거", "노브랜드 버거", "No Brand Burger"],
                        ),
                    ],
                },
                Category {
                    name: "chicken".to_string(),
                    groups: vec![
                        BrandGroup::new("교촌치킨", ["교촌치킨", "교촌"]),
                        BrandGroup::new("BBQ", ["BBQ치킨", "비비큐", "BBQ"]),
                        BrandGroup::new("BHC", ["BHC치킨", "비에이치씨", "bhc"]),
                        BrandGroup::new("굽네치킨", ["굽네치킨", "굽네"]),
                        BrandGroup::new("푸라닭", ["푸라닭", "Puradak"]),
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = KeywordCatalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.list_categories(), vec!["pizza", "burger", "chicken"]);
        assert_eq!(catalog.groups_for("pizza").map(|g| g.len()), Some(8));
        assert!(catalog.groups_for("sushi").is_none());
    }

    #[test]
    fn groups_for_all_keeps_selection_order_and_dedups() {
        let catalog = KeywordCatalog::new(vec![
            Category {
                name: "a".to_string(),
                groups: vec![BrandGroup::new("X", ["x"]), BrandGroup::new("Y", ["y"])],
            },
            Category {
                name: "b".to_string(),
                groups: vec![BrandGroup::new("Z", ["z"]), BrandGroup::new("X", ["x2"])],
            },
        ])
        .unwrap();

        let names: Vec<String> = catalog
            .groups_for_all(&["b", "a"])
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Z", "X", "Y"]);
    }

    #[test]
    fn unknown_or_empty_selection_is_a_config_error() {
        let catalog = KeywordCatalog::default();
        let err = catalog.groups_for_all(&["sushi"]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);

        let empty: [&str; 0] = [];
        assert!(catalog.groups_for_all(&empty).is_err());
    }

    #[test]
    fn rejects_group_without_keywords() {
        let res = KeywordCatalog::new(vec![Category {
            name: "a".to_string(),
            groups: vec![BrandGroup::new("X", Vec::<String>::new())],
        }]);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_repeated_group_in_one_category() {
        let err = KeywordCatalog::new(vec![Category {
            name: "pizza".to_string(),
            groups: vec![BrandGroup::new("X", ["x"]), BrandGroup::new("X", ["x2"])],
        }])
        .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
        assert!(err.to_string().contains("'X' twice"));
    }

    #[test]
    fn parses_catalog_json() {
        let json = r#"{"categories":[{"name":"coffee","groups":[{"groupName":"Cafe","keywords":["cafe","카페"]}]}]}"#;
        let catalog: KeywordCatalog = serde_json::from_str(json).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.groups_for("coffee").unwrap()[0].keywords, vec!["cafe", "카페"]);
    }
}
