use std::collections::BTreeMap;

use crate::foundation::{
    core::Vec3,
    error::{ReplayError, ReplayResult},
};

/// Maps trace vegetation type codes to template basenames, and basenames to the local
/// origin offset applied to each template once at import.
///
/// Basenames are name prefixes: the bundle's objects carry longer names that start with them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TreeCatalog {
    pub codes: BTreeMap<String, String>,
    pub origins: BTreeMap<String, Vec3>,
}

impl Default for TreeCatalog {
    fn default() -> Self {
        let codes = [
            ("A", "Bark___S"),
            ("C", "Bottom_T"),
            ("D", "Bark___0"),
            ("E", "Sonnerat"),
            ("F", "Bark___1"),
            ("G", "Bark___0"),
            ("H", "Walnut_L"),
            ("J", "Sonnerat"),
            ("K", "Sonnerat"),
            ("L", "Oak_Leav"),
            ("M", "Bottom_T"),
            ("N", "Mossy_Tr"),
            ("O", "Bark___S"),
            ("P", "Bark___1"),
            ("Q", "Bark___1"),
            ("R", "Bark___0"),
            ("S", "Mossy_Tr"),
            ("T", "Bark___S"),
            ("U", "Mossy_Tr"),
            ("V", "Mossy_Tr"),
        ];
        let origins = [
            ("Bottom_T", 40.0),
            ("Bark___1", 20.0),
            ("Mossy_Tr", 0.0),
            ("Bark___0", -10.0),
            ("Walnut_L", -20.0),
            ("Bark___S", -30.0),
            ("Sonnerat", -40.0),
            ("Oak_Leav", -50.0),
        ];

        Self {
            codes: codes
                .into_iter()
                .map(|(c, b)| (c.to_string(), b.to_string()))
                .collect(),
            origins: origins
                .into_iter()
                .map(|(b, x)| (b.to_string(), Vec3::new(x, 0.0, 0.0)))
                .collect(),
        }
    }
}

impl TreeCatalog {
    pub fn basenames(&self) -> impl Iterator<Item = &str> {
        self.origins.keys().map(String::as_str)
    }

    pub fn basename_for(&self, code: &str) -> ReplayResult<&str> {
        self.codes
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| ReplayError::unknown_tree_type(code))
    }

    pub fn origin_for(&self, basename: &str) -> Option<Vec3> {
        self.origins.get(basename).copied()
    }

    /// Catalog basename an object name belongs to, if any.
    pub fn basename_of<'a>(&'a self, object_name: &str) -> Option<&'a str> {
        self.basenames().find(|b| object_name.starts_with(b))
    }

    pub fn validate(&self) -> ReplayResult<()> {
        if self.origins.is_empty() {
            return Err(ReplayError::validation("tree catalog has no basenames"));
        }
        for (code, basename) in &self.codes {
            if !self.origins.contains_key(basename) {
                return Err(ReplayError::validation(format!(
                    "tree type '{code}' maps to '{basename}', which has no origin entry"
                )));
            }
        }
        let names: Vec<&str> = self.basenames().collect();
        for (i, a) in names.iter().enumerate() {
            if let Some(b) = names[i + 1..]
                .iter()
                .find(|b| a.starts_with(**b) || b.starts_with(*a))
            {
                return Err(ReplayError::validation(format!(
                    "tree basenames '{a}' and '{b}' are ambiguous prefixes"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;
