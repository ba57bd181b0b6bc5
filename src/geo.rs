//! Static province -> district -> ward reference table for `unit` questions.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub districts: IndexMap<String, Place>,
    #[serde(default)]
    pub wards: IndexMap<String, Place>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLevel {
    Province,
    District,
    Ward,
}

impl UnitLevel {
    pub const ALL: [UnitLevel; 3] = [UnitLevel::Province, UnitLevel::District, UnitLevel::Ward];

    pub fn depth(self) -> usize {
        match self {
            UnitLevel::Province => 0,
            UnitLevel::District => 1,
            UnitLevel::Ward => 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Geography {
    provinces: IndexMap<String, Place>,
}

impl Geography {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self {
            provinces: serde_json::from_str(raw)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let geo = Self::from_json(&raw).map_err(|source| Error::Document {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), provinces = geo.provinces.len(), "geography loaded");
        Ok(geo)
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    fn province(&self, key: &str) -> Option<&Place> {
        self.provinces.get(key)
    }

    fn district(&self, province: &str, district: &str) -> Option<&Place> {
        self.province(province)?.districts.get(district)
    }

    fn ward(&self, province: &str, district: &str, ward: &str) -> Option<&Place> {
        self.district(province, district)?.wards.get(ward)
    }

    /// `(key, name)` choices for `level`, given the parents already chosen in `path`.
    /// Empty when a required parent is missing.
    pub fn options(&self, level: UnitLevel, path: &[String]) -> Vec<(String, String)> {
        let places = match level {
            UnitLevel::Province => Some(&self.provinces),
            UnitLevel::District => path
                .first()
                .and_then(|p| self.province(p))
                .map(|p| &p.districts),
            UnitLevel::Ward => match path {
                [p, d, ..] => self.district(p, d).map(|d| &d.wards),
                _ => None,
            },
        };
        places
            .map(|m| {
                m.iter()
                    .map(|(k, place)| (k.clone(), place.name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The path after choosing `key` at `level`. Deeper levels are cleared:
    /// a new province drops district and ward, a new district drops ward.
    /// `key` must belong to the chosen parent.
    pub fn select(&self, current: &[String], level: UnitLevel, key: &str) -> Result<Vec<String>> {
        let parents = &current[..level.depth().min(current.len())];
        if parents.len() < level.depth() {
            return Err(Error::InvalidSelection(format!(
                "choose the level above before {:?}",
                level
            )));
        }
        let known = match parents {
            [] => self.province(key).is_some(),
            [p] => self.district(p, key).is_some(),
            [p, d] => self.ward(p, d, key).is_some(),
            _ => false,
        };
        if !known {
            return Err(Error::InvalidSelection(format!(
                "`{}` is not a valid {:?} here",
                key, level
            )));
        }
        let mut next = parents.to_vec();
        next.push(key.to_string());
        Ok(next)
    }

    /// Names along a stored path, blank where a key does not resolve.
    pub fn names(&self, path: &[String]) -> [String; 3] {
        let get = |i: usize| path.get(i).map(String::as_str).unwrap_or("");
        let (p, d, w) = (get(0), get(1), get(2));
        [
            self.province(p).map(|x| x.name.clone()).unwrap_or_default(),
            self.district(p, d).map(|x| x.name.clone()).unwrap_or_default(),
            self.ward(p, d, w).map(|x| x.name.clone()).unwrap_or_default(),
        ]
    }

    /// `"Province - District - Ward"` as shown in exports.
    pub fn describe(&self, path: &[String]) -> String {
        self.names(path).join(" - ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Geography {
        Geography::from_json(
            r#"{
              "91": {"name": "Kien Giang", "districts": {
                  "899": {"name": "Rach Gia", "wards": {"30700": {"name": "Vinh Thanh"}}}
              }},
              "01": {"name": "Ha Noi", "districts": {
                  "001": {"name": "Ba Dinh", "wards": {"00001": {"name": "Phuc Xa"}}}
              }}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn options_follow_parent_selection() {
        let geo = sample();
        assert_eq!(geo.options(UnitLevel::Province, &[]).len(), 2);
        assert!(geo.options(UnitLevel::District, &[]).is_empty());
        let districts = geo.options(UnitLevel::District, &["91".to_string()]);
        assert_eq!(districts, vec![("899".to_string(), "Rach Gia".to_string())]);
    }

    #[test]
    fn select_rejects_foreign_district() {
        let geo = sample();
        let err = geo.select(&["91".to_string()], UnitLevel::District, "001");
        assert!(err.is_err());
    }

    #[test]
    fn describe_blanks_unknown_parts() {
        let geo = sample();
        let path = vec!["91".to_string(), "899".to_string(), "nope".to_string()];
        assert_eq!(geo.describe(&path), "Kien Giang - Rach Gia - ");
    }
}
