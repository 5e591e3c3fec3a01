//! Optional per-field lookup files.
//!
//! A lookup directory may carry, for any field `f`:
//!
//! - `f_lookup.csv` with `raw,clean` columns (exact rules)
//! - `f_regex.csv` with `pattern,canonical` columns (ordered regex rules)
//! - `f_drop.csv` / `f_keep.csv` with a `value` column (flat sets)
//!
//! plus `locations_with_coordinates.csv` with
//! `place_key,city,latitude,longitude` for coordinate imputation.
//!
//! A missing file means "no additional rules for this field", never an
//! error. An empty `clean`/`canonical` cell maps the match to the absent
//! state rather than to any literal text.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

use survey_model::{CoordinateEntry, ExactSpec, RuleSpec};

/// Rules loaded from disk for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldLookup {
    pub exact: Vec<ExactSpec>,
    pub regex: Vec<RuleSpec>,
    pub drop: Vec<String>,
    pub keep: Vec<String>,
}

impl FieldLookup {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
            && self.regex.is_empty()
            && self.drop.is_empty()
            && self.keep.is_empty()
    }
}

/// All lookup tables for one run.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub fields: BTreeMap<String, FieldLookup>,
    pub coordinates: Vec<CoordinateEntry>,
}

impl Lookups {
    pub fn field(&self, name: &str) -> Option<&FieldLookup> {
        self.fields.get(name)
    }
}

fn lookup_path(dir: &Path, field: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{field}_{suffix}.csv"))
}

fn read_pairs(path: &Path) -> Result<Vec<(String, Option<String>)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read lookup: {}", path.display()))?;
    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read lookup record: {}", path.display()))?;
        let left = record.get(0).unwrap_or("").trim().to_string();
        if left.is_empty() {
            continue;
        }
        let right = record.get(1).unwrap_or("").trim();
        let canonical = if right.is_empty() {
            None
        } else {
            Some(right.to_string())
        };
        pairs.push((left, canonical));
    }
    Ok(pairs)
}

fn read_value_set(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read value set: {}", path.display()))?;
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read value record: {}", path.display()))?;
        let value = record.get(0).unwrap_or("").trim();
        if !value.is_empty() {
            values.push(value.to_string());
        }
    }
    Ok(values)
}

/// Load lookup files for the given fields from `dir`.
///
/// `dir` itself may be absent, in which case every field gets empty rules.
pub fn load_lookups<I, S>(dir: Option<&Path>, field_names: I) -> Result<Lookups>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lookups = Lookups::default();
    let Some(dir) = dir else {
        return Ok(lookups);
    };
    if !dir.is_dir() {
        return Ok(lookups);
    }
    for field in field_names {
        let field = field.as_ref();
        let mut entry = FieldLookup::default();

        let exact_path = lookup_path(dir, field, "lookup");
        if exact_path.is_file() {
            entry.exact = read_pairs(&exact_path)?
                .into_iter()
                .map(|(raw, canonical)| ExactSpec { raw, canonical })
                .collect();
        }
        let regex_path = lookup_path(dir, field, "regex");
        if regex_path.is_file() {
            entry.regex = read_pairs(&regex_path)?
                .into_iter()
                .map(|(pattern, canonical)| RuleSpec { pattern, canonical })
                .collect();
        }
        let drop_path = lookup_path(dir, field, "drop");
        if drop_path.is_file() {
            entry.drop = read_value_set(&drop_path)?;
        }
        let keep_path = lookup_path(dir, field, "keep");
        if keep_path.is_file() {
            entry.keep = read_value_set(&keep_path)?;
        }

        if !entry.is_empty() {
            debug!(
                field,
                exact = entry.exact.len(),
                regex = entry.regex.len(),
                "loaded field lookup"
            );
            lookups.fields.insert(field.to_string(), entry);
        }
    }

    let coords_path = dir.join("locations_with_coordinates.csv");
    if coords_path.is_file() {
        lookups.coordinates = read_coordinates(&coords_path)?;
    }
    Ok(lookups)
}

fn read_coordinates(path: &Path) -> Result<Vec<CoordinateEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read coordinates: {}", path.display()))?;
    let mut entries = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("read coordinate record: {}", path.display()))?;
        let place_key = record.get(0).unwrap_or("").trim().to_lowercase();
        let city = record.get(1).unwrap_or("").trim().to_string();
        let latitude = record.get(2).unwrap_or("").trim().parse::<f64>();
        let longitude = record.get(3).unwrap_or("").trim().parse::<f64>();
        let (Ok(latitude), Ok(longitude)) = (latitude, longitude) else {
            continue;
        };
        if place_key.is_empty() {
            continue;
        }
        entries.push(CoordinateEntry {
            place_key,
            city,
            latitude,
            longitude,
        });
    }
    Ok(entries)
}
