//! Static coordinate imputation.
//!
//! No geocoding happens here: the table is a fixed list of lowercase
//! place-key substrings with a replacement city and a coordinate pair.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::debug;

use survey_model::fields;

use crate::context::PipelineContext;
use crate::data_utils::{column_strings, has_column, set_string_column};

/// Fill missing coordinates from the place-key table.
///
/// Only rows where latitude or longitude is absent are touched. The row's
/// city, province and country text is searched in that order for the
/// first entry whose key occurs as a case-insensitive substring; a hit
/// sets both coordinates and, when the city itself was absent, the
/// replacement city.
pub fn impute_coordinates(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    if ctx.coordinates.is_empty() {
        return Ok(());
    }
    let height = df.height();
    let blank = || vec![String::new(); height];
    let mut cities = column_strings(df, fields::CITY).unwrap_or_else(blank);
    let provinces = column_strings(df, fields::PROVINCE).unwrap_or_else(blank);
    let countries = column_strings(df, fields::COUNTRY).unwrap_or_else(blank);
    let mut latitudes = column_strings(df, fields::LATITUDE).unwrap_or_else(blank);
    let mut longitudes = column_strings(df, fields::LONGITUDE).unwrap_or_else(blank);

    let mut imputed = 0usize;
    for idx in 0..height {
        if !latitudes[idx].trim().is_empty() && !longitudes[idx].trim().is_empty() {
            continue;
        }
        let haystacks = [
            cities[idx].to_lowercase(),
            provinces[idx].to_lowercase(),
            countries[idx].to_lowercase(),
        ];
        let hit = haystacks.iter().find_map(|haystack| {
            if haystack.is_empty() {
                return None;
            }
            ctx.coordinates
                .iter()
                .find(|entry| haystack.contains(&entry.place_key.to_lowercase()))
        });
        if let Some(entry) = hit {
            latitudes[idx] = entry.latitude.to_string();
            longitudes[idx] = entry.longitude.to_string();
            if cities[idx].trim().is_empty() {
                cities[idx] = entry.city.clone();
            }
            imputed += 1;
        }
    }
    if imputed > 0 {
        debug!(imputed, "imputed coordinates from place-key table");
    }

    let had_city = has_column(df, fields::CITY);
    set_string_column(df, fields::LATITUDE, latitudes)?;
    set_string_column(df, fields::LONGITUDE, longitudes)?;
    if had_city || cities.iter().any(|city| !city.is_empty()) {
        set_string_column(df, fields::CITY, cities)?;
    }
    Ok(())
}
