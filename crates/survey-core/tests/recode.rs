//! Stage-level tests for individual recoding functions.

use polars::df;
use survey_core::{
    PipelineContext, column_strings, column_value_string, coords::impute_coordinates,
    dedupe::dedupe_respondents, recode,
};
use survey_ingest::Lookups;
use survey_model::{PipelineConfig, fields};

fn context() -> PipelineContext {
    PipelineContext::new(PipelineConfig::default(), &Lookups::default()).expect("compile rules")
}

#[test]
fn city_encoding_fix_applies_before_normalization() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["A"],
        "city" => ["Las PiÃ±as"],
    )
    .expect("frame");
    recode::normalize_city(&mut frame, &ctx).expect("normalize");
    assert_eq!(column_value_string(&frame, fields::CITY, 0), "Las Pinas");
}

#[test]
fn imputation_sets_replacement_city_only_when_city_absent() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "city" => ["", "Subic"],
        "province" => ["Zambales", "Zambales"],
        "country" => ["Philippines", "Philippines"],
        "latitude" => ["", ""],
        "longitude" => ["", ""],
    )
    .expect("frame");
    impute_coordinates(&mut frame, &ctx).expect("impute");

    assert_eq!(column_value_string(&frame, fields::CITY, 0), "Olongapo City");
    assert_eq!(column_value_string(&frame, fields::LATITUDE, 0), "14.8386");
    assert_eq!(column_value_string(&frame, fields::CITY, 1), "Subic");
    assert_eq!(column_value_string(&frame, fields::LATITUDE, 1), "14.8386");
}

#[test]
fn imputation_search_order_is_city_then_province_then_country() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["A"],
        "city" => ["somewhere in zambales"],
        "province" => ["calabarzon"],
        "country" => ["united kingdom"],
        "latitude" => [""],
        "longitude" => [""],
    )
    .expect("frame");
    impute_coordinates(&mut frame, &ctx).expect("impute");

    // The city text wins even though province and country also match.
    assert_eq!(column_value_string(&frame, fields::LATITUDE, 0), "14.8386");
}

#[test]
fn dedupe_without_timestamps_keeps_last_row() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["first", "second"],
        "city" => ["Quezon City", "Quezon City"],
        "age" => ["30", "30"],
        "gender" => ["Female", "Female"],
        "educstat" => ["College", "College"],
        "industry" => ["BPO", "BPO"],
        "careerstg" => ["Professional", "Professional"],
    )
    .expect("frame");
    dedupe_respondents(&mut frame, &ctx).expect("dedupe");

    let ids = column_strings(&frame, fields::RESP_ID).expect("ids");
    assert_eq!(ids, vec!["second"]);
}

#[test]
fn blank_fingerprint_rows_are_never_collapsed() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "city" => ["", ""],
        "age" => ["", ""],
        "gender" => ["", ""],
        "educstat" => ["", ""],
        "industry" => ["", ""],
        "careerstg" => ["", ""],
    )
    .expect("frame");
    dedupe_respondents(&mut frame, &ctx).expect("dedupe");

    assert_eq!(frame.height(), 2);
}

#[test]
fn employer_recode_leaves_unmatched_free_text() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "employertype" => ["US-based startup", "Family business"],
    )
    .expect("frame");
    recode::recode_single_field(&mut frame, &ctx, fields::EMPLOYER_TYPE).expect("recode");

    let values = column_strings(&frame, fields::EMPLOYER_TYPE).expect("column");
    assert_eq!(values, vec!["Foreign-Other", "Family business"]);
}

#[test]
fn sitework_not_working_maps_to_absent() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "sitework" => ["Not working", "Hybrid setup"],
    )
    .expect("frame");
    recode::recode_single_field(&mut frame, &ctx, fields::SITE_WORK).expect("recode");

    let values = column_strings(&frame, fields::SITE_WORK).expect("column");
    assert_eq!(values, vec!["", "Hybrid"]);
}

#[test]
fn hardware_recode_canonicalizes_and_blanks() {
    let ctx = context();
    let mut frame = df!(
        "resp_id" => ["A", "B", "C"],
        "hardware" => ["Desktop and Laptop", "Phone", "N/A"],
    )
    .expect("frame");
    recode::recode_single_field(&mut frame, &ctx, fields::HARDWARE).expect("recode");

    let values = column_strings(&frame, fields::HARDWARE).expect("column");
    assert_eq!(values, vec!["laptop and desktop", "mobile phone", ""]);
}

#[test]
fn team_size_is_blanked_when_role_is_absent() {
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "datarole" => ["", "Data Analyst"],
        "sizeteam" => ["4", "4"],
    )
    .expect("frame");
    recode::blank_team_size_if_no_role(&mut frame).expect("blank");

    let sizes = column_strings(&frame, fields::TEAM_SIZE).expect("column");
    assert_eq!(sizes, vec!["", "4"]);
}
