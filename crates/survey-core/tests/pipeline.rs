//! End-to-end tests for the default cleaning pipeline.

use polars::df;
use polars::prelude::DataFrame;
use survey_core::pipeline::{StepState, build_default_pipeline};
use survey_core::{PipelineContext, SequenceIdSource, column_strings, column_value_string};
use survey_ingest::Lookups;
use survey_model::{PipelineConfig, fields};

fn context() -> PipelineContext {
    PipelineContext::new(PipelineConfig::default(), &Lookups::default()).expect("compile rules")
}

fn run(df: &mut DataFrame) -> survey_core::SurveyTables {
    let ctx = context();
    let mut state = StepState::new().with_id_source(Box::new(SequenceIdSource::new()));
    build_default_pipeline()
        .run(df, &ctx, &mut state)
        .expect("pipeline run")
}

#[test]
fn ages_are_bounded_corrected_and_grouped() {
    let mut frame = df!(
        "resp_id" => ["A", "B", "C", "D", "E"],
        "age" => ["-5", "0", "15", "100", "101"],
        "educstat" => ["", "Secondary High School", "", "", ""],
    )
    .expect("frame");
    run(&mut frame);

    let ages = column_strings(&frame, fields::AGE).expect("age column");
    assert_eq!(ages, vec!["", "18", "15", "100", ""]);
    let groups = column_strings(&frame, fields::AGE_GROUP).expect("age group column");
    assert_eq!(groups, vec!["", "<19", "<19", "60+", ""]);
}

#[test]
fn blank_gender_becomes_prefer_not_to_say() {
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "gender" => ["  ", "Female"],
    )
    .expect("frame");
    run(&mut frame);

    let genders = column_strings(&frame, fields::GENDER).expect("gender column");
    assert_eq!(genders, vec!["Prefer not to say", "Female"]);
}

#[test]
fn missing_ids_are_assigned_existing_ids_kept() {
    let mut frame = df!(
        "resp_id" => ["existing", ""],
        "age" => ["31", "42"],
    )
    .expect("frame");
    run(&mut frame);

    let ids = column_strings(&frame, fields::RESP_ID).expect("id column");
    assert_eq!(ids, vec!["existing", "R0001"]);
}

#[test]
fn identifying_columns_are_stripped() {
    let mut frame = df!(
        "resp_id" => ["A"],
        "email" => ["someone@example.com"],
        "age" => ["31"],
    )
    .expect("frame");
    run(&mut frame);

    assert!(frame.column(fields::EMAIL).is_err());
}

#[test]
fn city_caps_are_titled_and_blanks_filled_from_province() {
    let mut frame = df!(
        "resp_id" => ["A", "B", "C"],
        "city" => ["QUEZON CITY", "", "None"],
        "province" => ["", "Rizal", ""],
        "country" => ["Philippines", "Philippines", ""],
    )
    .expect("frame");
    run(&mut frame);

    let cities = column_strings(&frame, fields::CITY).expect("city column");
    assert_eq!(cities, vec!["Quezon City", "Rizal", "Perth Australia"]);
}

#[test]
fn coordinates_imputed_from_place_key_substring() {
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "city" => ["", "Makati"],
        "province" => ["Region IV-A CALABARZON", ""],
        "country" => ["Philippines", "Philippines"],
        "latitude" => ["", "14.55"],
        "longitude" => ["", "121.02"],
    )
    .expect("frame");
    run(&mut frame);

    assert_eq!(column_value_string(&frame, fields::LATITUDE, 0), "14.4791");
    assert_eq!(column_value_string(&frame, fields::LONGITUDE, 0), "120.8969");
    // City was already filled from the province text upstream.
    assert_eq!(
        column_value_string(&frame, fields::CITY, 0),
        "Region IV-A CALABARZON"
    );
    // Row with both coordinates present is untouched.
    assert_eq!(column_value_string(&frame, fields::LATITUDE, 1), "14.55");
    assert_eq!(column_value_string(&frame, fields::CITY, 1), "Makati");
}

#[test]
fn duplicate_submissions_keep_latest_timestamp_everywhere() {
    let mut frame = df!(
        "resp_id" => ["early", "late", "other"],
        "timestamp" => [
            "2024/02/03 10:15:00 AM GMT+8",
            "2024/02/03 2:30:00 PM GMT+8",
            "2024/02/03 11:00:00 AM GMT+8",
        ],
        "city" => ["Quezon City", "Quezon City", "Cebu City"],
        "age" => ["30", "30", "41"],
        "gender" => ["Female", "Female", "Male"],
        "educstat" => ["College", "College", "College"],
        "industry" => ["BPO", "BPO", "Finance"],
        "careerstg" => ["Professional", "Professional", "Professional"],
        "generaltools" => ["Excel, SQL", "Excel, Python", "Excel"],
    )
    .expect("frame");
    let tables = run(&mut frame);

    let ids = column_strings(&frame, fields::RESP_ID).expect("id column");
    assert_eq!(ids, vec!["late", "other"]);

    let junction = tables
        .junctions
        .iter()
        .find(|frame| frame.name == fields::GENERAL_TOOLS)
        .expect("generaltools junction");
    let junction_ids = column_strings(&junction.data, fields::RESP_ID).expect("junction ids");
    assert!(!junction_ids.contains(&"early".to_string()));
    assert!(junction_ids.contains(&"late".to_string()));
}

#[test]
fn excluded_cities_are_dropped_outright() {
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "city" => ["Borongan City, Eastern Samar", "Davao City"],
    )
    .expect("frame");
    run(&mut frame);

    let cities = column_strings(&frame, fields::CITY).expect("city column");
    assert_eq!(cities, vec!["Davao City"]);
}

#[test]
fn student_rows_have_working_section_blanked() {
    let mut frame = df!(
        "resp_id" => ["student", "pro"],
        "careerstg" => [
            "Student / New grad / Career break (currently studying)",
            "Professional",
        ],
        "employertype" => ["Local", "Multinational"],
        "salary" => ["15,000 and below", "75,001 to 85,000"],
        "sizeteam" => ["3", "5"],
        "datarole" => ["Data Analyst", "Data Analyst"],
    )
    .expect("frame");
    run(&mut frame);

    assert_eq!(
        column_value_string(&frame, fields::CAREER_STAGE_CLEAN, 0),
        "Student/ New grad/ Career Break"
    );
    assert_eq!(column_value_string(&frame, fields::EMPLOYER_TYPE, 0), "");
    assert_eq!(column_value_string(&frame, fields::SALARY, 0), "");
    assert_eq!(column_value_string(&frame, fields::TEAM_SIZE, 0), "");
    assert_eq!(
        column_value_string(&frame, fields::EMPLOYER_TYPE, 1),
        "Multinational"
    );
    assert_eq!(
        column_value_string(&frame, fields::SALARY_GROUP, 1),
        "75K+ to 85K"
    );
}

#[test]
fn unknown_career_stage_becomes_other_absent_stays_absent() {
    let mut frame = df!(
        "resp_id" => ["A", "B", "C"],
        "careerstg" => ["Entrepreneur", "", "Freelance"],
    )
    .expect("frame");
    run(&mut frame);

    let cleaned = column_strings(&frame, fields::CAREER_STAGE_CLEAN).expect("column");
    assert_eq!(cleaned, vec!["Other", "", "Freelance"]);
}

#[test]
fn in_region_flag_is_never_absent() {
    let mut frame = df!(
        "resp_id" => ["A", "B", "C"],
        "country" => ["Pilipinas", "Singapore", ""],
    )
    .expect("frame");
    run(&mut frame);

    let flags = column_strings(&frame, fields::IN_REGION).expect("column");
    assert_eq!(flags, vec!["true", "false", "false"]);
}

#[test]
fn presence_pruning_suppresses_none_only_with_real_answers() {
    // Form exports spell these answers with the curly apostrophe.
    let mut frame = df!(
        "resp_id" => ["mixed", "lonely"],
        "ingestion" => ["Don\u{2019}t know, Excel", "Don\u{2019}t know"],
    )
    .expect("frame");
    let tables = run(&mut frame);

    let junction = tables
        .junctions
        .iter()
        .find(|frame| frame.name == fields::INGESTION_TOOLS)
        .expect("ingestion junction");
    let ids = column_strings(&junction.data, fields::RESP_ID).expect("ids");
    let values = column_strings(&junction.data, fields::INGESTION_TOOLS).expect("values");
    let pairs: Vec<(String, String)> = ids.into_iter().zip(values).collect();
    assert_eq!(
        pairs,
        vec![
            ("mixed".to_string(), "Excel".to_string()),
            ("lonely".to_string(), "None".to_string()),
        ]
    );
}

#[test]
fn secondary_roles_do_not_double_count_primary() {
    let mut frame = df!(
        "resp_id" => ["A"],
        "datarole" => ["Data Analyst"],
        "restofrole" => ["data analyst, Project Manager, I help with anything the team needs done"],
    )
    .expect("frame");
    let tables = run(&mut frame);

    let junction = tables
        .junctions
        .iter()
        .find(|frame| frame.name == fields::REST_OF_ROLE)
        .expect("restofrole junction");
    let values = column_strings(&junction.data, fields::REST_OF_ROLE).expect("values");
    assert_eq!(values, vec!["Project Manager"]);
}

#[test]
fn salary_bucket_and_typework_fill() {
    // Distinct cities keep the two rows out of one dedupe fingerprint.
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "city" => ["Quezon City", "Makati"],
        "salary" => ["15,000 and below", ""],
        "typework" => ["", ""],
        "careerstg" => ["Professional", "Professional"],
    )
    .expect("frame");
    run(&mut frame);

    assert_eq!(
        column_value_string(&frame, fields::SALARY_GROUP, 0),
        "15K or less"
    );
    assert_eq!(
        column_value_string(&frame, fields::TYPE_WORK, 0),
        "Unspecified"
    );
    // No salary, no fill.
    assert_eq!(column_value_string(&frame, fields::TYPE_WORK, 1), "");
}

#[test]
fn role_grouping_uses_catch_all_but_not_for_absent() {
    let mut frame = df!(
        "resp_id" => ["A", "B", "C"],
        "datarole" => ["Data Analyst", "Basket Weaver", ""],
    )
    .expect("frame");
    run(&mut frame);

    let groups = column_strings(&frame, fields::ROLE_GROUP).expect("column");
    assert_eq!(
        groups,
        vec!["Data Analysis & Insights", "Other Specialized Roles", ""]
    );
}

#[test]
fn output_model_has_expected_tables() {
    let mut frame = df!(
        "resp_id" => ["A"],
        "age" => ["31"],
        "city" => ["Quezon City"],
        "spneeds" => ["None"],
        "generaltools" => ["Excel"],
    )
    .expect("frame");
    let tables = run(&mut frame);

    assert_eq!(tables.single.name, "single");
    assert_eq!(tables.location.name, "location");
    assert_eq!(tables.freetext.name, "freetext");
    assert!(!tables.junctions.is_empty());
    for table in tables.all() {
        assert!(table.data.column(fields::RESP_ID).is_ok());
    }
}

#[test]
fn cleaning_cleaned_data_is_a_fixed_point() {
    let mut frame = df!(
        "resp_id" => ["A", "B"],
        "timestamp" => ["2024/02/03 10:15:00 AM GMT+8", "2024/02/03 11:00:00 AM GMT+8"],
        "age" => ["31", "0"],
        "educstat" => ["College", "Secondary High School"],
        "gender" => ["", "Male"],
        "city" => ["TAGUIG", ""],
        "province" => ["", "Rizal"],
        "country" => ["Philippines", "Philippines"],
        "careerstg" => ["Professional", "Student / New grad / Career break (studying)"],
        "employertype" => ["Private", "Local"],
        "sitework" => ["Field", ""],
        "salary" => ["15,000 and below", ""],
        "typework" => ["", ""],
        "datarole" => ["Reports Analyst", ""],
        "sizeteam" => ["4", "2"],
    )
    .expect("frame");
    run(&mut frame);

    let mut again = frame.clone();
    run(&mut again);

    for field in [
        fields::AGE,
        fields::AGE_GROUP,
        fields::GENDER,
        fields::CITY,
        fields::CAREER_STAGE_CLEAN,
        fields::EMPLOYER_TYPE,
        fields::SITE_WORK,
        fields::SALARY_GROUP,
        fields::TYPE_WORK,
        fields::DATA_ROLE,
        fields::ROLE_GROUP,
        fields::IN_REGION,
    ] {
        assert_eq!(
            column_strings(&frame, field),
            column_strings(&again, field),
            "field {field} changed on re-run"
        );
    }
}
