//! Field catalog for the survey export.
//!
//! The survey schema is fixed: every column the pipeline knows about has a
//! short field name here, and [`COLUMN_MAP`] maps the verbatim export
//! headers onto those names. Columns absent from a given export are simply
//! skipped by the stages that use them.

pub const RESP_ID: &str = "resp_id";
pub const TIMESTAMP: &str = "timestamp";
pub const EMAIL: &str = "email";

// Demographics
pub const AGE: &str = "age";
pub const GENDER: &str = "gender";
pub const EDUCATION: &str = "educstat";
pub const CAREER_STAGE: &str = "careerstg";
pub const INDUSTRY: &str = "industry";

// Location
pub const CITY: &str = "city";
pub const PROVINCE: &str = "province";
pub const COUNTRY: &str = "country";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

// Working section
pub const EMPLOYER_TYPE: &str = "employertype";
pub const TYPE_WORK: &str = "typework";
pub const SITE_WORK: &str = "sitework";
pub const SALARY: &str = "salary";
pub const SALARY_GROUP: &str = "salary_grp";
pub const DATA_ROLE: &str = "datarole";
pub const REST_OF_ROLE: &str = "restofrole";
pub const TEAM_SIZE: &str = "sizeteam";

// Multi-selects
pub const SUCCESS_METHOD: &str = "successmethod";
pub const CLOUD_PLATFORMS: &str = "cloudplat";
pub const NONCLOUD_PLATFORMS: &str = "noncloudplat";
pub const GENERAL_TOOLS: &str = "generaltools";
pub const REGULAR_TOOLS: &str = "whatused";
pub const AI_TOOLS: &str = "useai";
pub const HOSTED_NOTEBOOKS: &str = "hostedntbk";
pub const HARDWARE: &str = "hardware";
pub const DIGITAL_LEARNING: &str = "digitools";
pub const INGESTION_TOOLS: &str = "ingestion";
pub const TRANSFORMATION_TOOLS: &str = "transform";
pub const WAREHOUSES: &str = "warehs";
pub const ORCHESTRATION: &str = "orchest";
pub const BUSINESS_INTELLIGENCE: &str = "busint";
pub const REVERSE_ETL: &str = "reversetl";
pub const DATA_QUALITY: &str = "dataqual";
pub const DATA_CATALOGS: &str = "datacatalog";
pub const OTHER_FB_GROUPS: &str = "otherfb";

// Free text
pub const SPECIAL_NEEDS: &str = "spneeds";
pub const VOLUNTEER: &str = "volunteer";
pub const COMMS: &str = "comms";
pub const BEST_PROJECT: &str = "bestproject";

// Community site questions (pass through untouched)
pub const SITE_AWARE: &str = "depwebsite";
pub const SITE_USED: &str = "depwebres";

// Derived
pub const AGE_GROUP: &str = "agegrp";
pub const CAREER_STAGE_CLEAN: &str = "careerstg_cln";
pub const ROLE_GROUP: &str = "role_group";
pub const IN_REGION: &str = "in_region";

/// Verbatim export header -> short field name.
pub const COLUMN_MAP: &[(&str, &str)] = &[
    ("Timestamp", TIMESTAMP),
    ("Email Address", EMAIL),
    ("Age", AGE),
    ("Gender", GENDER),
    ("Latest education status", EDUCATION),
    ("Current stage of DATA CAREER", CAREER_STAGE),
    ("Industry that you are currently in:", INDUSTRY),
    ("City of Residence, current", CITY),
    ("Province of Residence, current", PROVINCE),
    ("Country of Residence, current", COUNTRY),
    ("Type of employer", EMPLOYER_TYPE),
    ("Type of work", TYPE_WORK),
    ("Work set-up", SITE_WORK),
    (
        "Monthly Salary Range (Or monthly income from main source)",
        SALARY,
    ),
    (
        "What best describes MAJORITY of your day-to-day role?",
        DATA_ROLE,
    ),
    (
        "What other descriptions comprise the REST of your role? (Click all that apply)",
        REST_OF_ROLE,
    ),
    ("What is the size of your Data Team?", TEAM_SIZE),
    (
        "Thinking of your most recent job, which platform or method gave you the most success?",
        SUCCESS_METHOD,
    ),
    (
        "What are the cloud platforms that you currently use? (Optional)",
        CLOUD_PLATFORMS,
    ),
    (
        "What are the non-cloud platforms that you currently use? (Optional)",
        NONCLOUD_PLATFORMS,
    ),
    (
        "Which of the following general tools do you use? Choose all that apply.",
        GENERAL_TOOLS,
    ),
    (
        "Which of the following do you use on a regular basis? Choose all that apply.",
        REGULAR_TOOLS,
    ),
    (
        "Do you currently use AI in your workflow or study? Choose all that apply.",
        AI_TOOLS,
    ),
    (
        "Do you use any of the following hosted notebook products?",
        HOSTED_NOTEBOOKS,
    ),
    ("What hardware do you currently use for data?", HARDWARE),
    (
        "Choose the digital tools you are currently using for learning:",
        DIGITAL_LEARNING,
    ),
    (
        "What are the data INGESTION tools you currently use? (Optional)",
        INGESTION_TOOLS,
    ),
    (
        "What are the data TRANSFORMATION tools you currently use? (Optional)",
        TRANSFORMATION_TOOLS,
    ),
    (
        "What are the data WAREHOUSES you currently use? (Optional)",
        WAREHOUSES,
    ),
    (
        "What are the data ORCHESTRATION tools you currently use? (Optional)",
        ORCHESTRATION,
    ),
    (
        "What are the BUSINESS INTELLIGENCE tools you currently use? (Optional)",
        BUSINESS_INTELLIGENCE,
    ),
    (
        "What are the REVERSE ETL tools you currently use? (Optional)",
        REVERSE_ETL,
    ),
    (
        "What are the DATA QUALITY tools you currently use? (Optional)",
        DATA_QUALITY,
    ),
    (
        "What are the DATA CATALOGS you currently use? (Optional)",
        DATA_CATALOGS,
    ),
    (
        "Thinking of data-related communities, what other Facebook communities do you follow?",
        OTHER_FB_GROUPS,
    ),
    (
        "Any specific needs you are trying to address by joining the Facebook group?",
        SPECIAL_NEEDS,
    ),
    (
        "Any specific tasks, skills, knowledge or resources you are willing to contribute to the group?",
        VOLUNTEER,
    ),
    (
        "Thinking of ways to improve communications in the group, do you have any suggestions?",
        COMMS,
    ),
    (
        "Describe the best project that you did in the last 6 months:",
        BEST_PROJECT,
    ),
    (
        "Whether or not aware of the free resources in the community website",
        SITE_AWARE,
    ),
    (
        "If aware of the free resources, have you used at least one of the resources in the community website?",
        SITE_USED,
    ),
    ("Latitude", LATITUDE),
    ("Longitude", LONGITUDE),
];

/// Single-response columns of the main table, in output order.
pub const SINGLE_FIELDS: &[&str] = &[
    RESP_ID,
    TIMESTAMP,
    AGE,
    AGE_GROUP,
    GENDER,
    EDUCATION,
    CAREER_STAGE,
    CAREER_STAGE_CLEAN,
    INDUSTRY,
    CITY,
    PROVINCE,
    COUNTRY,
    IN_REGION,
    EMPLOYER_TYPE,
    TYPE_WORK,
    SITE_WORK,
    SALARY,
    SALARY_GROUP,
    DATA_ROLE,
    ROLE_GROUP,
    TEAM_SIZE,
    HARDWARE,
    SITE_AWARE,
    SITE_USED,
];

/// Columns of the location dimension.
pub const LOCATION_FIELDS: &[&str] = &[RESP_ID, CITY, PROVINCE, COUNTRY, LATITUDE, LONGITUDE];

/// Free-text columns, kept verbatim in their own table.
pub const FREE_TEXT_FIELDS: &[&str] = &[SPECIAL_NEEDS, VOLUNTEER, COMMS, BEST_PROJECT];

/// Fields cleared when the respondent is not currently working.
pub const WORKING_SECTION: &[&str] = &[
    EMPLOYER_TYPE,
    TYPE_WORK,
    SITE_WORK,
    SALARY,
    SALARY_GROUP,
    DATA_ROLE,
    REST_OF_ROLE,
    TEAM_SIZE,
    CLOUD_PLATFORMS,
    NONCLOUD_PLATFORMS,
];

/// Columns removed before any processing (anonymization).
pub const IDENTIFYING_FIELDS: &[&str] = &[EMAIL];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_map_targets_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for (_, field) in COLUMN_MAP {
            assert!(seen.insert(*field), "duplicate field name {field}");
        }
    }

    #[test]
    fn working_section_is_subset_of_known_fields() {
        let known: std::collections::BTreeSet<&str> = COLUMN_MAP
            .iter()
            .map(|(_, field)| *field)
            .chain([SALARY_GROUP, RESP_ID])
            .collect();
        for field in WORKING_SECTION {
            assert!(known.contains(field), "unknown field {field}");
        }
    }
}
