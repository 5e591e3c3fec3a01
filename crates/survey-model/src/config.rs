//! Immutable pipeline configuration.
//!
//! All per-field constant tables live here, consolidated into one object
//! built at startup and passed by reference into every stage. The built-in
//! rule sets can be extended per field by lookup files loaded at runtime;
//! the sets below are the documented baseline.

use crate::fields;
use crate::rules::{ExactSpec, RuleSpec};

/// One age bin. Bounds are inclusive; `None` means unbounded on that side.
/// Bands are tested in declaration order, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    pub label: &'static str,
    pub lo: Option<i64>,
    pub hi: Option<i64>,
}

impl AgeBand {
    pub fn contains(&self, age: i64) -> bool {
        self.lo.is_none_or(|lo| age >= lo) && self.hi.is_none_or(|hi| age <= hi)
    }
}

/// Static coordinate imputation entry.
///
/// `place_key` is matched as a lowercase substring against city, province
/// and country text when both coordinates are missing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoordinateEntry {
    pub place_key: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Per-field configuration for one multi-select question.
#[derive(Debug, Clone, Default)]
pub struct MultiSelectSpec {
    pub field: &'static str,
    /// Literal replacements applied to the whole cell before splitting.
    pub pre_split_replace: Vec<(String, String)>,
    /// Ordered regex rules applied to each exploded token.
    pub regex: Vec<RuleSpec>,
    /// Exact rules applied to each exploded token.
    pub exact: Vec<ExactSpec>,
    /// Tokens dropped outright (blank-equivalent answers).
    pub drop: Vec<String>,
    /// When non-empty, only these canonical tokens survive.
    pub keep: Vec<String>,
    /// Tokens longer than this many words are dropped (free-typed noise).
    pub max_words: Option<usize>,
    /// Single-select column whose answer must not be double counted.
    pub dedupe_against: Option<&'static str>,
    /// None-class tokens suppressed when the respondent has >= 2 distinct
    /// remaining values for this field.
    pub prune_none: Vec<String>,
}

impl MultiSelectSpec {
    pub fn plain(field: &'static str) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }
}

/// The full, immutable pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub column_map: Vec<(&'static str, &'static str)>,
    pub identifying_fields: Vec<&'static str>,

    pub age_min: i64,
    pub age_max: i64,
    pub age_zero_correction: i64,
    pub age_zero_education_marker: String,
    pub age_bands: Vec<AgeBand>,

    pub gender_blank_to: String,

    pub city_replacements: Vec<(String, String)>,
    pub city_none_to: String,
    pub city_fill_from: Vec<&'static str>,
    pub delete_city_exact: Vec<String>,

    pub salary_bins: Vec<ExactSpec>,

    pub career_stage_regex: Vec<RuleSpec>,
    pub career_stage_allowed: Vec<String>,
    pub career_stage_other: String,
    pub career_stage_student: String,
    pub working_section: Vec<&'static str>,

    pub employer_regex: Vec<RuleSpec>,
    pub sitework_regex: Vec<RuleSpec>,
    pub data_role_regex: Vec<RuleSpec>,
    pub hardware_regex: Vec<RuleSpec>,
    pub platform_regex: Vec<RuleSpec>,

    pub role_groups: Vec<(String, Vec<String>)>,
    pub role_group_other: String,

    pub in_region_countries: Vec<String>,

    pub typework_fill_with_salary: String,

    pub coordinates: Vec<CoordinateEntry>,

    pub multi_selects: Vec<MultiSelectSpec>,
    pub free_text_fields: Vec<&'static str>,
    pub comms_none_like: Vec<String>,

    pub dedupe_fingerprint: Vec<&'static str>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            column_map: fields::COLUMN_MAP.to_vec(),
            identifying_fields: fields::IDENTIFYING_FIELDS.to_vec(),

            age_min: 15,
            age_max: 100,
            age_zero_correction: 18,
            age_zero_education_marker: "Secondary High School".to_string(),
            age_bands: vec![
                AgeBand { label: "<19", lo: None, hi: Some(18) },
                AgeBand { label: "19-24", lo: Some(19), hi: Some(24) },
                AgeBand { label: "25-29", lo: Some(25), hi: Some(29) },
                AgeBand { label: "30-34", lo: Some(30), hi: Some(34) },
                AgeBand { label: "35-39", lo: Some(35), hi: Some(39) },
                AgeBand { label: "40-44", lo: Some(40), hi: Some(44) },
                AgeBand { label: "45-49", lo: Some(45), hi: Some(49) },
                AgeBand { label: "50-54", lo: Some(50), hi: Some(54) },
                AgeBand { label: "55-59", lo: Some(55), hi: Some(59) },
                AgeBand { label: "60+", lo: Some(60), hi: None },
            ],

            gender_blank_to: "Prefer not to say".to_string(),

            city_replacements: vec![
                ("Ã±".to_string(), "n".to_string()),
                ("CATBALOGAN".to_string(), "Catbalogan".to_string()),
            ],
            city_none_to: "Perth Australia".to_string(),
            city_fill_from: vec![fields::PROVINCE, fields::COUNTRY],
            delete_city_exact: owned(&[
                "Borongan City, Eastern Samar",
                "Aleosan, North Cotabato",
            ]),

            salary_bins: vec![
                ExactSpec::map("15,000 and below", "15K or less"),
                ExactSpec::map("15,001 to 25,000", "15K+ to 25K"),
                ExactSpec::map("25,001 to 35,000", "25K+ to 35K"),
                ExactSpec::map("35,001 to 45,000", "35K+ to 45K"),
                ExactSpec::map("45,001 to 55, 000", "45K+ to 55K"),
                ExactSpec::map("55,001 to 65,000", "55K+ to 65K"),
                ExactSpec::map("65,001 to 75,000", "65K+ to 75K"),
                ExactSpec::map("75,001 to 85,000", "75K+ to 85K"),
                ExactSpec::map("85,001 to 95,000", "85K+ to 95K"),
                ExactSpec::map("95,001 to 100,000", "95K+ to 100K"),
                ExactSpec::map("100,001 to 125,000", "100K+ to 125K"),
                ExactSpec::map("125,001 to 250, 000", "125K+ to 250K"),
                ExactSpec::map("250,001 and above", "250K+"),
            ],

            career_stage_regex: vec![RuleSpec::map(
                r"^Student\s*/\s*New grad\s*/\s*Career break.*$",
                "Student/ New grad/ Career Break",
            )],
            career_stage_allowed: owned(&[
                "Student/ New grad/ Career Break",
                "Career shifter",
                "Professional",
                "Freelance",
            ]),
            career_stage_other: "Other".to_string(),
            career_stage_student: "Student/ New grad/ Career Break".to_string(),
            working_section: fields::WORKING_SECTION.to_vec(),

            employer_regex: vec![
                RuleSpec::map(r"^Local$", "Local"),
                RuleSpec::map(r"^Multinational$", "Multinational"),
                RuleSpec::map(r".*\b(International|US[- ]?based|Foreign)\b.*", "Foreign-Other"),
                RuleSpec::map(r".*\b(Self[- ]?employed|Freelance)\b.*", "Self-employed"),
                RuleSpec::map(r"^Private$", "Unspecified"),
            ],
            sitework_regex: vec![
                RuleSpec::blank(r"^Not working$"),
                RuleSpec::map(r".*\bHybrid\b.*", "Hybrid"),
                RuleSpec::map(r"^Field$", "100% onsite"),
                RuleSpec::map(r".*\bonline\b.*", "Mostly work from home/ fully remote"),
            ],
            data_role_regex: vec![
                RuleSpec::map(r"^admin(\b| .*)$", "Admin"),
                RuleSpec::blank(
                    r"^(Na|NA|N\.A|N/A|student|Studying|Unemployed|Housekeeping|Aspiring DA|career shifter|Not working)$",
                ),
                RuleSpec::map(r"^Data Entry with Analysis$", "Data Analyst"),
                RuleSpec::map(r"^Data Strategist$", "Data Analyst"),
                RuleSpec::map(r"^Reports Analyst$", "Data Analyst"),
                RuleSpec::map(r"^Reports$", "Data Analyst"),
                RuleSpec::map(r"^Reports Developer$", "Data Analyst"),
                RuleSpec::map(r"^A mix of Data Engineering and Analysis$", "Data Engineering"),
                RuleSpec::map(
                    r"^Water supply engineer, data management, power platform$",
                    "Water supply engineer",
                ),
                RuleSpec::map(r"^current role – autocad drafter$", "Autocad Drafter"),
                RuleSpec::map(r"^providing support to end users$", "Application Support"),
                RuleSpec::map(
                    r"^Previously in management\. Currently in content production$",
                    "Content Production",
                ),
            ],
            hardware_regex: vec![
                RuleSpec::map(
                    r"^(Desktop and Laptop|Both laptop and desktop)$",
                    "laptop and desktop",
                ),
                RuleSpec::blank(r"^N/?A$"),
                RuleSpec::map(r"^Phone$", "mobile phone"),
            ],
            platform_regex: vec![
                RuleSpec::map(r"^(SSMS|Ssms)$", "SSMS"),
                RuleSpec::map(r"^(SQL SERVER|MS SWL Server|Microsoft SQL Server)$", "MS SQL Server"),
            ],

            role_groups: vec![
                (
                    "Data Analysis & Insights".to_string(),
                    owned(&["Data Analyst", "Business Analyst", "BI Analyst", "Insights Analyst"]),
                ),
                (
                    "Data & Software Engineering".to_string(),
                    owned(&["Data Engineer", "Software Engineer", "ML Engineer", "Data Engineering"]),
                ),
                (
                    "Management & Leadership".to_string(),
                    owned(&["Manager", "Team Lead", "Director", "Head of Data"]),
                ),
                (
                    "Data Science & Research".to_string(),
                    owned(&["Data Scientist", "Researcher", "ML Researcher"]),
                ),
                (
                    "Technical Support & IT Operations".to_string(),
                    owned(&["Application Support", "IT Support", "SysAdmin", "DevOps"]),
                ),
                (
                    "Data Processing & Entry".to_string(),
                    owned(&["Data Entry", "Encoder"]),
                ),
                (
                    "Customer Service & Operations".to_string(),
                    owned(&["Customer Support", "Operations"]),
                ),
                (
                    "Other Specialized Roles".to_string(),
                    owned(&["Autocad Drafter", "Water supply engineer", "Content Production", "Admin"]),
                ),
            ],
            role_group_other: "Other Specialized Roles".to_string(),

            in_region_countries: owned(&["Philippines", "PH", "Pilipinas"]),

            typework_fill_with_salary: "Unspecified".to_string(),

            coordinates: vec![
                CoordinateEntry {
                    place_key: "calabarzon".to_string(),
                    city: "Cavite".to_string(),
                    latitude: 14.4791,
                    longitude: 120.8969,
                },
                CoordinateEntry {
                    place_key: "zambales".to_string(),
                    city: "Olongapo City".to_string(),
                    latitude: 14.8386,
                    longitude: 120.2842,
                },
                CoordinateEntry {
                    place_key: "united kingdom".to_string(),
                    city: "London".to_string(),
                    latitude: 51.5074,
                    longitude: -0.1278,
                },
            ],

            multi_selects: default_multi_selects(),
            free_text_fields: fields::FREE_TEXT_FIELDS.to_vec(),
            comms_none_like: owned(&["None at the moment", "Nothing"]),

            dedupe_fingerprint: vec![
                fields::CITY,
                fields::AGE,
                fields::GENDER,
                fields::EDUCATION,
                fields::INDUSTRY,
                fields::CAREER_STAGE,
            ],
        }
    }
}

impl PipelineConfig {
    pub fn multi_select(&self, field: &str) -> Option<&MultiSelectSpec> {
        self.multi_selects.iter().find(|spec| spec.field == field)
    }
}

fn default_multi_selects() -> Vec<MultiSelectSpec> {
    vec![
        MultiSelectSpec {
            field: fields::SUCCESS_METHOD,
            regex: vec![
                RuleSpec::map(r"^Headhunt(er)?$", "Headhunter"),
                RuleSpec::map(
                    r"^(Seek|Monster(\.com)?|Kalibrr|Local Posting|company website|Toptal|Udemy|Tableau Public|online job search abroad)$",
                    "Online \u{2013} Other",
                ),
                RuleSpec::map(r"^Jobstree(?:t|y|r)?$", "Jobstreet"),
                RuleSpec::map(
                    r"^(Facebook|Facebook groups|FB|Facebook freelancing groups|Postings in groups|Social Media \(FB ad\))$",
                    "Facebook",
                ),
                RuleSpec::map(r"^(Discord|Slack communities)$", "Discord, Slack, Other"),
                RuleSpec::map(r".*Social Media.*", "Social Media - Unspecified"),
                RuleSpec::map(
                    r"^(Colleague referral on my skillsets|Gradschool career center|Municipal LGU|Office other department)$",
                    "My network \u{2013} people I know",
                ),
            ],
            drop: owned(&[
                "Not working",
                "none as of the moment",
                "still looking for remote work",
                "Di pa hired as freelance",
                "None of the above",
                "I am still yet to try these job networking sites",
                "Haven't tried",
                "No success yet",
                "Unemployed",
            ]),
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec {
            field: fields::REST_OF_ROLE,
            max_words: Some(6),
            dedupe_against: Some(fields::DATA_ROLE),
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec::plain(fields::GENERAL_TOOLS),
        MultiSelectSpec {
            field: fields::REGULAR_TOOLS,
            regex: vec![
                RuleSpec::blank(r"^(none yet|None right now|not daily basis|beginner)$"),
                RuleSpec::map(
                    r"^(PivotChart|Microsoft Excel|excel|using Excel most of the time)$",
                    "Excel",
                ),
                RuleSpec::map(r"^(tableau|Tableau|Tableau calculation)$", "Tableau"),
            ],
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec {
            field: fields::AI_TOOLS,
            regex: vec![
                RuleSpec::map(r"^No, I do not use AI currently(,.*)?$", "None"),
                RuleSpec::map(r"^Chatgpt( .*)?$", "Chatgpt"),
            ],
            prune_none: owned(&["None"]),
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec {
            field: fields::HOSTED_NOTEBOOKS,
            regex: vec![
                RuleSpec::map(r"^(onenote|One Note|microsoft one note)$", "OneNote"),
                RuleSpec::blank(r"^We use regular offline notebook$"),
                RuleSpec::map(r"^Amazon Sagemaker Studio Lab$", "Amazon Sagemaker Studio"),
                RuleSpec::map(
                    r"^(I use none|I am not using any of the above|I currently have no knowledge of this|No\. Just local|not yet|No idea|NO|Nope|Microsoft Word)$",
                    "None",
                ),
            ],
            prune_none: owned(&["None"]),
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec {
            field: fields::DIGITAL_LEARNING,
            pre_split_replace: vec![("/".to_string(), ",".to_string())],
            regex: vec![
                RuleSpec::map(r".*(Youtube|youtube|YouTube).*", "Youtube"),
                RuleSpec::map(
                    r"^(great learning|Great Learning|Great learning free certification)$",
                    "Great Learning",
                ),
                RuleSpec::map(
                    r"^Not currently using any digital tools for learning$",
                    "None",
                ),
            ],
            prune_none: owned(&["None"]),
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec {
            field: fields::INGESTION_TOOLS,
            regex: vec![
                RuleSpec::map(
                    r"^(Python|python|Python jobs|In house tools developed using python|Python scripts|Random throw away python scripts)$",
                    "Python",
                ),
                RuleSpec::map(r"^(Custom scripts|Custom|Tools developed internally)$", "Custom scripts"),
                RuleSpec::map(r"^(Google sheet|Google sheets|Google Sheets)$", "Google sheets"),
                RuleSpec::map(r"^(MS Excel|Only excel|Microsoft Excel|Excel)$", "Excel"),
                RuleSpec::map(r"^(Adf|ADF)$", "Azure Data Factory"),
                RuleSpec::map(r"^(AWS Glue|Glue)$", "AWS Glue"),
                RuleSpec::map(r"^(Don't know/ None|Don't know)$", "None"),
                RuleSpec::blank(r"^Not needed$"),
            ],
            prune_none: owned(&["None"]),
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec {
            field: fields::TRANSFORMATION_TOOLS,
            regex: vec![
                RuleSpec::map(r"^Xstl$", "Xslt"),
                RuleSpec::map(r"^Power BI$", "Power Query"),
            ],
            ..MultiSelectSpec::default()
        },
        MultiSelectSpec::plain(fields::WAREHOUSES),
        MultiSelectSpec::plain(fields::ORCHESTRATION),
        MultiSelectSpec::plain(fields::BUSINESS_INTELLIGENCE),
        MultiSelectSpec::plain(fields::REVERSE_ETL),
        MultiSelectSpec::plain(fields::DATA_QUALITY),
        MultiSelectSpec::plain(fields::DATA_CATALOGS),
        MultiSelectSpec::plain(fields::CLOUD_PLATFORMS),
        MultiSelectSpec::plain(fields::NONCLOUD_PLATFORMS),
        MultiSelectSpec::plain(fields::OTHER_FB_GROUPS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_bands_cover_bounds_in_order() {
        let config = PipelineConfig::default();
        let first = config
            .age_bands
            .iter()
            .find(|band| band.contains(18))
            .map(|band| band.label);
        assert_eq!(first, Some("<19"));
        let sixty = config
            .age_bands
            .iter()
            .find(|band| band.contains(73))
            .map(|band| band.label);
        assert_eq!(sixty, Some("60+"));
    }

    #[test]
    fn every_multi_select_field_is_unique() {
        let config = PipelineConfig::default();
        let mut seen = std::collections::BTreeSet::new();
        for spec in &config.multi_selects {
            assert!(seen.insert(spec.field));
        }
    }

    #[test]
    fn student_label_is_in_allowed_set() {
        let config = PipelineConfig::default();
        assert!(config
            .career_stage_allowed
            .contains(&config.career_stage_student));
    }
}
