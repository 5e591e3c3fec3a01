pub mod csv_table;
pub mod frame;
pub mod lookups;

pub use csv_table::{CsvTable, read_csv_table};
pub use frame::{build_survey_frame, read_survey_frame};
pub use lookups::{FieldLookup, Lookups, load_lookups};
