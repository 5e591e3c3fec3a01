//! Respondent identifier sources.
//!
//! Identifiers are assigned only where the input has none. The production
//! source draws random UUIDs, which makes identifier assignment the one
//! intentionally non-idempotent stage of the pipeline; tests (and
//! reproducible runs) inject the sequential source instead.

pub trait IdSource: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `R0001`, `R0002`, ... identifiers.
#[derive(Debug)]
pub struct SequenceIdSource {
    next: u64,
}

impl SequenceIdSource {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequenceIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequenceIdSource {
    fn next_id(&mut self) -> String {
        let id = format!("R{:04}", self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ids_are_stable() {
        let mut source = SequenceIdSource::new();
        assert_eq!(source.next_id(), "R0001");
        assert_eq!(source.next_id(), "R0002");
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut source = UuidIdSource;
        assert_ne!(source.next_id(), source.next_id());
    }
}
