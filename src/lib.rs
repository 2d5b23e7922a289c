//! Anonymization of location records stored as a JSON array.
//!
//! Coordinates are moved to a synthetic location in the Pacific Ocean, addresses are replaced
//! by a demo address and owners by a demo email address. All other fields are kept as they are.
//!
//! # Example
//!
//! ```
//! use location_anonymization::Anonymizer;
//!
//! let input = r#"[{"id": 1, "owner": "jane@example.org", "location": {"latitude": 52.37, "longitude": 4.89}}]"#;
//!
//! let mut anonymizer = Anonymizer::default();
//! let result = anonymizer.anonymize(input.as_bytes()).unwrap();
//!
//! assert_eq!(result.anonymized[0]["owner"], "demo@example.com");
//! assert_eq!(result.anonymized[0]["id"], 1);
//! ```

pub mod actions;
pub mod config;
pub mod coordinates;
pub mod processor;

use crate::config::Config;
use crate::processor::{DefaultProcessor, Processor};
use log::info;
use serde_json::Value;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnonymizationError {
    #[error("Read error: {}", .0.to_lowercase())]
    ReadError(String),

    #[error("Invalid input: {}", .0.to_lowercase())]
    InvalidInput(String),

    #[error("Processing error: {}", .0.to_lowercase())]
    ProcessingError(String),

    #[error("Write error: {}", .0.to_lowercase())]
    WriteError(String),
}

impl From<processor::Error> for AnonymizationError {
    fn from(err: processor::Error) -> Self {
        match err {
            processor::Error::RecordNotAnObject(_) => {
                AnonymizationError::InvalidInput(format!("{err}"))
            }
            _ => AnonymizationError::ProcessingError(format!("{err}")),
        }
    }
}

pub type Result<T, E = AnonymizationError> = std::result::Result<T, E>;

/// The anonymized records, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymizationResult {
    pub anonymized: Vec<Value>,
}

impl AnonymizationResult {
    /// Writes the records as a JSON array, indented with two spaces.
    ///
    /// The complete document is serialized before anything is written to `dest`.
    pub fn write<W: Write>(&self, mut dest: W) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.anonymized)
            .map_err(|e| AnonymizationError::WriteError(format!("{e}")))?;
        dest.write_all(&bytes)
            .and_then(|_| dest.flush())
            .map_err(|e| AnonymizationError::WriteError(format!("{e}")))
    }

    pub fn len(&self) -> usize {
        self.anonymized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anonymized.is_empty()
    }
}

/// What a run did, for reporting to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub latitude_start: f64,
    pub latitude_end: f64,
}

impl Summary {
    /// Creates the summary for `count` records anonymized with the given [`Config`].
    ///
    /// The latitude range is the range without jitter: it starts at the origin and ends `count`
    /// steps further.
    pub fn new(count: usize, config: &Config) -> Self {
        let latitude_start = config.get_origin().latitude();
        Self {
            count,
            latitude_start,
            latitude_end: latitude_start + count as f64 * config.get_step(),
        }
    }
}

/// Anonymizes an array of location records using a [`Processor`].
///
/// # Example
///
/// ```
/// use location_anonymization::config::ConfigBuilder;
/// use location_anonymization::processor::DefaultProcessor;
/// use location_anonymization::Anonymizer;
///
/// let config = ConfigBuilder::new().seed(42).build();
/// let mut anonymizer = Anonymizer::new(DefaultProcessor::new(config));
///
/// let result = anonymizer.anonymize(r#"[{"address": {"locality": "Utrecht"}}]"#.as_bytes()).unwrap();
/// assert_eq!(result.anonymized[0]["address"]["locality"], "Demo City");
/// ```
pub struct Anonymizer<P: Processor = DefaultProcessor> {
    processor: P,
}

impl<P: Processor> Anonymizer<P> {
    pub fn new(processor: P) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Reads a JSON array of records from `src` and anonymizes it.
    ///
    /// # Errors
    ///
    /// * [`AnonymizationError::ReadError`] if `src` does not contain valid JSON
    /// * [`AnonymizationError::InvalidInput`] if the JSON is not an array of objects
    /// * [`AnonymizationError::ProcessingError`] if a location field of a record is not an object
    pub fn anonymize<R: Read>(&mut self, src: R) -> Result<AnonymizationResult> {
        let value: Value = serde_json::from_reader(src)
            .map_err(|e| AnonymizationError::ReadError(format!("{e}")))?;

        let Value::Array(mut records) = value else {
            return Err(AnonymizationError::InvalidInput(
                "top-level JSON value is not an array".into(),
            ));
        };

        self.anonymize_records(&mut records)?;
        Ok(AnonymizationResult {
            anonymized: records,
        })
    }

    /// Anonymizes the given records in place, in order.
    ///
    /// Stops at the first record that cannot be processed. Records before it have been changed
    /// already.
    pub fn anonymize_records(&mut self, records: &mut [Value]) -> Result<()> {
        for (index, record) in records.iter_mut().enumerate() {
            self.processor.process_record(index, record)?;
        }
        info!("anonymized {} records", records.len());
        Ok(())
    }
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new(DefaultProcessor::default())
    }
}
