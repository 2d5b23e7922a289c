use crate::actions::{is_truthy, Action};
use crate::config::Config;
use crate::coordinates::CoordinateGenerator;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;
use thiserror::Error;

const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("record {0} is not an object")]
    RecordNotAnObject(usize),

    #[error("field {field} of record {index} is not an object")]
    FieldNotAnObject { index: usize, field: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub trait Processor {
    /// Processes the record at position `index` of the input, changing it in place.
    fn process_record(&mut self, index: usize, record: &mut Value) -> Result<()>;
}

/// A processor for location records that applies anonymization rules based on the given configuration
///
/// For every record it generates one coordinate pair, which is written to all location fields of
/// that record. Other fields are replaced, or left as they are, according to the [`Action`]s of the
/// [`Config`].
pub struct DefaultProcessor<R: Rng = StdRng> {
    config: Config,
    coordinates: CoordinateGenerator<R>,
}

impl DefaultProcessor<StdRng> {
    pub fn new(config: Config) -> Self {
        let coordinates = CoordinateGenerator::from_config(&config);
        Self {
            config,
            coordinates,
        }
    }
}

impl Default for DefaultProcessor<StdRng> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<R: Rng> DefaultProcessor<R> {
    /// Creates a processor that draws its jitter from the given random generator instead of the
    /// one derived from the configured seed.
    pub fn with_rng(config: Config, rng: R) -> Self {
        let coordinates = CoordinateGenerator::new(&config, rng);
        Self {
            config,
            coordinates,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<R: Rng> Processor for DefaultProcessor<R> {
    /// Process a record according to the configured anonymization rules
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the record in the input, used to generate its coordinates
    /// * `record` - The record to be processed, which must be a JSON object
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record was changed in place
    /// * `Err` - The record, or one of its location fields, is not an object
    fn process_record(&mut self, index: usize, record: &mut Value) -> Result<()> {
        let fields = record
            .as_object_mut()
            .ok_or(Error::RecordNotAnObject(index))?;

        let (latitude, longitude) = self.coordinates.coordinates(index);
        debug!("record {index}: latitude {latitude}, longitude {longitude}");

        for (field, value) in fields.iter_mut() {
            match self.config.get_action(field) {
                Action::Coordinates => {
                    process_action_coordinates(index, field, value, latitude, longitude)?
                }
                Action::ReplaceIfPresent(new_value) => {
                    if is_truthy(value) {
                        *value = new_value.clone();
                    }
                }
                Action::Replace(new_value) => *value = new_value.clone(),
                Action::Keep => {}
            }
        }

        Ok(())
    }
}

fn process_action_coordinates(
    index: usize,
    field: &str,
    value: &mut Value,
    latitude: f64,
    longitude: f64,
) -> Result<()> {
    if !is_truthy(value) {
        return Ok(());
    }

    let location = value
        .as_object_mut()
        .ok_or_else(|| Error::FieldNotAnObject {
            index,
            field: field.into(),
        })?;
    location.insert(LATITUDE.into(), Value::from(latitude));
    location.insert(LONGITUDE.into(), Value::from(longitude));
    Ok(())
}

/// A processor that leaves every record untouched.
#[derive(Debug, Clone, Default)]
pub struct NoopProcessor;

impl NoopProcessor {
    pub fn new() -> Self {
        Self {}
    }
}

impl Processor for NoopProcessor {
    fn process_record(&mut self, _index: usize, _record: &mut Value) -> Result<()> {
        // just leave it as is, without any changes
        Ok(())
    }
}
