use crate::actions::Action;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

pub const LOCATION: &str = "location";
pub const CROWD_SOURCED_LOCATION: &str = "crowdSourcedLocation";
pub const ADDRESS: &str = "address";
pub const OWNER: &str = "owner";

pub const DEMO_OWNER: &str = "demo@example.com";

// middle of the Pacific Ocean
const ORIGIN_LATITUDE_DEFAULT: f64 = 0.0;
const ORIGIN_LONGITUDE_DEFAULT: f64 = -150.0;

const STEP_DEFAULT: f64 = 0.001;
const JITTER_DEFAULT: f64 = 0.0001;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct CoordinatesError(String);

/// A latitude/longitude pair in decimal degrees.
///
/// Both values must be finite, the latitude must lie within `-90..=90` and the longitude within
/// `-180..=180`.
///
/// # Example
///
/// ```
/// use location_anonymization::config::Coordinates;
///
/// let coordinates = Coordinates::new(52.37, 4.89).unwrap();
/// assert_eq!(coordinates.latitude(), 52.37);
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError(format!(
                "latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError(format!(
                "longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            latitude: ORIGIN_LATITUDE_DEFAULT,
            longitude: ORIGIN_LONGITUDE_DEFAULT,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct JitterError(String);

/// The maximum absolute random offset, in degrees, added to each generated coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter(pub(crate) f64);

impl Jitter {
    /// Creates a new [`Jitter`] instance.
    ///
    /// # Returns
    /// * `Ok(Jitter)` if `bound` is finite and not negative
    /// * `Err(JitterError)` otherwise
    pub fn new(bound: f64) -> Result<Self, JitterError> {
        if !bound.is_finite() || bound < 0.0 {
            return Err(JitterError(format!(
                "jitter must be a finite, non-negative number, got {bound}"
            )));
        }
        Ok(Jitter(bound))
    }

    pub fn bound(&self) -> f64 {
        self.0
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Jitter(JITTER_DEFAULT)
    }
}

impl TryFrom<f64> for Jitter {
    type Error = JitterError;

    fn try_from(value: f64) -> Result<Self, JitterError> {
        Jitter::new(value)
    }
}

/// The fixed address written over every real address.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DemoAddress {
    locality: &'static str,
    country: &'static str,
    street_name: &'static str,
    formatted_address_lines: [&'static str; 3],
    administrative_area: &'static str,
    country_code: &'static str,
    label: &'static str,
    street_address: &'static str,
    state_code: &'static str,
    map_item_full_address: &'static str,
}

const DEMO_ADDRESS: DemoAddress = DemoAddress {
    locality: "Demo City",
    country: "Demo Country",
    street_name: "Demo Street",
    formatted_address_lines: [
        "123 Demo Street",
        "Demo City, Demo State 00000",
        "Demo Country",
    ],
    administrative_area: "Demo State",
    country_code: "XX",
    label: "123 Demo Street",
    street_address: "123",
    state_code: "DS",
    map_item_full_address: "123 Demo Street, Demo City, Demo State 00000",
};

/// Returns the demo address as a JSON object, with its keys in a fixed order.
pub fn demo_address() -> Value {
    // serializing a struct of plain strings cannot fail
    serde_json::to_value(DEMO_ADDRESS).expect("Failed to serialize demo address")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldActionMap(BTreeMap<&'static str, Action>);

impl FieldActionMap {
    pub(crate) fn get(&self, field: &str) -> Option<&Action> {
        self.0.get(field)
    }
}

impl Default for FieldActionMap {
    fn default() -> Self {
        FieldActionMap(BTreeMap::from([
            (LOCATION, Action::Coordinates),
            (CROWD_SOURCED_LOCATION, Action::Coordinates),
            (ADDRESS, Action::ReplaceIfPresent(demo_address())),
            (OWNER, Action::Replace(Value::from(DEMO_OWNER))),
        ]))
    }
}

/// Configuration for location anonymization.
///
/// # Fields
///
/// * `origin` - The [`Coordinates`] the generated locations start from
/// * `step` - The offset in degrees between the locations of consecutive records
/// * `jitter` - The [`Jitter`] bound for the random part of each coordinate
/// * `seed` - Optional seed for the random generator, making the output reproducible
/// * `field_actions` - Mapping of record fields to the action taken on them
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    origin: Coordinates,
    step: f64,
    jitter: Jitter,
    seed: Option<u64>,
    field_actions: FieldActionMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: Coordinates::default(),
            step: STEP_DEFAULT,
            jitter: Jitter::default(),
            seed: None,
            field_actions: FieldActionMap::default(),
        }
    }
}

impl Config {
    pub fn get_origin(&self) -> Coordinates {
        self.origin
    }

    pub fn get_step(&self) -> f64 {
        self.step
    }

    pub fn get_jitter(&self) -> Jitter {
        self.jitter
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the [`Action`] to take for a given record field.
    ///
    /// Fields without an explicit action are kept as they are.
    pub fn get_action(&self, field: &str) -> &Action {
        self.field_actions.get(field).unwrap_or(&Action::Keep)
    }
}

/// A builder for [`Config`].
///
/// # Example
///
/// ```
/// use location_anonymization::config::{ConfigBuilder, Coordinates, Jitter};
///
/// let config = ConfigBuilder::new()
///     .origin(Coordinates::new(10.0, 20.0).unwrap())
///     .jitter(Jitter::new(0.0).unwrap())
///     .seed(42)
///     .build();
/// assert_eq!(config.get_seed(), Some(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder(Config::default())
    }

    /// Sets the [`Coordinates`] that the location of the first record is generated around.
    pub fn origin(mut self, origin: Coordinates) -> Self {
        self.0.origin = origin;
        self
    }

    pub fn jitter(mut self, jitter: Jitter) -> Self {
        self.0.jitter = jitter;
        self
    }

    /// Seeds the random generator used for jitter.
    ///
    /// Without a seed, every run produces different coordinates.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = Some(seed);
        self
    }

    pub fn build(self) -> Config {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.get_origin().latitude(), 0.0);
        assert_eq!(config.get_origin().longitude(), -150.0);
        assert_eq!(config.get_step(), 0.001);
        assert_eq!(config.get_jitter().bound(), 0.0001);
        assert_eq!(config.get_seed(), None);
    }

    #[test]
    fn test_get_action() {
        let config = Config::default();
        assert_eq!(config.get_action(LOCATION), &Action::Coordinates);
        assert_eq!(config.get_action(CROWD_SOURCED_LOCATION), &Action::Coordinates);
        assert_eq!(
            config.get_action(ADDRESS),
            &Action::ReplaceIfPresent(demo_address())
        );
        assert_eq!(
            config.get_action(OWNER),
            &Action::Replace(json!("demo@example.com"))
        );

        // fields without explicit action should be kept
        assert_eq!(config.get_action("id"), &Action::Keep);
        assert_eq!(config.get_action("Location"), &Action::Keep);
    }

    #[test]
    fn test_config_builder() {
        let origin = Coordinates::new(1.5, 2.5).unwrap();
        let config = ConfigBuilder::new()
            .origin(origin)
            .jitter(Jitter::new(0.5).unwrap())
            .seed(7)
            .build();
        assert_eq!(config.get_origin(), origin);
        assert_eq!(config.get_jitter().bound(), 0.5);
        assert_eq!(config.get_seed(), Some(7));
        assert_eq!(config.get_step(), 0.001);
    }

    #[test]
    fn test_coordinates_validation() {
        // valid cases
        assert!(Coordinates::new(0.0, 0.0).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());

        // invalid cases
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinates_error() {
        let error = Coordinates::new(100.0, 0.0).unwrap_err();
        assert_eq!(error.to_string(), "latitude must be between -90 and 90, got 100");
    }

    #[test]
    fn test_jitter_new() {
        assert!(Jitter::new(0.0).is_ok());
        assert!(Jitter::new(0.0001).is_ok());
        assert!(Jitter::new(-0.0001).is_err());
        assert!(Jitter::new(f64::NAN).is_err());
        assert!(Jitter::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_jitter_try_into() {
        assert!(<f64 as TryInto<Jitter>>::try_into(0.1).is_ok());
        assert!(<f64 as TryInto<Jitter>>::try_into(-0.1).is_err());
    }

    #[test]
    fn test_demo_address() {
        let expected = json!({
            "locality": "Demo City",
            "country": "Demo Country",
            "streetName": "Demo Street",
            "formattedAddressLines": [
                "123 Demo Street",
                "Demo City, Demo State 00000",
                "Demo Country"
            ],
            "administrativeArea": "Demo State",
            "countryCode": "XX",
            "label": "123 Demo Street",
            "streetAddress": "123",
            "stateCode": "DS",
            "mapItemFullAddress": "123 Demo Street, Demo City, Demo State 00000"
        });
        assert_eq!(demo_address(), expected);
    }

    #[test]
    fn test_demo_address_key_order() {
        let address = demo_address();
        let keys: Vec<&str> = address
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            [
                "locality",
                "country",
                "streetName",
                "formattedAddressLines",
                "administrativeArea",
                "countryCode",
                "label",
                "streetAddress",
                "stateCode",
                "mapItemFullAddress"
            ]
        );
    }
}
