use crate::{
    bar::BarSpec,
    compute::{BarFactory, router::ComputeRouter},
    error::BarError,
};
use jackbot_integration::Validator;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

/// Bar computations requested for a session.
///
/// eg/
/// ```json
/// {
///     "bars": [
///         { "kind": "time", "interval": 60000 },
///         { "kind": "volume", "interval": 1000, "name": "oi_1k" },
///         { "kind": "tick", "interval": 50 }
///     ]
/// }
/// ```
#[derive(Clone, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct ComputeConfig {
    #[serde(default)]
    pub bars: Vec<BarSpec>,
}

impl ComputeConfig {
    /// Parse and validate a [`ComputeConfig`] from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, BarError> {
        serde_json::from_str::<Self>(input)?.validate()
    }

    /// Load and validate a [`ComputeConfig`] from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BarError> {
        let file = File::open(path)?;
        serde_json::from_reader::<_, Self>(BufReader::new(file))?.validate()
    }

    /// One [`BarFactory`] per configured bar.
    pub fn factories(&self) -> impl Iterator<Item = BarFactory> + '_ {
        self.bars.iter().cloned().map(BarFactory::new)
    }

    /// Build a [`ComputeRouter`] for a new session from this configuration.
    pub fn router(&self) -> Result<ComputeRouter<BarFactory>, BarError> {
        ComputeRouter::new(self.factories())
    }
}

impl Validator for ComputeConfig {
    type Error = BarError;

    fn validate(self) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        // Bar names identify outputs downstream, so they must be unique
        let mut names = HashSet::with_capacity(self.bars.len());
        if let Some(duplicate) = self.bars.iter().find(|spec| !names.insert(spec.name().clone())) {
            return Err(BarError::Config(format!(
                "duplicate bar name: {}",
                duplicate.name()
            )));
        }

        Ok(self)
    }
}
