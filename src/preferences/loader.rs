//! JSON preference loading
//!
//! Documents may be partial; missing top-level fields take the built-in
//! defaults.

use super::Preferences;
use crate::error::LoadError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

impl Preferences {
    /// Parse preferences from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let prefs: Preferences = serde_json::from_str(json)?;
        prefs.log_sanity_warnings();
        Ok(prefs)
    }

    /// Load preferences from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let prefs: Preferences = serde_json::from_reader(reader)?;
        log::debug!("loaded preferences from {}", path.as_ref().display());
        prefs.log_sanity_warnings();
        Ok(prefs)
    }

    /// Serialize to pretty JSON, e.g. to seed a settings file
    pub fn to_json_pretty(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn log_sanity_warnings(&self) {
        for warning in self.sanity_warnings() {
            log::warn!("preferences: {}", warning);
        }
    }
}
