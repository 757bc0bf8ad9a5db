//! Deployment habitat lookup

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Well-known location of the habitat identifier
pub const DEFAULT_HABITAT_FILE: &str = "/nail/etc/habitat";

/// Placeholder substituted into dashboard URL templates
pub const HABITAT_PLACEHOLDER: &str = "{habitat}";

/// Deployment/location identifier of the host running the handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habitat(String);

impl Habitat {
    /// Sentinel used when the habitat cannot be determined
    pub const UNKNOWN: &'static str = "UNKNOWN";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// Read the habitat from a file, trimming surrounding whitespace
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let name = contents.trim();
        if name.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "habitat file is empty"));
        }
        Ok(Self(name.to_string()))
    }

    /// Read the habitat, falling back to `UNKNOWN` on any failure
    pub fn read_or_unknown(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::read(path).unwrap_or_else(|e| {
            warn!("Could not read habitat from {}: {}", path.display(), e);
            Self::unknown()
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Habitat {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Habitat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a dashboard URL template for a habitat
pub fn dashboard_link(template: &str, habitat: &Habitat) -> String {
    template.replace(HABITAT_PLACEHOLDER, habitat.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_trims_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  uswest1aprod  ").unwrap();
        let habitat = Habitat::read(file.path()).unwrap();
        assert_eq!(habitat.as_str(), "uswest1aprod");
    }

    #[test]
    fn test_missing_file_falls_back_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let habitat = Habitat::read_or_unknown(dir.path().join("habitat"));
        assert_eq!(habitat, Habitat::unknown());
        assert!(Habitat::read(dir.path().join("habitat")).is_err());
    }

    #[test]
    fn test_empty_file_is_unknown() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(Habitat::read_or_unknown(file.path()).as_str(), "UNKNOWN");
    }

    #[test]
    fn test_dashboard_link() {
        let link = dashboard_link(
            "https://systems-{habitat}.example.com/sensu/",
            &Habitat::new("norcal-prod"),
        );
        assert_eq!(link, "https://systems-norcal-prod.example.com/sensu/");
    }
}
