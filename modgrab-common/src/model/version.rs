// modgrab-common/src/model/version.rs
use serde::{Deserialize, Serialize};

/// How a version relates to a dependency target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
    Incompatible,
    Embedded,
}

/// Raw dependency descriptor as the registry reports it. Either id may be
/// absent; entries with neither are annotation-only and carry no resolvable
/// target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDependency {
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub dependency_type: DependencyType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHashes {
    pub sha512: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

/// One downloadable file of a version. The first file in a version's list is
/// the primary one by registry convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionFile {
    pub hashes: FileHashes,
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub size: u64,
}

/// Version metadata, reduced to the fields resolution reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub project_id: String,
    pub version_number: String,
    #[serde(default)]
    pub dependencies: Vec<VersionDependency>,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub files: Vec<VersionFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_with_dependencies() {
        let json = r#"{
            "id": "vQhq1",
            "project_id": "AANobbMI",
            "version_number": "0.5.8",
            "game_versions": ["1.20.1"],
            "loaders": ["fabric"],
            "dependencies": [
                {"project_id": "P7dR8mSH", "dependency_type": "required"},
                {"version_id": "abc123", "dependency_type": "optional"}
            ],
            "files": [{
                "hashes": {"sha512": "deadbeef", "sha1": "cafe"},
                "url": "https://cdn.modrinth.com/data/AANobbMI/sodium.jar",
                "filename": "sodium.jar",
                "primary": true,
                "size": 1024
            }]
        }"#;
        let version: Version = serde_json::from_str(json).unwrap();
        assert_eq!(version.dependencies.len(), 2);
        assert_eq!(
            version.dependencies[0].dependency_type,
            DependencyType::Required
        );
        assert_eq!(version.files[0].filename, "sodium.jar");
        assert_eq!(version.files[0].hashes.sha512, "deadbeef");
    }

    #[test]
    fn missing_dependency_type_is_a_parse_error() {
        let json = r#"{"project_id": "x"}"#;
        assert!(serde_json::from_str::<VersionDependency>(json).is_err());
    }
}
