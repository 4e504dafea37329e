// modgrab-common/src/model/project.rs
use serde::{Deserialize, Serialize};

/// Whether a project works on a given side (client or server).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideSupport {
    Required,
    Optional,
    Unsupported,
    #[serde(other)]
    Unknown,
}

impl Default for SideSupport {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Project metadata, reduced to the fields resolution reads. Unknown fields
/// in the payload are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub client_side: SideSupport,
    #[serde(default)]
    pub server_side: SideSupport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_project_and_ignores_unknown_fields() {
        let json = r#"{
            "id": "AANobbMI",
            "slug": "sodium",
            "title": "Sodium",
            "client_side": "required",
            "server_side": "unsupported",
            "team": "4reLOAKe",
            "downloads": 1000000
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, "AANobbMI");
        assert_eq!(project.client_side, SideSupport::Required);
        assert_eq!(project.server_side, SideSupport::Unsupported);
    }

    #[test]
    fn missing_side_support_defaults_to_unknown() {
        let json = r#"{"id": "x", "slug": "y", "title": "Z"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.client_side, SideSupport::Unknown);
    }

    #[test]
    fn unrecognized_side_support_maps_to_unknown() {
        let json = r#"{"id": "x", "slug": "y", "title": "Z", "client_side": "who-knows"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.client_side, SideSupport::Unknown);
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let json = r#"{"id": "x", "slug": "y"}"#;
        assert!(serde_json::from_str::<Project>(json).is_err());
    }
}
