//! Installed application entity and its lifecycle status

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApplicationDescriptor, Site};

/// Fully resolved configuration of an installed application
pub type Configuration = BTreeMap<String, serde_json::Value>;

/// Lifecycle status of an installed application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Initialized,
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialized => "INITIALIZED",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
        };
        f.write_str(name)
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INITIALIZED" => Ok(Self::Initialized),
            "STARTING" => Ok(Self::Starting),
            "RUNNING" => Ok(Self::Running),
            "STOPPING" => Ok(Self::Stopping),
            "STOPPED" => Ok(Self::Stopped),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Where an application is deployed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeployMode {
    #[default]
    Local,
    Cluster,
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("LOCAL"),
            Self::Cluster => f.write_str("CLUSTER"),
        }
    }
}

impl FromStr for DeployMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOCAL" => Ok(Self::Local),
            "CLUSTER" => Ok(Self::Cluster),
            other => Err(format!("unknown deploy mode '{other}'")),
        }
    }
}

/// An application installed on a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEntity {
    pub uuid: Uuid,

    pub app_id: String,

    pub site_id: String,

    /// Type of the descriptor this application was installed from
    pub app_type: String,

    #[serde(default)]
    pub mode: DeployMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar_path: Option<String>,

    #[serde(default)]
    pub configuration: Configuration,

    pub status: Status,
}

impl ApplicationEntity {
    /// Build a fresh entity with generated identity and `INITIALIZED` status
    pub fn new(site: &Site, descriptor: &ApplicationDescriptor, mode: DeployMode) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            app_id: default_app_id(&descriptor.app_type, &site.site_id),
            site_id: site.site_id.clone(),
            app_type: descriptor.app_type.clone(),
            mode,
            jar_path: descriptor.jar_path.clone(),
            configuration: Configuration::new(),
            status: Status::Initialized,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Default application id: `UPPER(<type>_<siteId>)`
pub fn default_app_id(app_type: &str, site_id: &str) -> String {
    format!("{app_type}_{site_id}").to_uppercase()
}

/// Lookup key for an installed application: uuid, app id, or both
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationRef {
    pub uuid: Option<Uuid>,
    pub app_id: Option<String>,
}

impl ApplicationRef {
    pub fn by_uuid(uuid: Uuid) -> Self {
        Self {
            uuid: Some(uuid),
            app_id: None,
        }
    }

    pub fn by_app_id(app_id: impl Into<String>) -> Self {
        Self {
            uuid: None,
            app_id: Some(app_id.into()),
        }
    }

    /// Interpret user input as a uuid when it parses as one, otherwise as an app id
    pub fn parse(input: &str) -> Self {
        match Uuid::parse_str(input) {
            Ok(uuid) => Self::by_uuid(uuid),
            Err(_) => Self::by_app_id(input),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.uuid.is_none() && self.app_id.is_none()
    }

    /// Whether every identifier present in this reference matches the entity
    pub fn matches(&self, entity: &ApplicationEntity) -> bool {
        !self.is_empty()
            && self.uuid.is_none_or(|uuid| uuid == entity.uuid)
            && self
                .app_id
                .as_deref()
                .is_none_or(|app_id| app_id == entity.app_id)
    }
}

impl fmt::Display for ApplicationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.uuid, &self.app_id) {
            (Some(uuid), Some(app_id)) => write!(f, "{app_id} ({uuid})"),
            (Some(uuid), None) => write!(f, "{uuid}"),
            (None, Some(app_id)) => write!(f, "{app_id}"),
            (None, None) => write!(f, "<empty>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> ApplicationEntity {
        ApplicationEntity::new(
            &Site::new("sandbox"),
            &ApplicationDescriptor::new("hdfs_audit").with_jar_path("lib/audit.jar"),
            DeployMode::Local,
        )
    }

    #[test]
    fn test_new_entity_defaults() {
        let entity = entity();
        assert_eq!(entity.app_id, "HDFS_AUDIT_SANDBOX");
        assert_eq!(entity.status, Status::Initialized);
        assert_eq!(entity.jar_path.as_deref(), Some("lib/audit.jar"));
        assert!(entity.configuration.is_empty());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let yaml = serde_yaml::to_string(&Status::Starting).unwrap();
        assert_eq!(yaml.trim(), "STARTING");
        assert_eq!("stopped".parse::<Status>(), Ok(Status::Stopped));
    }

    #[test]
    fn test_ref_parse_uuid_or_app_id() {
        let uuid = Uuid::new_v4();
        assert_eq!(
            ApplicationRef::parse(&uuid.to_string()),
            ApplicationRef::by_uuid(uuid)
        );
        assert_eq!(
            ApplicationRef::parse("HDFS_AUDIT_SANDBOX"),
            ApplicationRef::by_app_id("HDFS_AUDIT_SANDBOX")
        );
    }

    #[test]
    fn test_ref_matches_requires_all_present_ids() {
        let entity = entity();
        assert!(ApplicationRef::by_uuid(entity.uuid).matches(&entity));
        assert!(ApplicationRef::by_app_id("HDFS_AUDIT_SANDBOX").matches(&entity));

        let both = ApplicationRef {
            uuid: Some(entity.uuid),
            app_id: Some("OTHER".to_string()),
        };
        assert!(!both.matches(&entity));
        assert!(!ApplicationRef::default().matches(&entity));
    }
}
