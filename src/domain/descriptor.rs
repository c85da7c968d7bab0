//! Application descriptor types
//!
//! A descriptor is the static metadata shipped with an application provider:
//! default configuration, declared dependencies, output streams and the kind
//! of environment the application runs in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of execution environment an application is bound to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    /// Lifecycle commands are dispatched to a backend over a stream provider
    #[default]
    Dispatch,
    /// Nothing to run; the application only contributes metadata
    Static,
}

impl EnvironmentKind {
    pub fn is_executable(self) -> bool {
        matches!(self, Self::Dispatch)
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch => write!(f, "dispatch"),
            Self::Static => write!(f, "static"),
        }
    }
}

impl FromStr for EnvironmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dispatch" => Ok(Self::Dispatch),
            "static" => Ok(Self::Static),
            other => Err(format!("unknown environment kind '{other}'")),
        }
    }
}

/// A default configuration property declared by a descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,

    #[serde(default)]
    pub value: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
            required: false,
        }
    }
}

/// A peer application type that must (or may) be installed on the same site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDependency {
    #[serde(rename = "type")]
    pub app_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ApplicationDependency {
    pub fn required(app_type: impl Into<String>) -> Self {
        Self {
            app_type: app_type.into(),
            version: None,
            required: true,
        }
    }

    pub fn optional(app_type: impl Into<String>) -> Self {
        Self {
            app_type: app_type.into(),
            version: None,
            required: false,
        }
    }
}

impl fmt::Display for ApplicationDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.app_type, version),
            None => write!(f, "{}", self.app_type),
        }
    }
}

/// An output stream an application publishes once installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDefinition {
    pub stream_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Transport topic the stream is read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl StreamDefinition {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            description: None,
            topic: None,
        }
    }

    /// Copy of this definition scoped to a site: `UPPER(<streamId>_<siteId>)`
    pub fn scoped_to(&self, site_id: &str) -> Self {
        Self {
            stream_id: format!("{}_{}", self.stream_id, site_id).to_uppercase(),
            ..self.clone()
        }
    }
}

/// Static metadata describing an installable application type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDescriptor {
    #[serde(rename = "type")]
    pub app_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default artifact location used when install does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar_path: Option<String>,

    #[serde(default)]
    pub environment: EnvironmentKind,

    /// Ordered default properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configuration: Vec<Property>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ApplicationDependency>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub streams: Vec<StreamDefinition>,
}

impl ApplicationDescriptor {
    pub fn new(app_type: impl Into<String>) -> Self {
        Self {
            app_type: app_type.into(),
            name: None,
            version: None,
            description: None,
            jar_path: None,
            environment: EnvironmentKind::default(),
            configuration: Vec::new(),
            dependencies: Vec::new(),
            streams: Vec::new(),
        }
    }

    pub fn with_jar_path(mut self, jar_path: impl Into<String>) -> Self {
        self.jar_path = Some(jar_path.into());
        self
    }

    pub fn with_environment(mut self, environment: EnvironmentKind) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.configuration.push(property);
        self
    }

    pub fn with_dependency(mut self, dependency: ApplicationDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_stream(mut self, stream: StreamDefinition) -> Self {
        self.streams.push(stream);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.app_type)
    }
}
