use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Availability of one platform subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    Online,
    Offline,
    Maintenance,
    NotAvailable,
}

impl ServiceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Maintenance => "maintenance",
            Self::NotAvailable => "not-available",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subsystem name (`portal`, `discussions`, `hub-search`, ...) to status.
pub type ServiceStatusMap = BTreeMap<String, ServiceStatus>;
