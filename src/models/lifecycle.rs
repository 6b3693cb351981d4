use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which driver is responsible for delivery right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SchedulerState {
    Active,
    Background,
}

impl SchedulerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerState::Active => "active",
            SchedulerState::Background => "background",
        }
    }
}

/// Lifecycle state as reported by the host shell.
///
/// `Inactive` is a transient state some platforms report while switching
/// apps; it does not move the scheduler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HostLifecycle {
    Active,
    Inactive,
    Background,
}

impl HostLifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostLifecycle::Active => "active",
            HostLifecycle::Inactive => "inactive",
            HostLifecycle::Background => "background",
        }
    }

    pub fn scheduler_state(&self) -> Option<SchedulerState> {
        match self {
            HostLifecycle::Active => Some(SchedulerState::Active),
            HostLifecycle::Background => Some(SchedulerState::Background),
            HostLifecycle::Inactive => None,
        }
    }
}

impl fmt::Display for HostLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostLifecycle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" | "foreground" => Ok(HostLifecycle::Active),
            "inactive" => Ok(HostLifecycle::Inactive),
            "background" => Ok(HostLifecycle::Background),
            other => Err(format!("unknown lifecycle state '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_states() {
        assert_eq!("active".parse::<HostLifecycle>(), Ok(HostLifecycle::Active));
        assert_eq!(" Background\n".parse::<HostLifecycle>(), Ok(HostLifecycle::Background));
        assert!("asleep".parse::<HostLifecycle>().is_err());
    }

    #[test]
    fn inactive_does_not_drive_scheduler() {
        assert_eq!(HostLifecycle::Inactive.scheduler_state(), None);
        assert_eq!(
            HostLifecycle::Background.scheduler_state(),
            Some(SchedulerState::Background)
        );
    }
}
