use serde::{Deserialize, Serialize};

/// Fault status lifecycle.
///
/// `Open → Assigned → Finished → Invoiced`, plus the way back
/// `Invoiced → Finished` and `Finished → Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultStatus {
    Open,
    Assigned,
    Finished,
    Invoiced,
}

impl FaultStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultStatus::Open => "open",
            FaultStatus::Assigned => "assigned",
            FaultStatus::Finished => "finished",
            FaultStatus::Invoiced => "invoiced",
        }
    }
}

impl core::fmt::Display for FaultStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
