// ==========================================
// Resource Planner - domain enums
// ==========================================
// Serialized form: snake_case (matches the stored enum values)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Lock type
// ==========================================
// hard: capacity commitment, never above the ceiling
// soft: advisory, may overcommit with a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockType {
    Hard,
    Soft,
}

impl LockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Hard => "hard",
            LockType::Soft => "soft",
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, LockType::Hard)
    }
}

impl Default for LockType {
    fn default() -> Self {
        LockType::Soft
    }
}

impl fmt::Display for LockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hard" => Ok(LockType::Hard),
            "soft" => Ok(LockType::Soft),
            other => Err(format!("unknown lock type: {}", other)),
        }
    }
}

// ==========================================
// Project status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "on_hold" | "on-hold" => Ok(ProjectStatus::OnHold),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(format!("unknown project status: {}", other)),
        }
    }
}

// ==========================================
// Hiring urgency
// ==========================================
// Ordered: Normal < Medium < Urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Normal,
    Medium,
    Urgent,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Normal => "normal",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::Urgent => "urgent",
        }
    }
}

impl Default for UrgencyLevel {
    fn default() -> Self {
        UrgencyLevel::Normal
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(UrgencyLevel::Normal),
            "medium" => Ok(UrgencyLevel::Medium),
            "urgent" => Ok(UrgencyLevel::Urgent),
            other => Err(format!("unknown urgency level: {}", other)),
        }
    }
}

// ==========================================
// Utilization band (dashboard badge)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationBand {
    Normal,
    Elevated,
    High,
}

impl fmt::Display for UtilizationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilizationBand::Normal => write!(f, "normal"),
            UtilizationBand::Elevated => write!(f, "elevated"),
            UtilizationBand::High => write!(f, "high"),
        }
    }
}
