//! Job kinds and their fixed stage sequences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Point in a job's workflow.
///
/// Custom and repair jobs share `Completed`; every other stage belongs to
/// exactly one kind. Which stages a kind may use, and in which order, is
/// decided by [`JobKind::stages`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Consultation,
    Cad,
    Production,
    Pickup,
    Intake,
    InProgress,
    ReadyForPickup,
    Completed,
}

const CUSTOM_STAGES: &[Stage] = &[
    Stage::Consultation,
    Stage::Cad,
    Stage::Production,
    Stage::Pickup,
    Stage::Completed,
];

const REPAIR_STAGES: &[Stage] = &[
    Stage::Intake,
    Stage::InProgress,
    Stage::ReadyForPickup,
    Stage::Completed,
];

const ALL_STAGES: &[Stage] = &[
    Stage::Consultation,
    Stage::Cad,
    Stage::Production,
    Stage::Pickup,
    Stage::Intake,
    Stage::InProgress,
    Stage::ReadyForPickup,
    Stage::Completed,
];

impl Stage {
    /// Every stage, custom sequence first.
    pub fn all() -> &'static [Stage] {
        ALL_STAGES
    }

    /// Stable identifier used in the jobs file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Consultation => "consultation",
            Stage::Cad => "cad",
            Stage::Production => "production",
            Stage::Pickup => "pickup",
            Stage::Intake => "intake",
            Stage::InProgress => "in_progress",
            Stage::ReadyForPickup => "ready_for_pickup",
            Stage::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Consultation => write!(f, "Consultation"),
            Stage::Cad => write!(f, "CAD"),
            Stage::Production => write!(f, "Production"),
            Stage::Pickup => write!(f, "Pickup"),
            Stage::Intake => write!(f, "Intake"),
            Stage::InProgress => write!(f, "In Progress"),
            Stage::ReadyForPickup => write!(f, "Ready for Pickup"),
            Stage::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    /// Accepts the file identifier (`ready_for_pickup`) as well as the
    /// display label (`Ready for Pickup`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        ALL_STAGES
            .iter()
            .copied()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| format!("unknown stage '{}'", s.trim()))
    }
}

/// What kind of ticket a job is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Custom,
    Repair,
}

impl JobKind {
    /// The kind's workflow, initial stage first and `Completed` last.
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            JobKind::Custom => CUSTOM_STAGES,
            JobKind::Repair => REPAIR_STAGES,
        }
    }

    pub fn initial_stage(&self) -> Stage {
        self.stages()[0]
    }

    /// Stage that means "the piece is waiting at the counter".
    pub fn pickup_stage(&self) -> Stage {
        match self {
            JobKind::Custom => Stage::Pickup,
            JobKind::Repair => Stage::ReadyForPickup,
        }
    }

    /// Next stage after `stage`, or `None` when `stage` is terminal or not
    /// part of this kind's sequence.
    pub fn next_stage(&self, stage: Stage) -> Option<Stage> {
        let stages = self.stages();
        let position = stages.iter().position(|s| *s == stage)?;
        stages.get(position + 1).copied()
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.stages().contains(&stage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Custom => "custom",
            JobKind::Repair => "repair",
        }
    }

    /// Ticket prefix: `C-1001`, `R-2001`.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            JobKind::Custom => "C",
            JobKind::Repair => "R",
        }
    }

    /// Number of the first ticket ever issued for this kind.
    pub fn first_ticket(&self) -> u32 {
        match self {
            JobKind::Custom => 1001,
            JobKind::Repair => 2001,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Custom => write!(f, "Custom"),
            JobKind::Repair => write!(f, "Repair"),
        }
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" => Ok(JobKind::Custom),
            "repair" => Ok(JobKind::Repair),
            other => Err(format!("unknown job kind '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_sequence() {
        let kind = JobKind::Custom;
        assert_eq!(kind.initial_stage(), Stage::Consultation);
        assert_eq!(kind.next_stage(Stage::Consultation), Some(Stage::Cad));
        assert_eq!(kind.next_stage(Stage::Cad), Some(Stage::Production));
        assert_eq!(kind.next_stage(Stage::Production), Some(Stage::Pickup));
        assert_eq!(kind.next_stage(Stage::Pickup), Some(Stage::Completed));
        assert_eq!(kind.next_stage(Stage::Completed), None);
    }

    #[test]
    fn test_repair_sequence() {
        let kind = JobKind::Repair;
        assert_eq!(kind.initial_stage(), Stage::Intake);
        assert_eq!(kind.next_stage(Stage::Intake), Some(Stage::InProgress));
        assert_eq!(
            kind.next_stage(Stage::InProgress),
            Some(Stage::ReadyForPickup)
        );
        assert_eq!(
            kind.next_stage(Stage::ReadyForPickup),
            Some(Stage::Completed)
        );
        assert_eq!(kind.next_stage(Stage::Completed), None);
    }

    #[test]
    fn test_next_stage_rejects_foreign_stage() {
        assert_eq!(JobKind::Repair.next_stage(Stage::Cad), None);
        assert!(!JobKind::Custom.has_stage(Stage::Intake));
        assert!(JobKind::Custom.has_stage(Stage::Completed));
        assert!(JobKind::Repair.has_stage(Stage::Completed));
    }

    #[test]
    fn test_every_sequence_ends_completed() {
        for kind in [JobKind::Custom, JobKind::Repair] {
            assert_eq!(kind.stages().last(), Some(&Stage::Completed));
            assert!(kind.has_stage(kind.pickup_stage()));
        }
    }

    #[test]
    fn test_stage_from_str() {
        assert_eq!("ready_for_pickup".parse::<Stage>(), Ok(Stage::ReadyForPickup));
        assert_eq!("Ready for Pickup".parse::<Stage>(), Ok(Stage::ReadyForPickup));
        assert_eq!("CAD".parse::<Stage>(), Ok(Stage::Cad));
        assert_eq!("in-progress".parse::<Stage>(), Ok(Stage::InProgress));
        assert!("casting".parse::<Stage>().is_err());
    }

    #[test]
    fn test_stage_identifiers_roundtrip() {
        for stage in Stage::all() {
            assert_eq!(stage.as_str().parse::<Stage>(), Ok(*stage));
            assert_eq!(stage.to_string().parse::<Stage>(), Ok(*stage));
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Custom".parse::<JobKind>(), Ok(JobKind::Custom));
        assert_eq!(" repair ".parse::<JobKind>(), Ok(JobKind::Repair));
        assert!("engraving".parse::<JobKind>().is_err());
    }
}
