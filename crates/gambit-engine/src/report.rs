//! Per-step transfer reporting.

use std::fmt;

use serde::Serialize;

use crate::sequencer::TransferStep;

/// What happened on one choreography step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Which step ran.
    pub step: TransferStep,
    /// Wall time for the command plus its wait.
    pub elapsed_ms: u64,
    /// `Some(true)` when the arm answered, `Some(false)` when the window
    /// elapsed silently, `None` for gripper steps (the gripper never
    /// answers; its wait is a fixed settle delay).
    pub acknowledged: Option<bool>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ack = match self.acknowledged {
            Some(true) => "ack",
            Some(false) => "NO ACK",
            None => "-",
        };
        write!(f, "{:<20} {:>6} ms  {}", self.step.label(), self.elapsed_ms, ack)
    }
}

/// Summary of one completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    /// The move that was executed, e.g. `"e2e4"`.
    pub notation: String,
    /// Total wall time for the whole choreography.
    pub total_ms: u64,
    /// One entry per executed step, in choreography order.
    pub steps: Vec<StepReport>,
}

impl TransferReport {
    /// Steps whose acknowledgment window elapsed silently.
    pub fn unacknowledged(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.acknowledged == Some(false))
            .count()
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} steps in {} ms",
            self.notation,
            self.steps.len(),
            self.total_ms
        )?;
        for step in &self.steps {
            writeln!(f, "  {step}")?;
        }
        if self.unacknowledged() > 0 {
            writeln!(
                f,
                "  {} step(s) ran without acknowledgment",
                self.unacknowledged()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_silent_steps() {
        let report = TransferReport {
            notation: "e2e4".into(),
            total_ms: 100,
            steps: vec![
                StepReport {
                    step: TransferStep::GripperOpen,
                    elapsed_ms: 10,
                    acknowledged: None,
                },
                StepReport {
                    step: TransferStep::Park,
                    elapsed_ms: 50,
                    acknowledged: Some(true),
                },
                StepReport {
                    step: TransferStep::TravelAboveStart,
                    elapsed_ms: 40,
                    acknowledged: Some(false),
                },
            ],
        };
        assert_eq!(report.unacknowledged(), 1);
        let rendered = report.to_string();
        assert!(rendered.contains("parking-pose"));
        assert!(rendered.contains("NO ACK"));
    }

    #[test]
    fn serializes_steps_as_kebab_labels() {
        let report = TransferReport {
            notation: "a1a2".into(),
            total_ms: 1,
            steps: vec![StepReport {
                step: TransferStep::DescendToStart,
                elapsed_ms: 1,
                acknowledged: Some(true),
            }],
        };
        let json = serde_json::to_value(&report).expect("serializable");
        assert_eq!(json["steps"][0]["step"], "descend-to-start");
    }
}
