// ==========================================
// Resource Planner - utilization accumulator
// ==========================================
// Input: assignments + query window
// Output: day-level load profile inside the window, and its peaks
// Rule: an assignment contributes its full percentage on every
//       day of its own interval (uniform load)
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::interval::CalendarInterval;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Constant load over a run of consecutive days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSegment {
    pub interval: CalendarInterval,
    pub hard_pct: u32,
    pub soft_pct: u32,
}

impl LoadSegment {
    pub fn combined_pct(&self) -> u32 {
        self.hard_pct + self.soft_pct
    }
}

/// Peak day-level sums inside the query window.
///
/// Each figure is the maximum over days of its own category, so
/// `hard_total` and `soft_total` may peak on different days;
/// `combined_total` is the maximum of their per-day sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UtilizationSummary {
    pub hard_total: u32,
    pub soft_total: u32,
    pub combined_total: u32,
    /// Assignments touching the window
    pub overlap_count: usize,
    /// First run of days where the hard peak occurs
    pub hard_peak_window: Option<CalendarInterval>,
    /// First run of days where the combined peak occurs
    pub peak_window: Option<CalendarInterval>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Delta {
    hard_in: u32,
    hard_out: u32,
    soft_in: u32,
    soft_out: u32,
}

// ==========================================
// UtilizationAccumulator
// ==========================================
pub struct UtilizationAccumulator;

impl UtilizationAccumulator {
    /// Day-level load across `window`, as contiguous segments.
    ///
    /// Segments cover the whole window (zero-load runs included) and
    /// adjacent runs with equal load are merged.
    pub fn profile<'a, I>(assignments: I, window: &CalendarInterval) -> Vec<LoadSegment>
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        Self::sweep(assignments, window).0
    }

    /// Peak hard / soft / combined load inside `window`.
    pub fn summarize<'a, I>(assignments: I, window: &CalendarInterval) -> UtilizationSummary
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        let (segments, overlap_count) = Self::sweep(assignments, window);

        let mut summary = UtilizationSummary {
            overlap_count,
            ..UtilizationSummary::default()
        };
        for segment in &segments {
            if segment.hard_pct > summary.hard_total {
                summary.hard_total = segment.hard_pct;
                summary.hard_peak_window = Some(segment.interval);
            }
            if segment.soft_pct > summary.soft_total {
                summary.soft_total = segment.soft_pct;
            }
            if segment.combined_pct() > summary.combined_total {
                summary.combined_total = segment.combined_pct();
                summary.peak_window = Some(segment.interval);
            }
        }
        summary
    }

    fn sweep<'a, I>(assignments: I, window: &CalendarInterval) -> (Vec<LoadSegment>, usize)
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        let mut deltas: BTreeMap<NaiveDate, Delta> = BTreeMap::new();
        deltas.entry(window.start()).or_default();

        let mut overlap_count = 0;
        for assignment in assignments {
            let Some(clipped) = assignment.interval.intersection(window) else {
                continue;
            };
            overlap_count += 1;

            let pct = assignment.utilization.pct();
            let hard = assignment.is_hard();

            let start = deltas.entry(clipped.start()).or_default();
            if hard {
                start.hard_in += pct;
            } else {
                start.soft_in += pct;
            }

            // load stops the day after the clipped end; nothing to record past the window
            if clipped.end() < window.end() {
                if let Some(next_day) = clipped.end().succ_opt() {
                    let stop = deltas.entry(next_day).or_default();
                    if hard {
                        stop.hard_out += pct;
                    } else {
                        stop.soft_out += pct;
                    }
                }
            }
        }

        let boundaries: Vec<(NaiveDate, Delta)> = deltas.into_iter().collect();
        let mut segments: Vec<LoadSegment> = Vec::with_capacity(boundaries.len());
        let (mut hard, mut soft) = (0u32, 0u32);

        for (i, (day, delta)) in boundaries.iter().enumerate() {
            hard = (hard + delta.hard_in).saturating_sub(delta.hard_out);
            soft = (soft + delta.soft_in).saturating_sub(delta.soft_out);

            let run_end = match boundaries.get(i + 1) {
                Some((next_day, _)) => match next_day.pred_opt() {
                    Some(prev) => prev,
                    None => continue,
                },
                None => window.end(),
            };
            let Ok(interval) = CalendarInterval::new(*day, run_end) else {
                continue;
            };

            if let Some(last) = segments.last_mut() {
                if last.hard_pct == hard && last.soft_pct == soft {
                    if let Ok(merged) = CalendarInterval::new(last.interval.start(), run_end) {
                        last.interval = merged;
                    }
                    continue;
                }
            }
            segments.push(LoadSegment {
                interval,
                hard_pct: hard,
                soft_pct: soft,
            });
        }

        (segments, overlap_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assignment::{AssignmentDraft, Utilization};
    use crate::domain::types::LockType;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> CalendarInterval {
        CalendarInterval::new(start, end).unwrap()
    }

    fn assignment(
        id: &str,
        start: NaiveDate,
        end: NaiveDate,
        pct: u32,
        lock_type: LockType,
    ) -> Assignment {
        let draft = AssignmentDraft::new(
            "E1",
            "P1",
            "R1",
            window(start, end),
            Utilization::new(pct).unwrap(),
            lock_type,
        );
        Assignment::from_draft(id, draft)
    }

    #[test]
    fn test_empty_set_yields_single_zero_segment() {
        let w = window(d(1, 1), d(1, 31));
        let profile = UtilizationAccumulator::profile(std::iter::empty(), &w);
        assert_eq!(
            profile,
            vec![LoadSegment {
                interval: w,
                hard_pct: 0,
                soft_pct: 0
            }]
        );
        let summary = UtilizationAccumulator::summarize(std::iter::empty(), &w);
        assert_eq!(summary, UtilizationSummary::default());
    }

    #[test]
    fn test_disjoint_assignments_are_not_summed() {
        // Both overlap the window but never each other: peak is 60, not 110
        let existing = vec![
            assignment("A1", d(1, 1), d(1, 10), 60, LockType::Hard),
            assignment("A2", d(1, 20), d(1, 31), 50, LockType::Hard),
        ];
        let summary = UtilizationAccumulator::summarize(&existing, &window(d(1, 1), d(1, 31)));
        assert_eq!(summary.hard_total, 60);
        assert_eq!(summary.combined_total, 60);
        assert_eq!(summary.overlap_count, 2);
        assert_eq!(summary.hard_peak_window, Some(window(d(1, 1), d(1, 10))));
    }

    #[test]
    fn test_partitions_by_lock_type() {
        let existing = vec![
            assignment("A1", d(1, 1), d(1, 31), 50, LockType::Hard),
            assignment("A2", d(1, 15), d(1, 20), 40, LockType::Soft),
            assignment("A3", d(1, 25), d(1, 31), 30, LockType::Soft),
        ];
        let summary = UtilizationAccumulator::summarize(&existing, &window(d(1, 1), d(1, 31)));
        assert_eq!(summary.hard_total, 50);
        assert_eq!(summary.soft_total, 40);
        assert_eq!(summary.combined_total, 90);
        assert_eq!(summary.peak_window, Some(window(d(1, 15), d(1, 20))));
    }

    #[test]
    fn test_profile_clips_to_window_and_merges_equal_runs() {
        let existing = vec![
            assignment("A1", d(1, 1), d(1, 31), 80, LockType::Hard),
            assignment("A2", d(2, 1), d(2, 28), 80, LockType::Hard),
        ];
        let profile = UtilizationAccumulator::profile(&existing, &window(d(1, 15), d(2, 15)));
        // Jan 15..Feb 15 at a constant 80 collapses into one run
        assert_eq!(
            profile,
            vec![LoadSegment {
                interval: window(d(1, 15), d(2, 15)),
                hard_pct: 80,
                soft_pct: 0
            }]
        );
    }

    #[test]
    fn test_profile_tracks_step_changes() {
        let existing = vec![
            assignment("A1", d(1, 5), d(1, 10), 30, LockType::Hard),
            assignment("A2", d(1, 8), d(1, 12), 20, LockType::Soft),
        ];
        let profile = UtilizationAccumulator::profile(&existing, &window(d(1, 1), d(1, 15)));
        let loads: Vec<(NaiveDate, NaiveDate, u32, u32)> = profile
            .iter()
            .map(|s| (s.interval.start(), s.interval.end(), s.hard_pct, s.soft_pct))
            .collect();
        assert_eq!(
            loads,
            vec![
                (d(1, 1), d(1, 4), 0, 0),
                (d(1, 5), d(1, 7), 30, 0),
                (d(1, 8), d(1, 10), 30, 20),
                (d(1, 11), d(1, 12), 0, 20),
                (d(1, 13), d(1, 15), 0, 0),
            ]
        );
    }

    #[test]
    fn test_ignores_assignments_outside_window() {
        let existing = vec![assignment("A1", d(3, 1), d(3, 31), 100, LockType::Hard)];
        let summary = UtilizationAccumulator::summarize(&existing, &window(d(1, 1), d(1, 31)));
        assert_eq!(summary.overlap_count, 0);
        assert_eq!(summary.hard_total, 0);
    }
}
