//! Schedule projection for one machine's ordered job queue.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::calendar::{HolidaySource, WorkdayCalendar};
use crate::config::PlannerConfig;
use crate::duration::resolve_duration_minutes;
use crate::log_changes;
use crate::models::{Job, ScheduledResult, WorkdayOverride};

use super::forward::ForwardScheduler;
use super::shift_table::ShiftTable;

/// Project start/end instants for `jobs` in the given order.
///
/// Each job starts where the previous one ended; the first starts at the first
/// shift opening at or after `production_start`. Returns nothing without an
/// anchor. Durations are derated by the configured efficiency.
pub fn project_schedule_ordered(
    jobs: &[Job],
    shifts: &ShiftTable,
    production_start: Option<NaiveDateTime>,
    config: &PlannerConfig,
    overrides: &[WorkdayOverride],
    holidays: &dyn HolidaySource,
) -> Vec<ScheduledResult> {
    let Some(anchor) = production_start else {
        return Vec::new();
    };
    if jobs.is_empty() {
        return Vec::new();
    }

    let verbosity = config.verbosity;
    let efficiency = config.efficiency_factor();
    let duration_field = config.duration_field.as_deref();

    let calendar = WorkdayCalendar::new(overrides, holidays);
    let mut scheduler = ForwardScheduler::new(shifts, calendar).with_config(config);

    let mut cursor = scheduler.find_next_shift_start(anchor);
    log_changes!(verbosity, "Anchor: {} -> {}", anchor, cursor);

    let mut results = Vec::with_capacity(jobs.len());
    for job in jobs {
        let nominal = resolve_duration_minutes(&job.attributes, duration_field);
        let effective = (nominal as f64 / efficiency).round() as i64;
        let end = scheduler.calculate_completion_time(cursor, effective);

        log_changes!(
            verbosity,
            "Job {}: {} -> {} ({} min nominal, {} min effective)",
            job.id,
            cursor,
            end,
            nominal,
            effective
        );

        results.push(ScheduledResult {
            job_id: job.id.clone(),
            start: cursor,
            end,
            duration_minutes: nominal,
            effective_minutes: effective,
        });
        cursor = end;
    }
    results
}

/// Project a job queue and index the results by job id.
///
/// If ids repeat, the later job's result is kept.
pub fn project_schedule(
    jobs: &[Job],
    shifts: &ShiftTable,
    production_start: Option<NaiveDateTime>,
    config: &PlannerConfig,
    overrides: &[WorkdayOverride],
    holidays: &dyn HolidaySource,
) -> HashMap<String, ScheduledResult> {
    project_schedule_ordered(jobs, shifts, production_start, config, overrides, holidays)
        .into_iter()
        .map(|r| (r.job_id.clone(), r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::NoHolidays;
    use crate::models::{AttributeValue, ShiftDefinition};
    use chrono::NaiveDate;

    // 2025-03-03 is a Monday
    fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn office_week() -> ShiftTable {
        let defs: Vec<ShiftDefinition> = (1..=5)
            .map(|day| ShiftDefinition {
                machine_id: "m1".to_string(),
                day_of_week: day,
                shift_name: "Früh".to_string(),
                start_time: "08:00".to_string(),
                end_time: "16:00".to_string(),
                hours: 8.0,
                is_active: true,
            })
            .collect();
        ShiftTable::from_definitions(&defs).unwrap()
    }

    fn job_minutes(id: &str, minutes: f64) -> Job {
        Job::with_attributes(id, [("Minuten", AttributeValue::Number(minutes))])
    }

    fn config(efficiency_percent: f64) -> PlannerConfig {
        PlannerConfig {
            efficiency_percent,
            ..PlannerConfig::default()
        }
    }

    #[test]
    fn test_no_anchor_or_no_jobs() {
        let shifts = office_week();
        let jobs = vec![job_minutes("a", 60.0)];
        assert!(project_schedule(&jobs, &shifts, None, &config(100.0), &[], &NoHolidays).is_empty());
        assert!(project_schedule(
            &[],
            &shifts,
            Some(dt(2025, 3, 3, 8, 0)),
            &config(100.0),
            &[],
            &NoHolidays
        )
        .is_empty());
    }

    #[test]
    fn test_first_job_anchored_to_next_shift() {
        let shifts = office_week();
        let jobs = vec![job_minutes("a", 60.0)];
        // Saturday anchor -> Monday 08:00
        let results = project_schedule(
            &jobs,
            &shifts,
            Some(dt(2025, 3, 8, 12, 0)),
            &config(100.0),
            &[],
            &NoHolidays,
        );
        let a = &results["a"];
        assert_eq!(a.start, dt(2025, 3, 10, 8, 0));
        assert_eq!(a.end, dt(2025, 3, 10, 9, 0));
        assert_eq!(a.duration_minutes, 60);
    }

    #[test]
    fn test_jobs_chain_in_order() {
        let shifts = office_week();
        let jobs = vec![
            job_minutes("a", 300.0),
            job_minutes("b", 300.0),
            job_minutes("c", 30.0),
        ];
        let results = project_schedule_ordered(
            &jobs,
            &shifts,
            Some(dt(2025, 3, 3, 8, 0)),
            &config(100.0),
            &[],
            &NoHolidays,
        );

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].end, dt(2025, 3, 3, 13, 0));
        assert_eq!(results[1].start, results[0].end);
        assert_eq!(results[1].end, dt(2025, 3, 4, 10, 0));
        assert_eq!(results[2].start, results[1].end);
        assert_eq!(results[2].end, dt(2025, 3, 4, 10, 30));

        for pair in results.windows(2) {
            assert_eq!(pair[1].start, pair[0].end);
            assert!(pair[1].start >= pair[0].start);
        }
        for r in &results {
            assert!(r.end >= r.start);
        }
    }

    #[test]
    fn test_zero_duration_job_is_instantaneous() {
        let shifts = office_week();
        let jobs = vec![
            Job::with_attributes("unknown", [("Artikel", AttributeValue::from("X-1"))]),
            job_minutes("b", 30.0),
        ];
        let results = project_schedule(
            &jobs,
            &shifts,
            Some(dt(2025, 3, 3, 9, 0)),
            &config(100.0),
            &[],
            &NoHolidays,
        );
        assert_eq!(results["unknown"].start, results["unknown"].end);
        assert_eq!(results["unknown"].duration_minutes, 0);
        assert_eq!(results["b"].start, dt(2025, 3, 3, 9, 0));
    }

    #[test]
    fn test_efficiency_scaling() {
        let shifts = office_week();
        let jobs = vec![job_minutes("a", 60.0)];
        let start = Some(dt(2025, 3, 3, 8, 0));

        let full = project_schedule(&jobs, &shifts, start, &config(100.0), &[], &NoHolidays);
        let half = project_schedule(&jobs, &shifts, start, &config(50.0), &[], &NoHolidays);
        let (full, half) = (&full["a"], &half["a"]);

        assert_eq!((half.end - half.start), (full.end - full.start) * 2);
        assert_eq!(half.duration_minutes, 60);
        assert_eq!(half.effective_minutes, 120);
    }

    #[test]
    fn test_efficiency_scaling_with_anchor_seconds() {
        let shifts = office_week();
        let jobs = vec![job_minutes("a", 60.0)];
        let anchor = NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(9, 30, 15);

        let full = project_schedule(&jobs, &shifts, anchor, &config(100.0), &[], &NoHolidays);
        let half = project_schedule(&jobs, &shifts, anchor, &config(50.0), &[], &NoHolidays);
        let (full, half) = (&full["a"], &half["a"]);

        assert_eq!(full.start, dt(2025, 3, 3, 9, 30));
        assert_eq!(full.end, dt(2025, 3, 3, 10, 30));
        assert_eq!(half.end, dt(2025, 3, 3, 11, 30));
        assert_eq!((half.end - half.start), (full.end - full.start) * 2);
    }

    #[test]
    fn test_unrepresentable_duration_does_not_panic() {
        let jobs = vec![job_minutes("huge", 1e15), job_minutes("next", 30.0)];
        let anchor = dt(2025, 3, 3, 8, 0);

        let linear = project_schedule(
            &jobs,
            &ShiftTable::default(),
            Some(anchor),
            &config(100.0),
            &[],
            &NoHolidays,
        );
        assert_eq!(linear["huge"].duration_minutes, 1_000_000_000_000_000);
        assert_eq!(linear["huge"].end, anchor);
        assert_eq!(linear["next"].end, dt(2025, 3, 3, 8, 30));

        // With shifts the simulation stops at its one-year cap
        let simulated = project_schedule(
            &jobs,
            &office_week(),
            Some(anchor),
            &config(1.0),
            &[],
            &NoHolidays,
        );
        assert_eq!(simulated["huge"].end, dt(2026, 3, 3, 0, 0));
    }

    #[test]
    fn test_efficiency_clamped() {
        let shifts = office_week();
        let jobs = vec![job_minutes("a", 2.0)];
        let start = Some(dt(2025, 3, 3, 8, 0));

        let zero = project_schedule(&jobs, &shifts, start, &config(0.0), &[], &NoHolidays);
        assert_eq!(zero["a"].effective_minutes, 200);
        assert_eq!(zero["a"].end, dt(2025, 3, 3, 11, 20));

        let over = project_schedule(&jobs, &shifts, start, &config(150.0), &[], &NoHolidays);
        assert_eq!(over["a"].effective_minutes, 2);
    }

    #[test]
    fn test_duration_field_hint_used() {
        let shifts = office_week();
        let jobs = vec![Job::with_attributes(
            "a",
            [
                ("Zeit", AttributeValue::Number(2.5)),
                ("Minuten", AttributeValue::Number(10.0)),
            ],
        )];
        let hinted = PlannerConfig {
            duration_field: Some("Zeit".to_string()),
            ..PlannerConfig::default()
        };
        let start = Some(dt(2025, 3, 3, 8, 0));

        let with_hint = project_schedule(&jobs, &shifts, start, &hinted, &[], &NoHolidays);
        assert_eq!(with_hint["a"].duration_minutes, 150);
        assert_eq!(with_hint["a"].end, dt(2025, 3, 3, 10, 30));

        let without = project_schedule(&jobs, &shifts, start, &config(100.0), &[], &NoHolidays);
        assert_eq!(without["a"].duration_minutes, 10);
    }

    #[test]
    fn test_idempotent() {
        let shifts = office_week();
        let jobs: Vec<Job> = (0..20)
            .map(|i| job_minutes(&format!("job-{}", i), 37.0 + i as f64 * 13.0))
            .collect();
        let start = Some(dt(2025, 3, 5, 14, 17));
        let overrides = vec![WorkdayOverride {
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            is_working_day: false,
        }];

        let first = project_schedule(&jobs, &shifts, start, &config(85.0), &overrides, &NoHolidays);
        let second = project_schedule(&jobs, &shifts, start, &config(85.0), &overrides, &NoHolidays);
        assert_eq!(first, second);
        assert_eq!(first.len(), 20);
    }

    #[test]
    fn test_duplicate_ids_keep_later_result() {
        let shifts = office_week();
        let jobs = vec![job_minutes("dup", 60.0), job_minutes("dup", 30.0)];
        let start = Some(dt(2025, 3, 3, 8, 0));

        let ordered =
            project_schedule_ordered(&jobs, &shifts, start, &config(100.0), &[], &NoHolidays);
        assert_eq!(ordered.len(), 2);

        let by_id = project_schedule(&jobs, &shifts, start, &config(100.0), &[], &NoHolidays);
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id["dup"].start, dt(2025, 3, 3, 9, 0));
        assert_eq!(by_id["dup"].end, dt(2025, 3, 3, 9, 30));
    }

    #[test]
    fn test_no_shifts_runs_linearly() {
        let shifts = ShiftTable::default();
        let jobs = vec![job_minutes("a", 90.0), job_minutes("b", 45.0)];
        let results = project_schedule(
            &jobs,
            &shifts,
            Some(dt(2025, 3, 8, 23, 0)),
            &config(100.0),
            &[],
            &NoHolidays,
        );
        assert_eq!(results["a"].start, dt(2025, 3, 8, 23, 0));
        assert_eq!(results["a"].end, dt(2025, 3, 9, 0, 30));
        assert_eq!(results["b"].end, dt(2025, 3, 9, 1, 15));
    }
}
