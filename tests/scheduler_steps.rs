// tests/scheduler_steps.rs

mod common;
use crate::common::{diamond, fan_in, validated, DagBuilder, TaskBuilder};

use dagrun::dag::{RunState, Scheduler};
use dagrun::engine::TaskOutcome;

fn names(tasks: &[dagrun::dag::ScheduledTask]) -> Vec<&str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn roots_are_ready_first_in_declaration_order() {
    let dag = validated(fan_in());
    let mut scheduler = Scheduler::new(&dag);

    let ready = scheduler.initial_ready();

    assert_eq!(names(&ready), vec!["A", "B"]);
    assert_eq!(scheduler.run_state_of("A"), Some(RunState::Ready));
    assert_eq!(scheduler.run_state_of("C"), Some(RunState::Pending));
    assert_eq!(scheduler.deps_satisfied("C"), Some(false));
}

#[test]
fn child_is_released_only_after_its_last_parent() {
    let dag = validated(fan_in());
    let mut scheduler = Scheduler::new(&dag);
    scheduler.initial_ready();

    scheduler.mark_running(0);
    scheduler.mark_running(1);

    let step = scheduler.handle_completion(0, &TaskOutcome::Success);
    assert!(step.newly_ready.is_empty());
    assert!(!step.run_just_finished);

    let step = scheduler.handle_completion(1, &TaskOutcome::Success);
    assert_eq!(names(&step.newly_ready), vec!["C"]);
    assert_eq!(scheduler.deps_satisfied("C"), Some(true));

    scheduler.mark_running(2);
    let step = scheduler.handle_completion(2, &TaskOutcome::Success);
    assert!(step.newly_ready.is_empty());
    assert!(step.run_just_finished);
    assert!(scheduler.is_finished());

    let report = scheduler.report();
    assert!(report.is_success());
    assert_eq!(report.succeeded, vec!["A", "B", "C"]);
}

#[test]
fn failure_at_the_top_of_a_diamond_withholds_each_descendant_once() {
    let dag = validated(diamond());
    let mut scheduler = Scheduler::new(&dag);
    assert_eq!(names(&scheduler.initial_ready()), vec!["A"]);

    scheduler.mark_running(0);
    let step = scheduler.handle_completion(0, &TaskOutcome::Failed("boom".into()));

    assert!(step.newly_ready.is_empty());
    assert_eq!(step.newly_withheld, vec!["B", "C", "D"]);
    assert!(step.run_just_finished);

    let report = scheduler.report();
    assert_eq!(report.failed, vec![("A".to_string(), "boom".to_string())]);
    assert_eq!(report.withheld, vec!["B", "C", "D"]);
    assert!(report.succeeded.is_empty());
    assert_eq!(report.total(), 4);
}

#[test]
fn converging_failures_count_the_shared_child_once() {
    let dag = validated(fan_in());
    let mut scheduler = Scheduler::new(&dag);
    scheduler.initial_ready();
    scheduler.mark_running(0);
    scheduler.mark_running(1);

    let first = scheduler.handle_completion(0, &TaskOutcome::Failed("a".into()));
    assert_eq!(first.newly_withheld, vec!["C"]);
    assert!(!first.run_just_finished);

    let second = scheduler.handle_completion(1, &TaskOutcome::Failed("b".into()));
    assert!(second.newly_withheld.is_empty());
    assert!(second.run_just_finished);

    let report = scheduler.report();
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.withheld, vec!["C"]);
    assert_eq!(report.total(), 3);
}

#[test]
fn failure_in_one_branch_leaves_the_other_running() {
    let raw = DagBuilder::new("branches")
        .with_task(TaskBuilder::new("A", "echo A").build())
        .with_task(TaskBuilder::new("B", "echo B").dep("A").build())
        .with_task(TaskBuilder::new("X", "echo X").build())
        .with_task(TaskBuilder::new("Y", "echo Y").dep("X").build())
        .build();
    let dag = validated(raw);
    let mut scheduler = Scheduler::new(&dag);
    assert_eq!(names(&scheduler.initial_ready()), vec!["A", "X"]);

    scheduler.mark_running(0);
    let step = scheduler.handle_completion(0, &TaskOutcome::Failed("no".into()));
    assert_eq!(step.newly_withheld, vec!["B"]);
    assert!(!step.run_just_finished);

    scheduler.mark_running(2);
    let step = scheduler.handle_completion(2, &TaskOutcome::Success);
    assert_eq!(names(&step.newly_ready), vec!["Y"]);

    scheduler.mark_running(3);
    let step = scheduler.handle_completion(3, &TaskOutcome::Success);
    assert!(step.run_just_finished);

    let report = scheduler.report();
    assert_eq!(report.succeeded, vec!["X", "Y"]);
    assert_eq!(report.withheld, vec!["B"]);
    assert!(!report.is_success());
}

#[test]
fn skipped_tasks_count_as_succeeded_and_release_children() {
    let raw = DagBuilder::new("resumed")
        .with_task(TaskBuilder::new("A", "echo A").success(true).build())
        .with_task(TaskBuilder::new("B", "echo B").dep("A").build())
        .build();
    let dag = validated(raw);
    let mut scheduler = Scheduler::new(&dag);

    let ready = scheduler.initial_ready();
    assert!(ready[0].skip);

    let step = scheduler.handle_completion(0, &TaskOutcome::Skipped);
    assert_eq!(names(&step.newly_ready), vec!["B"]);
    assert!(!step.newly_ready[0].skip);
    assert_eq!(scheduler.succeeded_flags(), vec![true, false]);
}

#[test]
fn completions_for_tasks_never_dispatched_are_ignored() {
    let dag = validated(diamond());
    let mut scheduler = Scheduler::new(&dag);
    scheduler.initial_ready();

    // D is still pending.
    let step = scheduler.handle_completion(3, &TaskOutcome::Success);
    assert!(step.newly_ready.is_empty());
    assert_eq!(scheduler.run_state_of("D"), Some(RunState::Pending));

    scheduler.mark_running(0);
    scheduler.handle_completion(0, &TaskOutcome::Success);
    // A second completion for A must not be counted again.
    let step = scheduler.handle_completion(0, &TaskOutcome::Success);
    assert!(step.newly_ready.is_empty());
    assert!(!scheduler.is_finished());
}
