//! Tests for Task execution paths and registry draining

use std::time::Duration;

use super::{Task, TaskHost, TaskRegistry, do_all_pending};
use crate::timers::virtual_clock::VirtualClock;
use crate::timers::{TimerHost, TimerService};

struct Host {
    timers: TimerService<Host>,
    tasks: TaskRegistry<Host>,
    ran: Vec<&'static str>,
    spawned: Option<Task>,
}

impl TimerHost for Host {
    fn timers(&mut self) -> &mut TimerService<Self> {
        &mut self.timers
    }
}

impl TaskHost for Host {
    fn tasks(&mut self) -> &mut TaskRegistry<Self> {
        &mut self.tasks
    }
}

fn setup() -> (Host, VirtualClock) {
    let (clock, commands) = VirtualClock::new();
    let host = Host {
        timers: TimerService::new(commands),
        tasks: TaskRegistry::new(),
        ran: Vec::new(),
        spawned: None,
    };
    (host, clock)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn do_now_runs_job_exactly_once() {
    let (mut host, mut clock) = setup();
    let task = Task::create(&mut host, |h: &mut Host| h.ran.push("job"));
    assert!(task.is_pending(&mut host));

    task.do_now(&mut host);
    task.do_now(&mut host);
    task.do_after(&mut host, ms(10));
    clock.advance(&mut host, 100);
    do_all_pending(&mut host);

    assert_eq!(host.ran, vec!["job"]);
    assert!(!task.is_pending(&mut host));
    assert!(host.timers.is_empty());
}

#[test]
fn do_after_runs_job_when_timer_fires() {
    let (mut host, mut clock) = setup();
    let task = Task::create(&mut host, |h: &mut Host| h.ran.push("later"));
    task.do_after(&mut host, ms(250));

    clock.advance(&mut host, 249);
    assert!(host.ran.is_empty());
    assert!(task.is_pending(&mut host));

    clock.advance(&mut host, 1);
    assert_eq!(host.ran, vec!["later"]);
    assert!(!task.is_pending(&mut host));
    assert!(host.tasks.is_empty());
}

#[test]
fn last_do_after_wins() {
    let (mut host, mut clock) = setup();
    let task = Task::create(&mut host, |h: &mut Host| h.ran.push("fired"));
    task.do_after(&mut host, ms(100));
    task.do_after(&mut host, ms(300));

    clock.advance(&mut host, 1_000);

    assert_eq!(host.ran, vec!["fired"]);
    let times: Vec<u64> = clock.fired.iter().map(|&(t, _)| t).collect();
    assert_eq!(times, vec![300]);
    assert_eq!(clock.stops_sent(), 1);
}

#[test]
fn do_after_can_shorten_a_pending_delay() {
    let (mut host, mut clock) = setup();
    let task = Task::create(&mut host, |h: &mut Host| h.ran.push("fired"));
    task.do_after(&mut host, ms(3_000));
    clock.advance(&mut host, 1_000);
    task.do_after(&mut host, ms(500));

    clock.advance(&mut host, 10_000);

    let times: Vec<u64> = clock.fired.iter().map(|&(t, _)| t).collect();
    assert_eq!(times, vec![1_500]);
    assert_eq!(host.ran, vec!["fired"]);
}

#[test]
fn do_now_cancels_the_pending_timer() {
    let (mut host, mut clock) = setup();
    let task = Task::create(&mut host, |h: &mut Host| h.ran.push("job"));
    task.do_after(&mut host, ms(100));
    let timer = host.tasks.timer_of(task).expect("timer armed");

    task.do_now(&mut host);
    clock.advance(&mut host, 1_000);

    assert_eq!(host.ran, vec!["job"]);
    assert!(!host.timers.is_scheduled(timer));
    assert!(clock.fired.is_empty());
}

#[test]
fn firing_does_not_send_a_stop_for_its_own_timer() {
    let (mut host, mut clock) = setup();
    let task = Task::create(&mut host, |_: &mut Host| {});
    task.do_after(&mut host, ms(10));

    clock.advance(&mut host, 10);

    assert_eq!(clock.stops_sent(), 0);
}

#[test]
fn do_all_pending_runs_snapshot_in_creation_order() {
    let (mut host, mut clock) = setup();
    Task::create(&mut host, |h: &mut Host| h.ran.push("a"));
    let b = Task::create(&mut host, |h: &mut Host| h.ran.push("b"));
    b.do_after(&mut host, ms(500));
    Task::create(&mut host, |h: &mut Host| {
        h.ran.push("c");
        let spawned = Task::create(h, |h: &mut Host| h.ran.push("spawned"));
        h.spawned = Some(spawned);
    });

    do_all_pending(&mut host);
    assert_eq!(host.ran, vec!["a", "b", "c"]);

    let spawned = host.spawned.expect("job created a task");
    assert!(spawned.is_pending(&mut host));
    assert_eq!(host.tasks.len(), 1);

    // b's timer went away with it.
    clock.advance(&mut host, 1_000);
    assert_eq!(host.ran, vec!["a", "b", "c"]);

    do_all_pending(&mut host);
    assert_eq!(host.ran, vec!["a", "b", "c", "spawned"]);
}

#[test]
fn drain_skips_tasks_already_run_by_an_earlier_job() {
    let (mut host, _clock) = setup();
    Task::create(&mut host, |h: &mut Host| {
        h.ran.push("first");
        if let Some(later) = h.spawned {
            later.do_now(h);
        }
    });
    let later = Task::create(&mut host, |h: &mut Host| h.ran.push("later"));
    host.spawned = Some(later);

    do_all_pending(&mut host);

    assert_eq!(host.ran, vec!["first", "later"]);
    assert!(host.tasks.is_empty());
}

#[test]
fn nested_drain_inside_a_job_is_safe() {
    let (mut host, mut clock) = setup();
    Task::create(&mut host, |h: &mut Host| h.ran.push("cleanup"));
    let reset = Task::create(&mut host, |h: &mut Host| {
        h.ran.push("reset");
        do_all_pending(h);
    });
    Task::create(&mut host, |h: &mut Host| h.ran.push("visual"));
    reset.do_after(&mut host, ms(1_500));

    clock.advance(&mut host, 1_500);

    assert_eq!(host.ran, vec!["reset", "cleanup", "visual"]);
    assert!(host.tasks.is_empty());
}
