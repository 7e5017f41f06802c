//! Command execution for dashboard hosts.
//!
//! [`Scheduler`] turns commands into timed messages for an event loop.
//! [`settle`] drives a controller to quiescence without waiting, for
//! headless hosts that have no clock to wait on.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::host::{ChartBackend, CloudEngine, Page};
use crate::logger::ActivityLog;

use super::controller::DashboardController;
use super::model::{DashboardCmd, DashboardMsg};

/// Upper bound on immediate retries in [`settle`], independent of config.
const SETTLE_GUARD: usize = 10_000;

/// Timed delivery of scheduled messages.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<(Instant, DashboardMsg)>,
}

impl Scheduler {
    /// Queue the timed parts of `cmd` and return the paths it navigated to.
    pub fn schedule(&mut self, cmd: DashboardCmd, now: Instant) -> Vec<String> {
        let mut navigations = Vec::new();
        for cmd in cmd.flatten() {
            match cmd {
                DashboardCmd::ScheduleCloudRetry { attempt, after } => {
                    self.pending
                        .push((now + after, DashboardMsg::CloudRetry { attempt }));
                }
                DashboardCmd::Navigate { path } => navigations.push(path),
                DashboardCmd::None | DashboardCmd::Batch(_) => {}
            }
        }
        navigations
    }

    /// Remove and return messages whose deadline has passed, earliest first.
    pub fn due(&mut self, now: Instant) -> Vec<DashboardMsg> {
        self.pending.sort_by_key(|(deadline, _)| *deadline);
        let split = self.pending.partition_point(|(deadline, _)| *deadline <= now);
        self.pending.drain(..split).map(|(_, msg)| msg).collect()
    }

    /// Time until the next deadline, if anything is queued.
    #[must_use]
    pub fn next_wait(&self, now: Instant) -> Option<Duration> {
        self.pending
            .iter()
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
            .min()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Execute `cmd` and everything it triggers immediately. Scheduled retries
/// fire without waiting; the controller's attempt cap still bounds them.
/// Returns the paths navigated to.
pub fn settle<H, L>(controller: &mut DashboardController<H, L>, cmd: DashboardCmd) -> Vec<String>
where
    H: Page + ChartBackend + CloudEngine,
    L: ActivityLog,
{
    let mut navigations = Vec::new();
    let mut queue: VecDeque<DashboardCmd> = cmd.flatten().into();
    let mut steps = 0;
    while let Some(next) = queue.pop_front() {
        steps += 1;
        if steps > SETTLE_GUARD {
            break;
        }
        match next {
            DashboardCmd::ScheduleCloudRetry { attempt, .. } => {
                let follow = controller.update(DashboardMsg::CloudRetry { attempt });
                queue.extend(follow.flatten());
            }
            DashboardCmd::Navigate { path } => navigations.push(path),
            DashboardCmd::None | DashboardCmd::Batch(_) => {}
        }
    }
    navigations
}
