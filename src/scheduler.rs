use crate::updater::{CheckOutcome, ReleaseSource, UpdateChecker, UpdateFlow};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Default)]
pub struct Schedulers {
    jobs: Vec<(&'static str, JoinHandle<()>)>,
}

impl Schedulers {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn shutdown(self) {
        if self.is_empty() {
            return;
        }

        info!("Stopping {} scheduled job(s)", self.len());
        for (name, job) in self.jobs {
            debug!("Stopping scheduled job {}", name);
            job.abort();
        }
    }
}

/// Spawns the periodic release watch. A zero interval disables it.
pub fn setup_schedulers<S, U>(
    checker: Option<Arc<UpdateChecker<S, U>>>,
    check_interval: Duration,
) -> Schedulers
where
    S: ReleaseSource + Send + Sync + 'static,
    U: UpdateFlow + Send + Sync + 'static,
{
    let mut schedulers = Schedulers::default();

    match checker {
        Some(checker) if !check_interval.is_zero() => {
            info!("Release watch scheduled every {:?}", check_interval);
            schedulers
                .jobs
                .push(("release-watch", tokio::spawn(release_watch(checker, check_interval))));
        }
        _ => debug!("Release watch disabled"),
    }

    schedulers
}

async fn release_watch<S, U>(checker: Arc<UpdateChecker<S, U>>, every: Duration)
where
    S: ReleaseSource + Send + Sync,
    U: UpdateFlow + Send + Sync,
{
    // The startup gate already ran a check, so the first tick waits a full interval.
    let mut timer = interval_at(Instant::now() + every, every);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        timer.tick().await;
        match checker.check().await {
            CheckOutcome::UpdateTriggered => info!("Scheduled release check triggered an update"),
            outcome => debug!("Scheduled release check finished: {:?}", outcome),
        }
    }
}
