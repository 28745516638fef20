use chrono::{DateTime, Utc};
use postpress_core::PostStore;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::cron::CronExpr;
use crate::error::Result;
use crate::reminder;

/// Long-running reminder loop: ticks every second, fires when the cron
/// expression matches, announces the next ready post.
pub struct SchedulerEngine {
    cron: CronExpr,
    store: PostStore,
}

impl SchedulerEngine {
    /// Parse the expression up front so a bad schedule fails at startup,
    /// not at fire time.
    pub fn new(expression: &str, store: PostStore) -> Result<Self> {
        let cron: CronExpr = expression.parse()?;
        Ok(Self { cron, store })
    }

    /// Main loop. Runs until `shutdown` broadcasts `true`. Trigger errors
    /// (store IO at fire time) are logged; the loop keeps running.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(schedule = %self.cron, "scheduler started");
        let mut next_fire = self.cron.next_after(Utc::now());
        match next_fire {
            Some(at) => info!(next = %at, "next reminder computed"),
            None => warn!("schedule has no future trigger; scheduler will idle"),
        }

        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Utc::now();
                    let Some(due) = next_fire else { continue };
                    if now < due {
                        continue;
                    }
                    if let Err(e) = self.fire(now) {
                        error!("scheduler trigger failed: {e}");
                    }
                    next_fire = self.cron.next_after(now);
                    if let Some(at) = next_fire {
                        info!(next = %at, "next reminder computed");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One firing: announce the first ready post, then re-read the store
    /// and stamp that record as scheduled.
    fn fire(&self, now: DateTime<Utc>) -> Result<()> {
        let posts = self.store.load()?;
        let Some(post) = reminder::next_ready(&posts) else {
            info!("no ready post to announce");
            return Ok(());
        };
        let id = post.id.clone();
        let title = post.title.clone();

        println!("{}", reminder::format_reminder(post));
        reminder::notify_desktop(&title);

        // Re-read before rewriting so edits made while the reminder was
        // being shown are not clobbered wholesale.
        let mut posts = self.store.load()?;
        if !reminder::mark_scheduled(&mut posts, &id, now) {
            warn!(post_id = %id, "post vanished between scan and stamp; nothing updated");
            return Ok(());
        }
        self.store.save(&posts)?;
        info!(post_id = %id, "post marked scheduled");
        Ok(())
    }
}
