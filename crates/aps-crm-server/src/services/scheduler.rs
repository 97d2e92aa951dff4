//! Mail Scheduler - Formular 230 renewal reminders and birthday greetings
//!
//! Wakes up every tick and runs a job once its local time slot has come.
//! Renewal reminders go out on 10 January and 1 May, birthday greetings
//! every day, both from 10:00. Each job runs at most once per day.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tokio::time::interval;

use aps_crm::PostRepository;

use crate::application::{JobReport, MailService};

const RUN_HOUR: u32 = 10;
const RENEWAL_DAYS: &[(u32, u32)] = &[(1, 10), (5, 1)];

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between checks
    pub interval: Duration,
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

/// Which jobs already ran, and on which day
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct JobCalendar {
    last_renewal: Option<NaiveDate>,
    last_birthday: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DueJobs {
    renewal: bool,
    birthday: bool,
}

impl JobCalendar {
    fn due(&self, now: NaiveDateTime) -> DueJobs {
        let today = now.date();
        let in_slot = now.time() >= NaiveTime::from_hms_opt(RUN_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        let renewal_day = RENEWAL_DAYS.contains(&(today.month(), today.day()));
        DueJobs {
            renewal: in_slot && renewal_day && self.last_renewal != Some(today),
            birthday: in_slot && self.last_birthday != Some(today),
        }
    }
}

fn log_report(job: &str, report: &JobReport) {
    if report.failed == 0 {
        tracing::info!(
            "  ✅ {}: {} due, {} sent",
            job,
            report.processed,
            report.sent
        );
    } else {
        tracing::warn!(
            "  ❌ {}: {} due, {} sent, {} failed",
            job,
            report.processed,
            report.sent,
            report.failed
        );
    }
}

/// Background runner for the mail jobs
pub struct MailScheduler<P: PostRepository + 'static> {
    mail: Arc<MailService<P>>,
    config: SchedulerConfig,
}

impl<P: PostRepository + 'static> MailScheduler<P> {
    pub fn new(mail: Arc<MailService<P>>, config: Option<SchedulerConfig>) -> Self {
        Self {
            mail,
            config: config.unwrap_or_default(),
        }
    }

    /// Start the scheduler (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        if !self.config.enabled {
            tracing::info!("📅 Mail scheduler disabled");
            return;
        }

        tracing::info!(
            "📅 Mail scheduler started (tick: {:?}, renewals on 10 Jan and 1 May, birthdays daily, from {}:00)",
            self.config.interval,
            RUN_HOUR
        );

        let mut ticker = interval(self.config.interval);
        let mut calendar = JobCalendar::default();

        loop {
            ticker.tick().await;

            let now = Local::now().naive_local();
            let due = calendar.due(now);
            let today = now.date();

            if due.renewal {
                calendar.last_renewal = Some(today);
                tracing::info!("🔄 Scheduler: running Formular 230 renewal reminders ({}:{:02})", now.hour(), now.minute());
                match self.mail.run_renewal(today).await {
                    Ok(report) => log_report("Renewal reminders", &report),
                    Err(e) => tracing::error!("  ❌ Renewal reminders aborted: {}", e),
                }
            }

            if due.birthday {
                calendar.last_birthday = Some(today);
                tracing::info!("🔄 Scheduler: running birthday greetings");
                match self.mail.run_birthday(today).await {
                    Ok(report) => log_report("Birthday greetings", &report),
                    Err(e) => tracing::error!("  ❌ Birthday greetings aborted: {}", e),
                }
            }
        }
    }
}

/// Start the scheduler unless disabled by configuration
pub fn maybe_start_scheduler<P: PostRepository + 'static>(
    mail: Arc<MailService<P>>,
    enabled: bool,
    tick: Duration,
) -> Option<tokio::task::JoinHandle<()>> {
    if !enabled {
        tracing::info!("📅 Mail scheduler disabled (MAIL_SCHEDULER_ENABLED=false)");
        return None;
    }

    let config = SchedulerConfig {
        interval: tick,
        enabled,
    };
    Some(MailScheduler::new(mail, Some(config)).start())
}
