use chrono::{DateTime, Duration, Utc};

use skillshare_domain::notification::NotificationKind;

use crate::domain::repository::{NotificationRepository, SessionRepository};
use crate::domain::types::{Notification, Session, reminder_message};
use crate::error::ApiError;

/// Counters for one sweep, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub sessions: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

// ── SendReminders ────────────────────────────────────────────────────────────

pub struct SendRemindersUseCase<S: SessionRepository, N: NotificationRepository> {
    pub sessions: S,
    pub notifications: N,
    pub window: Duration,
}

impl<S: SessionRepository, N: NotificationRepository> SendRemindersUseCase<S, N> {
    /// Remind every participant of sessions starting within the window.
    /// Individual failures are logged and counted; only the session lookup
    /// fails the sweep.
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<SweepReport, ApiError> {
        let upcoming = self
            .sessions
            .starting_between(now, now + self.window)
            .await?;

        let mut report = SweepReport {
            sessions: upcoming.len(),
            ..Default::default()
        };
        for session in &upcoming {
            self.remind(session, &mut report).await;
        }
        Ok(report)
    }

    async fn remind(&self, session: &Session, report: &mut SweepReport) {
        let participants = match self.sessions.participants(session.id).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = ?e, "failed to load participants for reminder");
                report.failed += 1;
                return;
            }
        };

        let message = reminder_message(&session.title, session.date_time);
        for participant in participants {
            match self
                .notifications
                .has_reminder(participant.id, session.id)
                .await
            {
                Ok(true) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(session_id = %session.id, user_id = %participant.id, error = ?e, "failed to check previous reminder");
                    report.failed += 1;
                    continue;
                }
            }

            let notification = Notification::about_session(
                participant.id,
                NotificationKind::SessionReminder,
                message.clone(),
                session.id,
            );
            match self.notifications.create(&notification).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    tracing::warn!(session_id = %session.id, user_id = %participant.id, error = ?e, "failed to send reminder");
                    report.failed += 1;
                }
            }
        }
    }
}
