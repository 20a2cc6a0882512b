//! Event-driven notification dispatcher.
//!
//! The dispatcher subscribes to the [`EventBus`] and, for every consumed
//! event, first persists the event row and then fans out notifications:
//!
//! * workflow events that need reviewing (`game.submitted`,
//!   `comment.created`, `evaluation.reviewed`) target the admin cohort;
//! * outcome events (`*.approved`, `*.rejected`, `*.flagged`) target the
//!   owner named in the event payload.
//!
//! Fan-out is best-effort: a failed database write or email delivery is
//! logged and swallowed so that one broken channel never blocks the others
//! or the publisher.

use playscore_core::roles::ROLE_ADMIN;
use playscore_core::types::DbId;
use playscore_db::models::notification::CreateNotification;
use playscore_db::repositories::{NotificationRepo, UserRepo};
use playscore_db::DbPool;
use playscore_events::{EmailDelivery, EventPersistence, PlatformEvent};
use tokio::sync::broadcast::error::RecvError;

/// Who a given event's notifications are addressed to.
enum Target {
    /// Every active user holding the admin role.
    AdminCohort,
    /// The single user named by `owner_user_id` in the event payload.
    Owner(DbId),
}

/// Subscribes to the event bus and materializes notifications.
pub struct NotificationDispatcher {
    pool: DbPool,
    email: Option<EmailDelivery>,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool, email: Option<EmailDelivery>) -> Self {
        Self { pool, email }
    }

    /// Consume events from the bus until the channel closes.
    ///
    /// Spawn this on a dedicated task:
    ///
    /// ```ignore
    /// let dispatcher = NotificationDispatcher::new(pool.clone(), email);
    /// tokio::spawn(dispatcher.run(event_bus.subscribe()));
    /// ```
    pub async fn run(self, mut rx: tokio::sync::broadcast::Receiver<PlatformEvent>) {
        tracing::info!("notification dispatcher started");
        loop {
            match rx.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification dispatcher lagged; events skipped");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("event bus closed; notification dispatcher stopping");
                    break;
                }
            }
        }
    }

    async fn handle_event(&self, event: PlatformEvent) {
        // Persist first so notifications can reference the durable event row.
        // A persistence failure downgrades to an un-linked notification.
        let event_id = match EventPersistence::persist(&self.pool, &event).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(event_type = %event.event_type, error = %e, "failed to persist event");
                None
            }
        };

        let Some(target) = target_for(&event) else {
            tracing::debug!(event_type = %event.event_type, "no notification target for event");
            return;
        };

        let input = CreateNotification {
            event_id,
            notification_type: event.event_type.clone(),
            message_key: format!("notifications.{}", event.event_type),
            message_params: event.payload.clone(),
            url: event
                .payload
                .get("url")
                .and_then(|v| v.as_str())
                .unwrap_or("/")
                .to_string(),
            for_roles: match target {
                Target::AdminCohort => vec![ROLE_ADMIN.to_string()],
                Target::Owner(_) => vec![],
            },
        };

        self.persist_notifications(&target, &input).await;
        self.send_emails(&target, &event).await;
    }

    async fn persist_notifications(&self, target: &Target, input: &CreateNotification) {
        let user_ids = match target {
            Target::AdminCohort => match UserRepo::ids_for_role(&self.pool, ROLE_ADMIN).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!(error = %e, "failed to resolve admin cohort");
                    return;
                }
            },
            Target::Owner(user_id) => vec![*user_id],
        };

        match NotificationRepo::create_for_users(&self.pool, &user_ids, input).await {
            Ok(count) => {
                tracing::debug!(
                    notification_type = %input.notification_type,
                    count,
                    "notifications persisted"
                );
            }
            Err(e) => {
                tracing::error!(
                    notification_type = %input.notification_type,
                    error = %e,
                    "failed to persist notifications"
                );
            }
        }
    }

    async fn send_emails(&self, target: &Target, event: &PlatformEvent) {
        let Some(email) = &self.email else {
            return;
        };

        let recipients = match target {
            Target::AdminCohort => {
                match UserRepo::emails_for_role(&self.pool, ROLE_ADMIN).await {
                    Ok(emails) => emails,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to resolve admin emails");
                        return;
                    }
                }
            }
            Target::Owner(user_id) => match UserRepo::find_by_id(&self.pool, *user_id).await {
                Ok(Some(user)) => vec![user.email],
                Ok(None) => {
                    tracing::warn!(user_id, "notification owner not found; skipping email");
                    return;
                }
                Err(e) => {
                    tracing::error!(user_id, error = %e, "failed to load notification owner");
                    return;
                }
            },
        };

        let (subject, body) = email_content(event);
        for recipient in recipients {
            if let Err(e) = email.deliver(&recipient, &subject, &body).await {
                tracing::error!(%recipient, error = %e, "email delivery failed");
            }
        }
    }
}

/// Resolve the notification target for an event, if any.
///
/// Returns `None` for event types that do not produce notifications.
fn target_for(event: &PlatformEvent) -> Option<Target> {
    match event.event_type.as_str() {
        "game.submitted" | "comment.created" | "evaluation.reviewed" => Some(Target::AdminCohort),
        "game.approved"
        | "game.rejected"
        | "comment.approved"
        | "comment.flagged"
        | "evaluation.approved"
        | "evaluation.flagged" => owner_of(event).map(Target::Owner),
        _ => None,
    }
}

/// Extract the owner user id from an event payload.
fn owner_of(event: &PlatformEvent) -> Option<DbId> {
    let owner = event.payload.get("owner_user_id").and_then(|v| v.as_i64());
    if owner.is_none() {
        tracing::warn!(event_type = %event.event_type, "event payload missing owner_user_id");
    }
    owner
}

/// Human-readable subject and body for the email channel.
fn email_content(event: &PlatformEvent) -> (String, String) {
    let title = event
        .payload
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("your content");

    match event.event_type.as_str() {
        "game.submitted" => (
            "New game submission".into(),
            format!("\"{title}\" was submitted and is awaiting review."),
        ),
        "game.approved" => (
            "Your game was approved".into(),
            format!("\"{title}\" has been approved and is now published."),
        ),
        "game.rejected" => {
            let feedback = event
                .payload
                .get("feedback")
                .and_then(|v| v.as_str())
                .unwrap_or("No feedback was provided.");
            (
                "Your game was rejected".into(),
                format!("\"{title}\" was rejected. Feedback: {feedback}"),
            )
        }
        "comment.created" => (
            "New comment awaiting moderation".into(),
            format!("A new comment on \"{title}\" is awaiting moderation."),
        ),
        "comment.approved" => (
            "Your comment was approved".into(),
            format!("Your comment on \"{title}\" is now visible."),
        ),
        "comment.flagged" => {
            let reason = event
                .payload
                .get("reason")
                .and_then(|v| v.as_str())
                .unwrap_or("No reason was provided.");
            (
                "Your comment was flagged".into(),
                format!("Your comment on \"{title}\" was flagged. Reason: {reason}"),
            )
        }
        "evaluation.reviewed" => (
            "New review awaiting moderation".into(),
            format!("A new review of \"{title}\" is awaiting moderation."),
        ),
        "evaluation.approved" => (
            "Your review was approved".into(),
            format!("Your review of \"{title}\" is now visible."),
        ),
        "evaluation.flagged" => {
            let reason = event
                .payload
                .get("reason")
                .and_then(|v| v.as_str())
                .unwrap_or("No reason was provided.");
            (
                "Your review was flagged".into(),
                format!("Your review of \"{title}\" was flagged. Reason: {reason}"),
            )
        }
        other => (
            "Notification".into(),
            format!("An event of type {other} occurred."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_owner(event_type: &str) -> PlatformEvent {
        PlatformEvent::new(event_type).with_payload(serde_json::json!({
            "owner_user_id": 17,
            "title": "Starfall"
        }))
    }

    #[test]
    fn review_events_target_admins() {
        for name in ["game.submitted", "comment.created", "evaluation.reviewed"] {
            match target_for(&PlatformEvent::new(name)) {
                Some(Target::AdminCohort) => {}
                _ => panic!("{name} should target the admin cohort"),
            }
        }
    }

    #[test]
    fn outcome_events_target_owner() {
        match target_for(&event_with_owner("game.approved")) {
            Some(Target::Owner(17)) => {}
            _ => panic!("game.approved should target the payload owner"),
        }
    }

    #[test]
    fn outcome_event_without_owner_is_dropped() {
        assert!(target_for(&PlatformEvent::new("game.approved")).is_none());
    }

    #[test]
    fn unknown_events_have_no_target() {
        assert!(target_for(&PlatformEvent::new("user.registered")).is_none());
    }

    #[test]
    fn rejection_email_includes_feedback() {
        let event = PlatformEvent::new("game.rejected").with_payload(serde_json::json!({
            "owner_user_id": 1,
            "title": "Starfall",
            "feedback": "Screenshots are missing."
        }));
        let (subject, body) = email_content(&event);
        assert_eq!(subject, "Your game was rejected");
        assert!(body.contains("Screenshots are missing."));
    }
}
