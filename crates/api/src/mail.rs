use sitesentry_common::TelemetryResult;
use sitesentry_storage::NewContactSubmission;

/// Outbound notification seam for the contact path.
///
/// Delivery is an external collaborator: the handler only needs "the owner
/// was notified, or it failed". Implementations plug in a real transport;
/// the default [`LogMailer`] emits the submission into the structured log
/// stream.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send_contact_notification(
        &self,
        submission: &NewContactSubmission,
    ) -> TelemetryResult<()>;
}

/// Mailer that records the notification in the log instead of sending.
pub struct LogMailer {
    notify_to: String,
}

impl LogMailer {
    pub fn new(notify_to: impl Into<String>) -> Self {
        Self {
            notify_to: notify_to.into(),
        }
    }
}

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send_contact_notification(
        &self,
        submission: &NewContactSubmission,
    ) -> TelemetryResult<()> {
        tracing::info!(
            to = %self.notify_to,
            from_name = %submission.name,
            from_email = %submission.email,
            message_len = submission.message.len(),
            "contact notification"
        );
        Ok(())
    }
}
