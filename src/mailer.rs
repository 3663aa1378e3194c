use async_trait::async_trait;
use tracing::info;

/// Outbound email collaborator. The service only needs it for password
/// resets; deployments without SMTP keep the logging implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to: &str, token: &str) -> anyhow::Result<()>;
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to: &str, _token: &str) -> anyhow::Result<()> {
        // The token is still returned in the response body; never log it.
        info!(to = %to, "password reset token issued");
        Ok(())
    }
}
