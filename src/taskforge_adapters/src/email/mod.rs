pub mod postmark_email_client;
pub mod recording_email_client;
