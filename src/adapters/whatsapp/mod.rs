//! WhatsApp messaging adapters.

mod cloud_api_sender;
mod recording_sender;

pub use cloud_api_sender::{WhatsAppCloudConfig, WhatsAppCloudSender};
pub use recording_sender::{RecordingSender, SentText};
