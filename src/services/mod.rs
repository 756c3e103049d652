//! Services module
//!
//! External collaborators: the event sheet, the form endpoint and the
//! submission-hash store.

pub mod sheets;
pub mod storage;
pub mod submission;

pub use sheets::SheetClient;
pub use storage::{FileStore, MemoryStore, RedisStore, SubmissionLedger, SubmissionStore};
pub use submission::{FormPayload, FormTransport, HttpFormTransport};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::forms::registry::FormRegistry;
use crate::utils::errors::Result;

/// Everything a form controller needs to submit
#[derive(Clone)]
pub struct FormServices {
    pub registry: Arc<FormRegistry>,
    pub transport: Arc<dyn FormTransport>,
    pub ledger: SubmissionLedger,
    /// Shown in the generic failure alert
    pub support_email: String,
}

impl FormServices {
    pub fn new(
        registry: Arc<FormRegistry>,
        transport: Arc<dyn FormTransport>,
        ledger: SubmissionLedger,
    ) -> Self {
        Self {
            registry,
            transport,
            ledger,
            support_email: String::new(),
        }
    }

    pub fn with_support_email(mut self, email: impl Into<String>) -> Self {
        self.support_email = email.into();
        self
    }

    /// Built-in form table, HTTP transport and the configured store
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = Arc::new(FormRegistry::builtin());
        let transport = Arc::new(HttpFormTransport::new(&settings.forms)?);
        let ledger = SubmissionLedger::from_config(&settings.storage).await?;

        Ok(Self::new(registry, transport, ledger).with_support_email(&settings.forms.support_email))
    }
}
