use std::sync::Arc;

use common::ValidationRules;

use crate::api::JudgingApi;
use crate::cache::QueryCache;
use crate::notify::Notifier;

/// Collaborators every form and view talks to.
#[derive(Clone)]
pub struct AdminState {
    pub api: Arc<dyn JudgingApi>,
    pub cache: Arc<QueryCache>,
    pub notifier: Arc<dyn Notifier>,
    pub rules: Arc<ValidationRules>,
}

impl AdminState {
    pub fn new(
        api: Arc<dyn JudgingApi>,
        notifier: Arc<dyn Notifier>,
        rules: ValidationRules,
    ) -> Self {
        Self {
            api,
            cache: Arc::new(QueryCache::new()),
            notifier,
            rules: Arc::new(rules),
        }
    }
}
