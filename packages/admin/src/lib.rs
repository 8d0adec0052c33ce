pub mod api;
pub mod cache;
pub mod config;
pub mod detail;
pub mod error;
pub mod forms;
pub mod notify;
pub mod smoke;
pub mod state;

pub use api::{HttpApi, JudgingApi};
pub use cache::{QueryCache, QueryKey};
pub use config::{AdminConfig, ApiConfig};
pub use error::{ApiError, SmokeError};
pub use forms::{FormMode, SubmitOutcome};
pub use notify::{Notifier, Toast, ToastLevel, ToastLog, TracingNotifier};
pub use state::AdminState;
