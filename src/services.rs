pub mod alert_service;
pub mod bulletin_service;

pub use alert_service::AlertService;
pub use bulletin_service::{BulletinError, BulletinService};
