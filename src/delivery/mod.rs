pub mod flow;
pub mod model;

pub use flow::{Delivery, DeliveryError, GENERIC_FAILURE_NOTICE, ReportDeliveryFlow};
pub use model::{ArtifactRef, DeliveryState, InvalidEmail, RecipientEmail, ReportRequest};
