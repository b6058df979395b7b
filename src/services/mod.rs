pub mod payment_frequency;
pub mod payment_schedule;
pub mod payment_status;
pub mod payments;
