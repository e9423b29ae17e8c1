pub mod device;
pub mod pipeline;
pub mod readiness;
