pub mod buffer_plan;
pub mod byte_order;
pub mod format_catalog;
pub mod opus_encoder;
