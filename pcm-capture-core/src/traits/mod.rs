pub mod capture_hardware;
pub mod frame_encoder;
