//! Capture probe: lists ALSA capture devices, opens one with the given
//! parameters and writes the captured periods to stdout.
//!
//! ```text
//! pcm-capture-probe [params.json] [periods]
//! ```
//!
//! Diagnostics go to stderr through `RUST_LOG`.

#[cfg(target_os = "linux")]
fn main() {
    env_logger::init();

    if let Err(e) = probe::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("pcm-capture-probe requires ALSA (Linux)");
    std::process::exit(1);
}

#[cfg(target_os = "linux")]
mod probe {
    use std::io::Write;

    use pcm_capture_alsa::{wait_readable, AlsaBackend, DeviceEnumerator};
    use pcm_capture_core::{CaptureParameters, CapturePipeline};

    const DEFAULT_PERIODS: usize = 50;
    const WAIT_TIMEOUT_MS: i32 = 1000;

    pub fn run(args: Vec<String>) -> Result<(), String> {
        let params = match args.first() {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
                CaptureParameters::from_json(&json).map_err(|e| e.to_string())?
            }
            None => CaptureParameters::default(),
        };
        let periods = match args.get(1) {
            Some(n) => n.parse::<usize>().map_err(|e| format!("invalid period count {}: {}", n, e))?,
            None => DEFAULT_PERIODS,
        };

        match DeviceEnumerator::new().list_capture_devices() {
            Ok(devices) => {
                for device in devices {
                    log::info!("capture device: {} ({})", device.id, device.description);
                }
            }
            Err(e) => log::warn!("{}", e),
        }

        let mut pipeline = CapturePipeline::open(&AlsaBackend, params).map_err(|e| e.to_string())?;
        let format = *pipeline.negotiated_format();
        log::info!(
            "capturing {} periods: {} {} Hz {} channels, compression {}",
            periods,
            format.encoding,
            format.sample_rate,
            format.channels,
            pipeline.params().compression
        );

        let descriptor = pipeline
            .readiness_descriptor()
            .ok_or_else(|| "capture device exposes no poll descriptor".to_string())?;
        let mut buf = vec![0u8; pipeline.plan().buffer_bytes];
        let mut stdout = std::io::stdout().lock();

        let mut delivered = 0;
        while delivered < periods {
            match wait_readable(&descriptor, WAIT_TIMEOUT_MS) {
                Ok(true) => {}
                Ok(false) => {
                    log::warn!("no data within {} ms", WAIT_TIMEOUT_MS);
                    continue;
                }
                Err(e) => return Err(e.to_string()),
            }

            let size = pipeline.read(&mut buf);
            if size == 0 {
                continue;
            }
            stdout.write_all(&buf[..size]).map_err(|e| e.to_string())?;
            delivered += 1;
        }
        stdout.flush().map_err(|e| e.to_string())?;

        let diagnostics = pipeline.diagnostics();
        log::info!(
            "reads: {} empty: {} recovered: {} failed: {} encoder failures: {} bytes: {}",
            diagnostics.reads,
            diagnostics.empty_reads,
            diagnostics.transient_failures,
            diagnostics.hardware_failures,
            diagnostics.encoder_failures,
            diagnostics.bytes_delivered
        );
        pipeline.close();
        Ok(())
    }
}
