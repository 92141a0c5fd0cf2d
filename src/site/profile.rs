//! On-demand CPU profiling for administrators.

use pprof::protos::Message;
use std::time::Duration;

/// Samples per second.
const SAMPLE_FREQUENCY: i32 = 100;

/// Samples the whole process for `duration` and returns the profile in
/// pprof's protobuf format.
///
/// Runs on the blocking pool; the calling task waits for the full duration.
/// Only one profile can be taken at a time, a concurrent request fails.
pub async fn capture_cpu_profile(duration: Duration) -> anyhow::Result<Vec<u8>> {
    let body = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<u8>> {
        let guard = pprof::ProfilerGuardBuilder::default()
            .frequency(SAMPLE_FREQUENCY)
            .blocklist(&["libc", "libgcc", "pthread", "vdso"])
            .build()?;

        std::thread::sleep(duration);

        let profile = guard.report().build()?.pprof()?;
        let mut body = Vec::new();
        profile.encode(&mut body)?;
        Ok(body)
    })
    .await??;

    Ok(body)
}
