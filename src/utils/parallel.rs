//! Parallel processing utilities

/// Initialise the global rayon pool; `0` means one thread per CPU.
/// Returns the number of threads configured.
pub fn configure_thread_pool(threads: usize) -> Result<usize, rayon::ThreadPoolBuildError> {
    let threads = if threads == 0 {
        num_cpus::get()
    } else {
        threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;
    Ok(threads)
}
