//! Induced resource consumption for capacity testing
//!
//! - `/load/cpu?seconds=N` - keep one core busy for N seconds
//! - `/load/memory?mb=N` - hold an N MB block until after the response is sent

use std::time::{Duration, Instant};

use axum::extract::{rejection::QueryRejection, Query};
use serde::Deserialize;
use tracing::warn;

use super::chaos::SecondsParams;
use crate::error::AppError;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// How long a memory block outlives the handler that allocated it
pub const BLOCK_RETENTION: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
pub struct MemoryParams {
    pub mb: u64,
}

/// Deadline `seconds` from now, or an error if it cannot be represented
pub fn cpu_deadline(seconds: u64) -> Result<Instant, AppError> {
    Instant::now()
        .checked_add(Duration::from_secs(seconds))
        .ok_or_else(|| AppError::InvalidParameter(format!("seconds={} is too large", seconds)))
}

/// Spin on floating point work until `deadline` has passed
///
/// Returns the number of iterations, which is otherwise meaningless.
pub fn burn_cpu(deadline: Instant) -> u64 {
    let mut iterations: u64 = 0;
    while Instant::now() < deadline {
        std::hint::black_box((iterations as f64).sqrt());
        iterations = iterations.wrapping_add(1);
    }
    iterations
}

/// Allocate `mb` megabytes and write every byte so the pages are resident
pub fn allocate_block(mb: u64) -> Result<Vec<u8>, AppError> {
    let bytes = mb
        .checked_mul(BYTES_PER_MB)
        .and_then(|b| usize::try_from(b).ok())
        .ok_or_else(|| AppError::InvalidParameter(format!("mb={} is too large", mb)))?;

    let mut block = Vec::new();
    block
        .try_reserve_exact(bytes)
        .map_err(|_| AppError::Allocation(mb))?;
    block.resize(bytes, 0xA5);
    Ok(block)
}

pub async fn cpu(params: Result<Query<SecondsParams>, QueryRejection>) -> Result<String, AppError> {
    let Query(SecondsParams { seconds }) = params?;
    let deadline = cpu_deadline(seconds)?;
    warn!(seconds, "Starting CPU burn");

    // Blocking pool, so runtime workers stay free for other requests
    let iterations = tokio::task::spawn_blocking(move || burn_cpu(deadline)).await?;
    tracing::debug!(iterations, "CPU burn finished");

    Ok(format!("CPU load for {}s", seconds))
}

/// Keep `block` reachable for [`BLOCK_RETENTION`] after the caller returns
///
/// hyper drops the response body before flushing the socket, so a block tied
/// to the response would already be unmapped when the client reads the reply.
pub fn retain_block(block: Vec<u8>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(BLOCK_RETENTION).await;
        std::hint::black_box(&block);
        drop(block);
    })
}

/// The block stays resident while the response is written and for
/// [`BLOCK_RETENTION`] after. Once dropped, the allocator may still keep the
/// pages mapped, so RSS can stay high for longer.
pub async fn memory(params: Result<Query<MemoryParams>, QueryRejection>) -> Result<String, AppError> {
    let Query(MemoryParams { mb }) = params?;
    warn!(mb, "Allocating memory block");

    // Filling a large block takes a while; keep it off the runtime workers
    let block = tokio::task::spawn_blocking(move || allocate_block(mb)).await??;
    retain_block(block);

    Ok(format!("Allocated {}MB", mb))
}
