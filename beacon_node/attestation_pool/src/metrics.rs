pub use beacon_metrics::*;
use lazy_static::lazy_static;

lazy_static! {
    /*
     * Aggregating attestation pool
     */
    pub static ref ATTESTATION_POOL_SIZE: Result<IntGauge> = try_create_int_gauge(
        "attestation_pool_size",
        "Count of attestations currently stored in the aggregating attestation pool"
    );
    pub static ref ATTESTATION_POOL_INSERT_SECONDS: Result<Histogram> = try_create_histogram(
        "attestation_pool_insert_seconds",
        "Time taken to insert an attestation into the pool"
    );
    pub static ref ATTESTATION_POOL_PRUNE_SECONDS: Result<Histogram> = try_create_histogram(
        "attestation_pool_prune_seconds",
        "Time taken to prune expired attestations from the pool"
    );
    pub static ref ATTESTATION_POOL_BLOCK_PACKING_SECONDS: Result<Histogram> = try_create_histogram(
        "attestation_pool_block_packing_seconds",
        "Time taken to select attestations for inclusion in a block"
    );
}
