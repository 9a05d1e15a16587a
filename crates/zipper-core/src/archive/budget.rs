//! Compressed size budget

/// Assumed average ratio between raw and compressed file size
pub const AVERAGE_COMPRESSION_RATIO: f64 = 4.0;

/// Estimates the compressed contribution of a file from its raw size
pub type SizeEstimator = fn(u64) -> f64;

/// Default estimator: raw size divided by [`AVERAGE_COMPRESSION_RATIO`]
pub fn ratio_estimate(raw_size: u64) -> f64 {
    raw_size as f64 / AVERAGE_COMPRESSION_RATIO
}

/// Upper bound on the compressed size of an archive.
///
/// The check is made before a file is written, from an estimate, so the
/// finished archive can overshoot the limit by the actual compressed size of
/// its last file.
#[derive(Debug, Clone, Copy)]
pub struct SizeBudget {
    limit: u64,
    estimator: SizeEstimator,
}

impl SizeBudget {
    /// A limit of 0 means unlimited
    pub fn new(limit: u64, estimator: SizeEstimator) -> Self {
        Self { limit, estimator }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }

    /// Whether adding a file of `raw_size` bytes on top of `compressed_so_far`
    /// is projected to cross the limit
    pub fn would_exceed(&self, compressed_so_far: u64, raw_size: u64) -> bool {
        if self.is_unlimited() {
            return false;
        }
        compressed_so_far as f64 + (self.estimator)(raw_size) > self.limit as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_estimate() {
        assert_eq!(ratio_estimate(0), 0.0);
        assert_eq!(ratio_estimate(4000), 1000.0);
        assert_eq!(ratio_estimate(3), 0.75);
    }

    #[test]
    fn test_unlimited_never_exceeds() {
        let budget = SizeBudget::new(0, ratio_estimate);
        assert!(!budget.would_exceed(u64::MAX / 2, u64::MAX / 2));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let budget = SizeBudget::new(1000, ratio_estimate);
        // 200 + 3200 / 4 == 1000 stays within the limit
        assert!(!budget.would_exceed(200, 3200));
        assert!(budget.would_exceed(200, 3204));
        assert!(budget.would_exceed(1001, 0));
    }

    #[test]
    fn test_custom_estimator() {
        fn exact(raw: u64) -> f64 {
            raw as f64
        }
        let budget = SizeBudget::new(100, exact);
        assert!(!budget.would_exceed(0, 100));
        assert!(budget.would_exceed(0, 101));
    }
}
