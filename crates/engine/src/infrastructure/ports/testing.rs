//! Testability port for injecting randomness.

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform in `[min, max]`.
    fn gen_range(&self, min: i32, max: i32) -> i32;

    /// Uniform in `[0, 1)`.
    fn gen_unit(&self) -> f64;
}
