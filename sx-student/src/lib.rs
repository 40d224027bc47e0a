//! sx-student: the assignment bot graded by `sx check`.

pub mod student;

pub use student::{suit_order, StudentBot};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
