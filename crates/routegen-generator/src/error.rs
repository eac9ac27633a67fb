//! Generator errors.
//!
//! Discovery itself cannot fail: a declaration that does not qualify is
//! skipped. The only way out of a pass is cancellation.

use routegen_core::Cancelled;
use thiserror::Error;

/// Why a generator pass stopped without producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The pass observed its cancellation token.
    #[error("generation was cancelled")]
    Cancelled,
}

impl From<Cancelled> for GenerateError {
    fn from(_: Cancelled) -> Self {
        GenerateError::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegen_core::CancellationToken;

    fn step(token: &CancellationToken) -> Result<u32, GenerateError> {
        token.check()?;
        Ok(1)
    }

    #[test]
    fn cancelled_converts_with_question_mark() {
        let token = CancellationToken::new();
        assert_eq!(step(&token), Ok(1));
        token.cancel();
        assert_eq!(step(&token), Err(GenerateError::Cancelled));
    }
}
