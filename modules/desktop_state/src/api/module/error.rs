//! Error mapping to module failure results

use super::dto::{ExtensionResult, Failure, GsettingsResult};
use crate::contract::{DesktopError, ExtensionFailure};

/// Map a key reconciliation error to a failure result
pub fn gsettings_failure(error: DesktopError) -> Failure<GsettingsResult> {
    tracing::debug!(error = ?error, "gsettings module failed");
    Failure {
        failed: true,
        msg: error.to_string(),
        result: GsettingsResult {
            changed: false,
            previous: None,
            value: None,
        },
    }
}

/// Map an extension failure to a failure result keeping partial progress
pub fn extension_failure(failure: ExtensionFailure) -> Failure<ExtensionResult> {
    tracing::debug!(error = ?failure.error, "gnome_extension module failed");
    Failure {
        failed: true,
        msg: failure.error.to_string(),
        result: failure.report.into(),
    }
}

/// Map an argument error before any extension work was done
pub fn extension_argument_failure(error: DesktopError) -> Failure<ExtensionResult> {
    extension_failure(error.into())
}

/// Argument decoding errors surface as `InvalidArgument`
pub fn invalid_arguments(error: serde_json::Error) -> DesktopError {
    DesktopError::InvalidArgument {
        message: error.to_string(),
    }
}
