//! Input validation for key references and extension identifiers

use crate::contract::DesktopError;
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::unwrap_used)]
static SCHEMA_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(/[A-Za-z0-9_.:-]+)+/$").unwrap());

/// Validate a relocatable schema path
///
/// A valid path begins and ends with '/' and does not contain two consecutive
/// '/' characters (e.g. "/org/gnome/terminal/legacy/profiles:/").
pub fn validate_schema_path(path: &str) -> Result<(), DesktopError> {
    if SCHEMA_PATH.is_match(path) {
        Ok(())
    } else {
        Err(DesktopError::InvalidPath {
            path: path.to_string(),
        })
    }
}

/// Validate an extension uuid
///
/// The uuid doubles as a directory name in the install locations, so it must
/// be a single path component.
pub fn validate_extension_uuid(uuid: &str) -> Result<(), DesktopError> {
    if uuid.is_empty() {
        return Err(DesktopError::InvalidArgument {
            message: "extension name cannot be empty".to_string(),
        });
    }

    if uuid == "." || uuid == ".." || uuid.contains('/') {
        return Err(DesktopError::InvalidArgument {
            message: format!("extension name '{}' is not a valid uuid", uuid),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_schema_paths() {
        assert!(validate_schema_path("/org/gnome/desktop/").is_ok());
        assert!(validate_schema_path(
            "/org/gnome/desktop/notifications/application/org-gnome-software/"
        )
        .is_ok());
        assert!(validate_schema_path("/org/gnome/settings-daemon/plugins/media-keys/custom-keybindings/custom0/").is_ok());
        assert!(validate_schema_path("/org/gnome/terminal/legacy/profiles:/:b1dcc9dd/").is_ok());
        assert!(validate_schema_path("/a/").is_ok());
    }

    #[test]
    fn test_invalid_schema_paths() {
        for path in [
            "",
            "/",
            "org/gnome/",
            "/org/gnome",
            "/org//gnome/",
            "/org/gnome /",
            "//",
        ] {
            assert_eq!(
                validate_schema_path(path),
                Err(DesktopError::InvalidPath {
                    path: path.to_string()
                }),
                "path {:?} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_extension_uuids() {
        assert!(validate_extension_uuid("user-theme@gnome-shell-extensions.gcampax.github.com").is_ok());
        assert!(validate_extension_uuid("night-light-slider.timurlinux.com").is_ok());
        assert!(validate_extension_uuid("").is_err());
        assert!(validate_extension_uuid("..").is_err());
        assert!(validate_extension_uuid("a/b").is_err());
    }
}
