//! Module handlers - thin layer that delegates to the desktop state client

use super::dto::*;
use super::error::{extension_argument_failure, extension_failure, gsettings_failure, invalid_arguments};
use super::mapper::split_runner_fields;
use crate::contract::{DesktopError, DesktopStateApi, ExtensionRequest, SetValueRequest};

/// Run the `gsettings` module with raw JSON arguments
pub async fn run_gsettings(
    client: &dyn DesktopStateApi,
    args: serde_json::Value,
) -> ModuleResponse<GsettingsResult> {
    let request = match gsettings_request(args) {
        Ok(request) => request,
        Err(error) => return ModuleResponse::Failed(gsettings_failure(error)),
    };

    match client.set_value(request).await {
        Ok(outcome) => ModuleResponse::Ok(outcome.into()),
        Err(error) => ModuleResponse::Failed(gsettings_failure(error)),
    }
}

/// Run the `gnome_extension` module with raw JSON arguments
pub async fn run_gnome_extension(
    client: &dyn DesktopStateApi,
    args: serde_json::Value,
) -> ModuleResponse<ExtensionResult> {
    let request = match extension_request(args) {
        Ok(request) => request,
        Err(error) => return ModuleResponse::Failed(extension_argument_failure(error)),
    };

    match client.reconcile_extension(request).await {
        Ok(report) => ModuleResponse::Ok(report.into()),
        Err(failure) => ModuleResponse::Failed(extension_failure(failure)),
    }
}

fn gsettings_request(args: serde_json::Value) -> Result<SetValueRequest, DesktopError> {
    let (args, check_mode) = split_runner_fields(args)?;
    let args: GsettingsArgs = serde_json::from_value(args).map_err(invalid_arguments)?;
    args.into_request(check_mode)
}

fn extension_request(args: serde_json::Value) -> Result<ExtensionRequest, DesktopError> {
    let (args, check_mode) = split_runner_fields(args)?;
    let args: ExtensionArgs = serde_json::from_value(args).map_err(invalid_arguments)?;
    Ok(args.into_request(check_mode))
}
