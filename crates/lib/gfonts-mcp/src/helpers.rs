use std::borrow::Cow;

use gfonts_core::control::ControlError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn map_err(err: ControlError) -> ErrorData {
    tracing::error!(error = %err, "tool call failed");
    mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string())
}
