//! Current time tool definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{instrument, warn};

use super::ToolDefinition;
use crate::core::dispatch::{
    ArgKind, ArgValue, ArgumentRecord, DispatchError, Handler, HandlerOutput, SchemaDescriptor,
};

const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

/// Time tool - reports the current time in an IANA timezone.
pub struct GetTimeTool {
    now: fn() -> DateTime<Utc>,
}

impl GetTimeTool {
    pub fn new() -> Self {
        Self { now: Utc::now }
    }

    /// Use a fixed clock (tests).
    pub fn with_clock(now: fn() -> DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Format `now` in `timezone`.
    pub fn format_time(now: DateTime<Utc>, timezone: &str) -> Result<String, DispatchError> {
        let tz: Tz = timezone.parse().map_err(|_| {
            DispatchError::invalid_operation(format!("Unknown timezone: {}", timezone))
        })?;

        let local = now.with_timezone(&tz);
        Ok(format!(
            "Current time in {}: {}",
            timezone,
            local.format("%Y-%m-%d %H:%M:%S %Z")
        ))
    }
}

impl Default for GetTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDefinition for GetTimeTool {
    const NAME: &'static str = "get_time";
    const DESCRIPTION: &'static str =
        "Get the current date and time in an IANA timezone (default: Asia/Seoul).";

    fn schema() -> Result<SchemaDescriptor, DispatchError> {
        SchemaDescriptor::builder()
            .with_default(
                "timezone",
                ArgKind::String,
                ArgValue::Text(DEFAULT_TIMEZONE.to_string()),
                "IANA timezone name, e.g. Asia/Seoul or Europe/Paris",
            )
            .build()
    }
}

#[async_trait]
impl Handler for GetTimeTool {
    #[instrument(skip_all)]
    async fn handle(&self, args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
        let timezone = args.text("timezone")?;
        Self::format_time((self.now)(), timezone)
            .inspect_err(|e| warn!("{}", e))
            .map(Into::into)
    }
}
