//! Clock tool: get_current_time

use super::{ToolHandler, ToolOutput};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use toolgate_domain::tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

/// Tool name constant
pub const GET_CURRENT_TIME: &str = "get_current_time";

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get the tool definition for get_current_time
pub fn get_current_time_definition() -> ToolDefinition {
    ToolDefinition::new(GET_CURRENT_TIME, "Get the current date and time").with_parameter(
        ToolParameter::new(
            "timezone",
            "'UTC' (default), 'local', an IANA zone such as 'America/New_York', or a fixed offset such as '+05:30'",
            false,
        )
        .with_type(ParamType::String),
    )
}

pub struct CurrentTimeTool;

#[async_trait]
impl ToolHandler for CurrentTimeTool {
    fn definition(&self) -> ToolDefinition {
        get_current_time_definition()
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::new(render_time(
            call.get_string("timezone"),
            Utc::now(),
        )))
    }
}

/// Render `now` in the requested zone. Unknown zones fall back to UTC.
pub fn render_time(timezone: Option<&str>, now: DateTime<Utc>) -> String {
    let requested = timezone.map(str::trim).unwrap_or_default();

    if requested.is_empty()
        || requested.eq_ignore_ascii_case("utc")
        || requested.eq_ignore_ascii_case("z")
    {
        return format!("Current time (UTC): {} UTC", now.format(FORMAT));
    }

    if requested.eq_ignore_ascii_case("local") {
        let local = now.with_timezone(&Local);
        return format!(
            "Current time (local): {} {}",
            local.format(FORMAT),
            local.format("%:z")
        );
    }

    if let Ok(zone) = requested.parse::<Tz>() {
        let zoned = now.with_timezone(&zone);
        return format!(
            "Current time ({}): {} {}",
            zone.name(),
            zoned.format(FORMAT),
            zoned.offset()
        );
    }

    match requested.parse::<FixedOffset>() {
        Ok(offset) => {
            let shifted = now.with_timezone(&offset);
            format!(
                "Current time ({}): {} {}",
                offset,
                shifted.format(FORMAT),
                offset
            )
        }
        Err(_) => format!(
            "Current time (UTC): {} UTC (unknown timezone '{}', showing UTC)",
            now.format(FORMAT),
            requested
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_utc_is_default() {
        let expected = "Current time (UTC): 2024-03-01 12:00:00 UTC";
        assert_eq!(render_time(None, noon()), expected);
        assert_eq!(render_time(Some("utc"), noon()), expected);
        assert_eq!(render_time(Some(""), noon()), expected);
    }

    #[test]
    fn test_fixed_offset() {
        assert_eq!(
            render_time(Some("+05:30"), noon()),
            "Current time (+05:30): 2024-03-01 17:30:00 +05:30"
        );
        assert_eq!(
            render_time(Some("-08:00"), noon()),
            "Current time (-08:00): 2024-03-01 04:00:00 -08:00"
        );
    }

    #[test]
    fn test_named_zone() {
        assert_eq!(
            render_time(Some("America/New_York"), noon()),
            "Current time (America/New_York): 2024-03-01 07:00:00 EST"
        );
        assert_eq!(
            render_time(Some(" Asia/Tokyo "), noon()),
            "Current time (Asia/Tokyo): 2024-03-01 21:00:00 JST"
        );
    }

    #[test]
    fn test_unknown_zone_falls_back() {
        assert_eq!(
            render_time(Some("Mars/Olympus"), noon()),
            "Current time (UTC): 2024-03-01 12:00:00 UTC (unknown timezone 'Mars/Olympus', showing UTC)"
        );
    }

    #[test]
    fn test_local() {
        assert!(render_time(Some("LOCAL"), noon()).starts_with("Current time (local): "));
    }

    #[tokio::test]
    async fn test_invoke() {
        let output = CurrentTimeTool
            .invoke(&ToolCall::new(GET_CURRENT_TIME))
            .await
            .unwrap();
        assert!(output.value.as_str().unwrap().starts_with("Current time (UTC): "));
    }
}
