//! Envelope validation and value-freshness interpretation.
//!
//! Both steps are pure and return explicit outcomes instead of raising
//! through the caller: the facade decides how each outcome degrades (log
//! level, neutral default). Freshness is advisory — a stale value is still
//! a value.

use crate::envelope::{COMMUNICATION_ERROR_CODE, ResponseEnvelope};
use crate::error::ClientError;

/// Result of interpreting a value envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueOutcome {
    /// Value decoded and trusted by the appliance.
    Fresh(f64),
    /// Value decoded but flagged stale or unsynchronized; callers get the
    /// value anyway, with `warning` destined for the warn-level log.
    Stale { value: f64, warning: ClientError },
    /// Nothing usable; callers fall back to their neutral default.
    Failed(ClientError),
}

/// Check an envelope for an erroneous appliance response.
///
/// `Ok` iff the status is not ERROR. ERROR with the reserved code `-1`
/// maps to a communication error (endpoint/description taken from the
/// envelope, already masked at normalization time); any other code maps to
/// a device error. Missing fields never panic — they degrade to
/// placeholder text.
pub fn check_envelope(envelope: &ResponseEnvelope) -> Result<(), ClientError> {
    if !envelope.is_error() {
        return Ok(());
    }

    let description = envelope
        .description
        .clone()
        .unwrap_or_else(|| "no description provided".to_string());

    match envelope.code {
        Some(COMMUNICATION_ERROR_CODE) | None => Err(ClientError::communication(
            envelope
                .endpoint
                .clone()
                .unwrap_or_else(|| "<unknown>".to_string()),
            description,
        )),
        Some(code) => Err(ClientError::Device {
            name: envelope
                .name
                .clone()
                .unwrap_or_else(|| "UNNAMED_ERROR".to_string()),
            code,
            description,
        }),
    }
}

/// Extract the latest valid value from a response envelope.
///
/// An absent type tag means the value has no content; a missing content
/// block is treated the same way. A decoded value that is `outdated` or
/// whose status is not `"SYNCHRONIZED"` comes back as
/// [`ValueOutcome::Stale`] carrying both the value and the warning.
pub fn extract_value(envelope: &ResponseEnvelope) -> ValueOutcome {
    let value_name = envelope
        .name
        .clone()
        .unwrap_or_else(|| "<unnamed>".to_string());

    if envelope.kind.is_none() {
        return ValueOutcome::Failed(ClientError::EmptyValue { value_name });
    }

    let Some(latest) = envelope
        .content
        .as_ref()
        .and_then(|content| content.latest_valid_value.as_ref())
    else {
        // Type tag present but no readable content block: nothing to
        // return, same degradation path as an empty value.
        return ValueOutcome::Failed(ClientError::EmptyValue { value_name });
    };

    if latest.outdated || latest.status != "SYNCHRONIZED" {
        return ValueOutcome::Stale {
            value: latest.value,
            warning: ClientError::ValueStatus {
                value_name,
                date: latest.date,
                outdated: latest.outdated,
                status: latest.status.clone(),
            },
        };
    }

    ValueOutcome::Fresh(latest.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> ResponseEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_check_passes_ok_status() {
        assert!(check_envelope(&envelope(json!({ "status": "OK" }))).is_ok());
    }

    #[test]
    fn test_check_maps_code_minus_one_to_communication() {
        let result = check_envelope(&envelope(json!({
            "status": "ERROR",
            "code": -1,
            "endpoint": "system",
            "description": "connection refused"
        })));
        match result.unwrap_err() {
            ClientError::Communication { endpoint, description } => {
                assert_eq!(endpoint, "system");
                assert_eq!(description, "connection refused");
            }
            other => panic!("expected communication error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_maps_other_codes_to_device() {
        let result = check_envelope(&envelope(json!({
            "status": "ERROR",
            "code": 5,
            "name": "HEATER_FAULT",
            "description": "driver offline"
        })));
        match result.unwrap_err() {
            ClientError::Device { name, code, description } => {
                assert_eq!(name, "HEATER_FAULT");
                assert_eq!(code, 5);
                assert_eq!(description, "driver offline");
            }
            other => panic!("expected device error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_tolerates_missing_fields() {
        // An ERROR envelope with nothing else is still a validation
        // failure, never a panic.
        let result = check_envelope(&envelope(json!({ "status": "ERROR" })));
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_fresh_value() {
        let outcome = extract_value(&envelope(json!({
            "name": "mxc_temperature",
            "type": "temperature",
            "content": {
                "latest_valid_value": {
                    "value": 4.2,
                    "date": 1_700_000_000,
                    "outdated": false,
                    "status": "SYNCHRONIZED"
                }
            }
        })));
        assert_eq!(outcome, ValueOutcome::Fresh(4.2));
    }

    #[test]
    fn test_extract_outdated_value_is_stale_but_kept() {
        let outcome = extract_value(&envelope(json!({
            "name": "mxc_temperature",
            "type": "temperature",
            "content": {
                "latest_valid_value": {
                    "value": 4.2,
                    "date": 1_700_000_000,
                    "outdated": true,
                    "status": "SYNCHRONIZED"
                }
            }
        })));
        match outcome {
            ValueOutcome::Stale { value, warning } => {
                assert_eq!(value, 4.2);
                assert!(matches!(warning, ClientError::ValueStatus { outdated: true, .. }));
            }
            other => panic!("expected stale outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_unsynchronized_value_is_stale() {
        let outcome = extract_value(&envelope(json!({
            "name": "still_pressure",
            "type": "pressure",
            "content": {
                "latest_valid_value": {
                    "value": 0.003,
                    "date": 1_700_000_000,
                    "outdated": false,
                    "status": "INDEPENDENT"
                }
            }
        })));
        match outcome {
            ValueOutcome::Stale { value, warning } => {
                assert_eq!(value, 0.003);
                let msg = warning.to_string();
                assert!(msg.contains("INDEPENDENT"));
                assert!(msg.contains("not outdated"));
            }
            other => panic!("expected stale outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_null_type_tag_fails_empty() {
        let outcome = extract_value(&envelope(json!({
            "name": "heater_power",
            "type": null
        })));
        assert!(matches!(
            outcome,
            ValueOutcome::Failed(ClientError::EmptyValue { .. })
        ));
    }

    #[test]
    fn test_extract_missing_content_fails_empty() {
        let outcome = extract_value(&envelope(json!({
            "name": "heater_power",
            "type": "power"
        })));
        assert!(matches!(
            outcome,
            ValueOutcome::Failed(ClientError::EmptyValue { .. })
        ));
    }

    #[test]
    fn test_extract_unnamed_value_uses_placeholder() {
        let outcome = extract_value(&envelope(json!({ "type": null })));
        match outcome {
            ValueOutcome::Failed(ClientError::EmptyValue { value_name }) => {
                assert_eq!(value_name, "<unnamed>");
            }
            other => panic!("expected empty-value failure, got {other:?}"),
        }
    }
}
