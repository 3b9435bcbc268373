use super::error::ExtractError;
use crate::client::chain_res::TxRecord;
use crate::config::network::EventKey;

/// Looks up `key` in the first event of type `event_type` in the tx's first log.
///
/// Fails without looking at any event when the tx itself did not succeed.
/// Surrounding json quotes are stripped, typed sdk events encode string
/// attributes as json (`"\"42\""`).
pub fn extract_attribute(
    record: &TxRecord,
    event_type: &str,
    key: &str,
) -> Result<String, ExtractError> {
    if !record.is_ok() {
        return Err(ExtractError::TxFailed {
            tx_hash: record.hash.clone(),
            status: record.status,
            code: record.code,
        });
    }

    let log = record.logs.first().ok_or_else(|| ExtractError::NoLogs {
        tx_hash: record.hash.clone(),
    })?;

    let event = log
        .events
        .iter()
        .find(|e| e.kind == event_type)
        .ok_or_else(|| ExtractError::EventNotFound {
            tx_hash: record.hash.clone(),
            event_type: event_type.to_string(),
        })?;

    let attr = event
        .attributes
        .iter()
        .find(|a| a.key == key)
        .ok_or_else(|| ExtractError::AttributeNotFound {
            tx_hash: record.hash.clone(),
            event_type: event_type.to_string(),
            key: key.to_string(),
        })?;

    Ok(unquote(&attr.value).to_string())
}

pub fn extract(record: &TxRecord, event: &EventKey) -> Result<String, ExtractError> {
    extract_attribute(record, &event.event_type, &event.attribute)
}

pub fn parse_code_id(value: &str) -> Result<u64, ExtractError> {
    unquote(value)
        .parse()
        .map_err(|_| ExtractError::InvalidCodeId {
            value: value.to_string(),
        })
}

fn unquote(value: &str) -> &str {
    let v = value.trim();
    v.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::{Attribute, Event, TxLog, TxStatus};
    use assert_matches::assert_matches;

    const CODE_STORED: &str = "cosmwasm.wasm.v1.EventCodeStored";

    fn event(kind: &str, attrs: &[(&str, &str)]) -> Event {
        Event {
            kind: kind.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| Attribute {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    fn record(status: TxStatus, logs: Vec<TxLog>) -> TxRecord {
        TxRecord {
            hash: "0xABC".to_string(),
            status,
            code: if status == TxStatus::Ok { 0 } else { 5 },
            raw_log: String::new(),
            logs,
        }
    }

    fn stored(code_id: &str) -> TxRecord {
        record(
            TxStatus::Ok,
            vec![TxLog {
                events: vec![
                    event("message", &[("action", "/cosmwasm.wasm.v1.MsgStoreCode")]),
                    event(CODE_STORED, &[("checksum", "abc"), ("code_id", code_id)]),
                ],
            }],
        )
    }

    #[test]
    fn finds_code_id() {
        assert_eq!(extract_attribute(&stored("42"), CODE_STORED, "code_id").unwrap(), "42");
    }

    #[test]
    fn strips_json_quotes() {
        let value = extract_attribute(&stored("\"42\""), CODE_STORED, "code_id").unwrap();
        assert_eq!(value, "42");
        assert_eq!(parse_code_id(&value).unwrap(), 42);
    }

    #[test]
    fn missing_event() {
        let rec = record(
            TxStatus::Ok,
            vec![TxLog {
                events: vec![event("message", &[("action", "store")])],
            }],
        );

        assert_eq!(
            extract_attribute(&rec, CODE_STORED, "code_id").unwrap_err(),
            ExtractError::EventNotFound {
                tx_hash: "0xABC".to_string(),
                event_type: CODE_STORED.to_string(),
            }
        );
    }

    #[test]
    fn missing_attribute() {
        assert_matches!(
            extract_attribute(&stored("42"), CODE_STORED, "creator"),
            Err(ExtractError::AttributeNotFound { key, .. }) if key == "creator"
        );
    }

    #[test]
    fn failed_tx_short_circuits() {
        // the event is present, but the status check comes first
        let mut rec = stored("42");
        rec.status = TxStatus::Error;
        rec.code = 11;

        assert_eq!(
            extract_attribute(&rec, CODE_STORED, "code_id").unwrap_err(),
            ExtractError::TxFailed {
                tx_hash: "0xABC".to_string(),
                status: TxStatus::Error,
                code: 11,
            }
        );
    }

    #[test]
    fn only_first_log_is_scanned() {
        let rec = record(
            TxStatus::Ok,
            vec![
                TxLog {
                    events: vec![event("message", &[])],
                },
                TxLog {
                    events: vec![event(CODE_STORED, &[("code_id", "42")])],
                },
            ],
        );

        assert_matches!(
            extract_attribute(&rec, CODE_STORED, "code_id"),
            Err(ExtractError::EventNotFound { .. })
        );
    }

    #[test]
    fn no_logs() {
        assert_matches!(
            extract_attribute(&record(TxStatus::Ok, vec![]), CODE_STORED, "code_id"),
            Err(ExtractError::NoLogs { .. })
        );
    }

    #[test]
    fn first_matching_event_wins() {
        let rec = record(
            TxStatus::Ok,
            vec![TxLog {
                events: vec![
                    event("instantiate", &[("_contract_address", "orai1first")]),
                    event("instantiate", &[("_contract_address", "orai1second")]),
                ],
            }],
        );

        let key = EventKey::new("instantiate", "_contract_address");
        assert_eq!(extract(&rec, &key).unwrap(), "orai1first");
    }

    #[test]
    fn rejects_non_numeric_code_id() {
        assert_matches!(parse_code_id("abc"), Err(ExtractError::InvalidCodeId { .. }));
    }
}
