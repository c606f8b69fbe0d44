// ── Counter extraction ──
//
// Turns a raw NX-API `show interface` document into `InterfaceCounter`s.
// Only an unrecognizable document is an error; a bad individual row is
// logged and skipped, and a missing counter reads as 0.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Direction, InterfaceCounter};

/// NX-OS inbound byte counters, most specific first:
/// physical Ethernet, routed (L3) unicast, loopback.
pub const NXOS_INBOUND_ALIASES: [&str; 3] = ["eth_inbytes", "eth_l3in_ucastbytes", "loop_in_bytes"];

/// NX-OS outbound byte counters, same precedence as the inbound list.
pub const NXOS_OUTBOUND_ALIASES: [&str; 3] =
    ["eth_outbytes", "eth_l3out_ucastbytes", "loop_out_bytes"];

/// Field holding the interface name in every `ROW_interface` entry.
pub const INTERFACE_NAME_FIELD: &str = "interface";

/// Ordered field-name fallbacks per direction.
///
/// Different interface types report the same counter under different
/// names. The first alias present on a row wins; if none is present the
/// counter is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    inbound: Vec<String>,
    outbound: Vec<String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::nxos()
    }
}

impl AliasTable {
    pub fn new<I, O>(inbound: I, outbound: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            inbound: inbound.into_iter().map(Into::into).collect(),
            outbound: outbound.into_iter().map(Into::into).collect(),
        }
    }

    /// The aliases NX-OS uses for Ethernet, L3 and loopback interfaces.
    pub fn nxos() -> Self {
        Self::new(NXOS_INBOUND_ALIASES, NXOS_OUTBOUND_ALIASES)
    }

    /// Append an inbound alias with the lowest precedence.
    pub fn with_inbound(mut self, alias: impl Into<String>) -> Self {
        self.inbound.push(alias.into());
        self
    }

    /// Append an outbound alias with the lowest precedence.
    pub fn with_outbound(mut self, alias: impl Into<String>) -> Self {
        self.outbound.push(alias.into());
        self
    }

    /// Aliases for `direction`, in precedence order.
    pub fn aliases(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Inbound => &self.inbound,
            Direction::Outbound => &self.outbound,
        }
    }

    /// Resolve one counter on a row. Unusable values fall through to the
    /// next alias.
    pub fn resolve(&self, row: &Map<String, Value>, direction: Direction) -> u64 {
        self.aliases(direction)
            .iter()
            .find_map(|alias| row.get(alias).and_then(counter_value))
            .unwrap_or(0)
    }
}

/// NX-OS reports counters as numbers or as numeric strings.
fn counter_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract counters with the default NX-OS alias table.
pub fn extract(record: &Value) -> Result<Vec<InterfaceCounter>, CoreError> {
    extract_with(record, &AliasTable::nxos())
}

/// Extract counters from an NX-API `show interface` response.
///
/// Returns an empty list for a device with no interfaces and
/// `MalformedRecord` only when the interface table cannot be located.
pub fn extract_with(record: &Value, aliases: &AliasTable) -> Result<Vec<InterfaceCounter>, CoreError> {
    let rows = interface_rows(record)?;
    let mut counters = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let Some(fields) = row.as_object() else {
            warn!(index, "skipping interface row that is not an object");
            continue;
        };
        let Some(name) = fields
            .get(INTERFACE_NAME_FIELD)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            warn!(index, "skipping interface row without a name");
            continue;
        };

        counters.push(InterfaceCounter::new(
            name,
            aliases.resolve(fields, Direction::Inbound),
            aliases.resolve(fields, Direction::Outbound),
        ));
    }

    debug!(interfaces = counters.len(), "extracted interface counters");
    Ok(counters)
}

/// Locate `ins_api.outputs.output.body.TABLE_interface.ROW_interface`.
fn interface_rows(record: &Value) -> Result<Vec<&Value>, CoreError> {
    let output = record
        .pointer("/ins_api/outputs/output")
        .ok_or_else(|| CoreError::malformed("missing ins_api.outputs.output"))?;

    // Batched requests return an array of outputs; ours is always the first.
    let output = match output {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| CoreError::malformed("ins_api.outputs.output is empty"))?,
        other => other,
    };

    if let Some(code) = output.get("code").and_then(code_str) {
        if code != "200" {
            let msg = output
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("no message");
            return Err(CoreError::malformed(format!(
                "device returned code {code}: {msg}"
            )));
        }
    }

    let body = output
        .get("body")
        .ok_or_else(|| CoreError::malformed("output has no body"))?;

    let Some(table) = body.get("TABLE_interface") else {
        // A device without interfaces answers with an empty body.
        return match body {
            Value::Object(_) | Value::Null => Ok(Vec::new()),
            Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
            _ => Err(CoreError::malformed("output body is not an object")),
        };
    };

    // A single row is serialized as a bare object instead of an array.
    match table.get("ROW_interface") {
        Some(Value::Array(rows)) => Ok(rows.iter().collect()),
        Some(row @ Value::Object(_)) => Ok(vec![row]),
        _ => Err(CoreError::malformed("TABLE_interface has no ROW_interface")),
    }
}

fn code_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(body: Value) -> Value {
        json!({
            "ins_api": {
                "outputs": {
                    "output": { "code": "200", "msg": "Success", "body": body }
                }
            }
        })
    }

    fn rows(rows: Value) -> Value {
        wrap(json!({ "TABLE_interface": { "ROW_interface": rows } }))
    }

    #[test]
    fn extracts_mixed_interface_types() {
        let record = rows(json!([
            { "interface": "mgmt0", "eth_inbytes": 100, "eth_outbytes": 200 },
            { "interface": "Vlan10", "eth_l3in_ucastbytes": 300, "eth_l3out_ucastbytes": 400 },
            { "interface": "loopback0", "loop_in_bytes": 5, "loop_out_bytes": 6 }
        ]));

        let counters = extract(&record).unwrap();

        assert_eq!(
            counters,
            vec![
                InterfaceCounter::new("mgmt0", 100, 200),
                InterfaceCounter::new("Vlan10", 300, 400),
                InterfaceCounter::new("loopback0", 5, 6),
            ]
        );
    }

    #[test]
    fn first_alias_wins() {
        let record = rows(json!([{
            "interface": "Ethernet1/1",
            "eth_inbytes": 11,
            "eth_l3in_ucastbytes": 99,
            "eth_l3out_ucastbytes": 42
        }]));

        let counters = extract(&record).unwrap();

        assert_eq!(counters[0].inbound_bytes, 11);
        assert_eq!(counters[0].outbound_bytes, 42);
    }

    #[test]
    fn missing_aliases_default_to_zero() {
        let record = rows(json!([{ "interface": "nve1", "admin_state": "up" }]));

        let counters = extract(&record).unwrap();

        assert_eq!(counters, vec![InterfaceCounter::new("nve1", 0, 0)]);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let record = rows(json!([
            { "interface": "Ethernet1/2", "eth_inbytes": "18446744073709551615", "eth_outbytes": " 7 " }
        ]));

        let counters = extract(&record).unwrap();

        assert_eq!(counters[0].inbound_bytes, u64::MAX);
        assert_eq!(counters[0].outbound_bytes, 7);
    }

    #[test]
    fn unusable_value_falls_through_to_next_alias() {
        let record = rows(json!([
            { "interface": "Vlan1", "eth_inbytes": -1, "eth_l3in_ucastbytes": 12, "eth_outbytes": "n/a" }
        ]));

        let counters = extract(&record).unwrap();

        assert_eq!(counters[0].inbound_bytes, 12);
        assert_eq!(counters[0].outbound_bytes, 0);
    }

    #[test]
    fn single_row_object_is_accepted() {
        let record = rows(json!({ "interface": "Ethernet1/1", "eth_inbytes": 1 }));

        let counters = extract(&record).unwrap();

        assert_eq!(counters, vec![InterfaceCounter::new("Ethernet1/1", 1, 0)]);
    }

    #[test]
    fn output_array_uses_first_entry() {
        let record = json!({
            "ins_api": { "outputs": { "output": [
                { "code": "200", "body": { "TABLE_interface": { "ROW_interface": [
                    { "interface": "Ethernet1/9", "eth_outbytes": 3 }
                ]}}}
            ]}}
        });

        let counters = extract(&record).unwrap();

        assert_eq!(counters, vec![InterfaceCounter::new("Ethernet1/9", 0, 3)]);
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let record = rows(json!([
            { "interface": "Ethernet1/1", "eth_inbytes": 1 },
            "garbage",
            { "eth_inbytes": 5 },
            { "interface": "   " },
            { "interface": "Ethernet1/2", "eth_inbytes": 2 }
        ]));

        let counters = extract(&record).unwrap();

        let names: Vec<_> = counters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Ethernet1/1", "Ethernet1/2"]);
    }

    #[test]
    fn empty_device_yields_empty_list() {
        assert!(extract(&rows(json!([]))).unwrap().is_empty());
        assert!(extract(&wrap(json!({}))).unwrap().is_empty());
        assert!(extract(&wrap(json!(""))).unwrap().is_empty());
    }

    #[test]
    fn unrecognizable_record_is_malformed() {
        for record in [
            json!({}),
            json!([]),
            json!({ "ins_api": { "outputs": {} } }),
            json!({ "ins_api": { "outputs": { "output": [] } } }),
            json!({ "ins_api": { "outputs": { "output": { "code": "200" } } } }),
            wrap(json!({ "TABLE_interface": {} })),
            wrap(json!(42)),
        ] {
            let result = extract(&record);
            assert!(
                matches!(result, Err(CoreError::MalformedRecord { .. })),
                "expected MalformedRecord for {record}, got {result:?}"
            );
        }
    }

    #[test]
    fn device_error_code_is_malformed() {
        let record = json!({
            "ins_api": { "outputs": { "output": {
                "code": "400", "msg": "Input CLI command error", "body": {}
            }}}
        });

        match extract(&record) {
            Err(CoreError::MalformedRecord { reason }) => {
                assert!(reason.contains("400"), "got: {reason}");
                assert!(reason.contains("Input CLI command error"), "got: {reason}");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn alias_table_is_extensible() {
        let table = AliasTable::nxos()
            .with_inbound("vpc_in_bytes")
            .with_outbound("vpc_out_bytes");
        let record = rows(json!([
            { "interface": "port-channel1", "vpc_in_bytes": 8, "vpc_out_bytes": 9 }
        ]));

        let counters = extract_with(&record, &table).unwrap();

        assert_eq!(counters, vec![InterfaceCounter::new("port-channel1", 8, 9)]);
        assert_eq!(table.aliases(Direction::Inbound).len(), 4);
        assert_eq!(table.aliases(Direction::Inbound)[0], "eth_inbytes");
    }

    #[test]
    fn custom_alias_table_replaces_defaults() {
        let table = AliasTable::new(["rx"], ["tx"]);
        let record = rows(json!([{ "interface": "e0", "rx": 1, "tx": 2, "eth_inbytes": 100 }]));

        let counters = extract_with(&record, &table).unwrap();

        assert_eq!(counters, vec![InterfaceCounter::new("e0", 1, 2)]);
    }
}
