// Wire models for the admin REST API
//
// Field names follow the server's camelCase JSON. Unknown fields are
// kept in a flattened map so an edit round-trip never drops data the
// client does not model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// ── List envelope ───────────────────────────────────────────────────

/// `{ "data": [...] }` wrapper used by every `findall` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: Vec<T>,
}

// ── RecordId ────────────────────────────────────────────────────────

/// Numeric record identity.
///
/// The server emits plain numbers, but forms and older clients send ids
/// as numeric strings, so both shapes are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(i64);

impl RecordId {
    /// Marks a record that has not been persisted yet. Updating a record
    /// with this id asks the server to create it.
    pub const PENDING: Self = Self(-2);

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub const fn is_pending(self) -> bool {
        self.0 == Self::PENDING.0
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(Self(n)),
            Raw::Str(s) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid record id: {s:?}"))),
        }
    }
}

// ── Flag ────────────────────────────────────────────────────────────

/// A yes/no switch on a service record.
///
/// The server stores these as booleans while forms present `"yes"` and
/// `"no"`. Decoding accepts either shape, so the conversion into the form
/// representation happens exactly once, at load time. Encoding for the
/// wire is chosen by [`FlagEncoding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flag {
    Yes,
    #[default]
    No,
}

impl Flag {
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }

    pub const fn as_bool(self) -> bool {
        matches!(self, Self::Yes)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "y" | "1" => Ok(Self::Yes),
            "no" | "false" | "n" | "0" => Ok(Self::No),
            other => Err(format!("expected yes or no, got {other:?}")),
        }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(Self::from_bool(b)),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// How [`Flag`] fields are written into request bodies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FlagEncoding {
    /// `"yes"` / `"no"` strings, the representation the admin forms submit.
    #[default]
    YesNo,
    /// JSON booleans, the representation the server emits.
    Bool,
}

impl FlagEncoding {
    /// Rewrite the named flag fields of an encoded record in place.
    pub(crate) fn apply(self, body: &mut Value, fields: &[&str]) {
        let Some(obj) = body.as_object_mut() else {
            return;
        };
        for field in fields {
            let Some(current) = obj.get(*field) else {
                continue;
            };
            let Ok(flag) = Flag::deserialize(current.clone()) else {
                continue;
            };
            let encoded = match self {
                Self::YesNo => Value::String(flag.as_str().to_owned()),
                Self::Bool => Value::Bool(flag.as_bool()),
            };
            obj.insert((*field).to_owned(), encoded);
        }
    }
}

// ── Lenient decoding ────────────────────────────────────────────────

/// Treat an explicit `null` like a missing key.
fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accept `60000`, `"60000"` or `null` for millisecond fields.
fn de_lenient_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

fn de_lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    de_lenient_opt_u64(deserializer).map(Option::unwrap_or_default)
}

fn de_timeout_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    de_lenient_opt_u64(deserializer).map(|ms| ms.unwrap_or(DEFAULT_TIMEOUT_MS))
}

fn de_type_request<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(|v| v.unwrap_or_else(default_type_request))
}

fn de_http_method<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(|v| v.unwrap_or_else(default_http_method))
}

// ── Service ─────────────────────────────────────────────────────────

/// Default upstream timeout for a freshly created service.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_type_request() -> String {
    "SOAP".into()
}

fn default_http_method() -> String {
    "POST".into()
}

/// A mockable backend endpoint proxied by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de_null_default")]
    pub description: String,
    /// `SOAP` or `REST`.
    #[serde(default = "default_type_request", deserialize_with = "de_type_request")]
    pub type_request: String,
    #[serde(default = "default_http_method", deserialize_with = "de_http_method")]
    pub http_method: String,
    #[serde(default, deserialize_with = "de_null_default")]
    pub local_target: String,
    #[serde(default, deserialize_with = "de_null_default")]
    pub remote_target: String,
    #[serde(default = "default_timeout_ms", deserialize_with = "de_timeout_ms")]
    pub timeoutms: u64,
    #[serde(default, deserialize_with = "de_null_default")]
    pub record_xml_data: Flag,
    #[serde(default, deserialize_with = "de_null_default")]
    pub record_data: Flag,
    #[serde(default, deserialize_with = "de_null_default")]
    pub use_mock_group: Flag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_group_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    /// Wire names of the fields carried as [`Flag`]s.
    pub const FLAG_FIELDS: [&'static str; 3] = ["recordXmlData", "recordData", "useMockGroup"];

    /// A service that has not been created yet, with every field empty
    /// and server-side defaults for the rest.
    pub fn pending() -> Self {
        Self {
            id: RecordId::PENDING,
            name: String::new(),
            description: String::new(),
            type_request: default_type_request(),
            http_method: default_http_method(),
            local_target: String::new(),
            remote_target: String::new(),
            timeoutms: DEFAULT_TIMEOUT_MS,
            record_xml_data: Flag::No,
            record_data: Flag::No,
            use_mock_group: Flag::No,
            mock_group_id: None,
            environment_name: None,
            extra: Map::new(),
        }
    }
}

// ── ServiceAction ───────────────────────────────────────────────────

/// A scripted action (SOAP action or REST verb) observed on a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAction {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub thresholdms: u64,
    #[serde(default, deserialize_with = "de_null_default")]
    pub groups: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Reference data ──────────────────────────────────────────────────

/// A named bucket of mock configurations a service can be bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockGroup {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de_null_default")]
    pub groups: Vec<String>,
}

impl MockGroup {
    /// Id of the built-in "no mock group" entry.
    pub const NONE_ID: RecordId = RecordId::new(1);

    pub fn is_none_group(&self) -> bool {
        self.id == Self::NONE_ID
    }
}

/// A deployment environment services are registered under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de_null_default")]
    pub groups: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_accepts_number_and_string() {
        let a: RecordId = serde_json::from_value(json!(7)).unwrap();
        let b: RecordId = serde_json::from_value(json!("-2")).unwrap();
        assert_eq!(a.get(), 7);
        assert!(b.is_pending());
        assert_eq!(serde_json::to_value(b).unwrap(), json!(-2));
    }

    #[test]
    fn record_id_rejects_garbage() {
        assert!(serde_json::from_value::<RecordId>(json!("abc")).is_err());
    }

    #[test]
    fn flag_decodes_booleans_into_form_values() {
        let yes: Flag = serde_json::from_value(json!(true)).unwrap();
        let no: Flag = serde_json::from_value(json!("no")).unwrap();
        assert_eq!(yes, Flag::Yes);
        assert_eq!(no, Flag::No);
        assert_eq!(serde_json::to_value(yes).unwrap(), json!("yes"));
    }

    #[test]
    fn flag_rejects_unknown_strings() {
        assert!(serde_json::from_value::<Flag>(json!("maybe")).is_err());
    }

    #[test]
    fn flag_encoding_rewrites_only_flag_fields() {
        let mut body = json!({
            "recordXmlData": "yes",
            "recordData": "no",
            "useMockGroup": "yes",
            "name": "yes",
        });
        FlagEncoding::Bool.apply(&mut body, &Service::FLAG_FIELDS);
        assert_eq!(body["recordXmlData"], json!(true));
        assert_eq!(body["recordData"], json!(false));
        assert_eq!(body["useMockGroup"], json!(true));
        assert_eq!(body["name"], json!("yes"));
    }

    #[test]
    fn flag_encoding_parses_from_kebab_case() {
        assert_eq!("yes-no".parse::<FlagEncoding>().unwrap(), FlagEncoding::YesNo);
        assert_eq!("bool".parse::<FlagEncoding>().unwrap(), FlagEncoding::Bool);
        assert_eq!(FlagEncoding::YesNo.to_string(), "yes-no");
    }

    #[test]
    fn service_keeps_unknown_fields() {
        let raw = json!({
            "id": 3,
            "name": "quotes",
            "timeoutms": "1500",
            "recordXmlData": false,
            "customHeader": "X-Trace",
        });
        let service: Service = serde_json::from_value(raw).unwrap();
        assert_eq!(service.timeoutms, 1500);
        assert_eq!(service.record_xml_data, Flag::No);
        assert_eq!(service.type_request, "SOAP");
        assert_eq!(service.extra.get("customHeader"), Some(&json!("X-Trace")));

        let back = serde_json::to_value(&service).unwrap();
        assert_eq!(back["customHeader"], json!("X-Trace"));
        assert_eq!(back["timeoutms"], json!(1500));
    }

    #[test]
    fn null_fields_decode_like_missing_ones() {
        let service: Service = serde_json::from_value(json!({
            "id": 1,
            "name": "a",
            "description": null,
            "typeRequest": null,
            "httpMethod": null,
            "localTarget": null,
            "remoteTarget": null,
            "timeoutms": null,
            "recordData": null,
            "mockGroupId": null,
        }))
        .unwrap();
        assert_eq!(service.description, "");
        assert_eq!(service.type_request, "SOAP");
        assert_eq!(service.http_method, "POST");
        assert_eq!(service.timeoutms, DEFAULT_TIMEOUT_MS);
        assert_eq!(service.record_data, Flag::No);
        assert_eq!(service.mock_group_id, None);

        let action: ServiceAction = serde_json::from_value(json!({
            "id": 2,
            "name": null,
            "thresholdms": null,
            "groups": null,
        }))
        .unwrap();
        assert_eq!(action.name, "");
        assert_eq!(action.thresholdms, 0);
        assert!(action.groups.is_empty());
    }

    #[test]
    fn one_null_field_does_not_fail_the_whole_list() {
        let page: DataEnvelope<Service> = serde_json::from_value(json!({
            "data": [
                {"id": 1, "name": "quotes", "description": null},
                {"id": 2, "name": "orders", "description": "ok"},
            ]
        }))
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].description, "");
    }
}
