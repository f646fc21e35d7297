// ── Record abstraction ──
//
// A `Record` is one editable admin resource. The generic list and edit
// controllers only ever talk to records through this trait: identity,
// table columns, form fields, routes, and the backend calls that load
// and persist them.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use mockctl_api::{Flag, RecordId, Service, ServiceAction};

use crate::backend::Backend;
use crate::error::CoreError;
use crate::navigation::Route;

// ── Field metadata ───────────────────────────────────────────────

/// How a form field is edited and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative integer.
    Number,
    /// yes / no switch.
    Flag,
    /// One of a fixed set of upper-case values.
    Choice(&'static [&'static str]),
    /// Comma-separated list of strings.
    List,
}

impl FieldKind {
    /// Parse user input into the JSON value stored for this kind.
    pub fn parse(self, raw: &str) -> Result<Value, CoreError> {
        let raw = raw.trim();
        match self {
            Self::Text => Ok(Value::String(raw.to_owned())),
            Self::Number => raw
                .parse::<u64>()
                .map(Value::from)
                .map_err(|_| CoreError::validation(format!("expected a number, got {raw:?}"))),
            Self::Flag => raw
                .parse::<Flag>()
                .map(|flag| Value::String(flag.as_str().to_owned()))
                .map_err(CoreError::validation),
            Self::Choice(options) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(raw))
                .map(|option| Value::String((*option).to_owned()))
                .ok_or_else(|| {
                    CoreError::validation(format!(
                        "expected one of {}, got {raw:?}",
                        options.join(", ")
                    ))
                }),
            Self::List => Ok(Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::String(item.to_owned()))
                    .collect(),
            )),
        }
    }
}

/// An editable field of a record, keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }
}

/// Render a JSON field value the way tables and forms show it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

// ── Record ───────────────────────────────────────────────────────

/// An admin resource that can be listed, edited and saved.
#[async_trait]
pub trait Record:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable resource name used in logs and errors.
    const KIND: &'static str;
    /// Editable fields, in form order.
    const FIELDS: &'static [FieldSpec];
    /// Wire names of the columns shown in list tables.
    const COLUMNS: &'static [&'static str];
    /// Whether the resource is listed per group scope.
    const SCOPED: bool;

    fn id(&self) -> RecordId;

    /// Where to go after a successful save or delete.
    fn list_route(scope: Option<&str>) -> Route;

    fn edit_route(&self, scope: Option<&str>) -> Route;

    async fn fetch_all(backend: &dyn Backend, scope: Option<&str>)
    -> Result<Vec<Self>, CoreError>;

    async fn fetch_one(backend: &dyn Backend, id: RecordId) -> Result<Self, CoreError>;

    async fn update(backend: &dyn Backend, record: &Self) -> Result<(), CoreError>;

    /// The record as a JSON object, in wire field names.
    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Value of a field by wire name.
    fn field(&self, name: &str) -> Option<Value> {
        match self.to_json() {
            Value::Object(mut map) => map.remove(name),
            _ => None,
        }
    }

    /// Display text of a field by wire name; empty when absent.
    fn field_text(&self, name: &str) -> String {
        self.field(name).as_ref().map(display_value).unwrap_or_default()
    }

    /// Set an editable field from user input.
    fn set_field(&mut self, name: &str, raw: &str) -> Result<(), CoreError> {
        let spec = Self::FIELDS
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| CoreError::UnknownField {
                kind: Self::KIND,
                field: name.to_owned(),
            })?;
        let value = spec.kind.parse(raw)?;

        let mut json = serde_json::to_value(&*self).map_err(|e| CoreError::Internal(e.to_string()))?;
        let Some(map) = json.as_object_mut() else {
            return Err(CoreError::Internal(format!("{} is not a JSON object", Self::KIND)));
        };
        map.insert(name.to_owned(), value);
        *self = serde_json::from_value(json)
            .map_err(|e| CoreError::validation(format!("{name}: {e}")))?;
        Ok(())
    }
}

// ── Service ──────────────────────────────────────────────────────

const TYPE_REQUESTS: &[&str] = &["SOAP", "REST"];
const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

#[async_trait]
impl Record for Service {
    const KIND: &'static str = "service";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text),
        FieldSpec::new("description", "Description", FieldKind::Text),
        FieldSpec::new("typeRequest", "Type", FieldKind::Choice(TYPE_REQUESTS)),
        FieldSpec::new("httpMethod", "HTTP method", FieldKind::Choice(HTTP_METHODS)),
        FieldSpec::new("localTarget", "Local target", FieldKind::Text),
        FieldSpec::new("remoteTarget", "Remote target", FieldKind::Text),
        FieldSpec::new("timeoutms", "Timeout (ms)", FieldKind::Number),
        FieldSpec::new("recordXmlData", "Record XML data", FieldKind::Flag),
        FieldSpec::new("recordData", "Record data", FieldKind::Flag),
        FieldSpec::new("useMockGroup", "Use mock group", FieldKind::Flag),
    ];
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "typeRequest",
        "localTarget",
        "remoteTarget",
        "timeoutms",
        "useMockGroup",
    ];
    const SCOPED: bool = true;

    fn id(&self) -> RecordId {
        self.id
    }

    fn list_route(scope: Option<&str>) -> Route {
        Route::services(scope)
    }

    fn edit_route(&self, scope: Option<&str>) -> Route {
        Route::edit_service(self.id, scope)
    }

    async fn fetch_all(
        backend: &dyn Backend,
        scope: Option<&str>,
    ) -> Result<Vec<Self>, CoreError> {
        backend.list_services(scope).await
    }

    async fn fetch_one(backend: &dyn Backend, id: RecordId) -> Result<Self, CoreError> {
        backend.get_service(id).await
    }

    async fn update(backend: &dyn Backend, record: &Self) -> Result<(), CoreError> {
        backend.update_service(record).await
    }
}

// ── ServiceAction ────────────────────────────────────────────────

#[async_trait]
impl Record for ServiceAction {
    const KIND: &'static str = "service action";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text),
        FieldSpec::new("thresholdms", "Threshold (ms)", FieldKind::Number),
        FieldSpec::new("groups", "Groups", FieldKind::List),
    ];
    const COLUMNS: &'static [&'static str] = &["name", "thresholdms", "groups"];
    const SCOPED: bool = false;

    fn id(&self) -> RecordId {
        self.id
    }

    fn list_route(_scope: Option<&str>) -> Route {
        Route::ServiceActions
    }

    fn edit_route(&self, _scope: Option<&str>) -> Route {
        Route::EditServiceAction { id: self.id }
    }

    async fn fetch_all(
        backend: &dyn Backend,
        _scope: Option<&str>,
    ) -> Result<Vec<Self>, CoreError> {
        backend.list_service_actions().await
    }

    async fn fetch_one(backend: &dyn Backend, id: RecordId) -> Result<Self, CoreError> {
        backend.get_service_action(id).await
    }

    async fn update(backend: &dyn Backend, record: &Self) -> Result<(), CoreError> {
        backend.update_service_action(record).await
    }
}
