// ── Domain model ──
//
// Wire types come from `mockctl-api`; this module adds the `Record`
// abstraction the generic controllers are written against.

pub mod record;

pub use mockctl_api::{Environment, Flag, MockGroup, RecordId, Service, ServiceAction};
pub use record::{FieldKind, FieldSpec, Record, display_value};
