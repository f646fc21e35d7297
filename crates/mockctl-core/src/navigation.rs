// ── Navigation ──
//
// Routes are the addressable screens of the admin client. The navigator
// publishes the current route through a `watch` channel so front ends
// can follow controller-driven redirects (e.g. back to the list after a
// save) without polling.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use tokio::sync::watch;
use tracing::info;
use url::Url;

use mockctl_api::{ALL_GROUPS, RecordId};

use crate::error::CoreError;

/// An addressable admin screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `services/<group>`
    Services { group: String },
    /// `services/new/<group>`
    NewService { group: String },
    /// `services/<id>/<group>`
    EditService { id: RecordId, group: String },
    /// `serviceactions`
    ServiceActions,
    /// `serviceactions/<id>`
    EditServiceAction { id: RecordId },
}

/// Resolve an optional scope to the group segment used in paths.
pub fn scope_segment(scope: Option<&str>) -> String {
    scope
        .filter(|s| !s.is_empty())
        .unwrap_or(ALL_GROUPS)
        .to_owned()
}

impl Route {
    pub fn services(scope: Option<&str>) -> Self {
        Self::Services {
            group: scope_segment(scope),
        }
    }

    pub fn new_service(scope: Option<&str>) -> Self {
        Self::NewService {
            group: scope_segment(scope),
        }
    }

    pub fn edit_service(id: RecordId, scope: Option<&str>) -> Self {
        Self::EditService {
            id,
            group: scope_segment(scope),
        }
    }

    /// The group segment carried by this route, if any.
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Services { group }
            | Self::NewService { group }
            | Self::EditService { group, .. } => Some(group),
            Self::ServiceActions | Self::EditServiceAction { .. } => None,
        }
    }
}

const NEW_SEGMENT: &str = "new";

/// Percent-encode a group for use as a single path segment. A group
/// literally named `new` gets its first byte escaped so `services/<group>`
/// never reads as the new-service path.
fn encode_group(group: &str) -> Cow<'_, str> {
    if group == NEW_SEGMENT {
        Cow::Borrowed("%6Eew")
    } else {
        urlencoding::encode(group)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Services { group } => write!(f, "services/{}", encode_group(group)),
            Self::NewService { group } => write!(f, "services/new/{}", encode_group(group)),
            Self::EditService { id, group } => {
                write!(f, "services/{id}/{}", encode_group(group))
            }
            Self::ServiceActions => f.write_str("serviceactions"),
            Self::EditServiceAction { id } => write!(f, "serviceactions/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = CoreError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let invalid = || CoreError::InvalidRoute(path.to_owned());
        let parse_id = |raw: &str| raw.parse::<RecordId>().map_err(|_| invalid());
        let decode = |raw: &str| {
            urlencoding::decode(raw)
                .map(Cow::into_owned)
                .map_err(|_| invalid())
        };

        match segments.as_slice() {
            ["services"] => Ok(Self::services(None)),
            ["services", "new"] => Ok(Self::new_service(None)),
            ["services", "new", group] => {
                Ok(Self::new_service(Some(decode(*group)?.as_str())))
            }
            ["services", id, group] => Ok(Self::EditService {
                id: parse_id(*id)?,
                group: scope_segment(Some(decode(*group)?.as_str())),
            }),
            ["services", group] => Ok(Self::services(Some(decode(*group)?.as_str()))),
            ["serviceactions"] => Ok(Self::ServiceActions),
            ["serviceactions", id] => Ok(Self::EditServiceAction { id: parse_id(*id)? }),
            _ => Err(invalid()),
        }
    }
}

// ── Navigator ────────────────────────────────────────────────────

/// Location service shared by controllers and front ends.
pub struct Navigator {
    route: watch::Sender<Route>,
    host: String,
    port: Option<u16>,
}

impl Navigator {
    pub fn new(initial: Route, server: &Url) -> Self {
        let (route, _) = watch::channel(initial);
        Self {
            route,
            host: server.host_str().unwrap_or("localhost").to_owned(),
            port: server.port_or_known_default(),
        }
    }

    /// Parse `path` and make it the current route.
    pub fn path(&self, path: &str) -> Result<(), CoreError> {
        let route = path.parse()?;
        self.navigate(route);
        Ok(())
    }

    pub fn navigate(&self, route: Route) {
        info!(%route, "navigating");
        self.route.send_replace(route);
    }

    pub fn current(&self) -> Route {
        self.route.borrow().clone()
    }

    /// Subscribe to route changes.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.route.subscribe()
    }

    /// Host of the mock server, as shown next to proxy endpoints.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_route_round_trips_through_its_path() {
        let routes = [
            Route::services(None),
            Route::services(Some("billing")),
            Route::new_service(Some("billing")),
            Route::edit_service(RecordId::new(12), Some("all")),
            Route::edit_service(RecordId::PENDING, Some("qa")),
            Route::ServiceActions,
            Route::EditServiceAction {
                id: RecordId::new(4),
            },
            Route::services(Some("new")),
            Route::new_service(Some("new")),
            Route::services(Some("team/a")),
            Route::new_service(Some("team/a")),
            Route::edit_service(RecordId::new(3), Some("ops & qa")),
            Route::services(Some("50%")),
        ];
        for route in routes {
            let path = route.to_string();
            assert_eq!(path.parse::<Route>().unwrap(), route, "path {path}");
        }
    }

    #[test]
    fn missing_group_defaults_to_all() {
        assert_eq!("services".parse::<Route>().unwrap().to_string(), "services/all");
        assert_eq!(
            "/services/new/".parse::<Route>().unwrap().to_string(),
            "services/new/all"
        );
    }

    #[test]
    fn group_segments_are_percent_encoded() {
        assert_eq!(Route::services(Some("new")).to_string(), "services/%6Eew");
        assert_eq!(
            Route::new_service(Some("team/a")).to_string(),
            "services/new/team%2Fa"
        );
        assert_eq!(
            "services/team%2Fa".parse::<Route>().unwrap(),
            Route::services(Some("team/a"))
        );
        assert!("services/%FF".parse::<Route>().is_err());
    }

    #[test]
    fn rejects_unknown_paths() {
        assert!("mockgroups".parse::<Route>().is_err());
        assert!("serviceactions/abc".parse::<Route>().is_err());
        assert!("services/x/y".parse::<Route>().is_err());
    }

    #[test]
    fn navigator_publishes_route_changes() {
        let server = Url::parse("http://mocks.local:9010").unwrap();
        let nav = Navigator::new(Route::services(None), &server);
        let mut rx = nav.subscribe();

        nav.path("services/new/qa").unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Route::new_service(Some("qa")));
        assert_eq!(nav.host(), "mocks.local");
        assert_eq!(nav.port(), Some(9010));
    }
}
