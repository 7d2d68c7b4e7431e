//! Agones GameServer CRD types and annotation helpers
//!
//! The GameServer resource is owned by Agones; this crate only reads it. The
//! types here mirror the subset of `agones.dev/v1` the ingress pipeline needs:
//! declared ports, exposed status ports and the lifecycle state, plus the
//! annotation keys that drive routing, TLS and certificate issuance.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Annotation selecting the routing mode (`domain` or `path`)
pub const ANNOTATION_INGRESS_MODE: &str = "octops.io/gameserver-ingress-mode";

/// Annotation holding the base domain for domain-mode routing
pub const ANNOTATION_INGRESS_DOMAIN: &str = "octops.io/gameserver-ingress-domain";

/// Annotation holding the shared FQDN for path-mode routing
pub const ANNOTATION_INGRESS_FQDN: &str = "octops.io/gameserver-ingress-fqdn";

/// Annotation naming a pre-existing TLS secret, overriding the computed default
pub const ANNOTATION_SECRET_NAME: &str = "octops.io/secret-name";

/// Annotation requesting TLS termination at the ingress layer
pub const ANNOTATION_TERMINATE_TLS: &str = "octops.io/terminate-tls";

/// Annotation naming the certificate issuer used when TLS is terminated
pub const ANNOTATION_ISSUER_NAME: &str = "octops.io/issuer-tls-name";

/// Prefix marking annotations to be copied onto the Ingress, prefix stripped
pub const ANNOTATION_CUSTOM_PREFIX: &str = "octops-";

/// cert-manager annotation written on the Ingress when issuance is requested
pub const CERT_MANAGER_ANNOTATION_ISSUER: &str = "cert-manager.io/issuer";

/// Label applied to generated Ingresses, pointing back at the GameServer
pub const AGONES_GAMESERVER_NAME_LABEL: &str = "agones.dev/gameserver";

/// How external traffic is routed to a GameServer
///
/// Resolved once per reconciliation pass from the ingress-mode annotation and
/// immutable afterwards. Unrecognized values deliberately coerce to
/// [`Domain`](IngressRoutingMode::Domain) rather than failing: the fallback is
/// part of the contract and must hold for any future unrecognized literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IngressRoutingMode {
    /// Route by subdomain: `{gameserver}.{domain}`
    #[default]
    Domain,
    /// Route by URL path prefix under a shared FQDN
    Path,
}

impl From<&str> for IngressRoutingMode {
    fn from(value: &str) -> Self {
        match value {
            "path" => Self::Path,
            // "domain" and anything unrecognized resolve to the default
            _ => Self::Domain,
        }
    }
}

impl std::fmt::Display for IngressRoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain => write!(f, "domain"),
            Self::Path => write!(f, "path"),
        }
    }
}

/// Specification for an Agones GameServer
///
/// Only the fields the ingress pipeline reads are modeled; everything else the
/// real CRD carries is preserved by the driver, not by this crate.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "agones.dev",
    version = "v1",
    kind = "GameServer",
    plural = "gameservers",
    shortname = "gs",
    status = "GameServerStatus",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct GameServerSpec {
    /// Ports declared by the GameServer container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<GameServerPort>,
}

/// A port declared in the GameServer spec
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameServerPort {
    /// Port name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Port exposed by the container
    pub container_port: i32,
    /// Host port assigned by Agones, when already allocated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<i32>,
    /// Protocol (TCP/UDP)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// Status reported by Agones for a GameServer
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameServerStatus {
    /// Current lifecycle state
    #[serde(default)]
    pub state: GameServerState,
    /// Ports exposed to the outside world; the first entry is authoritative
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<GameServerStatusPort>,
}

/// An exposed port in the GameServer status
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameServerStatusPort {
    /// Port name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Externally reachable port number
    pub port: i32,
}

/// Agones GameServer lifecycle states
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum GameServerState {
    /// Being created
    #[default]
    Creating,
    /// Scheduled onto a node, not yet ready
    Scheduled,
    /// Container asked to be marked ready
    RequestReady,
    /// Ready to accept players
    Ready,
    /// Allocated to a game session
    Allocated,
    /// Failed health checks
    Unhealthy,
    /// Shutting down
    Shutdown,
}

impl GameServer {
    /// Name of the GameServer, empty when metadata carries none
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Look up an annotation by key
    ///
    /// Pure read: absence is `None`, never an error. Callers decide whether a
    /// missing key matters for the routing mode they resolved.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .map(String::as_str)
    }

    /// Resolve the routing mode from the ingress-mode annotation
    ///
    /// Absent and unrecognized values both resolve to
    /// [`IngressRoutingMode::Domain`].
    pub fn routing_mode(&self) -> IngressRoutingMode {
        self.annotation(ANNOTATION_INGRESS_MODE)
            .map(IngressRoutingMode::from)
            .unwrap_or_default()
    }

    /// First exposed status port, zero when none is declared
    pub fn port(&self) -> i32 {
        self.status
            .as_ref()
            .and_then(|status| status.ports.first())
            .map(|p| p.port)
            .unwrap_or_default()
    }

    /// First declared container port, zero when none is declared
    pub fn container_port(&self) -> i32 {
        self.spec
            .ports
            .first()
            .map(|p| p.container_port)
            .unwrap_or_default()
    }

    /// Whether the GameServer is in the Ready state
    pub fn is_ready(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|status| status.state == GameServerState::Ready)
    }

    /// Configured certificate issuer name, empty when the annotation is absent
    pub fn tls_cert_issuer(&self) -> &str {
        self.annotation(ANNOTATION_ISSUER_NAME).unwrap_or_default()
    }
}
