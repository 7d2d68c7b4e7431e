//! Transformation steps that derive an Ingress from a GameServer
//!
//! Each step reads only the immutable GameServer and mutates the target
//! Ingress; no step depends on another step's output. Failures are returned
//! immediately and surface verbatim to the driver, which owns retries.

use std::collections::BTreeMap;

use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use tracing::debug;

use crate::gameserver::{
    GameServer, IngressRoutingMode, AGONES_GAMESERVER_NAME_LABEL, ANNOTATION_CUSTOM_PREFIX,
    ANNOTATION_INGRESS_DOMAIN, ANNOTATION_INGRESS_FQDN, ANNOTATION_ISSUER_NAME,
    ANNOTATION_SECRET_NAME, ANNOTATION_TERMINATE_TLS, CERT_MANAGER_ANNOTATION_ISSUER,
};
use crate::{Error, Result};

/// A single ingress transformation step
///
/// Stateless beyond the configuration it closes over (routing mode, issuer
/// name). Created at pipeline-assembly time, applied exactly once per
/// reconciliation pass, then discarded.
pub type IngressOption = Box<dyn Fn(&GameServer, &mut Ingress) -> Result<()> + Send + Sync>;

/// Path type applied to every generated rule
const DEFAULT_PATH_TYPE: &str = "Prefix";

/// Copy `octops-` prefixed annotations onto the Ingress, prefix stripped
///
/// `octops-color: blue` on the GameServer becomes `color: blue` on the
/// Ingress. A prefixed key with nothing after the prefix is a validation
/// error; annotations already copied before the failing key stay applied.
pub fn with_custom_annotations() -> IngressOption {
    Box::new(|gs, ingress| {
        let Some(source) = gs.metadata.annotations.as_ref() else {
            return Ok(());
        };

        let annotations = ingress.metadata.annotations.get_or_insert_with(Default::default);
        for (key, value) in source {
            if let Some(custom) = key.strip_prefix(ANNOTATION_CUSTOM_PREFIX) {
                if custom.is_empty() {
                    return Err(Error::validation(
                        "custom annotation does not contain a suffix",
                    ));
                }
                annotations.insert(custom.to_string(), value.clone());
            }
        }

        Ok(())
    })
}

/// Set the single TLS block for the resolved routing mode
///
/// The default secret name is `{gameserver}-tls`; a `secret-name` annotation
/// overrides it verbatim. Any TLS entries already on the Ingress are replaced.
pub fn with_tls(mode: IngressRoutingMode) -> IngressOption {
    Box::new(move |gs, ingress| {
        let host = match mode {
            IngressRoutingMode::Path => gs
                .annotation(ANNOTATION_INGRESS_FQDN)
                .ok_or_else(|| {
                    Error::missing_tls_annotation(mode, ANNOTATION_INGRESS_FQDN, gs.name())
                })?
                .to_string(),
            IngressRoutingMode::Domain => {
                let domain = gs.annotation(ANNOTATION_INGRESS_DOMAIN).ok_or_else(|| {
                    Error::missing_tls_annotation(mode, ANNOTATION_INGRESS_DOMAIN, gs.name())
                })?;
                format!("{}.{}", gs.name(), domain)
            }
        };

        let secret = match gs.annotation(ANNOTATION_SECRET_NAME) {
            Some(specific) => specific.to_string(),
            None => format!("{}-tls", gs.name()),
        };

        ingress.spec.get_or_insert_with(IngressSpec::default).tls = Some(vec![IngressTLS {
            hosts: Some(vec![host]),
            secret_name: Some(secret),
        }]);

        Ok(())
    })
}

/// Set the single routing rule for the resolved routing mode
///
/// Path mode routes `{fqdn}/{gameserver}`; domain mode routes
/// `{gameserver}.{domain}/`. The backend is always the GameServer's own
/// service name and its first exposed port (zero when none is declared).
/// Any rules already on the Ingress are replaced.
pub fn with_ingress_rule(mode: IngressRoutingMode) -> IngressOption {
    Box::new(move |gs, ingress| {
        let (host, path) = match mode {
            IngressRoutingMode::Path => {
                let fqdn = gs.annotation(ANNOTATION_INGRESS_FQDN).ok_or_else(|| {
                    Error::missing_annotation(mode, ANNOTATION_INGRESS_FQDN, gs.name())
                })?;
                (fqdn.to_string(), format!("/{}", gs.name()))
            }
            IngressRoutingMode::Domain => {
                let domain = gs.annotation(ANNOTATION_INGRESS_DOMAIN).ok_or_else(|| {
                    Error::missing_annotation(mode, ANNOTATION_INGRESS_DOMAIN, gs.name())
                })?;
                (format!("{}.{}", gs.name(), domain), "/".to_string())
            }
        };

        ingress.spec.get_or_insert_with(IngressSpec::default).rules =
            Some(vec![new_ingress_rule(&host, &path, gs.name(), gs.port())]);

        Ok(())
    })
}

/// Request certificate issuance when the GameServer terminates TLS
///
/// The conditions form a ladder checked in this exact order; later checks are
/// only reachable when earlier ones pass:
/// 1. terminate-tls absent or empty: no-op.
/// 2. terminate-tls not a boolean: validation error.
/// 3. terminate-tls false: no-op.
/// 4. secret-name present: no-op, the certificate is externally managed.
/// 5. configured issuer name empty: configuration error.
/// 6. Otherwise the cert-manager issuer annotation is set on the Ingress.
pub fn with_tls_cert_issuer(issuer_name: impl Into<String>) -> IngressOption {
    let issuer_name = issuer_name.into();
    Box::new(move |gs, ingress| {
        let terminate = match gs.annotation(ANNOTATION_TERMINATE_TLS) {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(()),
        };

        let Some(terminate) = parse_bool_annotation(terminate) else {
            return Err(Error::validation(format!(
                "annotation {} for {} must be \"true\" or \"false\"",
                ANNOTATION_TERMINATE_TLS,
                gs.name()
            )));
        };
        if !terminate {
            return Ok(());
        }

        if gs.annotation(ANNOTATION_SECRET_NAME).is_some() {
            return Ok(());
        }

        if issuer_name.is_empty() {
            return Err(Error::configuration(format!(
                "annotation {} for {} must be present, check your Fleet or GameServer manifest",
                ANNOTATION_ISSUER_NAME,
                gs.name()
            )));
        }

        ingress
            .metadata
            .annotations
            .get_or_insert_with(Default::default)
            .insert(CERT_MANAGER_ANNOTATION_ISSUER.to_string(), issuer_name.clone());

        Ok(())
    })
}

// Boolean annotation literals: 1/t/T/TRUE/true/True and the false counterparts.
fn parse_bool_annotation(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Apply each step in order, returning the first failure immediately
///
/// No aggregation and no rollback: when a step fails, mutations made by
/// earlier steps stay on the Ingress and the error surfaces verbatim.
pub fn apply_options(
    gs: &GameServer,
    ingress: &mut Ingress,
    options: &[IngressOption],
) -> Result<()> {
    for option in options {
        option(gs, ingress)?;
    }

    Ok(())
}

/// Build the Ingress for a GameServer using the default step sequence
///
/// Resolves the routing mode once, stamps the Ingress metadata (name and
/// namespace mirroring the GameServer, the `agones.dev/gameserver` label, an
/// owner reference when the GameServer UID is known) and applies custom
/// annotations, issuer annotation, TLS block and routing rule in that order.
/// Pure in-memory assembly; persisting the result belongs to the driver.
pub fn new_ingress(gs: &GameServer, issuer_name: &str) -> Result<Ingress> {
    let mode = gs.routing_mode();
    debug!(gameserver = %gs.name(), %mode, "assembling ingress");

    let options = [
        with_custom_annotations(),
        with_tls_cert_issuer(issuer_name),
        with_tls(mode),
        with_ingress_rule(mode),
    ];

    let mut ingress = Ingress {
        metadata: new_ingress_meta(gs),
        ..Default::default()
    };
    apply_options(gs, &mut ingress, &options)?;

    Ok(ingress)
}

fn new_ingress_meta(gs: &GameServer) -> ObjectMeta {
    let mut labels = BTreeMap::new();
    labels.insert(
        AGONES_GAMESERVER_NAME_LABEL.to_string(),
        gs.name().to_string(),
    );

    ObjectMeta {
        name: gs.metadata.name.clone(),
        namespace: gs.metadata.namespace.clone(),
        labels: Some(labels),
        owner_references: gs.metadata.uid.as_ref().map(|uid| {
            vec![OwnerReference {
                api_version: "agones.dev/v1".to_string(),
                kind: "GameServer".to_string(),
                name: gs.name().to_string(),
                uid: uid.clone(),
                controller: Some(true),
                block_owner_deletion: Some(true),
            }]
        }),
        ..Default::default()
    }
}

fn new_ingress_rule(host: &str, path: &str, service: &str, port: i32) -> IngressRule {
    IngressRule {
        host: Some(host.to_string()),
        http: Some(HTTPIngressRuleValue {
            paths: vec![HTTPIngressPath {
                path: Some(path.to_string()),
                path_type: DEFAULT_PATH_TYPE.to_string(),
                backend: IngressBackend {
                    service: Some(IngressServiceBackend {
                        name: service.to_string(),
                        port: Some(ServiceBackendPort {
                            name: None,
                            number: Some(port),
                        }),
                    }),
                    resource: None,
                },
            }],
        }),
    }
}
