//! Ingress reconciliation building blocks
//!
//! This module contains the transformation steps applied to an Ingress during
//! a reconciliation pass. Each step is an [`IngressOption`]: a pure function
//! of the source GameServer that mutates the target Ingress in place. The
//! driver assembles the steps (or calls [`new_ingress`] for the default
//! sequence), applies them once, and persists the result.

mod options;

pub use options::{
    apply_options, new_ingress, with_custom_annotations, with_ingress_rule, with_tls,
    with_tls_cert_issuer, IngressOption,
};
