//! Error types for the ingress pipeline

use thiserror::Error;

use crate::gameserver::IngressRoutingMode;

/// Main error type for ingress pipeline operations
///
/// Every failure is data-dependent and resolved by correcting the source
/// GameServer's annotations; none is fatal to the surrounding process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A routing/TLS annotation required by the resolved routing mode is absent
    #[error("ingress routing mode {mode} requires the annotation {annotation} to be present on {gameserver}, check your Fleet or GameServer manifest")]
    MissingAnnotation {
        /// Routing mode that made the annotation mandatory
        mode: IngressRoutingMode,
        /// The annotation key that was expected
        annotation: String,
        /// Name of the GameServer missing the annotation
        gameserver: String,
    },

    /// A TLS annotation required by the resolved routing mode is absent
    ///
    /// Same contract as [`Error::MissingAnnotation`], rendered with the TLS
    /// builder's own wording so the two failures stay distinguishable.
    #[error("ingress routing mode {mode} requires the annotation {annotation} to be set on {gameserver}")]
    MissingTlsAnnotation {
        /// Routing mode that made the annotation mandatory
        mode: IngressRoutingMode,
        /// The annotation key that was expected
        annotation: String,
        /// Name of the GameServer missing the annotation
        gameserver: String,
    },

    /// A present annotation carries a malformed value
    #[error("validation error: {0}")]
    Validation(String),

    /// The pipeline was assembled without a value it needs
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create a missing-annotation error for the given mode, key and GameServer
    pub fn missing_annotation(
        mode: IngressRoutingMode,
        annotation: impl Into<String>,
        gameserver: impl Into<String>,
    ) -> Self {
        Self::MissingAnnotation {
            mode,
            annotation: annotation.into(),
            gameserver: gameserver.into(),
        }
    }

    /// Create a TLS missing-annotation error for the given mode, key and GameServer
    pub fn missing_tls_annotation(
        mode: IngressRoutingMode,
        annotation: impl Into<String>,
        gameserver: impl Into<String>,
    ) -> Self {
        Self::MissingTlsAnnotation {
            mode,
            annotation: annotation.into(),
            gameserver: gameserver.into(),
        }
    }

    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error with the given message
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
