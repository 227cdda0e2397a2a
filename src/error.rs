//! Error types for the dependency injection container.

use thiserror::Error;

/// Dependency injection errors
///
/// Represents the failure conditions of registration, aliasing, annotation
/// and resolution. Every error is returned synchronously to the direct caller
/// of the container operation; nothing is retried internally.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Container, DiError};
///
/// let container = Container::new();
/// match container.make("mailer") {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "mailer"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use anno_di::DiError;
///
/// let circular = DiError::Circular(vec!["A".into(), "B".into(), "A".into()]);
/// assert_eq!(circular.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// No resolver is registered and none can be auto-registered
    #[error("Service \"{0}\" not found")]
    NotFound(String),

    /// A declared dependency could not be resolved while constructing a service
    #[error("Unresolvable dependency resolving argument #{position} [{dependency}] while resolving {service}")]
    Unresolvable {
        /// 1-based position of the failing argument
        position: usize,
        /// Display form of the failing dependency identifier
        dependency: String,
        /// Name of the service under construction
        service: String,
        #[source]
        source: Box<DiError>,
    },

    /// The value given as a service definition is neither a type nor an instance
    #[error("Invalid service definition: Class or Object required, {0} given.")]
    InvalidDefinition(String),

    /// Alias collides with a service key, an alias, or closes an alias cycle
    #[error("Invalid service alias. {0}")]
    InvalidAlias(String),

    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),

    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// A resolved value did not have the requested type
    #[error("Type mismatch for {context}: expected {expected}")]
    TypeMismatch {
        expected: &'static str,
        context: String,
    },

    /// Annotation attached to a target it does not allow
    #[error("{annotation}: {required} target required but {given} given.")]
    AnnotationTarget {
        annotation: String,
        required: String,
        given: String,
    },

    /// A constructor reported a failure
    #[error("Failed to construct {service}: {message}")]
    Construction { service: String, message: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiError {
    /// Builds a [`DiError::Construction`] from any displayable cause.
    pub fn construction(service: impl Into<String>, message: impl std::fmt::Display) -> Self {
        DiError::Construction {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Errors of this class are wrapped in [`DiError::Unresolvable`] when they
    /// surface from a dependency. Everything else passes through unchanged.
    pub(crate) fn is_unresolvable_class(&self) -> bool {
        matches!(
            self,
            DiError::NotFound(_) | DiError::InvalidDefinition(_) | DiError::TypeMismatch { .. }
        )
    }
}

/// Result type for DI operations
///
/// ```rust
/// use anno_di::{DiResult, DiError};
///
/// fn lookup(found: bool) -> DiResult<&'static str> {
///     if found { Ok("service") } else { Err(DiError::NotFound("service".into())) }
/// }
///
/// assert!(lookup(true).is_ok());
/// assert!(lookup(false).is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
