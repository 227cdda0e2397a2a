/// Unit tests for DiError and DiResult types

use anno_di::{DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound("mailer".to_string());
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Service \"mailer\" not found");
    assert!(error.source().is_none());
}

#[test]
fn test_error_display_unresolvable_with_source() {
    let error = DiError::Unresolvable {
        position: 1,
        dependency: "Wheels".to_string(),
        service: "Engine".to_string(),
        source: Box::new(DiError::NotFound("Wheels".to_string())),
    };
    assert_eq!(
        error.to_string(),
        "Unresolvable dependency resolving argument #1 [Wheels] while resolving Engine"
    );

    let source = error.source().expect("wrapped error is exposed as source");
    assert_eq!(source.to_string(), "Service \"Wheels\" not found");
}

#[test]
fn test_error_display_invalid_definition() {
    let error = DiError::InvalidDefinition("string (engine)".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid service definition: Class or Object required, string (engine) given."
    );
}

#[test]
fn test_error_display_invalid_alias() {
    let error = DiError::InvalidAlias("Alias \"smtp\" already defined.".to_string());
    assert_eq!(error.to_string(), "Invalid service alias. Alias \"smtp\" already defined.");
}

#[test]
fn test_error_display_circular() {
    let path = vec!["ServiceA".to_string(), "ServiceB".to_string(), "ServiceA".to_string()];
    let error = DiError::Circular(path);
    assert_eq!(error.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_depth_exceeded() {
    assert_eq!(DiError::DepthExceeded(1024).to_string(), "Max depth 1024 exceeded");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch {
        expected: "alloc::string::String",
        context: "argument #2 of Engine".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Type mismatch for argument #2 of Engine: expected alloc::string::String"
    );
}

#[test]
fn test_error_display_annotation_target() {
    let error = DiError::AnnotationTarget {
        annotation: "Inject".to_string(),
        required: "Class".to_string(),
        given: "Method".to_string(),
    };
    assert_eq!(error.to_string(), "Inject: Class target required but Method given.");
}

#[test]
fn test_construction_helper() {
    let error = DiError::construction("Pool", std::io::Error::new(std::io::ErrorKind::Other, "refused"));
    assert_eq!(error.to_string(), "Failed to construct Pool: refused");
}

#[test]
fn test_error_is_cloneable() {
    let error = DiError::Config("bad".to_string());
    let copy = error.clone();
    assert_eq!(error.to_string(), copy.to_string());
    assert_eq!(copy.to_string(), "Configuration error: bad");
}

#[test]
fn test_di_result_propagates() {
    fn inner() -> DiResult<u8> {
        Err(DiError::NotFound("x".to_string()))
    }

    fn outer() -> DiResult<u8> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(matches!(outer(), Err(DiError::NotFound(_))));
}
