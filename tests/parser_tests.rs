use metrics_aggregator::model::{MetricCatalog, MetricsMeasurement};
use metrics_aggregator::parser::{parse_violation, tokenize_description, RawViolation};
use metrics_aggregator::producers::analyzer_metrics;
use metrics_aggregator::utils::ParseError;
use pretty_assertions::assert_eq;

fn catalog() -> MetricCatalog {
    analyzer_metrics().into_iter().collect()
}

fn violation(method_name: Option<&str>, description: &str) -> RawViolation {
    RawViolation {
        filename: "src/org/acme/Service.java".to_string(),
        package_name: "org.acme".to_string(),
        class_name: "Service".to_string(),
        method_name: method_name.map(str::to_string),
        begin_line: 40,
        begin_column: 5,
        end_line: 58,
        end_column: 6,
        description: description.to_string(),
    }
}

#[test]
fn test_tokenize_class_description() {
    let description = tokenize_description("ClassOrInterfaceDeclaration::LOC=120,WMC=14,TCC=0.5,").unwrap();

    assert!(description.is_class_level());
    assert_eq!(description.signature, None);
    assert_eq!(description.pairs, vec![("LOC", 120.0), ("WMC", 14.0), ("TCC", 0.5)]);
}

#[test]
fn test_tokenize_signature_with_separator_inside() {
    let description =
        tokenize_description("MethodDeclaration::Map<String, List<Foo>> (java.util::Bar)::CYCLO=2,")
            .unwrap();

    assert!(!description.is_class_level());
    assert_eq!(description.signature, Some("Map<String, List<Foo>> (java.util::Bar)"));
    assert_eq!(description.pairs, vec![("CYCLO", 2.0)]);
}

#[test]
fn test_tokenize_errors() {
    assert!(matches!(
        tokenize_description("LOC=3"),
        Err(ParseError::MissingSeparator(_))
    ));
    assert!(matches!(
        tokenize_description("MethodDeclaration::LOC"),
        Err(ParseError::MalformedPair(_))
    ));
    assert_eq!(
        tokenize_description("MethodDeclaration::LOC=abc,"),
        Err(ParseError::InvalidNumber {
            metric: "LOC".to_string(),
            value: "abc".to_string()
        })
    );
}

#[test]
fn test_parse_method_violation() {
    let measurement = parse_violation(
        &violation(Some("handle"), "MethodDeclaration::void (Request)::CYCLO=7,NPATH=12,"),
        &catalog(),
    )
    .unwrap();

    match measurement {
        MetricsMeasurement::Method(method) => {
            assert_eq!(method.method_name, "void handle(Request)");
            assert_eq!(method.base.qualified_class_name(), "org.acme.Service");
            assert_eq!((method.begin_line, method.end_line), (40, 58));
            assert_eq!(method.base.metric_value("NPATH"), Some(12.0));
        }
        other => panic!("expected method measurement, got {:?}", other),
    }
}

#[test]
fn test_parse_class_violation_drops_unknown_metrics() {
    let measurement = parse_violation(
        &violation(None, "ClassOrInterfaceDeclaration::LOC=80,FOO=1,WOC=0.25,"),
        &catalog(),
    )
    .unwrap();

    assert!(measurement.is_class());
    assert_eq!(measurement.metric_value("LOC"), Some(80.0));
    assert_eq!(measurement.metric_value("WOC"), Some(0.25));
    assert_eq!(measurement.metric_value("FOO"), None);
}

#[test]
fn test_parse_integer_metric_truncates() {
    let measurement = parse_violation(
        &violation(None, "EnumDeclaration::LOC=12.9,"),
        &catalog(),
    )
    .unwrap();

    assert!(measurement.is_class());
    assert_eq!(measurement.metric_value("LOC"), Some(12.0));
}
