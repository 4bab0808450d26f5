//! Parser for analyzer violation descriptions.
//!
//! The analyzer encodes the metrics of one class or method in the violation
//! description:
//!
//! ```text
//! ClassOrInterfaceDeclaration::LOC=120,WMC=14,TCC=0.5,
//! MethodDeclaration::void (int,String)::CYCLO=3,NPATH=4,
//! ```
//!
//! `tokenize_description` splits that string without looking at the catalog;
//! `parse_violation` combines it with the record's location and the
//! producer's catalog into a measurement.

use super::schema::RawViolation;
use crate::model::{ClassMeasurement, Metric, MetricCatalog, MethodMeasurement, MetricsMeasurement};
use crate::utils::config::CLASS_NODE_KINDS;
use crate::utils::error::ParseError;
use log::{debug, warn};

const SEGMENT_SEPARATOR: &str = "::";

/// Tokens of one violation description
#[derive(Debug, Clone, PartialEq)]
pub struct Description<'a> {
    pub node_kind: &'a str,
    pub signature: Option<&'a str>,
    pub pairs: Vec<(&'a str, f64)>,
}

impl Description<'_> {
    /// Whether the node kind denotes a type declaration
    pub fn is_class_level(&self) -> bool {
        CLASS_NODE_KINDS.contains(&self.node_kind)
    }
}

/// Split a description into node kind, optional signature and metric pairs
///
/// # Errors
/// * `ParseError::MissingSeparator` - no `::` after the node kind
/// * `ParseError::MalformedPair` - a pair without `=` or without an id
/// * `ParseError::InvalidNumber` - a value that is not a number
pub fn tokenize_description(description: &str) -> Result<Description<'_>, ParseError> {
    let (node_kind, rest) = description
        .split_once(SEGMENT_SEPARATOR)
        .ok_or_else(|| ParseError::MissingSeparator(description.to_string()))?;

    let (signature, metrics) = match rest.rsplit_once(SEGMENT_SEPARATOR) {
        Some((signature, metrics)) => (Some(signature.trim()), metrics),
        None => (None, rest),
    };

    let pairs = metrics
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_pair)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Description {
        node_kind: node_kind.trim(),
        signature,
        pairs,
    })
}

fn parse_pair(token: &str) -> Result<(&str, f64), ParseError> {
    let (id, value) = token
        .split_once('=')
        .ok_or_else(|| ParseError::MalformedPair(token.to_string()))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(ParseError::MalformedPair(token.to_string()));
    }

    let value = value.trim();
    let number = value.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        metric: id.to_string(),
        value: value.to_string(),
    })?;

    Ok((id, number))
}

/// Parse one analyzer violation into a class or method measurement
///
/// Metric ids missing from `catalog` are logged and dropped.
pub fn parse_violation(
    violation: &RawViolation,
    catalog: &MetricCatalog,
) -> Result<MetricsMeasurement, ParseError> {
    let description = tokenize_description(&violation.description)?;

    let mut measurement: MetricsMeasurement = if description.is_class_level() {
        ClassMeasurement::new(
            &violation.filename,
            &violation.package_name,
            &violation.class_name,
        )
        .into()
    } else {
        MethodMeasurement::new(
            &violation.filename,
            &violation.package_name,
            &violation.class_name,
            method_name(violation, description.signature),
        )
        .with_span(
            violation.begin_line,
            violation.begin_column,
            violation.end_line,
            violation.end_column,
        )
        .into()
    };

    for (id, value) in description.pairs {
        match catalog.get(id) {
            Some(definition) => measurement.add_metric(Metric::from_raw(definition.clone(), value)),
            None => warn!(
                "Unknown metric {} in {}, ignoring",
                id,
                measurement.qualified_class_name()
            ),
        }
    }

    debug!(
        "Parsed {} measurement for {}",
        description.node_kind,
        measurement.qualified_class_name()
    );

    Ok(measurement)
}

/// Method display name: the signature with the name inserted before `(`
fn method_name(violation: &RawViolation, signature: Option<&str>) -> String {
    let name = violation.method_name.as_deref().unwrap_or_default();
    match signature {
        Some(signature) if signature.contains('(') => {
            signature.replacen('(', &format!("{}(", name), 1)
        }
        Some(signature) if !signature.is_empty() => signature.to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MetricDefinition, MetricKind, MetricValue, Scope};
    use std::sync::Arc;

    fn catalog() -> MetricCatalog {
        [
            ("LOC", MetricKind::Integer),
            ("CYCLO", MetricKind::Integer),
            ("TCC", MetricKind::Double),
        ]
        .into_iter()
        .map(|(id, kind)| {
            Arc::new(MetricDefinition::new(
                id,
                id,
                "",
                "test",
                10,
                &[Scope::Class, Scope::Method],
                kind,
            ))
        })
        .collect()
    }

    fn violation(description: &str, method: Option<&str>) -> RawViolation {
        RawViolation {
            filename: "src/com/example/Foo.java".to_string(),
            package_name: "com.example".to_string(),
            class_name: "Foo".to_string(),
            method_name: method.map(String::from),
            begin_line: 10,
            begin_column: 5,
            end_line: 20,
            end_column: 6,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_tokenize_class_description() {
        let description = tokenize_description("ClassOrInterfaceDeclaration::LOC=120,TCC=0.5,").unwrap();

        assert_eq!(description.node_kind, "ClassOrInterfaceDeclaration");
        assert!(description.signature.is_none());
        assert!(description.is_class_level());
        assert_eq!(description.pairs, vec![("LOC", 120.0), ("TCC", 0.5)]);
    }

    #[test]
    fn test_tokenize_method_description_with_signature() {
        let description = tokenize_description("MethodDeclaration::void (int,String)::CYCLO=3,").unwrap();

        assert_eq!(description.node_kind, "MethodDeclaration");
        assert_eq!(description.signature, Some("void (int,String)"));
        assert!(!description.is_class_level());
        assert_eq!(description.pairs, vec![("CYCLO", 3.0)]);
    }

    #[test]
    fn test_tokenize_missing_separator() {
        let result = tokenize_description("LOC=10,");
        assert!(matches!(result, Err(ParseError::MissingSeparator(_))));
    }

    #[test]
    fn test_tokenize_malformed_pair() {
        let result = tokenize_description("ClassOrInterfaceDeclaration::LOC,");
        assert_eq!(result, Err(ParseError::MalformedPair("LOC".to_string())));

        let result = tokenize_description("ClassOrInterfaceDeclaration::=4,");
        assert!(matches!(result, Err(ParseError::MalformedPair(_))));
    }

    #[test]
    fn test_tokenize_invalid_number() {
        let result = tokenize_description("ClassOrInterfaceDeclaration::LOC=ten,");
        assert_eq!(
            result,
            Err(ParseError::InvalidNumber {
                metric: "LOC".to_string(),
                value: "ten".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_class_violation() {
        let measurement = parse_violation(
            &violation("ClassOrInterfaceDeclaration::LOC=120,TCC=0.5714,", None),
            &catalog(),
        )
        .unwrap();

        assert!(measurement.is_class());
        assert_eq!(measurement.qualified_class_name(), "com.example.Foo");
        assert_eq!(measurement.metric("LOC").unwrap().value(), MetricValue::Integer(120));
        assert_eq!(measurement.metric("TCC").unwrap().render_value(), "0.57");
    }

    #[test]
    fn test_parse_method_violation() {
        let measurement = parse_violation(
            &violation("MethodDeclaration::void (int)::CYCLO=3,LOC=12,", Some("run")),
            &catalog(),
        )
        .unwrap();

        match measurement {
            MetricsMeasurement::Method(method) => {
                assert_eq!(method.method_name, "void run(int)");
                assert_eq!(method.begin_line, 10);
                assert_eq!(method.end_column, 6);
                assert_eq!(method.base.metric_value("CYCLO"), Some(3.0));
            }
            other => panic!("expected method measurement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_method_without_signature_uses_record_name() {
        let measurement =
            parse_violation(&violation("ConstructorDeclaration::LOC=4,", Some("Foo")), &catalog()).unwrap();

        match measurement {
            MetricsMeasurement::Method(method) => assert_eq!(method.method_name, "Foo"),
            other => panic!("expected method measurement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_drops_unknown_metrics() {
        let measurement = parse_violation(
            &violation("ClassOrInterfaceDeclaration::LOC=10,FOO=3,", None),
            &catalog(),
        )
        .unwrap();

        assert_eq!(measurement.metric_value("LOC"), Some(10.0));
        assert!(measurement.metric("FOO").is_none());
    }
}
