use metrics_aggregator::commands::{execute_aggregate, load_build_outputs, validate_args, AggregateArgs};
use metrics_aggregator::model::Scope;
use metrics_aggregator::output::read_report;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BUILD_OUTPUTS: &str = r#"[
  {
    "kind": "analyzer_report",
    "violations": [
      {
        "filename": "src/com/example/Foo.java",
        "package_name": "com.example",
        "class_name": "Foo",
        "description": "ClassOrInterfaceDeclaration::LOC=100,WMC=10,NCSS=60,"
      },
      {
        "filename": "src/com/example/Foo.java",
        "package_name": "com.example",
        "class_name": "Foo",
        "method_name": "run",
        "begin_line": 12,
        "end_line": 20,
        "description": "MethodDeclaration::void (int)::CYCLO=3,"
      },
      {
        "filename": "src/com/example/util/Bar.java",
        "package_name": "com.example.util",
        "class_name": "Bar",
        "description": "ClassOrInterfaceDeclaration::LOC=50,WMC=4,NCSS=20,"
      },
      {
        "filename": "src/com/example/util/Bar.java",
        "package_name": "com.example.util",
        "class_name": "Bar",
        "method_name": "Bar",
        "begin_line": 5,
        "description": "ConstructorDeclaration::(String)::CYCLO=1,"
      }
    ]
  },
  {
    "kind": "coverage_report",
    "root": {
      "name": "project",
      "element": "report",
      "ratios": {"class": {"covered": 1, "total": 2}},
      "children": [
        {
          "name": "com/example/Foo",
          "element": "class",
          "ratios": {"line": {"covered": 3, "total": 4}}
        }
      ]
    }
  }
]"#;

struct Workspace {
    dir: TempDir,
    input: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("build-outputs.json");
        fs::write(&input, BUILD_OUTPUTS).unwrap();
        Self { dir, input }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn args(&self) -> AggregateArgs {
        AggregateArgs {
            input: self.input.clone(),
            output: Some(self.path("out/metrics.json")),
            ..Default::default()
        }
    }
}

fn read_json(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_load_build_outputs() {
    let workspace = Workspace::new();
    let outputs = load_build_outputs(&workspace.input).unwrap();
    assert_eq!(outputs.len(), 2);
}

#[test]
fn test_load_build_outputs_rejects_unknown_kind() {
    let workspace = Workspace::new();
    let input = workspace.path("bad.json");
    fs::write(&input, r#"[{"kind": "lint_report"}]"#).unwrap();

    assert!(load_build_outputs(&input).is_err());
}

#[test]
fn test_aggregate_writes_report() {
    let workspace = Workspace::new();
    let args = workspace.args();
    validate_args(&args).unwrap();
    execute_aggregate(args).unwrap();

    let report = read_report(workspace.path("out/metrics.json")).unwrap();
    assert_eq!(report.version, "1.0.0");
    assert_eq!(report.scope, Scope::Class);
    assert_eq!(report.summary_lines[0], "2 Classes");
    assert_eq!(report.summary_lines[3], "Class Coverage: 1/2 Classes (50%)");
    assert_eq!(report.classes.len(), 2);

    let foo = &report.classes[0];
    assert_eq!(foo.qualified_name, "com.example.Foo");
    assert_eq!(foo.metrics_display["LINE_COVERAGE"], "75%");
    assert_eq!(foo.metrics_raw["LOC"], Some(100.0));
    assert_eq!(foo.metrics_raw["METHOD_COVERAGE"], None);
    assert_eq!(report.maxima["WMC"], 10.0);
}

#[test]
fn test_aggregate_writes_collapsed_tree() {
    let workspace = Workspace::new();
    let args = AggregateArgs {
        tree_output: Some(workspace.path("tree.json")),
        ..workspace.args()
    };
    execute_aggregate(args).unwrap();

    assert_eq!(
        read_json(&workspace.path("tree.json")),
        serde_json::json!({
            "name": "com.example",
            "value": 150.0,
            "children": [
                {"name": "Foo", "value": 100.0, "children": []},
                {"name": "util.Bar", "value": 50.0, "children": []}
            ]
        })
    );
}

#[test]
fn test_aggregate_tree_metric_override() {
    let workspace = Workspace::new();
    let args = AggregateArgs {
        tree_output: Some(workspace.path("tree.json")),
        tree_metric: Some("WMC".to_string()),
        ..workspace.args()
    };
    execute_aggregate(args).unwrap();

    assert_eq!(read_json(&workspace.path("tree.json"))["value"], 14.0);
}

#[test]
fn test_aggregate_writes_adaptive_histogram() {
    let workspace = Workspace::new();
    let args = AggregateArgs {
        histogram_output: Some(workspace.path("histogram.json")),
        ..workspace.args()
    };
    execute_aggregate(args).unwrap();

    assert_eq!(
        read_json(&workspace.path("histogram.json")),
        serde_json::json!({"data": [2], "labels": ["1.00 - 4.00"]})
    );
}

#[test]
fn test_aggregate_writes_fixed_histogram() {
    let workspace = Workspace::new();
    let args = AggregateArgs {
        histogram_output: Some(workspace.path("histogram.json")),
        bins: Some(2),
        ..workspace.args()
    };
    execute_aggregate(args).unwrap();

    assert_eq!(
        read_json(&workspace.path("histogram.json")),
        serde_json::json!({"data": [1, 1], "labels": ["1.00 - 2.00", "2.00 - 3.00"]})
    );
}

#[test]
fn test_aggregate_uses_config_file() {
    let workspace = Workspace::new();
    let config = workspace.path("metrics.toml");
    fs::write(
        &config,
        "[histogram]\nmetric = \"LOC\"\nrule = \"fixed\"\nbins = 5\n\n[table]\nscope = \"METHOD\"\n",
    )
    .unwrap();

    let args = AggregateArgs {
        config: Some(config),
        histogram_output: Some(workspace.path("histogram.json")),
        ..workspace.args()
    };
    execute_aggregate(args).unwrap();

    let histogram = read_json(&workspace.path("histogram.json"));
    assert_eq!(histogram["data"], serde_json::json!([1, 0, 0, 0, 1]));
    assert_eq!(histogram["labels"][0], "50.00 - 60.00");

    let report = read_report(workspace.path("out/metrics.json")).unwrap();
    assert_eq!(report.scope, Scope::Method);
    assert!(report.supported_metrics.iter().any(|d| d.id == "CYCLO"));
}

#[test]
fn test_aggregate_invalid_config() {
    let workspace = Workspace::new();
    let config = workspace.path("metrics.toml");
    fs::write(&config, "[histogram]\nrule = \"fixed\"\nbins = 0\n").unwrap();

    let args = AggregateArgs {
        config: Some(config),
        ..workspace.args()
    };
    assert!(execute_aggregate(args).is_err());
}

#[test]
fn test_aggregate_invalid_input() {
    let workspace = Workspace::new();
    fs::write(&workspace.input, "{ not json").unwrap();

    assert!(execute_aggregate(workspace.args()).is_err());
}

#[test]
fn test_aggregate_report_only() {
    let workspace = Workspace::new();
    execute_aggregate(workspace.args()).unwrap();

    let mut written: Vec<_> = fs::read_dir(workspace.dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    written.sort();
    assert_eq!(written, vec!["build-outputs.json", "out"]);
    assert!(workspace.path("out/metrics.json").exists());
}
