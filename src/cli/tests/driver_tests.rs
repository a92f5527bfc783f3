use clap::Parser;
use jsm_common::{DefectKind, diagnostic_codes};
use jsm_surface::{Mode, Stage};
use std::path::{Path, PathBuf};

use super::args::CliArgs;
use super::config::{ResolvedConfig, SetSource};
use super::driver::{build, resolve_effective_config, run, scan_set_roots};

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["jsm"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("args should parse")
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create test directory");
    }
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

const INCOMPLETE_JS_SET: &str = r#"/// <set id="tiny-js" version="0.1.0" mode="js" />
/// <reference set="base" />

interface Array<T> {
    push(...items: T[]): int;
}
"#;

#[test]
fn default_run_prints_the_js_surface() {
    let temp = tempfile::tempdir().expect("temp dir");

    let outcome = run(&args(&[]), temp.path()).expect("run should succeed");

    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.output.starts_with("// jsm global type surface\n// mode: js\n// sets: base@1.0.0, js@2.0.0\n"));
    assert!(outcome.output.contains("interface Array<T>"));
}

#[test]
fn output_is_deterministic() {
    let temp = tempfile::tempdir().expect("temp dir");
    let first = run(&args(&["--mode", "host-native"]), temp.path()).expect("first run");
    let second = run(&args(&["--mode", "host-native"]), temp.path()).expect("second run");
    assert_eq!(first.output, second.output);
}

#[test]
fn host_native_surface_lacks_allocating_members() {
    let config = ResolvedConfig { mode: Mode::HostNative, ..ResolvedConfig::default() };

    let result = build(&config).expect("build should run");

    assert_eq!(result.stage, Stage::Published);
    assert_eq!(result.installed, vec!["base".to_string(), "host-native".to_string()]);
    let surface = result.surface.expect("surface published");
    assert!(surface.resolve_member("Array.push").is_some());
    assert!(surface.resolve_member("Array.map").is_none());
    assert!(surface.resolve_member("Array.slice").is_none());
}

#[test]
fn emits_json() {
    let temp = tempfile::tempdir().expect("temp dir");

    let outcome = run(&args(&["--emit", "json", "--pretty"]), temp.path()).expect("run should succeed");

    let value: serde_json::Value = serde_json::from_str(&outcome.output).expect("valid JSON");
    assert_eq!(value["mode"], "js");
    assert_eq!(value["sets"][1]["id"], "js");
}

#[test]
fn writes_output_file() {
    let temp = tempfile::tempdir().expect("temp dir");

    let outcome = run(&args(&["--out", "out/surface.d.ts"]), temp.path()).expect("run should succeed");

    let path = temp.path().join("out/surface.d.ts");
    assert_eq!(outcome.written.as_deref(), Some(path.as_path()));
    assert!(outcome.output.is_empty());
    let written = std::fs::read_to_string(&path).expect("output file");
    assert!(written.starts_with("// jsm global type surface\n"));
}

#[test]
fn config_exclusions_reject_declared_globals() {
    let temp = tempfile::tempdir().expect("temp dir");
    write_file(
        temp.path(),
        "jsmconfig.json",
        r#"{
          // parseFloat is declared by host-native itself
          "mode": "host-native",
          "additionalExclusions": ["parseFloat"],
        }"#,
    );

    let outcome = run(&args(&[]), temp.path()).expect("run should finish");

    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.output.is_empty());
    assert!(
        outcome
            .diagnostics
            .iter()
            .any(|d| d.code == diagnostic_codes::CAPABILITY_VIOLATION && d.message_text.contains("'parseFloat'")),
        "{:?}",
        outcome.diagnostics
    );
}

#[test]
fn command_line_overrides_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    write_file(
        temp.path(),
        "jsmconfig.json",
        r#"{ "mode": "host-native", "additionalExclusions": ["eval"], "indexAudit": true }"#,
    );

    let config = resolve_effective_config(
        &args(&["--mode", "js", "--exclude", "eval,Proxy", "--no-index-audit", "--sets", "base,js"]),
        temp.path(),
    )
    .expect("config should resolve");

    assert_eq!(config.mode, Mode::Js);
    assert_eq!(config.extra_exclusions, vec!["eval".to_string(), "Proxy".to_string()]);
    assert!(!config.index_audit);
    assert_eq!(config.sets, vec![SetSource::Id("base".to_string()), SetSource::Id("js".to_string())]);
}

#[test]
fn unknown_mode_is_an_error() {
    let temp = tempfile::tempdir().expect("temp dir");
    let err = run(&args(&["--mode", "wasm"]), temp.path()).expect_err("unknown mode");
    assert!(err.to_string().contains("Unknown mode 'wasm'"));
}

#[test]
fn unknown_set_is_a_configuration_defect() {
    let temp = tempfile::tempdir().expect("temp dir");

    let outcome = run(&args(&["--sets", "base,nope"]), temp.path()).expect("run should finish");

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].code, diagnostic_codes::UNKNOWN_DECLARATION_SET);
    assert_eq!(outcome.diagnostics[0].message_text, "Unknown declaration set 'nope'.");
}

#[test]
fn two_mode_sets_are_ambiguous() {
    let temp = tempfile::tempdir().expect("temp dir");

    let outcome = run(&args(&["--sets", "js,host-native"]), temp.path()).expect("run should finish");

    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.diagnostics.iter().any(|d| d.kind() == DefectKind::AmbiguousMode));
}

#[test]
fn second_file_claiming_an_installed_id_is_rejected() {
    let temp = tempfile::tempdir().expect("temp dir");
    let shadow = write_file(
        temp.path(),
        "shadow.d.ts",
        "/// <set id=\"host-native\" version=\"0.1.0\" mode=\"host-native\" />\n\
         declare function fetch(url: string): void;\n",
    );
    let shadow_name = shadow.to_string_lossy().into_owned();
    let config = ResolvedConfig {
        mode: Mode::HostNative,
        sets: vec![SetSource::Id("host-native".to_string()), SetSource::File(shadow)],
        ..ResolvedConfig::default()
    };

    let result = build(&config).expect("build should run");

    assert_eq!(result.stage, Stage::Unconfigured);
    assert!(result.surface.is_none());
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.code, diagnostic_codes::DUPLICATE_SET_ID);
    assert_eq!(diagnostic.kind(), DefectKind::Configuration);
    assert_eq!(
        diagnostic.message_text,
        format!("Declaration set 'host-native' is provided by both 'host-native.d.ts' and '{shadow_name}'.")
    );
}

#[test]
fn same_file_listed_twice_installs_once() {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = write_file(temp.path(), "decls/tiny-js.d.ts", INCOMPLETE_JS_SET);
    let config = ResolvedConfig {
        sets: vec![SetSource::File(path.clone()), SetSource::File(path)],
        ..ResolvedConfig::default()
    };

    let result = build(&config).expect("build should run");

    assert_eq!(result.installed, vec!["base".to_string(), "tiny-js".to_string()]);
    assert!(result.diagnostics.iter().all(|d| d.code != diagnostic_codes::DUPLICATE_SET_ID));
}

#[test]
fn custom_set_file_pulls_in_its_references() {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = write_file(temp.path(), "decls/tiny-js.d.ts", INCOMPLETE_JS_SET);
    let config = ResolvedConfig { sets: vec![SetSource::File(path)], ..ResolvedConfig::default() };

    let result = build(&config).expect("build should run");

    assert_eq!(result.installed, vec!["base".to_string(), "tiny-js".to_string()]);
    assert_eq!(result.stage, Stage::Merged);
    assert!(result.surface.is_none());
    assert!(result.diagnostics.iter().all(|d| d.kind() == DefectKind::IncompleteMode));
    let missing_map = "Mode 'js' requires member 'map' on 'Array', but the merged surface does not declare it.";
    assert!(result.diagnostics.iter().any(|d| d.message_text == missing_map), "{:?}", result.diagnostics);
}

#[test]
fn syntax_errors_keep_the_surface_unconfigured() {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = write_file(
        temp.path(),
        "broken.d.ts",
        "/// <set id=\"broken\" version=\"0.1.0\" mode=\"js\" />\ninterface Array<T> {\n    length: ;\n}\n",
    );
    let file_name = path.to_string_lossy().into_owned();
    let config = ResolvedConfig { sets: vec![SetSource::File(path)], ..ResolvedConfig::default() };

    let result = build(&config).expect("build should run");

    assert_eq!(result.stage, Stage::Unconfigured);
    assert!(!result.diagnostics.is_empty());
    assert!(result.diagnostics.iter().all(|d| d.kind() == DefectKind::Syntax && d.file == file_name));
    assert!(result.sources.iter().any(|(file, _)| *file == file_name));
}

#[test]
fn set_roots_shadow_embedded_sets() {
    let temp = tempfile::tempdir().expect("temp dir");
    let embedded = jsm_libs::get_set("js").expect("embedded js set");
    let patched = embedded.content.replacen("version=\"2.0.0\"", "version=\"9.9.9\"", 1);
    write_file(temp.path(), "decls/js.d.ts", &patched);
    write_file(temp.path(), "decls/notes.txt", "not a declaration set");

    let roots = scan_set_roots(&[temp.path().join("decls")]).expect("scan");
    assert_eq!(roots.keys().collect::<Vec<_>>(), vec!["js"]);

    let outcome = run(&args(&["--set-root", "decls"]), temp.path()).expect("run should succeed");
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    assert!(outcome.output.contains("// sets: base@1.0.0, js@9.9.9\n"));
}

#[test]
fn missing_set_root_is_an_error() {
    let temp = tempfile::tempdir().expect("temp dir");
    assert!(run(&args(&["--set-root", "nowhere"]), temp.path()).is_err());
}

#[test]
fn show_config_prints_resolved_settings() {
    let temp = tempfile::tempdir().expect("temp dir");
    write_file(temp.path(), "jsmconfig.json", r#"{ "mode": "host-native", "indexAudit": "false" }"#);

    let outcome = run(&args(&["--show-config"]), temp.path()).expect("run should succeed");

    let value: serde_json::Value = serde_json::from_str(&outcome.output).expect("valid JSON");
    assert_eq!(value["mode"], "host-native");
    assert_eq!(value["indexAudit"], false);
}

#[test]
fn list_sets_names_every_embedded_set() {
    let temp = tempfile::tempdir().expect("temp dir");

    let outcome = run(&args(&["--list-sets"]), temp.path()).expect("run should succeed");

    for id in ["base", "js", "js.legacy", "host-native"] {
        assert!(outcome.output.lines().any(|line| line.starts_with(id)), "missing {id}");
    }
    assert!(outcome.output.contains("deprecated"));
}

#[test]
fn profile_lists_exclusions() {
    let temp = tempfile::tempdir().expect("temp dir");

    let outcome = run(&args(&["--profile", "--mode", "host-native", "--exclude", "eval"]), temp.path())
        .expect("run should succeed");

    assert!(outcome.output.starts_with("mode: host-native\n"));
    assert!(outcome.output.contains("\n  window\n"));
    assert!(outcome.output.ends_with("  eval\n"));
}
