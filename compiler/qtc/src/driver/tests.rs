#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

const HELLO: &str = "{% func Hello(name string) %}Hello, {%s name %}!{% endfunc %}\n";

fn write(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn output_path_appends_go() {
    assert_eq!(
        output_path(Path::new("views/page.qtpl")),
        PathBuf::from("views/page.qtpl.go")
    );
}

#[test]
fn package_from_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write(tmp.path(), "views/a.qtpl", "");
    assert_eq!(package_name(&path).unwrap(), "views");
}

#[test]
fn package_must_be_identifier() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write(tmp.path(), "my-views/a.qtpl", "");
    let err = package_name(&path).unwrap_err();
    assert!(err.to_string().contains("not a valid Go package name"), "{err}");
}

#[test]
fn finds_templates_recursively() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("views");
    write(&root, "b.qtpl", "");
    write(&root, "a.qtpl", "");
    write(&root, "nested/c.qtpl", "");
    write(&root, "notes.txt", "");
    write(&root, ".hidden/d.qtpl", "");
    write(&root, "a.qtpl.go", "");

    let found = find_templates(&root, "qtpl").unwrap();
    assert_eq!(
        found,
        vec![
            root.join("a.qtpl"),
            root.join("b.qtpl"),
            root.join("nested/c.qtpl"),
        ]
    );
}

#[test]
fn missing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let err = find_templates(&tmp.path().join("nope"), "qtpl").unwrap_err();
    assert!(matches!(err, DriverError::Read { .. }));
}

#[test]
fn compiles_next_to_template() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write(tmp.path(), "views/hello.qtpl", HELLO);
    let out = compile_file(&path, false).unwrap();
    assert_eq!(out, path.with_file_name("hello.qtpl.go"));

    let code = fs::read_to_string(out).unwrap();
    assert!(code.contains("\npackage views\n"));
    assert!(code.contains("func Hello(name string) string {"));
    assert!(!code.contains("//line"));
}

#[test]
fn failed_compile_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write(tmp.path(), "views/bad.qtpl", "{% func F() %}{% break %}{% endfunc %}");
    let err = compile_file(&path, true).unwrap_err();
    assert!(matches!(err, DriverError::Compile { .. }));
    assert!(err.to_string().contains("found break tag outside for loop"), "{err}");
    assert!(!output_path(&path).exists());
}

#[test]
fn run_collects_every_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("views");
    write(&root, "a.qtpl", HELLO);
    write(&root, "b.qtpl", "{% func B() %}");
    write(&root, "c.qtpl", "{% import \"fmt\" %}{% func C() %}{%s fmt.Sprint(1) %}{% endfunc %}");
    write(&root, "d.qtpl", "{% s x %}");

    let config = DriverConfig {
        dir: root.clone(),
        ..DriverConfig::default()
    };
    let summary = run(&config).unwrap();
    assert!(!summary.is_success());
    assert_eq!(
        summary.written,
        vec![root.join("a.qtpl.go"), root.join("c.qtpl.go")]
    );
    assert_eq!(summary.failures.len(), 2);
    assert!(!root.join("b.qtpl.go").exists());
}

#[test]
fn run_single_file() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("views");
    let a = write(&root, "a.qtpl", HELLO);
    write(&root, "b.qtpl", "{% func B() %}");

    let config = DriverConfig {
        file: Some(a.clone()),
        ..DriverConfig::default()
    };
    let summary = run(&config).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.written, vec![output_path(&a)]);
}
