use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn write(root: &Path, relative: &str, contents: &str) {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, contents).unwrap();
}

fn export_fixture(root: &Path) {
  write(
    root,
    "out/index.html",
    r#"<!DOCTYPE html>
<html>
<head>
  <title>Dashboard</title>
  <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
  <div id="root"></div>
  <script src="/static/js/main.js"></script>
</body>
</html>"#,
  );
  write(root, "out/static/css/main.css", "body{background:url(/img/bg.svg)}");
  write(root, "out/img/bg.svg", "<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
  write(root, "out/static/js/main.js", "document.title = 'ready';");
}

#[test]
fn bundle_then_validate() {
  let dir = tempfile::tempdir().unwrap();
  export_fixture(dir.path());

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--build-dir", "out", "--output", "dist/app.html"])
    .assert()
    .success()
    .stdout(predicate::str::contains("3 inlined"));

  let artifact = dir.path().join("dist/app.html");
  let html = fs::read_to_string(&artifact).unwrap();
  assert!(html.contains("url(\"data:image/svg+xml;base64,"));
  assert!(!html.contains("/static/js/main.js\""));

  cargo_bin_cmd!("standalone-validate")
    .arg(&artifact)
    .assert()
    .success()
    .stdout(predicate::str::contains("VALIDATION PASSED"));
}

#[test]
fn config_file_is_discovered_and_overridden_by_flags() {
  let dir = tempfile::tempdir().unwrap();
  export_fixture(dir.path());
  write(
    dir.path(),
    "standalone.config.json",
    r#"{ "buildDir": "out", "outputFile": "from-config.html", "htmlTemplate": { "bodyExtra": "<!-- configured -->" } }"#,
  );

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .arg("--quiet")
    .assert()
    .success();
  let html = fs::read_to_string(dir.path().join("from-config.html")).unwrap();
  assert!(html.contains("<!-- configured -->"));

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--output", "from-flag.html", "--quiet"])
    .assert()
    .success();
  assert!(dir.path().join("from-flag.html").exists());
}

#[test]
fn missing_entry_fails_without_output() {
  let dir = tempfile::tempdir().unwrap();
  write(dir.path(), "out/static/js/main.js", "main()");

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--build-dir", "out"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no entry document found"));

  assert!(!dir.path().join("standalone.html").exists());
}

#[test]
fn missing_build_dir_fails() {
  let dir = tempfile::tempdir().unwrap();

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("build directory not found"));
}

#[test]
fn validator_rejects_external_scripts() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    "standalone.html",
    r#"<!DOCTYPE html><html><head><style>body{}</style></head>
<body><div id="root"></div><script src="http://cdn.example.com/app.js"></script></body></html>"#,
  );

  cargo_bin_cmd!("standalone-validate")
    .current_dir(dir.path())
    .assert()
    .failure()
    .stdout(predicate::str::contains("External script"))
    .stdout(predicate::str::contains("VALIDATION FAILED"));
}

#[test]
fn max_size_is_given_in_megabytes() {
  let dir = tempfile::tempdir().unwrap();
  export_fixture(dir.path());
  write(
    dir.path(),
    "out/static/css/main.css",
    "body{background:url(/img/bg.svg)} .hero{background:url(/img/big.png)}",
  );
  let big = dir.path().join("out/img/big.png");
  fs::write(&big, vec![b'A'; 1_500_000]).unwrap();

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--build-dir", "out", "--output", "small.html", "--max-size", "1"])
    .assert()
    .success()
    .stdout(predicate::str::contains("3 inlined, 1 skipped"));
  let html = fs::read_to_string(dir.path().join("small.html")).unwrap();
  assert!(html.contains("url(/img/big.png)"));
  assert!(!html.contains("data:image/png;base64,"));

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--build-dir", "out", "--output", "large.html", "--max-size", "2"])
    .assert()
    .success()
    .stdout(predicate::str::contains("4 inlined, 0 skipped"));
  let html = fs::read_to_string(dir.path().join("large.html")).unwrap();
  assert!(html.contains("url(\"data:image/png;base64,QUFB"));
  assert!(!html.contains("url(/img/big.png)"));
}

#[test]
fn explicit_config_file_takes_precedence_over_discovery() {
  let dir = tempfile::tempdir().unwrap();
  let settings = tempfile::tempdir().unwrap();
  export_fixture(dir.path());
  write(
    dir.path(),
    "standalone.config.json",
    r#"{ "buildDir": "out", "outputFile": "discovered.html" }"#,
  );

  let config_path = settings.path().join("bundle.json");
  let config = serde_json::json!({
    "buildDir": dir.path().join("out"),
    "outputFile": settings.path().join("explicit.html"),
    "htmlTemplate": { "defaultTitle": "Unused", "bodyExtra": "<!-- explicit -->" }
  });
  fs::write(&config_path, config.to_string()).unwrap();

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .arg("--config")
    .arg(&config_path)
    .assert()
    .success();

  let html = fs::read_to_string(settings.path().join("explicit.html")).unwrap();
  assert!(html.contains("<!-- explicit -->"));
  assert!(!dir.path().join("discovered.html").exists());
}

#[test]
fn malformed_config_file_fails() {
  let dir = tempfile::tempdir().unwrap();
  export_fixture(dir.path());
  write(dir.path(), "broken.json", "{ \"buildDir\": ");

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--config", "broken.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn verbose_and_quiet_control_the_run_log() {
  let dir = tempfile::tempdir().unwrap();
  export_fixture(dir.path());

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .env_remove("RUST_LOG")
    .args(["--build-dir", "out", "--verbose"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Reserved entry document candidate"));

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .env_remove("RUST_LOG")
    .args(["--build-dir", "out"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Processed script"))
    .stdout(predicate::str::contains("Reserved entry document candidate").not());

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--build-dir", "out", "--quiet"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Processed").not());

  cargo_bin_cmd!("standalone-bundle")
    .current_dir(dir.path())
    .args(["--quiet", "--verbose"])
    .assert()
    .failure();
}
