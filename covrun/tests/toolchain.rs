//! Runs complete plans against stand-in shell scripts for cmake, the test binary, llvm-profdata and llvm-cov.

#![cfg(unix)]

extern crate covrun;
extern crate tempfile;

use covrun::*;
use tempfile::{TempDir, tempdir};

use std::fs::{File, Permissions, create_dir_all, metadata, read, read_to_string};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// Serializes the tests so that no script is exec'd while another thread still holds it open for writing.
static LOCK: Mutex<()> = Mutex::new(());

/// Configures with `-B <dir>` by recording `CXX` and the current run id into the build tree, and builds with
/// `--build <dir>` by emitting a test program which writes its results and raw profile into the current directory.
///
/// Every artifact carries the run id read from `bin/run-id`, so a stale artifact can be told apart from a fresh one.
const FAKE_CMAKE: &str = r#"#!/bin/sh
set -e
if [ "$1" = "--build" ]; then
    mkdir -p "$2/test"
    cat > "$2/test/demo_tests" <<'END'
#!/bin/sh
run=$(cat ../run-id)
echo "<testsuites tests=\"1\" failures=\"0\" name=\"$run\"/>" > test_detail.xml
echo "raw-profile $run" > default.profraw
END
    chmod +x "$2/test/demo_tests"
    exit 0
fi
run=$(cat "$(dirname "$0")/run-id")
while [ $# -gt 0 ]; do
    if [ "$1" = "-B" ]; then
        mkdir -p "$2"
        echo "CXX=$CXX CC=$CC" > "$2/CMakeCache.txt"
        echo "RUN=$run" >> "$2/CMakeCache.txt"
        echo "$run" > "$2/run-id"
    fi
    shift
done
"#;

/// `merge -sparse <in> -o <out>`
const FAKE_PROFDATA: &str = r#"#!/bin/sh
set -e
[ "$1" = "merge" ] && [ "$2" = "-sparse" ] && [ "$4" = "-o" ]
{ echo "indexed"; cat "$3"; } > "$5"
"#;

/// `export|show <bin> -instr-profile=<profdata> [-format=...]`
const FAKE_COV: &str = r#"#!/bin/sh
set -e
run=$(cat "$(dirname "$0")/run-id")
case "$4" in
    -format=lcov) echo "TN:$run"; echo "SF:demo.cpp"; echo "end_of_record" ;;
    -format=html) echo "<html><body>$run</body></html>" ;;
    *) echo '{"run":"'"$run"'","data":[{"totals":{"lines":{"count":4,"covered":3},"functions":{"count":1,"covered":1},"regions":{"count":2,"covered":2}}}],"type":"llvm.coverage.json.export","version":"2.0.1"}' ;;
esac
"#;

const FAILING_TOOL: &str = "#!/bin/sh\necho 'simulated failure' >&2\nexit 3\n";

fn write_script(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.set_permissions(Permissions::from_mode(0o755)).unwrap();
}

struct Fixture {
    dir: TempDir,
    config: RunConfig,
    paths: PathContext,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("bin");
    let root = dir.path().join("repo");
    create_dir_all(&bin).unwrap();
    create_dir_all(&root).unwrap();
    write_script(&bin, "cmake", FAKE_CMAKE);
    write_script(&bin, "llvm-profdata", FAKE_PROFDATA);
    write_script(&bin, "llvm-cov", FAKE_COV);
    write_script(&bin, "fail", FAILING_TOOL);
    File::create(bin.join("run-id")).unwrap().write_all(b"run-0\n").unwrap();

    let mut config = RunConfig::default();
    config.project = "demo".to_owned();
    config.toolchain_dir = "/opt/toolchain".into();
    config.tools = Tools {
        cmake: bin.join("cmake"),
        llvm_profdata: bin.join("llvm-profdata"),
        llvm_cov: bin.join("llvm-cov"),
    };
    Fixture {
        paths: PathContext::new(root),
        config,
        dir,
    }
}

impl Fixture {
    /// Sets the id stamped into every artifact by the stand-in tools.
    fn set_run_id(&self, id: &str) {
        let mut file = File::create(self.dir.path().join("bin").join("run-id")).unwrap();
        writeln!(file, "{}", id).unwrap();
    }
}

fn artifacts(f: &Fixture) -> Vec<PathBuf> {
    let mut artifacts = vec![f.paths.build().join("CMakeCache.txt"), f.paths.test_results(), f.paths.profile_data(&f.config)];
    artifacts.extend(f.paths.reports().iter().cloned());
    artifacts
}

#[test]
fn test_full_run_produces_all_artifacts() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let f = fixture();

    run(&f.config, &f.paths, SystemRunner).unwrap();

    assert!(f.paths.build().is_dir());
    for artifact in artifacts(&f) {
        let len = metadata(&artifact).unwrap_or_else(|e| panic!("{}: {}", artifact.display(), e)).len();
        assert!(len > 0, "{} is empty", artifact.display());
    }

    let cache = read_to_string(f.paths.build().join("CMakeCache.txt")).unwrap();
    assert_eq!(cache.lines().next(), Some("CXX=/opt/toolchain/clang++ CC=/opt/toolchain/clang"));

    let summary = Summary::from_path(&f.paths.coverage_json()).unwrap();
    assert_eq!(summary.lines.covered, 3);
    assert!(read_to_string(f.paths.coverage_html()).unwrap().contains("<html>"));
}

#[test]
fn test_test_outputs_land_in_test_directory() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let f = fixture();

    run(&f.config, &f.paths, SystemRunner).unwrap();

    assert!(f.paths.test().join("test_detail.xml").is_file());
    assert!(!f.paths.root().join("test_detail.xml").exists());
    assert!(!f.paths.root().join("default.profraw").exists());
}

#[test]
fn test_rerun_overwrites_artifacts() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let f = fixture();

    f.set_run_id("run-alpha");
    run(&f.config, &f.paths, SystemRunner).unwrap();
    let first = artifacts(&f).iter().map(|p| read_to_string(p).unwrap()).collect::<Vec<_>>();

    f.set_run_id("run-bravo");
    run(&f.config, &f.paths, SystemRunner).unwrap();

    for (artifact, before) in artifacts(&f).iter().zip(&first) {
        let after = read_to_string(artifact).unwrap();
        assert!(before.contains("run-alpha"), "{}: {:?}", artifact.display(), before);
        assert!(after.contains("run-bravo"), "{} was not rewritten: {:?}", artifact.display(), after);
        assert!(!after.contains("run-alpha"), "{} kept stale content: {:?}", artifact.display(), after);
        assert_eq!(after.len(), before.len(), "{} was appended to", artifact.display());
    }
}

#[test]
fn test_failing_phase_stops_the_run() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let f = fixture();
    let fail = f.paths.root().parent().unwrap().join("bin").join("fail");

    let mut config = f.config.clone();
    config.tools.llvm_profdata = fail.clone();

    let steps = pipeline::plan(&config, &f.paths);
    let mut orchestrator = Orchestrator::new(SystemRunner);
    let error = orchestrator.run(&steps).unwrap_err();

    assert_eq!(error.exit_code(), Some(3));
    assert_eq!(orchestrator.state(), State::Failed(Phase::Merge));
    assert!(f.paths.test_results().is_file());
    assert!(!f.paths.profile_data(&config).exists());
    for report in &f.paths.reports() {
        assert!(!report.exists(), "{} should not be exported", report.display());
    }

    config.tools.cmake = fail;
    let error = run(&config, &f.paths, SystemRunner).unwrap_err();
    assert_eq!(error.exit_code(), Some(3));
}

#[test]
fn test_invalid_config_spawns_nothing() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let f = fixture();
    let mut config = f.config.clone();
    config.compiler.clear();

    assert!(run(&config, &f.paths, SystemRunner).is_err());
    assert!(!f.paths.build().exists());
}

#[test]
fn test_merging_twice_is_idempotent() {
    let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let f = fixture();
    let mut runner = SystemRunner;

    for step in pipeline::plan(&f.config, &f.paths).iter().take_while(|s| s.phase != Phase::Export) {
        runner.run(&step.invocation).unwrap();
    }
    let once = read(f.paths.profile_data(&f.config)).unwrap();
    runner.run(&pipeline::merge(&f.config, &f.paths)).unwrap();
    let twice = read(f.paths.profile_data(&f.config)).unwrap();

    assert_eq!(once, twice);
}
