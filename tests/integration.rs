use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

/// Fresh directory holding a Cooja dir, a javac binary and a simulation file.
fn setup(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(test_dir.join("cooja")).expect("failed to create cooja directory");
    fs::write(test_dir.join("javac"), "").expect("failed to write javac file");
    fs::write(test_dir.join("sim.csc"), "<simconf/>").expect("failed to write simulation file");

    test_dir
}

fn run_bin(test_dir: &Path, args: &[&str], display: bool) -> Output {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_cooja"));

    let mut cmd = Command::new(bin);
    cmd.current_dir(test_dir)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("WAYLAND_DISPLAY");
    if display {
        cmd.env("DISPLAY", ":0");
    } else {
        cmd.env_remove("DISPLAY");
    }

    cmd.output().expect("failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output, args: &[&str]) {
    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{}\nstderr:\n{}\n",
        stdout(output),
        stderr(output)
    );
}

fn assert_failure(output: &Output, needle: &str) {
    assert_eq!(output.status.code(), Some(1), "stderr:\n{}", stderr(output));
    assert!(
        stderr(output).contains(needle),
        "expected {needle:?} in stderr:\n{}",
        stderr(output)
    );
}

const REQUIRED: [&str; 4] = ["--cooja", "cooja", "--javac", "javac"];

fn with_required<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut all: Vec<&'a str> = REQUIRED.to_vec();
    all.extend_from_slice(args);
    all
}

#[test]
fn gui_defaults() {
    let test_dir = setup("gui_defaults");

    let args = with_required(&["sim.csc"]);
    let output = run_bin(&test_dir, &args, true);
    assert_success(&output, &args);

    let out = stdout(&output);
    assert!(out.contains("gui=true"), "{out}");
    assert!(
        out.contains(r#"simulation 0: "sim.csc" autostart=false update-simulation=false logdir=".""#),
        "{out}"
    );
    assert!(out.contains("handed over 1 simulation(s)"), "{out}");
    assert!(
        out.lines()
            .any(|line| line.starts_with(" INFO [main] (src/engine.rs:") && line.contains(") - gui=true")),
        "{out}"
    );

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn headless_batch_run() {
    let test_dir = setup("headless_batch_run");
    fs::write(test_dir.join("other.csc.gz"), "").expect("failed to write simulation file");

    let args = with_required(&[
        "--no-gui",
        "--logdir",
        "logs",
        "--logname",
        "run",
        "--random-seed",
        "123",
        "sim.csc",
        "other.csc.gz,autostart=false,logdir=custom",
    ]);
    let output = run_bin(&test_dir, &args, false);
    assert_success(&output, &args);

    let log_file = test_dir.join("logs").join("run.log");
    let log = fs::read_to_string(&log_file).expect("failed to read log file");

    assert!(log.contains("random-seed=Some(123)"), "{log}");
    assert!(
        log.contains(r#"simulation 0: "sim.csc" autostart=true update-simulation=false logdir="logs""#),
        "{log}"
    );
    assert!(
        log.contains(r#"simulation 1: "other.csc.gz" autostart=false update-simulation=false logdir="custom""#),
        "{log}"
    );
    assert!(!log.contains("handing over"), "{log}");
    assert!(stdout(&output).contains("handed over 2 simulation(s)"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn log_file_is_truncated() {
    let test_dir = setup("log_file_is_truncated");
    fs::write(test_dir.join("run.log"), "stale line\n").expect("failed to write log file");

    let args = with_required(&["--no-gui", "--logname", "run.log"]);
    let output = run_bin(&test_dir, &args, false);
    assert_success(&output, &args);

    let log = fs::read_to_string(test_dir.join("run.log")).expect("failed to read log file");
    assert!(!log.contains("stale line"), "{log}");
    assert!(log.contains("no simulation files given"), "{log}");
    assert!(!test_dir.join("run.log.log").exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn external_log_config() {
    let test_dir = setup("external_log_config");

    let toml_string = String::new()
        + "filters = \"warn\"\n"
        + "\n"
        + "[file]\n"
        + "path = \"external.log\"\n"
        + "filters = \"info\"\n";
    fs::write(test_dir.join("log.toml"), toml_string).expect("failed to write log config");

    let args = with_required(&["--no-gui", "--log4j2", "log.toml", "--logname", "ignored"]);
    let output = run_bin(&test_dir, &args, false);
    assert_success(&output, &args);

    let log = fs::read_to_string(test_dir.join("external.log")).expect("failed to read log file");
    assert!(log.contains("handed over 0 simulation(s)"), "{log}");
    assert!(!test_dir.join("ignored.log").exists());
    assert!(!stdout(&output).contains("handed over"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn gui_run_creates_log_dir() {
    let test_dir = setup("gui_run_creates_log_dir");

    let args = with_required(&["--logdir", "newlogs", "--logname", "run", "sim.csc"]);
    let output = run_bin(&test_dir, &args, true);
    assert_success(&output, &args);

    let log = fs::read_to_string(test_dir.join("newlogs").join("run.log"))
        .expect("failed to read log file");
    assert!(log.contains("handed over 1 simulation(s)"), "{log}");

    fs::remove_dir_all(&test_dir).ok();
}

#[cfg(all(unix, not(target_os = "macos")))]
#[test]
fn batch_run_ignores_unreadable_display() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let test_dir = setup("batch_run_ignores_unreadable_display");

    let args = with_required(&["--no-gui", "sim.csc"]);
    let output = Command::new(env!("CARGO_BIN_EXE_cooja"))
        .current_dir(&test_dir)
        .args(&args)
        .env_remove("RUST_LOG")
        .env_remove("DISPLAY")
        .env("WAYLAND_DISPLAY", OsStr::from_bytes(b"wl\xff"))
        .output()
        .expect("failed to execute command");
    assert_success(&output, &args);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn update_requires_gui() {
    let test_dir = setup("update_requires_gui");

    let args = with_required(&["--no-gui", "--update-simulation", "sim.csc"]);
    let output = run_bin(&test_dir, &args, true);
    assert_failure(&output, "requires --gui");

    fs::remove_dir_all(&test_dir).ok();
}

#[cfg(all(unix, not(target_os = "macos")))]
#[test]
fn gui_needs_display() {
    let test_dir = setup("gui_needs_display");

    let output = run_bin(&test_dir, &with_required(&["sim.csc"]), false);
    assert_failure(&output, "headless");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn missing_contiki_path() {
    let test_dir = setup("missing_contiki_path");

    let output = run_bin(
        &test_dir,
        &with_required(&["--contiki", "no-such-contiki", "sim.csc"]),
        true,
    );
    assert_failure(&output, "no-such-contiki");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn missing_install_path() {
    let test_dir = setup("missing_install_path");

    let output = run_bin(&test_dir, &["--cooja", "nowhere", "--javac", "javac"], true);
    assert_failure(&output, "nowhere/");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn faulty_override_spec() {
    let test_dir = setup("faulty_override_spec");

    let output = run_bin(&test_dir, &with_required(&["sim.csc,autostart=true,"]), true);
    assert_failure(&output, "faulty key=value specification ''");

    let output = run_bin(&test_dir, &with_required(&["sim.csc,autostart"]), true);
    assert_failure(&output, "'autostart'");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn simulation_file_checks() {
    let test_dir = setup("simulation_file_checks");
    fs::write(test_dir.join("sim.xml"), "").expect("failed to write file");

    let output = run_bin(&test_dir, &with_required(&["sim.xml"]), true);
    assert_failure(&output, "'.csc' or '.csc.gz'");

    let output = run_bin(&test_dir, &with_required(&["absent.csc"]), true);
    assert_failure(&output, "absent.csc");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn usage_errors_exit_with_one() {
    let test_dir = setup("usage_errors_exit_with_one");

    let output = run_bin(&test_dir, &["--javac", "javac"], true);
    assert_failure(&output, "--cooja");

    let output = run_bin(&test_dir, &with_required(&["--random-seed", "abc"]), true);
    assert_failure(&output, "abc");

    let output = run_bin(&test_dir, &with_required(&["--frobnicate"]), true);
    assert_failure(&output, "--frobnicate");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn query_options() {
    let test_dir = env::temp_dir();

    let output = run_bin(&test_dir, &["--version"], false);
    assert_success(&output, &["--version"]);
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));

    let output = run_bin(&test_dir, &["--help"], false);
    assert_success(&output, &["--help"]);
    let out = stdout(&output);
    assert!(out.contains("--update-simulation"), "{out}");
    assert!(out.contains("Log configuration"), "{out}");
}
