use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

static BENDEC_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> String {
	bendec_testkit::fixture_path(name).display().to_string()
}

pub(crate) fn run_bendec(args: &[&str]) -> Output {
	Command::new(bendec_bin()).args(args).output().expect("bendec command executes")
}

pub(crate) fn run_bendec_stdout(args: &[&str]) -> String {
	let output = run_bendec(args);
	assert!(
		output.status.success(),
		"bendec command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

pub(crate) fn run_bendec_json(args: &[&str]) -> serde_json::Value {
	serde_json::from_str(&run_bendec_stdout(args)).expect("stdout should be valid json")
}

fn bendec_bin() -> &'static PathBuf {
	BENDEC_BIN.get_or_init(resolve_bendec_bin)
}

fn resolve_bendec_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_bendec") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let mut bin = bendec_testkit::target_dir().join("debug");
	bin.push(if cfg!(windows) { "bendec.exe" } else { "bendec" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "bendec"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build bendec binary at {}", bin.display());

	bin
}
