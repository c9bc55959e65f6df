//! End-to-end tests: real scripts, real child processes, real files.

use std::fs;
use std::io::Cursor;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use wish::{Batch, Config, DIAGNOSTIC, ErrorKind, Interpreter, SessionEnd};

/// Write an executable shell script called `name` into `dir`.
fn script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
}

/// A temp dir with a `bin/` of helper scripts and a `work/` dir for outputs.
fn sandbox() -> TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    let bin = root.path().join("bin");
    fs::create_dir(&bin).unwrap();
    fs::create_dir(root.path().join("work")).unwrap();

    script(&bin, "say", r#"echo "$@""#);
    script(&bin, "complain", r#"echo "out:$1"; echo "err:$1" 1>&2"#);
    script(&bin, "slow", r#"sleep 0.3; echo "done""#);
    // Announce ourselves with $1, then wait for the peer's $2.
    script(
        &bin,
        "rendezvous",
        r#"touch "$1"
i=0
while [ ! -e "$2" ]; do
  i=$((i+1))
  if [ "$i" -gt 100 ]; then echo timeout; exit 1; fi
  sleep 0.05
done
echo ok"#,
    );
    root
}

fn run_lines(root: &Path, lines: &str) -> SessionEnd {
    let config = Config::default().with_search_path(vec![root.join("bin")]);
    let mut shell = Interpreter::new(config);
    shell.run(&mut Batch::new(Cursor::new(lines.to_string())))
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

#[test]
fn redirect_writes_output_to_file() {
    let root = sandbox();
    let out = root.path().join("work/out.txt");
    let end = run_lines(root.path(), &format!("say hello world > {}\n", out.display()));

    assert!(matches!(end, SessionEnd::EndOfInput));
    assert_eq!(read(&out), "hello world\n");
}

#[test]
fn redirect_captures_stderr_and_truncates() {
    let root = sandbox();
    let out = root.path().join("work/out.txt");
    fs::write(&out, "old old old old old old old old\n").unwrap();

    run_lines(root.path(), &format!("complain x >{}\n", out.display()));
    assert_eq!(read(&out), "out:x\nerr:x\n");
}

#[test]
fn parallel_commands_run_at_the_same_time() {
    let root = sandbox();
    let work = root.path().join("work");
    let line = format!(
        "rendezvous {w}/a.flag {w}/b.flag > {w}/a.out & rendezvous {w}/b.flag {w}/a.flag > {w}/b.out\n",
        w = work.display()
    );
    let end = run_lines(root.path(), &line);

    assert!(matches!(end, SessionEnd::EndOfInput));
    assert_eq!(read(&work.join("a.out")), "ok\n");
    assert_eq!(read(&work.join("b.out")), "ok\n");
}

#[test]
fn barrier_waits_for_slow_children() {
    let root = sandbox();
    let work = root.path().join("work");
    let config = Config::default().with_search_path(vec![root.path().join("bin")]);
    let mut shell = Interpreter::new(config);

    let report = shell.process_line(&format!(
        "slow > {w}/slow.out & say quick > {w}/quick.out\n",
        w = work.display()
    ));
    assert!(report.error.is_none());
    assert_eq!(report.launched, 2);
    assert_eq!(read(&work.join("slow.out")), "done\n");
    assert_eq!(read(&work.join("quick.out")), "quick\n");
}

#[test]
fn syntax_error_runs_nothing_and_stops_session() {
    let root = sandbox();
    let work = root.path().join("work");
    let lines = format!(
        "say a > {w}/x > {w}/y\nsay b > {w}/later\n",
        w = work.display()
    );
    let end = run_lines(root.path(), &lines);

    match &end {
        SessionEnd::Failed(e) => assert_eq!(e.kind(), ErrorKind::Syntax),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(end.exit_code(), 1);
    assert!(!work.join("x").exists());
    assert!(!work.join("y").exists());
    assert!(!work.join("later").exists());
}

#[test]
fn emptied_path_resolves_nothing() {
    let root = sandbox();
    let end = run_lines(root.path(), "path\nsay hi\n");
    match end {
        SessionEnd::Failed(e) => assert_eq!(e.kind(), ErrorKind::Resolution),
        other => panic!("expected failure, got {other:?}"),
    }
}

fn wish() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wish"));
    cmd.env_remove("WISH_LOG");
    cmd
}

#[test]
fn binary_batch_mode_exits_cleanly() {
    let root = sandbox();
    let out = root.path().join("work/out.txt");
    let batch = root.path().join("script.wish");
    fs::write(
        &batch,
        format!(
            "path {}\nsay one > {}\nexit\nsay two > {}\n",
            root.path().join("bin").display(),
            out.display(),
            out.display()
        ),
    )
    .unwrap();

    let output = wish().arg(&batch).output().expect("run wish");
    assert!(output.status.success(), "status: {:?}", output.status);
    assert!(output.stderr.is_empty());
    assert_eq!(read(&out), "one\n");
}

#[test]
fn binary_prints_single_diagnostic_on_error() {
    let root = sandbox();
    let batch = root.path().join("script.wish");
    fs::write(&batch, "cd\ncd a b\nno-such-command\n").unwrap();

    let output = wish().arg(&batch).output().expect("run wish");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr), DIAGNOSTIC);
}

#[test]
fn binary_rejects_bad_invocations() {
    let root = sandbox();
    let a = root.path().join("a.wish");
    let b = root.path().join("b.wish");
    fs::write(&a, "exit\n").unwrap();
    fs::write(&b, "exit\n").unwrap();

    let output = wish().arg(&a).arg(&b).output().expect("run wish");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr), DIAGNOSTIC);

    let output = wish()
        .arg(root.path().join("missing.wish"))
        .output()
        .expect("run wish");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr), DIAGNOSTIC);
}

#[test]
fn binary_runs_batch_files_named_like_flags() {
    let root = sandbox();
    let bin = root.path().join("bin");
    for (name, out) in [("help", "help.out"), ("-x", "dash.out")] {
        let out = root.path().join("work").join(out);
        fs::write(
            root.path().join(name),
            format!("path {}\nsay hi > {}\n", bin.display(), out.display()),
        )
        .unwrap();

        let output = wish()
            .current_dir(root.path())
            .arg(name)
            .output()
            .expect("run wish");
        assert!(output.status.success(), "{name}: {:?}", output.status);
        assert!(output.stderr.is_empty(), "{name}");
        assert_eq!(read(&out), "hi\n");
    }
}

#[test]
fn binary_unknown_flag_prints_only_the_diagnostic() {
    let root = sandbox();
    let output = wish()
        .current_dir(root.path())
        .arg("--bogus")
        .output()
        .expect("run wish");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr), DIAGNOSTIC);
    assert!(output.stdout.is_empty());

    let output = wish().arg("-p").output().expect("run wish");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stderr), DIAGNOSTIC);
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_utf8_in_batch_file_does_not_end_session() {
    let root = sandbox();
    let out = root.path().join("work/out.txt");
    let batch = root.path().join("script.wish");
    let mut body = format!("path {}\n", root.path().join("bin").display()).into_bytes();
    body.extend_from_slice(b"say caf\xe9 > ");
    body.extend_from_slice(format!("{}\n", out.display()).as_bytes());
    fs::write(&batch, body).unwrap();

    let output = wish().arg(&batch).output().expect("run wish");
    assert!(output.status.success(), "status: {:?}", output.status);
    assert!(output.stderr.is_empty());
    assert_eq!(read(&out), "caf\u{fffd}\n");
}

#[test]
fn missing_program_keeps_existing_target() {
    let root = sandbox();
    let out = root.path().join("work/out.txt");
    fs::write(&out, "precious\n").unwrap();

    let end = run_lines(root.path(), &format!("say x > {}\n", out.display()));
    assert!(matches!(end, SessionEnd::EndOfInput));
    fs::remove_file(root.path().join("bin/say")).unwrap();
    let end = run_lines(root.path(), &format!("say y > {}\n", out.display()));
    match end {
        SessionEnd::Failed(e) => assert_eq!(e.kind(), ErrorKind::Resolution),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(read(&out), "x\n");
}
