use std::{
    fs,
    os::unix::process::CommandExt,
    process::Stdio,
    thread,
    time::{Duration, Instant},
};

use crate::common::{Sandbox, Scenario};

const TRAPPING_APP: &str =
    "trap 'echo app-got-int >> app.log' INT; : > app.ready; sleep 5; exit 5";

#[test]
fn interrupt_while_application_runs_keeps_its_exit_code() {
    let sandbox = Sandbox::new(&Scenario {
        app_command: Some(vec!["sh".into(), "-c".into(), TRAPPING_APP.into()]),
        ..Scenario::default()
    });

    let mut launcher = sandbox
        .command(&[])
        .process_group(0)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("launcher should start");

    let ready = sandbox.path().join("app.ready");
    let deadline = Instant::now() + Duration::from_secs(10);
    while !ready.exists() {
        assert!(Instant::now() < deadline, "application never started");
        thread::sleep(Duration::from_millis(20));
    }

    let group = launcher.id() as libc::pid_t;
    // SAFETY: sends a signal to the process group created for the launcher above.
    let sent = unsafe { libc::kill(-group, libc::SIGINT) };
    assert_eq!(sent, 0, "can signal the launcher's process group");

    let status = launcher.wait().expect("launcher should exit");

    assert_eq!(status.code(), Some(5), "launcher status: {status:?}");
    let app_log = fs::read_to_string(sandbox.path().join("app.log")).expect("app.log exists");
    assert!(app_log.contains("app-got-int"), "app log: {app_log}");
}
