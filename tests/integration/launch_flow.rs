use crate::common::{Sandbox, Scenario, ENV_FILE_TEMPLATE};

#[test]
fn missing_packages_are_installed_from_the_same_manifest() {
    let sandbox = Sandbox::new(&Scenario {
        checker_exit: 1,
        ..Scenario::default()
    });

    let output = sandbox.run(&[]);

    assert!(output.status.success(), "launcher failed: {output:?}");
    assert_eq!(
        sandbox.calls(),
        vec![
            "checker requirements.txt",
            "installer requirements.txt",
            "token https://cognitiveservices.azure.com",
            "app",
        ]
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Installing missing packages..."),
        "stdout: {stdout}"
    );
}

#[test]
fn installer_is_skipped_unless_checker_exits_one() {
    for checker_exit in [0, 2, 42] {
        let sandbox = Sandbox::new(&Scenario {
            checker_exit,
            ..Scenario::default()
        });

        let output = sandbox.run(&[]);

        assert!(output.status.success(), "launcher failed: {output:?}");
        assert!(
            sandbox.calls().iter().all(|call| !call.starts_with("installer")),
            "checker exit {checker_exit} must not install: {:?}",
            sandbox.calls()
        );
    }
}

#[test]
fn token_is_written_into_env_file() {
    let sandbox = Sandbox::new(&Scenario::default());

    let output = sandbox.run(&[]);

    assert!(output.status.success(), "launcher failed: {output:?}");
    assert_eq!(
        sandbox.read_env(),
        "## settings\nOPENAI_API_KEY=fresh-token\nSMART_LLM_MODEL=gpt-4\n"
    );
}

#[test]
fn missing_token_field_writes_empty_value() {
    let sandbox = Sandbox::new(&Scenario {
        token_output: r#"{"error":"Please run 'az login' to setup account."}"#.to_string(),
        ..Scenario::default()
    });

    let output = sandbox.run(&[]);

    assert!(output.status.success(), "launcher failed: {output:?}");
    assert_eq!(
        sandbox.read_env(),
        "## settings\nOPENAI_API_KEY=\nSMART_LLM_MODEL=gpt-4\n"
    );
}

#[test]
fn arguments_are_forwarded_verbatim() {
    let sandbox = Sandbox::new(&Scenario::default());

    let output = sandbox.run(&["--continuous", "--", "two words", "--help", "-V"]);

    assert!(output.status.success(), "launcher failed: {output:?}");
    assert_eq!(
        sandbox.app_args(),
        vec!["--continuous", "--", "two words", "--help", "-V"]
    );
}

#[test]
fn exit_code_is_the_application_exit_code() {
    let sandbox = Sandbox::new(&Scenario {
        app_exit: 7,
        ..Scenario::default()
    });

    let output = sandbox.run(&[]);

    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn unstartable_application_exits_127() {
    let sandbox = Sandbox::new(&Scenario {
        app_command: Some(vec!["./no-such-application".to_string()]),
        ..Scenario::default()
    });

    let output = sandbox.run(&[]);

    assert_eq!(output.status.code(), Some(127));
}

#[test]
fn strict_mode_aborts_on_empty_token() {
    let sandbox = Sandbox::new(&Scenario {
        token_output: "not json".to_string(),
        require_non_empty: true,
        ..Scenario::default()
    });

    let output = sandbox.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(sandbox.read_env(), ENV_FILE_TEMPLATE);
    assert!(
        !sandbox.calls().iter().any(|call| call == "app"),
        "application must not start: {:?}",
        sandbox.calls()
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("accessToken"), "stderr: {stderr}");
}

#[test]
fn env_file_without_key_is_left_alone() {
    let sandbox = Sandbox::new(&Scenario::default());
    sandbox.write_env("OTHER=1\n");

    let output = sandbox.run(&[]);

    assert!(output.status.success(), "launcher failed: {output:?}");
    assert_eq!(sandbox.read_env(), "OTHER=1\n");
}
