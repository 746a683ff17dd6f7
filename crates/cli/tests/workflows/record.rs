//! `gtm-bridge record`

use crate::common::TestProject;
use anyhow::Result;

#[test]
fn test_record_passes_file_through() -> Result<()> {
    let project = TestProject::with_fake_gtm();

    let result = project.bridge(&["record", "src/my file.rs"]).assert_success()?;

    assert_eq!(result.stdout, "gtm: record --status src/my file.rs\n");
    assert_eq!(project.recorded_calls(), vec!["record --status src/my file.rs"]);
    assert!(result.duration.as_secs() < 30);
    Ok(())
}

#[test]
fn test_record_exit_code_passes_through() -> Result<()> {
    let project = TestProject::with_fake_gtm();

    let result = project
        .bridge(&["record", "a.txt"])
        .env("FAKE_GTM_EXIT", "3")
        .assert_failure()?;

    assert_eq!(result.exit_code, 3);
    assert!(result.contains_stdout("gtm: record --status a.txt"));
    Ok(())
}

#[test]
fn test_record_failure_keeps_log_file() -> Result<()> {
    let project = TestProject::with_fake_gtm();
    let log = project.path().join("bridge.log");

    let result = project
        .bridge(&["--log-file", log.to_str().expect("utf-8 path"), "record", "a.txt"])
        .env("FAKE_GTM_EXIT", "3")
        .assert_failure()?;
    assert_eq!(result.exit_code, 3);

    let logged = std::fs::read_to_string(&log)?;
    assert!(logged.contains("Recording activity"), "log file: {logged:?}");
    Ok(())
}
