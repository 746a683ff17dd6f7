//! `gtm-bridge probe`

use crate::common::TestProject;
use anyhow::Result;

#[test]
fn test_probe_reports_installed_version() -> Result<()> {
    let project = TestProject::with_fake_gtm();

    let result = project
        .bridge(&["probe"])
        .env("FAKE_GTM_VERSION", "gtm v1.2.0")
        .assert_success()?;

    assert!(result.contains_stdout("v1.2.0"));
    assert!(result.contains_stdout("v1.0-beta.8"));
    Ok(())
}

#[test]
fn test_probe_warns_but_succeeds_when_outdated() -> Result<()> {
    let project = TestProject::with_fake_gtm();

    let result = project
        .bridge(&["probe"])
        .env("FAKE_GTM_VERSION", "v1.0-beta.5")
        .assert_success()?;

    assert!(result.contains_stdout("below v1.0-beta.8"));
    Ok(())
}

#[test]
fn test_probe_fails_without_gtm() -> Result<()> {
    let project = TestProject::without_gtm();

    let result = project.bridge(&["probe"]).assert_failure()?;
    assert!(result.contains_stderr("not available on your $PATH"));
    Ok(())
}
