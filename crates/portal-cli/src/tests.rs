use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["portal-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_report_with_default_window() {
    let cli = Cli::try_parse_from(["portal-cli", "report"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report { days_back: None })
    ));
}

#[test]
fn parses_report_days_back() {
    let cli = Cli::try_parse_from(["portal-cli", "report", "--days-back", "7"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report { days_back: Some(7) })
    ));
}

#[test]
fn largest_days_back_is_rejected_as_a_window() {
    let cli = Cli::try_parse_from(["portal-cli", "report", "--days-back", "4294967295"]).unwrap();
    let Some(Commands::Report { days_back: Some(days_back) }) = cli.command else {
        panic!("expected report with --days-back");
    };
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let err = portal_report::ReportOrchestrator::window(today, days_back).unwrap_err();
    assert!(err.to_string().contains("4294967295-day window"), "{err}");
}

#[test]
fn rejects_negative_days_back() {
    assert!(Cli::try_parse_from(["portal-cli", "metrics", "--days-back", "-3"]).is_err());
}

#[test]
fn parses_export_jobs_in_both_date_formats() {
    let cli = Cli::try_parse_from([
        "portal-cli",
        "export-jobs",
        "--start",
        "01/05/2024",
        "--end",
        "2024-02-04",
        "--output",
        "jobs.csv",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::ExportJobs { start, end, output }) => {
            assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
            assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 4).unwrap());
            assert_eq!(output, Some(PathBuf::from("jobs.csv")));
        }
        other => panic!("expected ExportJobs, got {other:?}"),
    }
}

#[test]
fn export_jobs_requires_both_dates() {
    assert!(Cli::try_parse_from(["portal-cli", "export-jobs", "--start", "01/05/2024"]).is_err());
}

#[test]
fn export_jobs_rejects_malformed_date() {
    let err = Cli::try_parse_from([
        "portal-cli",
        "export-jobs",
        "--start",
        "Jan 5",
        "--end",
        "02/04/2024",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("MM/DD/YYYY"));
}

#[test]
fn export_range_rejects_inverted_window() {
    let start = NaiveDate::from_ymd_opt(2024, 2, 4).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert!(commands::export_range(start, end).is_err());
    assert!(commands::export_range(end, start).is_ok());
    assert!(commands::export_range(start, start).is_ok());
}

#[test]
fn parses_check_cookies_path() {
    let cli = Cli::try_parse_from(["portal-cli", "check-cookies", "--path", "c.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::CheckCookies { path: Some(ref p) }) if p == &PathBuf::from("c.json")
    ));
}

#[test]
fn check_cookies_accepts_unexpired_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.json");
    std::fs::write(
        &path,
        r#"[{"name": "PHPSESSID", "value": "abc", "expirationDate": 4102444800}]"#,
    )
    .unwrap();
    assert!(commands::run_check_cookies(&path).is_ok());
}

#[test]
fn check_cookies_rejects_expired_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.json");
    std::fs::write(
        &path,
        r#"[{"name": "PHPSESSID", "value": "abc", "expirationDate": 946684800}]"#,
    )
    .unwrap();
    let err = commands::run_check_cookies(&path).unwrap_err();
    assert!(err.to_string().contains("expired"));
}
