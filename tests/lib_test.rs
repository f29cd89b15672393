//! Library integration tests.

use site_audit::AuditError;

#[test]
fn error_types_are_public() {
    let err = AuditError::UnknownCheck {
        id: "views_count".into(),
    };
    assert!(err.to_string().contains("views_count"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> site_audit::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use site_audit::cli::{Cli, Commands};

    let cli = Cli::parse_from(["site-audit", "checks", "--json"]);

    if let Some(Commands::Checks(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Checks command");
    }
}

#[test]
fn report_ids_round_trip_through_strings() {
    use site_audit::report::ReportId;

    for report in ReportId::ALL {
        assert_eq!(report.as_str().parse::<ReportId>().ok(), Some(report));
    }
    assert!("nonsense".parse::<ReportId>().is_err());
}

#[test]
fn score_weights_are_public() {
    use site_audit::audit::Score;

    assert_eq!(Score::Pass.weight(), 2);
    assert_eq!(Score::Warn.weight(), 1);
    assert_eq!(Score::Fail.weight(), 0);
    assert_eq!(Score::Info.weight(), -1);
}

#[test]
fn percent_is_public() {
    use site_audit::report::percent;

    assert_eq!(percent(3, 4), 75);
    assert_eq!(percent(0, 0), 0);
}

#[test]
fn report_json_uses_check_keys_in_order() {
    use site_audit::audit::AuditOptions;
    use site_audit::runner::Auditor;
    use site_audit::site::SiteSnapshot;
    use std::sync::Arc;

    let snapshot = SiteSnapshot::from_yaml("environment: dev\n").unwrap();
    let report = Auditor::new(Arc::new(snapshot))
        .report("cache", AuditOptions::default())
        .unwrap();
    let json = serde_json::to_string(&report).unwrap();

    let expire = json.find("SiteAuditCheckCachePageExpire").unwrap();
    let css = json.find("SiteAuditCheckCachePreprocessCSS").unwrap();
    let js = json.find("SiteAuditCheckCachePreprocessJS").unwrap();
    assert!(expire < css && css < js);
}
