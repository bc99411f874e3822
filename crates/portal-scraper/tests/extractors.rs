//! Integration tests for the portal extractors.
//!
//! Every test stands up a `wiremock` server in place of the portal and
//! points a `PortalClient` at it, so the full request path (cookies,
//! query templates, form posts, status handling) is exercised.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use portal_core::{CookieSet, DateRange};
use rust_decimal::Decimal;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portal_scraper::{
    ConversionReportFetcher, CycleTimeFetcher, JobStatus, JobStatusCounter, PortalClient,
    RevenueRankingFetcher, ScraperError,
};

const CONVERSION_FORM: &str = "/scripts/lead-to-appointment-conversion/index.html";
const CONVERSION_EXPORT: &str = "/scripts/report_as_spreadsheet.html";

fn session() -> CookieSet {
    CookieSet::from_json(r#"[{"name": "PHPSESSID", "value": "abc123", "path": "/"}]"#)
        .expect("valid cookie JSON")
}

fn test_client(server: &MockServer) -> Arc<PortalClient> {
    Arc::new(
        PortalClient::new(&server.uri(), &session(), 5, "portal-test/0.1")
            .expect("failed to build test PortalClient"),
    )
}

fn window() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
    )
}

// ---------------------------------------------------------------------------
// PortalClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_sends_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("cookie", "PHPSESSID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let body = client.get_text(&client.url("/ping"), &[]).await.unwrap();
    assert_eq!(body, "pong");
}

#[tokio::test]
async fn client_maps_non_success_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .get_text(&client.url("/missing"), &[])
        .await
        .unwrap_err();
    match err {
        ScraperError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/missing"), "url was {url}");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// JobStatusCounter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn counts_jobs_for_status_and_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listjobs.html"))
        .and(query_param("status_field_name_for_filter", "6"))
        .and(query_param("status_update_search_date_ge", "01/05/2024"))
        .and(query_param("status_update_search_date_le", "02/04/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body>ID,Franchisee,\n101,Austin,\nC102,Dallas,\nR103,Tulsa,\n</body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let counter = JobStatusCounter::new(test_client(&server), "unused");
    let count = counter
        .count_jobs_by_status(JobStatus::OrderShipped, &window())
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn empty_listing_counts_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listjobs.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>\n</body></html>"))
        .mount(&server)
        .await;

    let counter = JobStatusCounter::new(test_client(&server), "unused");
    let count = counter
        .count_jobs_by_status(JobStatus::SubmittedToManufacturingPartner, &window())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn combined_csv_concatenates_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listjobs.html"))
        .and(query_param("status_field_name_for_filter", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "ID,Franchisee,Submitted to Manufacturing Partner Date\n201,Austin,01/06/2024\n",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/listjobs.html"))
        .and(query_param("status_field_name_for_filter", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "ID,Franchisee,Order Shipped Date\nC301,Dallas,01/20/2024\n",
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let counter = JobStatusCounter::new(test_client(&server), dir.path());
    let (records, written) = counter.generate_combined_csv(&window(), None).await.unwrap();

    assert_eq!(records.len(), 2);
    let written = written.expect("a file should be written");
    assert_eq!(written, dir.path().join("01052024_02042024_jobs.csv"));
    let csv = std::fs::read_to_string(&written).unwrap();
    assert_eq!(
        csv,
        "ID,Order Type,Franchisee,Date,Status\n\
         201,New,Austin,01/06/2024,Submitted to Manufacturing Partner\n\
         C301,Claim,Dallas,01/20/2024,Order Shipped\n"
    );
}

#[tokio::test]
async fn combined_csv_skips_file_when_no_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listjobs.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("jobs.csv");
    let counter = JobStatusCounter::new(test_client(&server), dir.path());
    let (records, written) = counter
        .generate_combined_csv(&window(), Some(&output))
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(written.is_none());
    assert!(!output.exists());
}

// ---------------------------------------------------------------------------
// ConversionReportFetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conversion_posts_search_then_sums_export() {
    let server = MockServer::start().await;
    let form_url = format!("{}{CONVERSION_FORM}", server.uri());

    Mock::given(method("POST"))
        .and(path(CONVERSION_FORM))
        .and(header("referer", form_url.as_str()))
        .and(body_string_contains("start_date=01%2F05%2F2024"))
        .and(body_string_contains("end_date=02%2F04%2F2024"))
        .and(body_string_contains("submit=Show+Report"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CONVERSION_EXPORT))
        .and(query_param("report", "report_lead_to_appointment_conversion"))
        .and(header("referer", form_url.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Call Center Rep,Leads,Outbound Communication Count\nAlice,4,25\nBob,2,17\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ConversionReportFetcher::new(test_client(&server));
    let total = fetcher
        .get_total_outbound_communications(&window())
        .await
        .unwrap();
    assert_eq!(total, 42);
}

#[tokio::test]
async fn conversion_login_page_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CONVERSION_FORM))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CONVERSION_EXPORT))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><title>Sign in</title></html>"),
        )
        .mount(&server)
        .await;

    let fetcher = ConversionReportFetcher::new(test_client(&server));
    let err = fetcher
        .get_total_outbound_communications(&window())
        .await
        .unwrap_err();
    match err {
        ScraperError::Protocol { excerpt, .. } => assert!(excerpt.contains("Sign in")),
        other => panic!("expected Protocol, got {other:?}"),
    }
}

#[tokio::test]
async fn conversion_search_failure_skips_export() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CONVERSION_FORM))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CONVERSION_EXPORT))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = ConversionReportFetcher::new(test_client(&server));
    let err = fetcher.download_report(&window()).await.unwrap_err();
    assert!(matches!(err, ScraperError::Status { status: 500, .. }));
}

// ---------------------------------------------------------------------------
// RevenueRankingFetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn revenue_ranking_extracts_total_and_top_locations() {
    let server = MockServer::start().await;
    let page = "<html><body>\
        <table><tr><td>Date filter</td></tr></table>\
        <table>\
        <tr><th>Rank</th><th>Location</th><th>Revenue</th></tr>\
        <tr><td>1</td><td><a href=\"/l/1\">Austin</a></td><td>$10,000.00</td></tr>\
        <tr><td>2</td><td>Dallas</td><td>$8,500.50</td></tr>\
        <tr><td>3</td><td>Houston</td><td>$7,000.00</td></tr>\
        <tr><td>4</td><td>Tulsa</td><td>$500.00</td></tr>\
        <tr><td>&nbsp;</td><td><b>Total</b></td><td>$26,000.50</td></tr>\
        </table></body></html>";
    Mock::given(method("GET"))
        .and(path("/scripts/location_sales_rankings.html"))
        .and(query_param("sd", "01/05/2024"))
        .and(query_param("ed", "02/04/2024"))
        .and(query_param("presetdates", "na"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let fetcher = RevenueRankingFetcher::new(test_client(&server));
    let summary = fetcher.fetch_summary(&window()).await.unwrap();

    assert_eq!(summary.total, Decimal::from_str("26000.50").unwrap());
    let top: Vec<&str> = summary.top(3).iter().map(|r| r.location.as_str()).collect();
    assert_eq!(top, ["Austin", "Dallas", "Houston"]);
}

#[tokio::test]
async fn revenue_without_total_row_is_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scripts/location_sales_rankings.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<table><tr><td>1</td><td>Austin</td><td>$1.00</td></tr></table>",
        ))
        .mount(&server)
        .await;

    let fetcher = RevenueRankingFetcher::new(test_client(&server));
    let err = fetcher.total_revenue(&window()).await.unwrap_err();
    assert!(matches!(err, ScraperError::DataFormat { .. }));
}

// ---------------------------------------------------------------------------
// CycleTimeFetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cycle_time_uses_shipped_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listjobs.html"))
        .and(query_param("date_shipped_ge", "01/05/2024"))
        .and(query_param("date_shipped_le", "02/04/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body>ID,Location,Order Total,Date Shipped,Measurement Approved Date\n\
             100,Austin,$1.00,2024-01-10,\"2024-01-01, 2024-01-05\"\n</body></html>",
        ))
        .mount(&server)
        .await;

    let fetcher = CycleTimeFetcher::new(test_client(&server));
    let cycle = fetcher.measurement_to_shipped(&window()).await.unwrap();
    assert!((cycle.average_days - 5.0).abs() < f64::EPSILON);
    assert_eq!(cycle.human, "5 days, 0 hours");
}

#[tokio::test]
async fn cycle_time_server_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listjobs.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = CycleTimeFetcher::new(test_client(&server));
    let err = fetcher.measurement_to_shipped(&window()).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::Status { status: 503, .. }),
        "unexpected error: {err:?}"
    );
}
