use httpmock::Method::GET;
use httpmock::MockServer;
use name_check::registry::{build_http_client, Endpoints, Provider};
use name_check::{
    AvailabilityStatus, CheckRequest, Checker, HttpConfig, ProviderGroup, ProviderKind, Summary,
};
use serde_json::json;
use std::net::TcpListener;
use std::time::{Duration, Instant};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn checker_for(request: &CheckRequest, endpoints: &Endpoints, timeout: Duration) -> Checker {
    let http = build_http_client(&HttpConfig {
        timeout,
        ..HttpConfig::default()
    })
    .unwrap();
    let clients = Provider::for_kinds(request.enabled(), &http, endpoints);
    Checker::new(clients, timeout + Duration::from_millis(500))
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Mock every provider endpoint for `name` with a definitive answer.
async fn mock_all_providers(server: &MockServer, name: &str) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/publishers/validate");
            then.status(200).json_body(json!({"isAvailable": true}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nodes/search");
            then.status(200).json_body(json!({"nodes": []}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/pypi/{}/json", name));
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/{}", name));
            then.status(200)
                .json_body(json!({"name": name, "dist-tags": {"latest": "1.0.0"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/users/{}", name));
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/orgs/{}", name));
            then.status(200).json_body(json!({"public_repos": 3}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/domain/{}.com", name));
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/domain/{}.io", name));
            then.status(200).json_body(json!({
                "objectClassName": "domain",
                "events": [{"eventAction": "expiration", "eventDate": "2027-03-01T00:00:00Z"}]
            }));
        })
        .await;
}

#[tokio::test]
async fn end_to_end_pypi_and_domain() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pypi/abcxyz123/json");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/domain/abcxyz123.com");
            then.status(200).json_body(json!({
                "objectClassName": "domain",
                "ldhName": "ABCXYZ123.COM",
                "events": [
                    {"eventAction": "registration", "eventDate": "2020-01-15T00:00:00Z"},
                    {"eventAction": "expiration", "eventDate": "2026-01-15T00:00:00Z"}
                ]
            }));
        })
        .await;

    let request = CheckRequest::with_providers(
        "abcxyz123",
        vec![ProviderKind::PyPi, ProviderKind::Domain("com".to_string())],
    )
    .unwrap();
    let checker = checker_for(&request, &Endpoints::all(&server.base_url()), Duration::from_secs(5));

    let report = checker.run(&request, None).await;

    assert_eq!(report.name, "abcxyz123");
    assert_eq!(report.results[0].label, "PyPI");
    assert_eq!(report.results[0].status, AvailabilityStatus::Available);
    assert_eq!(report.results[1].label, "abcxyz123.com");
    assert_eq!(
        report.results[1].status,
        AvailabilityStatus::taken_with("exp 2026-01-15")
    );
    assert_eq!(
        report.summary,
        Summary {
            available: 1,
            taken: 1,
            unknown: 0
        }
    );
}

#[tokio::test]
async fn every_enabled_provider_has_a_result() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    mock_all_providers(&server, "sample").await;

    let tlds = vec!["com".to_string(), "io".to_string()];
    let request = CheckRequest::new("sample", &[], &tlds).unwrap();
    let checker = checker_for(&request, &Endpoints::all(&server.base_url()), Duration::from_secs(5));

    let report = checker.run(&request, None).await;

    assert_eq!(report.results.len(), request.enabled().len());
    assert_eq!(report.results.len(), 8);
    assert_eq!(report.summary.total(), report.results.len());
    assert_eq!(
        report.summary,
        Summary {
            available: 5,
            taken: 3,
            unknown: 0
        }
    );

    let labels: Vec<&str> = report.results.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Comfy Publisher",
            "Comfy Node",
            "PyPI",
            "npm",
            "GitHub User",
            "GitHub Org",
            "sample.com",
            "sample.io",
        ]
    );
}

#[tokio::test]
async fn one_unreachable_provider_does_not_affect_others() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    mock_all_providers(&server, "sample").await;

    let tlds = vec!["com".to_string(), "io".to_string()];
    let request = CheckRequest::new("sample", &[], &tlds).unwrap();

    let healthy = Endpoints::all(&server.base_url());
    let mut faulty = healthy.clone();
    faulty.npm = closed_port_url();

    let baseline = checker_for(&request, &healthy, Duration::from_secs(5))
        .run(&request, None)
        .await;
    let degraded = checker_for(&request, &faulty, Duration::from_secs(5))
        .run(&request, None)
        .await;

    assert_eq!(baseline.results.len(), degraded.results.len());
    for (before, after) in baseline.results.iter().zip(&degraded.results) {
        if after.provider == ProviderKind::Npm {
            assert!(after.status.is_unknown(), "npm should be unknown: {:?}", after);
        } else {
            assert_eq!(before, after);
        }
    }
    assert_eq!(degraded.summary.unknown, 1);
}

#[tokio::test]
async fn slow_provider_times_out_within_bound() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pypi/sample/json");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sample");
            then.status(404).delay(Duration::from_secs(10));
        })
        .await;

    let request =
        CheckRequest::with_providers("sample", vec![ProviderKind::PyPi, ProviderKind::Npm])
            .unwrap();
    let checker = checker_for(
        &request,
        &Endpoints::all(&server.base_url()),
        Duration::from_millis(300),
    );

    let start = Instant::now();
    let report = checker.run(&request, None).await;

    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(report.results[0].status, AvailabilityStatus::Available);
    match &report.results[1].status {
        AvailabilityStatus::Unknown { reason } => assert!(reason.contains("timeout")),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn batch_reports_are_independent() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pypi/alpha/json");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pypi/beta/json");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pypi/gamma/json");
            then.status(200).json_body(json!({}));
        })
        .await;

    let skip = [
        ProviderGroup::Comfy,
        ProviderGroup::Npm,
        ProviderGroup::Github,
        ProviderGroup::Domain,
    ];
    let requests: Vec<CheckRequest> = ["alpha", "beta", "gamma"]
        .iter()
        .map(|name| CheckRequest::new(name, &skip, &[]).unwrap())
        .collect();
    let checker = checker_for(
        &requests[0],
        &Endpoints::all(&server.base_url()),
        Duration::from_secs(5),
    )
    .with_parallel(3);

    let reports = checker.run_all(&requests, None).await;

    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(reports[0].results[0].status, AvailabilityStatus::Available);
    assert_eq!(
        reports[1].results[0].status,
        AvailabilityStatus::Unknown {
            reason: "HTTP 500".to_string()
        }
    );
    assert_eq!(reports[2].results[0].status, AvailabilityStatus::taken());
}
