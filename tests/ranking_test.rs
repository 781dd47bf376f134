//! Tests for building and querying [`RepositoryViewSet`] from raw upstream
//! repository arrays.

use readcache::ranking::compare_entries;
use readcache::{Criterion, OrderValue, ProxyError, RankedEntry, RepositoryViewSet};

fn repo(name: &str, forks: i64, stars: i64, issues: i64, updated: &str) -> serde_json::Value {
    serde_json::json!({
        "full_name": name,
        "forks_count": forks,
        "stargazers_count": stars,
        "open_issues_count": issues,
        "updated_at": updated,
        // Unrelated fields are ignored
        "private": false,
        "owner": {"login": "acme"},
    })
}

fn raw(repos: &[serde_json::Value]) -> String {
    serde_json::to_string(repos).unwrap()
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn views_are_sorted_descending() {
    let views = RepositoryViewSet::build(&raw(&[
        repo("a", 1, 30, 5, "2020-01-01T00:00:00Z"),
        repo("b", 3, 10, 15, "2022-01-01T00:00:00Z"),
        repo("c", 2, 20, 10, "2021-01-01T00:00:00Z"),
    ]))
    .unwrap();

    let names = |c| -> Vec<String> {
        views
            .ordered_by(c)
            .iter()
            .map(|e| e.name.clone())
            .collect()
    };
    assert_eq!(names(Criterion::Forks), ["b", "c", "a"]);
    assert_eq!(names(Criterion::Stars), ["a", "c", "b"]);
    assert_eq!(names(Criterion::OpenIssues), ["b", "c", "a"]);
    assert_eq!(names(Criterion::LastUpdated), ["b", "c", "a"]);
}

#[test]
fn ties_are_broken_by_name_ascending() {
    let views = RepositoryViewSet::build(&raw(&[
        repo("zeta", 5, 0, 0, "2020-01-01T00:00:00Z"),
        repo("alpha", 5, 0, 0, "2020-01-01T00:00:00Z"),
        repo("mid", 5, 0, 0, "2020-01-01T00:00:00Z"),
    ]))
    .unwrap();

    for criterion in Criterion::ALL {
        let names: Vec<&str> = views
            .ordered_by(criterion)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["alpha", "mid", "zeta"], "{criterion}");
    }
}

#[test]
fn input_order_does_not_matter() {
    let repos = vec![
        repo("x", 4, 4, 4, "2020-04-01T00:00:00Z"),
        repo("y", 4, 1, 9, "2020-02-01T00:00:00Z"),
        repo("z", 1, 4, 9, "2020-04-01T00:00:00Z"),
    ];
    let mut reversed = repos.clone();
    reversed.reverse();

    let forward = RepositoryViewSet::build(&raw(&repos)).unwrap();
    let backward = RepositoryViewSet::build(&raw(&reversed)).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn every_view_holds_every_repository() {
    let views = RepositoryViewSet::build(&raw(&[
        repo("a", 1, 1, 1, "2020-01-01T00:00:00Z"),
        repo("b", 2, 2, 2, "2020-01-02T00:00:00Z"),
    ]))
    .unwrap();
    assert_eq!(views.len(), 2);
    for criterion in Criterion::ALL {
        let entries = views.ordered_by(criterion);
        assert_eq!(entries.len(), 2);
        assert!(entries.windows(2).all(|w| compare_entries(&w[0], &w[1]).is_le()));
    }
}

#[test]
fn last_updated_uses_timestamp_values() {
    let views =
        RepositoryViewSet::build(&raw(&[repo("a", 1, 1, 1, "2023-11-29T10:00:00Z")])).unwrap();
    assert_eq!(
        views.ordered_by(Criterion::LastUpdated)[0].order,
        OrderValue::Timestamp("2023-11-29T10:00:00Z".into())
    );
}

// =============================================================================
// Bottom-N
// =============================================================================

#[test]
fn bottom_two_by_forks() {
    let views = RepositoryViewSet::build(&raw(&[
        repo("Repo1", 100, 0, 0, "2020-01-01T00:00:00Z"),
        repo("Repo2", 200, 0, 0, "2020-01-01T00:00:00Z"),
        repo("Repo3", 150, 0, 0, "2020-01-01T00:00:00Z"),
    ]))
    .unwrap();

    assert_eq!(
        views.bottom(Criterion::Forks, 2),
        &[
            RankedEntry::count("Repo3", 150),
            RankedEntry::count("Repo1", 100)
        ]
    );
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn missing_field_reports_field_and_index() {
    let mut second = repo("b", 1, 1, 1, "2020-01-01T00:00:00Z");
    second.as_object_mut().unwrap().remove("stargazers_count");

    let err = RepositoryViewSet::build(&raw(&[
        repo("a", 1, 1, 1, "2020-01-01T00:00:00Z"),
        second,
    ]))
    .unwrap_err();
    match err {
        ProxyError::MissingField { field, index } => {
            assert_eq!(field, "stargazers_count");
            assert_eq!(index, 1);
        }
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn missing_name_is_reported() {
    let mut nameless = repo("a", 1, 1, 1, "2020-01-01T00:00:00Z");
    nameless.as_object_mut().unwrap().remove("full_name");

    let err = RepositoryViewSet::build(&raw(&[nameless])).unwrap_err();
    assert!(matches!(
        err,
        ProxyError::MissingField {
            field: "full_name",
            index: 0
        }
    ));
}

#[test]
fn array_shaped_record_is_malformed() {
    let err = RepositoryViewSet::build(r#"[["Repo1", 1, 2, 3, "2020-01-01"]]"#).unwrap_err();
    assert!(matches!(err, ProxyError::MalformedResponse(_)));
}

#[test]
fn non_array_is_malformed() {
    let err = RepositoryViewSet::build(r#"{"full_name":"a"}"#).unwrap_err();
    assert!(matches!(err, ProxyError::MalformedResponse(_)));
}

#[test]
fn wrongly_typed_count_is_malformed() {
    let err = RepositoryViewSet::build(
        r#"[{"full_name":"a","forks_count":"many","stargazers_count":1,"open_issues_count":1,"updated_at":"x"}]"#,
    )
    .unwrap_err();
    assert!(matches!(err, ProxyError::MalformedResponse(_)));
}

#[test]
fn invalid_json_is_malformed() {
    let err = RepositoryViewSet::build("not json").unwrap_err();
    assert!(matches!(err, ProxyError::MalformedResponse(_)));
}
