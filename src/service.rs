//! Query service: orchestrates the GitHub client, mapper, and store.
//!
//! The search path fetches one page from GitHub, maps each item (dropping
//! the ones that fail), and upserts the survivors. The read path pushes the
//! equality/threshold filters down to the store, then applies the name
//! filter and sort in memory.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::github::{map_item, GitHubClient};
use crate::models::{Repository, SortKey, SortOrder};
use crate::store::RepoStore;

const SEARCH_PAGE_SIZE: u32 = 30;

pub struct RepoService {
    store: Arc<RepoStore>,
    github: GitHubClient,
}

impl RepoService {
    pub fn new(store: Arc<RepoStore>, github: GitHubClient) -> Self {
        Self { store, github }
    }

    /// Search GitHub and persist every repository that maps cleanly.
    ///
    /// Returns the full mapped list. Individual items that fail to map are
    /// logged and skipped; a store fault is fatal to the whole call.
    pub async fn search_and_save(
        &self,
        query: Option<&str>,
        language: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Vec<Repository>, ServiceError> {
        let query = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => {
                return Err(ServiceError::InvalidArgument(
                    "Query parameter is required and cannot be empty".to_string(),
                ))
            }
        };
        let sort = match sort {
            Some(s) => SortKey::parse(s)?,
            None => SortKey::Stars,
        };

        let built_query = build_query(query, language);
        tracing::info!("Query param: {built_query}");

        let items = self
            .github
            .search(&built_query, sort.as_str(), "desc", SEARCH_PAGE_SIZE)
            .await?;

        let repos: Vec<Repository> = items.iter().filter_map(map_item).collect();
        for repo in &repos {
            self.store.upsert(repo)?;
        }
        tracing::info!("Successfully saved {} repositories", repos.len());
        Ok(repos)
    }

    /// Return stored repositories matching the given filters, sorted.
    pub fn repositories_with_filters(
        &self,
        language: Option<&str>,
        min_stars: Option<i64>,
        min_forks: Option<i64>,
        name: Option<&str>,
        sort_by: &str,
        sort_order: &str,
    ) -> Result<Vec<Repository>, ServiceError> {
        if min_stars.is_some_and(|n| n < 0) {
            return Err(ServiceError::InvalidArgument(
                "Minimum stars count cannot be negative".to_string(),
            ));
        }
        if min_forks.is_some_and(|n| n < 0) {
            return Err(ServiceError::InvalidArgument(
                "Minimum forks count cannot be negative".to_string(),
            ));
        }
        let sort_by = SortKey::parse(sort_by)?;
        let sort_order = SortOrder::parse(sort_order)?;

        let mut repos = self.store.query(language, min_stars, min_forks)?;

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            let needle = name.to_lowercase();
            repos.retain(|r| {
                r.name
                    .as_ref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            });
        }

        sort_repositories(&mut repos, sort_by, sort_order);
        tracing::info!("Retrieved {} repositories with filters", repos.len());
        Ok(repos)
    }
}

/// Concatenate the search terms with an optional `language:` qualifier, then
/// encode whitespace as `+` for transport.
fn build_query(query: &str, language: Option<&str>) -> String {
    let mut built = query.to_string();
    if let Some(lang) = language.filter(|l| !l.is_empty()) {
        if !built.is_empty() {
            built.push(' ');
        }
        built.push_str("language:");
        built.push_str(lang);
    }
    built
        .chars()
        .map(|c| if c.is_whitespace() { '+' } else { c })
        .collect()
}

/// Stable sort by the given key. Records with a null key sort last in both
/// directions; `desc` reverses only the comparison of present values.
fn sort_repositories(repos: &mut [Repository], key: SortKey, order: SortOrder) {
    repos.sort_by(|a, b| match key {
        SortKey::Stars => directed(a.stars.cmp(&b.stars), order),
        SortKey::Forks => directed(a.forks.cmp(&b.forks), order),
        SortKey::Updated => nulls_last(a.last_updated.as_ref(), b.last_updated.as_ref(), order),
        SortKey::Name => nulls_last(a.name.as_ref(), b.name.as_ref(), order),
    });
}

fn directed(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

fn nulls_last<T: Ord>(a: Option<&T>, b: Option<&T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => directed(x.cmp(y), order),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn repo(id: i64, name: Option<&str>, stars: i64, forks: i64) -> Repository {
        Repository {
            id,
            name: name.map(str::to_string),
            description: None,
            owner: Some("octocat".to_string()),
            language: Some("Rust".to_string()),
            stars,
            forks,
            last_updated: None,
        }
    }

    #[test]
    fn test_build_query_appends_language_qualifier() {
        assert_eq!(build_query("raft", Some("go")), "raft+language:go");
    }

    #[test]
    fn test_build_query_without_language() {
        assert_eq!(build_query("raft consensus", None), "raft+consensus");
        assert_eq!(build_query("raft", Some("")), "raft");
    }

    #[test]
    fn test_build_query_encodes_all_whitespace() {
        assert_eq!(build_query("a\tb c", None), "a+b+c");
    }

    #[test]
    fn test_sort_by_stars_desc() {
        let mut repos = vec![
            repo(1, Some("a"), 5, 0),
            repo(2, Some("b"), 50, 0),
            repo(3, Some("c"), 10, 0),
        ];
        sort_repositories(&mut repos, SortKey::Stars, SortOrder::Desc);
        let stars: Vec<i64> = repos.iter().map(|r| r.stars).collect();
        assert_eq!(stars, vec![50, 10, 5]);
    }

    #[test]
    fn test_sort_by_forks_asc() {
        let mut repos = vec![
            repo(1, Some("a"), 0, 9),
            repo(2, Some("b"), 0, 1),
            repo(3, Some("c"), 0, 4),
        ];
        sort_repositories(&mut repos, SortKey::Forks, SortOrder::Asc);
        let forks: Vec<i64> = repos.iter().map(|r| r.forks).collect();
        assert_eq!(forks, vec![1, 4, 9]);
    }

    #[test]
    fn test_sort_by_name_nulls_last_both_directions() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let mut repos = vec![
                repo(1, None, 0, 0),
                repo(2, Some("beta"), 0, 0),
                repo(3, Some("alpha"), 0, 0),
            ];
            sort_repositories(&mut repos, SortKey::Name, order);
            assert_eq!(repos.last().unwrap().id, 1, "null name must sort last");
            let names: Vec<_> = repos[..2].iter().map(|r| r.name.clone().unwrap()).collect();
            match order {
                SortOrder::Asc => assert_eq!(names, vec!["alpha", "beta"]),
                SortOrder::Desc => assert_eq!(names, vec!["beta", "alpha"]),
            }
        }
    }

    #[test]
    fn test_sort_by_updated_nulls_last_both_directions() {
        let early = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let mut repos = vec![
                repo(1, Some("a"), 0, 0),
                repo(2, Some("b"), 0, 0),
                repo(3, Some("c"), 0, 0),
            ];
            repos[1].last_updated = Some(late);
            repos[2].last_updated = Some(early);
            sort_repositories(&mut repos, SortKey::Updated, order);
            assert_eq!(repos.last().unwrap().id, 1, "null timestamp must sort last");
            match order {
                SortOrder::Asc => assert_eq!(repos[0].id, 3),
                SortOrder::Desc => assert_eq!(repos[0].id, 2),
            }
        }
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut repos = vec![
            repo(10, Some("x"), 5, 0),
            repo(20, Some("y"), 5, 0),
            repo(30, Some("z"), 5, 0),
        ];
        sort_repositories(&mut repos, SortKey::Stars, SortOrder::Desc);
        let ids: Vec<i64> = repos.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    fn service_with_empty_store() -> RepoService {
        let store = Arc::new(RepoStore::open_in_memory().unwrap());
        let github = GitHubClient::new(
            reqwest::Client::new(),
            crate::config::GitHubConfig::default(),
        );
        RepoService::new(store, github)
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let service = service_with_empty_store();
        for q in [None, Some(""), Some("   ")] {
            let err = service.search_and_save(q, None, None).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidArgument(_)), "query {q:?}");
        }
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_sort() {
        let service = service_with_empty_store();
        let err = service
            .search_and_save(Some("raft"), None, Some("watchers"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn test_read_path_rejects_negative_thresholds() {
        let service = service_with_empty_store();
        let err = service
            .repositories_with_filters(None, Some(-1), None, None, "stars", "desc")
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let err = service
            .repositories_with_filters(None, None, Some(-5), None, "stars", "desc")
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn test_read_path_rejects_bad_sort_params() {
        let service = service_with_empty_store();
        assert!(service
            .repositories_with_filters(None, None, None, None, "size", "desc")
            .is_err());
        assert!(service
            .repositories_with_filters(None, None, None, None, "stars", "down")
            .is_err());
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let service = service_with_empty_store();
        service.store.upsert(&repo(1, Some("Foo-Bar"), 1, 0)).unwrap();
        service.store.upsert(&repo(2, Some("baz"), 2, 0)).unwrap();
        service.store.upsert(&repo(3, None, 3, 0)).unwrap();

        let hits = service
            .repositories_with_filters(None, None, None, Some("foo"), "stars", "desc")
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_empty_name_filter_is_ignored() {
        let service = service_with_empty_store();
        service.store.upsert(&repo(1, Some("a"), 1, 0)).unwrap();
        service.store.upsert(&repo(2, None, 2, 0)).unwrap();

        let hits = service
            .repositories_with_filters(None, None, None, Some(""), "stars", "desc")
            .unwrap();
        assert_eq!(hits.len(), 2);
    }
}
