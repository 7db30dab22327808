use crate::types::{DetectionSummary, RepositoryApiReport};

/// Fleet-wide totals across per-repository reports. Coverage is the
/// percentage of repositories with at least one detected API, defined
/// as 0 for an empty fleet.
pub fn generate_summary(reports: &[RepositoryApiReport]) -> DetectionSummary {
    let total_repositories = reports.len();
    let repositories_with_apis = reports.iter().filter(|r| r.has_any_apis).count();
    let api_coverage = if total_repositories == 0 {
        0
    } else {
        (repositories_with_apis as f64 / total_repositories as f64 * 100.0).round() as u32
    };

    DetectionSummary {
        total_repositories,
        total_rest_apis: reports.iter().map(|r| r.apis.rest.len()).sum(),
        total_graphql_schemas: reports.iter().map(|r| r.apis.graphql.len()).sum(),
        total_grpc_services: reports.iter().map(|r| r.apis.grpc.len()).sum(),
        repositories_with_apis,
        api_coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApiInventory, ButtonKind, RestApi};

    fn report_with_rest(repository: &str, count: usize) -> RepositoryApiReport {
        let rest: Vec<RestApi> = (0..count)
            .map(|i| RestApi {
                file: format!("api{i}.yaml"),
                title: None,
                version: None,
            })
            .collect();
        RepositoryApiReport {
            repository: repository.to_string(),
            has_any_apis: !rest.is_empty(),
            recommended_buttons: if rest.is_empty() {
                Vec::new()
            } else {
                vec![ButtonKind::Swagger, ButtonKind::Postman]
            },
            apis: ApiInventory {
                rest,
                graphql: Vec::new(),
                grpc: Vec::new(),
            },
            postman: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn totals_and_coverage() {
        let reports = vec![
            report_with_rest("a", 2),
            report_with_rest("b", 0),
            report_with_rest("c", 1),
        ];

        let summary = generate_summary(&reports);
        assert_eq!(summary.total_repositories, 3);
        assert_eq!(summary.total_rest_apis, 3);
        assert_eq!(summary.repositories_with_apis, 2);
        assert_eq!(summary.api_coverage, 67);
    }

    #[test]
    fn empty_fleet_has_zero_coverage() {
        let summary = generate_summary(&[]);
        assert_eq!(summary.total_repositories, 0);
        assert_eq!(summary.api_coverage, 0);
    }

    #[test]
    fn failed_repositories_still_count_toward_totals() {
        let reports = vec![
            report_with_rest("a", 1),
            RepositoryApiReport::failed("broken".to_string(), "unreadable".to_string()),
        ];

        let summary = generate_summary(&reports);
        assert_eq!(summary.total_repositories, 2);
        assert_eq!(summary.repositories_with_apis, 1);
        assert_eq!(summary.api_coverage, 50);
    }
}
