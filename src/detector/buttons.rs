use crate::types::{
    ApiButton, ApiCountSummary, ButtonConfig, ButtonKind, GraphqlApi, GrpcApi, RepositoryApiReport,
    RestApi,
};

/// Which documentation buttons a repository should surface, in fixed
/// order: swagger, graphql, grpc, then postman whenever any API type
/// was detected at all.
pub fn determine_recommended_buttons(
    rest: &[RestApi],
    graphql: &[GraphqlApi],
    grpc: &[GrpcApi],
) -> Vec<ButtonKind> {
    let mut buttons = Vec::new();

    if !rest.is_empty() {
        buttons.push(ButtonKind::Swagger);
    }
    if !graphql.is_empty() {
        buttons.push(ButtonKind::Graphql);
    }
    if !grpc.is_empty() {
        buttons.push(ButtonKind::Grpc);
    }
    if !buttons.is_empty() {
        buttons.push(ButtonKind::Postman);
    }

    buttons
}

/// Display metadata for a report. Labels embed live artifact counts.
pub fn generate_button_config(report: &RepositoryApiReport) -> ButtonConfig {
    let apis = &report.apis;
    let buttons = report
        .recommended_buttons
        .iter()
        .map(|kind| match kind {
            ButtonKind::Swagger => ApiButton {
                kind: ButtonKind::Swagger,
                label: format!("Swagger UI ({} APIs)", apis.rest.len()),
                icon: "📋".to_string(),
                color: "green".to_string(),
                url: format!("/swagger/{}", report.repository),
                description: "Explore REST/OpenAPI specifications".to_string(),
            },
            ButtonKind::Graphql => ApiButton {
                kind: ButtonKind::Graphql,
                label: format!("GraphQL Playground ({} schemas)", apis.graphql.len()),
                icon: "🔮".to_string(),
                color: "pink".to_string(),
                url: format!("/graphql/{}", report.repository),
                description: "Explore GraphQL schemas and run queries".to_string(),
            },
            ButtonKind::Grpc => ApiButton {
                kind: ButtonKind::Grpc,
                label: format!("gRPC UI ({} services)", apis.grpc.len()),
                icon: "⚡".to_string(),
                color: "blue".to_string(),
                url: format!("/grpc/{}", report.repository),
                description: "Explore gRPC service definitions".to_string(),
            },
            ButtonKind::Postman => ApiButton {
                kind: ButtonKind::Postman,
                label: format!("Postman Collection ({} APIs)", apis.total()),
                icon: "📮".to_string(),
                color: "orange".to_string(),
                url: format!("/api/postman/{}", report.repository),
                description: "Download Postman collection for API testing".to_string(),
            },
        })
        .collect();

    ButtonConfig {
        repository: report.repository.clone(),
        has_apis: report.has_any_apis,
        buttons,
        summary: ApiCountSummary {
            rest: apis.rest.len(),
            graphql: apis.graphql.len(),
            grpc: apis.grpc.len(),
            total: apis.total(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApiInventory, GraphqlKind};

    fn rest(file: &str) -> RestApi {
        RestApi {
            file: file.to_string(),
            title: None,
            version: None,
        }
    }

    fn graphql(file: &str) -> GraphqlApi {
        GraphqlApi {
            file: file.to_string(),
            kind: GraphqlKind::Schema,
            description: None,
        }
    }

    fn grpc(file: &str) -> GrpcApi {
        GrpcApi {
            file: file.to_string(),
            services: vec!["Svc".to_string()],
            package: None,
            description: None,
        }
    }

    #[test]
    fn no_apis_means_no_buttons() {
        assert!(determine_recommended_buttons(&[], &[], &[]).is_empty());
    }

    #[test]
    fn postman_is_appended_whenever_anything_was_detected() {
        assert_eq!(
            determine_recommended_buttons(&[rest("a.yaml")], &[], &[]),
            vec![ButtonKind::Swagger, ButtonKind::Postman]
        );
        assert_eq!(
            determine_recommended_buttons(&[], &[], &[grpc("a.proto")]),
            vec![ButtonKind::Grpc, ButtonKind::Postman]
        );
    }

    #[test]
    fn button_order_is_fixed() {
        let buttons = determine_recommended_buttons(
            &[rest("a.yaml")],
            &[graphql("s.graphql")],
            &[grpc("p.proto")],
        );
        assert_eq!(
            buttons,
            vec![
                ButtonKind::Swagger,
                ButtonKind::Graphql,
                ButtonKind::Grpc,
                ButtonKind::Postman,
            ]
        );
    }

    #[test]
    fn labels_embed_counts() {
        let rest_apis = vec![rest("a.yaml"), rest("b.yaml")];
        let report = RepositoryApiReport {
            repository: "fleet".to_string(),
            recommended_buttons: determine_recommended_buttons(&rest_apis, &[], &[]),
            apis: ApiInventory {
                rest: rest_apis,
                graphql: Vec::new(),
                grpc: Vec::new(),
            },
            postman: Vec::new(),
            has_any_apis: true,
            error: None,
        };

        let config = generate_button_config(&report);
        assert!(config.has_apis);
        assert_eq!(config.buttons.len(), 2);
        assert_eq!(config.buttons[0].label, "Swagger UI (2 APIs)");
        assert_eq!(config.buttons[0].url, "/swagger/fleet");
        assert_eq!(config.buttons[1].label, "Postman Collection (2 APIs)");
        assert_eq!(config.summary.rest, 2);
        assert_eq!(config.summary.total, 2);
    }
}
