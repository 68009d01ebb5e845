// src/routes.rs

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn router(app_state: AppState) -> Router {
    let cliente_routes = Router::new()
        .route("/"
               ,post(handlers::crm::create_cliente)
               .get(handlers::crm::list_clientes)
        )
        .route("/{id}"
               ,get(handlers::crm::get_cliente)
               .put(handlers::crm::update_cliente)
               .delete(handlers::crm::delete_cliente)
        )
        .route("/{id}/mapa"
               ,get(handlers::rotas::get_mapa_cliente)
        );

    let visita_routes = Router::new()
        .route("/"
               ,post(handlers::crm::create_visita)
               .get(handlers::crm::list_visitas)
        )
        .route("/{id}"
               ,get(handlers::crm::get_visita)
               .put(handlers::crm::update_visita)
               .delete(handlers::crm::delete_visita)
        );

    let dashboard_routes = Router::new()
        .route("/metricas", get(handlers::dashboard::get_metricas))
        .route("/resumo", get(handlers::dashboard::get_resumo));

    let rota_routes = Router::new()
        .route("/cidades", get(handlers::rotas::list_cidades))
        .route("/sugestao", get(handlers::rotas::get_sugestao))
        .route("/link", post(handlers::rotas::create_link_rota));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/agenda", get(handlers::dashboard::get_agenda))
        .nest("/api/clientes", cliente_routes)
        .nest("/api/visitas", visita_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/rotas", rota_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::Weekday;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::db::{CrmRepository, MemoryRecordStore};

    async fn test_app() -> Router {
        let repo = CrmRepository::load(Arc::new(MemoryRecordStore::new()))
            .await
            .unwrap()
            .into_shared();
        router(AppState::from_repository(repo, Weekday::Sun))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn create_cliente(app: &Router, nome: &str, cidade: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/clientes",
            Some(json!({
                "nome": nome,
                "empresa": format!("{nome} Ltda"),
                "telefone": "(11) 90000-0000",
                "email": "contato@empresa.com",
                "endereco": "Rua A, 10",
                "cidade": cidade,
                "estado": "SP",
                "status": "ativo"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_visita(app: &Router, cliente_id: &str, data: &str, extra: Value) -> Value {
        let mut payload = json!({
            "clienteId": cliente_id,
            "data": data,
            "horario": "10:00",
            "objetivo": "Apresentação"
        });
        if let (Some(obj), Some(extra)) = (payload.as_object_mut(), extra.as_object()) {
            obj.extend(extra.clone());
        }
        let (status, body) = send(app, "POST", "/api/visitas", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    #[tokio::test]
    async fn health_check_answers_ok() {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn creates_and_searches_clientes() {
        let app = test_app().await;
        let id = create_cliente(&app, "Ana", "São Paulo").await;
        create_cliente(&app, "Bruno", "Campinas").await;

        let (status, body) = send(&app, "GET", "/api/clientes?busca=paulo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], json!(id));

        let (status, body) = send(&app, "GET", &format!("/api/clientes/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nome"], json!("Ana"));
    }

    #[tokio::test]
    async fn rejects_cliente_without_required_fields() {
        let app = test_app().await;
        let (status, body) = send(&app, "POST", "/api/clientes", Some(json!({ "nome": "Ana" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"].get("empresa").is_some());
        assert!(body["details"].get("email").is_some());
    }

    #[tokio::test]
    async fn unknown_ids_return_not_found() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/clientes/nao-existe", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], json!("cliente_not_found"));

        let (status, _) = send(&app, "DELETE", "/api/visitas/nao-existe", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/api/visitas",
            Some(json!({
                "clienteId": "nao-existe",
                "data": "2024-01-10",
                "horario": "10:00",
                "objetivo": "Demo"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_malformed_visit_fields() {
        let app = test_app().await;
        let id = create_cliente(&app, "Ana", "São Paulo").await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/visitas",
            Some(json!({ "clienteId": id, "data": "2024-01-10", "horario": "25h", "objetivo": "Demo" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "POST",
            "/api/visitas",
            Some(json!({
                "clienteId": id,
                "data": "2024-01-10",
                "horario": "10:00",
                "objetivo": "Demo",
                "valorNegociado": "-10"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("negative_value"));
    }

    #[tokio::test]
    async fn deleting_cliente_removes_its_visits() {
        let app = test_app().await;
        let ana = create_cliente(&app, "Ana", "São Paulo").await;
        let bruno = create_cliente(&app, "Bruno", "São Paulo").await;
        create_visita(&app, &ana, "2024-01-10", json!({})).await;
        create_visita(&app, &ana, "2024-01-11", json!({})).await;
        create_visita(&app, &bruno, "2024-01-12", json!({})).await;

        let (status, body) = send(&app, "DELETE", &format!("/api/clientes/{ana}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["visitasRemovidas"], json!(2));

        let (_, visitas) = send(&app, "GET", "/api/visitas", None).await;
        let visitas = visitas.as_array().unwrap();
        assert_eq!(visitas.len(), 1);
        assert_eq!(visitas[0]["clienteId"], json!(bruno));
    }

    #[tokio::test]
    async fn filters_visitas_by_status() {
        let app = test_app().await;
        let ana = create_cliente(&app, "Ana", "São Paulo").await;
        create_visita(&app, &ana, "2024-01-10", json!({ "status": "realizada" })).await;
        create_visita(&app, &ana, "2024-01-12", json!({})).await;

        let (_, todas) = send(&app, "GET", "/api/visitas?status=todas", None).await;
        assert_eq!(todas.as_array().unwrap().len(), 2);
        // Mais recente primeiro
        assert_eq!(todas[0]["data"], json!("2024-01-12"));

        let (_, realizadas) = send(&app, "GET", "/api/visitas?status=realizada", None).await;
        assert_eq!(realizadas.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "GET", "/api/visitas?status=perdida", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_reports_metrics_and_summary() {
        let app = test_app().await;
        let ana = create_cliente(&app, "Ana", "São Paulo").await;
        create_visita(
            &app,
            &ana,
            "2024-01-10",
            json!({ "status": "realizada", "valorNegociado": 1000, "vendaRealizada": true }),
        )
        .await;

        let (status, painel) = send(&app, "GET", "/api/dashboard/metricas", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(painel["metricas"]["totalClientes"], json!(1));
        assert_eq!(painel["metricas"]["visitasRealizadas"], json!(1));
        assert_eq!(painel["metricas"]["valorTotalNegociado"], json!(1000.0));
        assert_eq!(painel["metricas"]["taxaConversao"], json!(100.0));
        assert_eq!(painel["ultimasVisitas"].as_array().unwrap().len(), 1);

        // 2024-01-10 foi uma quarta; a semana começa no domingo 07/01
        let (_, resumo) = send(&app, "GET", "/api/dashboard/resumo?referencia=2024-01-12", None).await;
        assert_eq!(resumo["semanal"]["inicio"], json!("2024-01-07"));
        assert_eq!(resumo["semanal"]["visitas"], json!(1));
        assert_eq!(resumo["semanal"]["vendas"], json!(1));
        assert_eq!(resumo["mensal"]["inicio"], json!("2024-01-01"));
    }

    #[tokio::test]
    async fn agenda_groups_scheduled_visits_by_day() {
        let app = test_app().await;
        let ana = create_cliente(&app, "Ana", "São Paulo").await;
        create_visita(&app, &ana, "2024-01-10", json!({ "horario": "15:00" })).await;
        create_visita(&app, &ana, "2024-01-10", json!({ "horario": "08:30" })).await;
        create_visita(&app, &ana, "2024-01-20", json!({})).await;

        let (status, agenda) = send(&app, "GET", "/api/agenda?referencia=2024-01-09", None).await;
        assert_eq!(status, StatusCode::OK);

        let dias = agenda.as_array().unwrap();
        assert_eq!(dias.len(), 7);
        assert_eq!(dias[0]["hoje"], json!(true));
        assert_eq!(dias[1]["data"], json!("2024-01-10"));
        assert_eq!(dias[1]["visitas"][0]["horario"], json!("08:30"));
        assert_eq!(dias[1]["visitas"][1]["horario"], json!("15:00"));

        let total: usize = dias.iter().map(|d| d["visitas"].as_array().unwrap().len()).sum();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn suggests_route_and_builds_maps_link() {
        let app = test_app().await;
        let ana = create_cliente(&app, "Ana", "São Paulo").await;
        create_cliente(&app, "Bruno", "São Paulo").await;
        create_visita(&app, &ana, "2024-01-10", json!({})).await;

        let (_, cidades) = send(&app, "GET", "/api/rotas/cidades", None).await;
        assert_eq!(cidades, json!(["São Paulo"]));

        let (status, rota) = send(&app, "GET", "/api/rotas/sugestao?cidade=paulo&dia=terca", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rota["totalClientes"], json!(2));
        assert_eq!(rota["paradas"][0]["cliente"]["nome"], json!("Ana"));

        let (status, link) = send(
            &app,
            "POST",
            "/api/rotas/link",
            Some(json!({ "cidade": "paulo", "lat": -23.5, "lng": -46.6 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(link["destinos"], json!(2));
        assert!(link["url"].as_str().unwrap().starts_with("https://www.google.com/maps/dir/"));

        let (status, body) = send(&app, "POST", "/api/rotas/link", Some(json!({ "cidade": "Recife" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], json!("route_without_addresses"));
    }

    #[tokio::test]
    async fn cliente_map_link_uses_search_without_origin() {
        let app = test_app().await;
        let ana = create_cliente(&app, "Ana", "São Paulo").await;

        let (status, link) = send(&app, "GET", &format!("/api/clientes/{ana}/mapa"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(link["url"].as_str().unwrap().starts_with("https://www.google.com/maps/search/"));
    }

    #[tokio::test]
    async fn errors_follow_accept_language() {
        let app = test_app().await;
        let request = Request::builder()
            .uri("/api/visitas/nao-existe")
            .header("accept-language", "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], json!("Visit not found."));
    }

    #[tokio::test]
    async fn malformed_visit_date_is_a_localized_bad_request() {
        let app = test_app().await;
        let ana = create_cliente(&app, "Ana", "São Paulo").await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/visitas")
            .header("content-type", "application/json")
            .header("accept-language", "en")
            .body(Body::from(
                json!({
                    "clienteId": ana,
                    "data": "10/01/2024",
                    "horario": "10:00",
                    "objetivo": "Demo"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );

        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], json!("invalid_request"));
        assert!(body["error"].as_str().unwrap().starts_with("Malformed request"));

        let (status, body) = send(
            &app,
            "POST",
            "/api/visitas",
            Some(json!({ "clienteId": ana, "data": "2024-01-10", "horario": "10:00", "objetivo": "Demo", "tipo": "fax" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("invalid_request"));
    }

    #[tokio::test]
    async fn malformed_query_string_is_a_bad_request() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/agenda?referencia=ontem", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("invalid_request"));

        let (status, _) = send(&app, "GET", "/api/rotas/sugestao?cidade=x&dia=domingo", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reference_dates_at_calendar_limits_are_rejected() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/agenda?referencia=%2B262142-12-31", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("date_out_of_range"));

        let (status, body) = send(&app, "GET", "/api/dashboard/resumo?referencia=-262143-01-01", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("date_out_of_range"));
    }

    #[tokio::test]
    async fn metrics_do_not_depend_on_reference_date() {
        let app = test_app().await;

        let (status, painel) = send(&app, "GET", "/api/dashboard/metricas?referencia=2024-01-01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(painel["metricas"]["totalClientes"], json!(0));
    }
}
