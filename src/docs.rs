// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "PlanVisita", description = "CRM de visitas comerciais"),
    paths(
        // --- Clientes ---
        handlers::crm::list_clientes,
        handlers::crm::create_cliente,
        handlers::crm::get_cliente,
        handlers::crm::update_cliente,
        handlers::crm::delete_cliente,

        // --- Visitas ---
        handlers::crm::list_visitas,
        handlers::crm::create_visita,
        handlers::crm::get_visita,
        handlers::crm::update_visita,
        handlers::crm::delete_visita,

        // --- Dashboard ---
        handlers::dashboard::get_metricas,
        handlers::dashboard::get_resumo,
        handlers::dashboard::get_agenda,

        // --- Rotas ---
        handlers::rotas::list_cidades,
        handlers::rotas::get_sugestao,
        handlers::rotas::create_link_rota,
        handlers::rotas::get_mapa_cliente,
    ),
    components(
        schemas(
            // --- CRM ---
            models::crm::StatusCliente,
            models::crm::TipoVisita,
            models::crm::StatusVisita,
            models::crm::Cliente,
            models::crm::Visita,

            // --- DASHBOARD ---
            models::dashboard::Metricas,
            models::dashboard::PainelDashboard,
            models::dashboard::ResumoPeriodo,
            models::dashboard::ResumoVisitas,
            models::dashboard::DiaAgenda,

            // --- Rotas ---
            models::rotas::DiaRota,
            models::rotas::ParadaRota,
            models::rotas::RotaSugerida,
            models::rotas::LinkMapa,

            // --- Payloads ---
            handlers::crm::CreateClientePayload,
            handlers::crm::UpdateClientePayload,
            handlers::crm::CreateVisitaPayload,
            handlers::crm::UpdateVisitaPayload,
            handlers::rotas::LinkRotaPayload,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de Clientes"),
        (name = "Visitas", description = "Agendamento e Registro de Visitas"),
        (name = "Dashboard", description = "Indicadores, Resumos e Agenda"),
        (name = "Rotas", description = "Sugestão de Rotas e Links do Google Maps")
    )
)]
pub struct ApiDoc;
