// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use utoipa_swagger_ui::SwaggerUi;

use backend::config::AppState;
use backend::db::CampaignRepository;
use backend::docs::ApiDoc;
use backend::handlers;
use backend::middleware::auth::auth_guard;
use backend::services::LifecycleSweeper;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // A varredura de ciclo de vida é do SERVIDOR: roda agendada, mesmo sem
    // nenhum cliente ativo, e nunca é alcançável por rota HTTP.
    LifecycleSweeper::new(CampaignRepository::new(app_state.db_pool.clone())).spawn();
    tracing::info!("✅ Varredura de ciclo de vida das campanhas agendada!");

    // Rotas públicas de entrega: seleção + telemetria fire-and-forget
    let delivery_routes = Router::new()
        .route("/sponsored", get(handlers::delivery::get_sponsored))
        .route(
            "/impressions/{campaign_id}",
            post(handlers::delivery::track_impression),
        )
        .route(
            "/clicks/{campaign_id}",
            post(handlers::delivery::track_click),
        );

    // Captura de lead é pública; a caixa de entrada do anunciante não.
    let lead_routes = Router::new()
        .route("/", post(handlers::leads::create_lead))
        .route(
            "/received",
            get(handlers::leads::list_received_leads).layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth_guard),
            ),
        );

    // Gestão de campanhas: tudo atrás do guard de autenticação
    let campaign_routes = Router::new()
        .route(
            "/",
            post(handlers::campaigns::create_campaign).get(handlers::campaigns::list_campaigns),
        )
        .route(
            "/{id}/status",
            patch(handlers::campaigns::update_campaign_status),
        )
        .route("/{id}", axum::routing::delete(handlers::campaigns::delete_campaign))
        .route(
            "/{id}/analytics",
            get(handlers::campaigns::get_campaign_analytics),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/delivery", delivery_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/campaigns", campaign_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::with_security()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
