use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use exam_hub_server::{
    app_state::AppState, auth::AuthMiddleware, config::Config, graphql::create_schema,
    handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if config.is_production() {
        config.validate_for_production().map_err(std::io::Error::other)?;
    }

    let state = AppState::new(config.clone())
        .await
        .map_err(std::io::Error::other)?;
    let jwt_service = web::Data::from(state.jwt_service.clone());
    let schema = web::Data::new(create_schema(state.clone()));
    let app_state = web::Data::new(state);

    log::info!(
        "Starting HTTP server on {}:{}",
        config.web_server_host,
        config.web_server_port
    );
    log::info!(
        "GraphiQL playground: http://{}:{}/graphiql",
        config.web_server_host,
        config.web_server_port
    );

    let cors_origin = config.cors_allowed_origin.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .app_data(jwt_service.clone())
            .app_data(schema.clone())
            .wrap(AuthMiddleware)
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}
