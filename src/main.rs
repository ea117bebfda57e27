use rollcall::config::Config;
use rollcall::routes;
use rollcall::services::school;
use rollcall::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let port = config.port;
    let seeds = config.seed_schools.clone();
    let state = AppState::new(config);

    school::seed_schools(&state, &seeds).await;

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, schools = seeds.len(), "rollcall listening");
    axum::serve(listener, app).await?;
    Ok(())
}
