use clap::Parser;
use directory_api::{
    arguments::{AppConfig, ProgramArgs},
    build_app, DIRECTORY_API_TARGET,
};
use directory_database::{database::DirectoryStore, mongo_database::MongoDirectory};
use std::{error::Error, net::SocketAddr, sync::Arc};
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .pretty()
        .init();

    let program_opts = ProgramArgs::parse();
    let app_config = AppConfig::new(
        program_opts.jwt_secret.as_bytes(),
        &program_opts.allowed_origins,
    );
    let port = program_opts.port;

    let store: Arc<dyn DirectoryStore> =
        Arc::new(MongoDirectory::new(program_opts.mongo_opts()).await?);

    let app = build_app(store, app_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    event!(
        target: DIRECTORY_API_TARGET,
        Level::INFO,
        "listening on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(Into::into)
}
