pub mod database;
pub mod mongo_database;
pub mod resource;
pub mod types;

use clap::Args;
use mongodb::{
    options::{ClientOptions, Tls, TlsOptions},
    Client,
};
use std::fmt::{Display, Formatter};

/// Tracing target for the directory store.
pub const DIRECTORY_DB_TARGET: &str = "directory-db";

// Setup the mongodb client. The cluster is addressed through a seed-list
// connection string; invalid certificates are tolerated for the
// development cluster.
pub async fn init_mongo_client(
    args: MongoArgs,
) -> Result<mongodb::Database, mongodb::error::Error> {
    let uri = format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        args.mongo_user, args.mongo_pass, args.mongo_host
    );

    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some(args.app_name);
    options.tls = Some(Tls::Enabled(
        TlsOptions::builder()
            .allow_invalid_certificates(Some(true))
            .build(),
    ));

    Client::with_options(options).map(|client| client.database(&args.mongo_db))
}

/// Mongodb connection options, sourced from flags or the environment.
#[derive(Args, Debug, Clone)]
#[clap(about, version, author)]
pub struct MongoArgs {
    #[clap(long, env = "DB_USER")]
    pub mongo_user: String,
    #[clap(long, env = "DB_PASS")]
    pub mongo_pass: String,
    #[clap(long, env = "DB_HOST")]
    pub mongo_host: String,
    #[clap(long, env = "DB_NAME", default_value = "bogurabashi")]
    pub mongo_db: String,
    #[clap(long, default_value = "directory-api")]
    pub app_name: String,
}

impl Display for MongoArgs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mongo_user ***** \
            mongo_pass ***** \
            mongo_host {} \
            mongo_db {} \
            app_name {} \
            ",
            self.mongo_host, self.mongo_db, self.app_name,
        )
    }
}
