use crate::{config, contacts_client, web};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("contacts client error: {0}")]
    ContactsClient(#[from] contacts_client::Error),
    #[error("data parsing error: {0}")]
    DataParsing(#[from] web::types::DataParsingError),
    #[error("lambda runtime error: {0}")]
    Gateway(String),

    #[error("tokio joining error: {0}")]
    TokioJoin(#[from] tokio::task::JoinError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
