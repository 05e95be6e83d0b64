use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::model::{AttemptError, LedgerError, PartError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Part(#[from] PartError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
}
