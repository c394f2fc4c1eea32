use letter_registry_db::repository::RepositoryError;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Transaction shared by the repositories of one session.
///
/// The slot is emptied by `commit` / `rollback`; later use fails with
/// [`transaction_consumed`].
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn commit(&self) -> Result<(), RepositoryError> {
        let tx = self.tx.lock().await.take().ok_or_else(transaction_consumed)?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(&self) -> Result<(), RepositoryError> {
        let tx = self.tx.lock().await.take().ok_or_else(transaction_consumed)?;
        tx.rollback().await?;
        Ok(())
    }
}

pub fn transaction_consumed() -> RepositoryError {
    RepositoryError::Invalid("Transaction has been consumed".into())
}
