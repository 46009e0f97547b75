use async_trait::async_trait;
use crate::shared::error::CollectionError;

pub trait DataCollector<T> {
    fn collect(&mut self) -> Result<T, CollectionError>;
    fn validate(&self) -> Result<(), CollectionError>;
    fn health_check(&self) -> bool;
}

#[async_trait]
pub trait AsyncDataCollector<T: Send> {
    async fn collect(&mut self) -> Result<T, CollectionError>;
    async fn validate(&self) -> Result<(), CollectionError>;
    async fn health_check(&self) -> bool;
}

pub trait Identifiable {
    fn id(&self) -> &str;
    fn category(&self) -> &str;
}

pub trait Validatable {
    fn validate(&self) -> Result<(), String>;
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
