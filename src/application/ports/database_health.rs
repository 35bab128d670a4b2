use async_trait::async_trait;

#[async_trait]
pub trait DatabaseHealth: Send + Sync {
    async fn ping(&self) -> bool;
}
