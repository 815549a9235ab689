use async_trait::async_trait;

use crate::core::{Request, ResponseWriter};
use crate::error::WebError;

#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Process the request, writing the response through `w`.
    async fn handle(&self, req: Request, w: &mut dyn ResponseWriter) -> Result<(), WebError>;
}
