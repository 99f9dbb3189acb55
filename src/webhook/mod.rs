//! Inbound webhook: authentication, decoding, the request pipeline and its
//! two transports (HTTP server and Lambda)

pub mod auth;
pub mod decode;
pub mod handler;
pub mod lambda;
pub mod server;

pub use handler::{WebhookHandler, WebhookRequest, WebhookResponse};
pub use lambda::run_lambda;
pub use server::{create_router, start_webhook_server};
