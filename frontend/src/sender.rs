use futures::future::LocalBoxFuture;
use gloo_net::http::Request;
use log::debug;

use crate::error::SendError;
use crate::validation::ContactFields;

/// The external operation behind a contact form submission.
pub trait FormSender {
    fn send<'a>(&'a self, fields: &'a ContactFields) -> LocalBoxFuture<'a, Result<(), SendError>>;
}

/// Stand-in used when the page has no endpoint configured: waits, then succeeds.
pub struct SimulatedSender {
    pub delay_ms: u32,
}

impl FormSender for SimulatedSender {
    fn send<'a>(&'a self, _fields: &'a ContactFields) -> LocalBoxFuture<'a, Result<(), SendError>> {
        Box::pin(async move {
            gloo_timers::future::TimeoutFuture::new(self.delay_ms).await;
            Ok(())
        })
    }
}

/// Posts the fields as JSON.
pub struct HttpSender {
    pub url: String,
}

impl FormSender for HttpSender {
    fn send<'a>(&'a self, fields: &'a ContactFields) -> LocalBoxFuture<'a, Result<(), SendError>> {
        Box::pin(async move {
            debug!("Posting contact form to {}", self.url);
            let response = Request::post(&self.url)
                .json(fields)
                .map_err(|e| SendError::Encode(e.to_string()))?
                .send()
                .await
                .map_err(|e| SendError::Network(e.to_string()))?;
            if response.ok() {
                Ok(())
            } else {
                Err(SendError::Status(response.status()))
            }
        })
    }
}
