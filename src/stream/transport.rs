//! Transport seam for the push channel.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::StreamError;

/// One inbound frame, stripped of transport detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Ping, pong or other control traffic.
    Control,
    /// The peer sent a close frame.
    Close,
}

/// An open push connection.
#[async_trait]
pub trait Connection: Send {
    /// Next frame, or `None` once the connection has ended.
    async fn recv(&mut self) -> Option<Result<Frame, StreamError>>;

    /// Close the connection if it is still open.
    async fn close(&mut self);
}

/// Opens push connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Where this connector connects to, for logs.
    fn target(&self) -> &str;

    async fn connect(&self) -> Result<Box<dyn Connection>, StreamError>;
}

/// Websocket connector.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Connector for WsConnector {
    fn target(&self) -> &str {
        &self.url
    }

    async fn connect(&self) -> Result<Box<dyn Connection>, StreamError> {
        let (stream, _response) =
            connect_async(self.url.as_str())
                .await
                .map_err(|e| StreamError::Connect {
                    url: self.url.clone(),
                    reason: e.to_string(),
                })?;
        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connection for WsConnection {
    async fn recv(&mut self) -> Option<Result<Frame, StreamError>> {
        let frame = match self.stream.next().await? {
            Ok(Message::Text(text)) => Ok(Frame::Text(text.as_str().to_owned())),
            Ok(Message::Binary(bytes)) => Ok(Frame::Binary(bytes.to_vec())),
            Ok(Message::Close(_)) => Ok(Frame::Close),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => {
                Ok(Frame::Control)
            }
            Err(e) => Err(StreamError::from(e)),
        };
        Some(frame)
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "Websocket close failed");
        }
    }
}
