use reqwest::Client;
use serde::Deserialize;

use crate::embedder::FaceEmbedder;
use crate::error::EmbeddingError;
use crate::vector::EMBEDDING_DIM;

/// Face embedder backed by an HTTP inference service.
///
/// POSTs the raw image bytes to `{base_url}/embed` and expects a JSON
/// body of the form `{"embedding": [f32; 512]}`. Works with any service
/// exposing that shape.
pub struct RemoteEmbedder {
    client: Client,
    base_url: String,
    dim: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl RemoteEmbedder {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            dim: EMBEDDING_DIM,
        }
    }

    /// Sets the expected output dimensionality (default 512). Responses
    /// with any other number of components are rejected as decode
    /// failures before they can reach a gallery comparison.
    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }
}

#[async_trait::async_trait]
impl FaceEmbedder for RemoteEmbedder {
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, EmbeddingError> {
        if image.is_empty() {
            return Err(EmbeddingError::Decode("empty image".to_string()));
        }

        let url = format!("{}/embed", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| EmbeddingError::Decode(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::Decode(format!(
                "inference service returned {status}: {body}"
            )));
        }

        let parsed: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| EmbeddingError::Decode(format!("bad response body: {e}")))?;
        if parsed.embedding.len() != self.dim {
            return Err(EmbeddingError::Decode(format!(
                "inference service returned {} components, expected {}",
                parsed.embedding.len(),
                self.dim
            )));
        }
        Ok(parsed.embedding)
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Accepts one connection, drains the request, and answers with the
    /// given JSON body. Returns the base URL to point the embedder at.
    async fn spawn_inference_stub(body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Drain headers, then the announced request body, before
            // responding; closing early confuses the client.
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let mut header_end = None;
            let mut body_len = 0usize;
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if header_end.is_none() {
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        header_end = Some(pos + 4);
                        let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
                        body_len = headers
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse().ok())
                            .unwrap_or(0);
                    }
                }
                if let Some(end) = header_end {
                    if buf.len() >= end + body_len {
                        break;
                    }
                }
            }

            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(resp.as_bytes()).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn embed_returns_the_service_vector() {
        let url = spawn_inference_stub(r#"{"embedding":[0.5,0.25]}"#).await;
        let embedder = RemoteEmbedder::new(&url).with_dimension(2);

        let vec = embedder.embed(b"jpeg bytes").await.unwrap();
        assert_eq!(vec, vec![0.5, 0.25]);
        assert_eq!(embedder.dimension(), 2);
    }

    #[tokio::test]
    async fn embed_rejects_a_wrong_service_dimension() {
        let url = spawn_inference_stub(r#"{"embedding":[0.5,0.25]}"#).await;
        let embedder = RemoteEmbedder::new(&url).with_dimension(4);

        let err = embedder.embed(b"jpeg bytes").await.unwrap_err();
        let EmbeddingError::Decode(msg) = err else {
            panic!("expected decode error, got {err:?}");
        };
        assert!(msg.contains("expected 4"), "message: {msg}");
    }

    #[tokio::test]
    async fn embed_rejects_empty_input_without_a_request() {
        let embedder = RemoteEmbedder::new("http://127.0.0.1:1");
        let err = embedder.embed(b"").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Decode(_)));
    }
}

