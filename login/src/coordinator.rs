use std::sync::Arc;

use tracing::{debug, warn};

use facegate_embedding::{decode_image, FaceEmbedder, FaceVector};
use facegate_gallery::{decide, nearest, GalleryStore, MatchDecision, DEFAULT_ACCEPT_THRESHOLD};
use facegate_session::{SessionError, SessionRegistry};

/// Orchestrates one login evaluation: input -> gallery scan -> decision
/// -> publish into the session registry.
///
/// Read-only against the gallery. Every evaluation failure (malformed
/// vector, undecodable image, store error) is converted into a published
/// "failed" decision: a waiting session must never expire just because
/// its submission was bad.
pub struct LoginCoordinator {
    gallery: Arc<dyn GalleryStore>,
    embedder: Arc<dyn FaceEmbedder>,
    registry: Arc<SessionRegistry<MatchDecision>>,
    threshold: f32,
}

impl LoginCoordinator {
    pub fn new(
        gallery: Arc<dyn GalleryStore>,
        embedder: Arc<dyn FaceEmbedder>,
        registry: Arc<SessionRegistry<MatchDecision>>,
    ) -> Self {
        Self {
            gallery,
            embedder,
            registry,
            threshold: DEFAULT_ACCEPT_THRESHOLD,
        }
    }

    /// Sets the process-wide acceptance threshold (default 0.60).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// The registry this coordinator publishes into.
    pub fn registry(&self) -> &Arc<SessionRegistry<MatchDecision>> {
        &self.registry
    }

    /// Evaluates a raw embedding against the gallery. Infallible by
    /// construction: input and store failures become failed decisions.
    pub async fn evaluate_vector(&self, raw: &[f32]) -> MatchDecision {
        match FaceVector::normalize(raw) {
            Ok(vector) => self.evaluate(&vector).await,
            Err(e) => {
                warn!(error = %e, "rejecting malformed login vector");
                MatchDecision::failed("invalid_vector")
            }
        }
    }

    /// Evaluates a captured image against the gallery via the inference
    /// collaborator.
    pub async fn evaluate_image(&self, image: &[u8]) -> MatchDecision {
        match decode_image(self.embedder.as_ref(), image).await {
            Ok(vector) => self.evaluate(&vector).await,
            Err(e) => {
                warn!(error = %e, "could not decode login image");
                MatchDecision::failed("decode_error")
            }
        }
    }

    /// Evaluates a pre-computed embedding submitted for `session_id` and
    /// publishes the decision. Fails only on an unknown session, which
    /// signals caller misuse; a publish racing channel teardown is
    /// dropped harmlessly inside the registry.
    pub async fn submit_vector(&self, session_id: &str, raw: &[f32]) -> Result<(), SessionError> {
        self.ensure_session(session_id)?;
        let decision = self.evaluate_vector(raw).await;
        debug!(session_id, accepted = decision.accepted, "publishing vector login decision");
        self.registry.publish(session_id, decision);
        Ok(())
    }

    /// Evaluates a captured image submitted for `session_id` and
    /// publishes the decision.
    pub async fn submit_image(&self, session_id: &str, image: &[u8]) -> Result<(), SessionError> {
        self.ensure_session(session_id)?;
        let decision = self.evaluate_image(image).await;
        debug!(session_id, accepted = decision.accepted, "publishing image login decision");
        self.registry.publish(session_id, decision);
        Ok(())
    }

    async fn evaluate(&self, vector: &FaceVector) -> MatchDecision {
        let snapshot = match self.gallery.read_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "gallery read failed during login");
                return MatchDecision::failed("storage_error");
            }
        };
        decide(nearest(vector, &snapshot), self.threshold)
    }

    fn ensure_session(&self, session_id: &str) -> Result<(), SessionError> {
        if !self.registry.contains(session_id) {
            return Err(SessionError::Unknown(session_id.to_string()));
        }
        Ok(())
    }
}
