use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use super::state::{AnalysisTicket, Settled};
use super::store::SessionStore;
use crate::analysis_client::AnalysisBackend;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::models::image::UploadedImage;

/// Scoped completion for one analysis call.
///
/// `settle` records the outcome; if the guard is dropped without settling
/// (task aborted, panic) busy is cleared anyway. Neither path recreates a
/// session that was pruned while the call was in flight.
pub struct BusyGuard {
    store: Arc<SessionStore>,
    session_id: Uuid,
    generation: u64,
    settled: bool,
}

impl BusyGuard {
    pub fn settle(mut self, outcome: Result<AnalysisResult, AppError>) -> Settled {
        self.settled = true;
        let generation = self.generation;
        self.store
            .with_existing(self.session_id, |s| s.finish_analysis(generation, outcome))
            .unwrap_or(Settled::Stale)
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if !self.settled {
            let generation = self.generation;
            self.store
                .with_existing(self.session_id, |s| s.abandon_analysis(generation));
        }
    }
}

/// Puts the session into the busy state and returns the image to send along
/// with the guard that will take it out again.
pub fn begin_analysis(
    store: &Arc<SessionStore>,
    session_id: Uuid,
) -> Result<(Arc<UploadedImage>, BusyGuard), AppError> {
    let AnalysisTicket { generation, image } =
        store.with_session(session_id, |s| s.begin_analysis())?;

    let guard = BusyGuard {
        store: Arc::clone(store),
        session_id,
        generation,
        settled: false,
    };
    Ok((image, guard))
}

/// Calls the backend and settles the session. Never retries.
pub async fn run_analysis(
    backend: Arc<dyn AnalysisBackend>,
    image: Arc<UploadedImage>,
    guard: BusyGuard,
) -> Settled {
    let session_id = guard.session_id;
    let outcome = backend
        .analyze(&image.data_url)
        .await
        .map_err(AppError::from);

    match &outcome {
        Ok(result) => info!(
            %session_id,
            accessories = result.accessories.len(),
            "Outfit analysis complete"
        ),
        Err(e) => error!(%session_id, "Outfit analysis failed: {e}"),
    }

    let settled = guard.settle(outcome);
    if settled == Settled::Stale {
        debug!(%session_id, "Discarded analysis for an image that is no longer loaded");
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_client::AnalysisError;
    use crate::models::image::UploadedImage;
    use crate::session::ViewState;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedBackend(Result<AnalysisResult, String>);

    #[async_trait]
    impl AnalysisBackend for FixedBackend {
        async fn analyze(&self, _image: &str) -> Result<AnalysisResult, AnalysisError> {
            self.0.clone().map_err(AnalysisError::Application)
        }
    }

    fn loaded_store() -> (Arc<SessionStore>, Uuid) {
        let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
        let (id, _) = store.resolve(None);
        store.with_session(id, |s| {
            s.load_image(UploadedImage {
                id: uuid::Uuid::new_v4(),
                data_url: "data:image/png;base64,AA==".to_string(),
                bytes: bytes::Bytes::from_static(&[0]),
                file_name: "a.png".to_string(),
                size_bytes: 1,
                mime_type: "image/png".to_string(),
            })
        });
        (store, id)
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            garment_description: "Linen shirt dress".to_string(),
            style: "Relaxed".to_string(),
            color_palette: vec!["Sand".to_string()],
            accessories: vec![],
            styling_tips: vec![],
            occasion_match: vec![],
        }
    }

    #[tokio::test]
    async fn test_success_sets_result_and_clears_busy() {
        let (store, id) = loaded_store();
        let (image, guard) = begin_analysis(&store, id).unwrap();
        assert_eq!(store.snapshot(id).unwrap().state(), ViewState::Analyzing);

        let settled = run_analysis(Arc::new(FixedBackend(Ok(result()))), image, guard).await;
        assert_eq!(settled, Settled::Applied);

        let session = store.snapshot(id).unwrap();
        assert!(!session.is_busy());
        assert_eq!(session.state(), ViewState::ResultShown);
    }

    #[tokio::test]
    async fn test_failure_clears_busy_without_result() {
        let (store, id) = loaded_store();
        let (image, guard) = begin_analysis(&store, id).unwrap();

        run_analysis(
            Arc::new(FixedBackend(Err("Image too blurry".to_string()))),
            image,
            guard,
        )
        .await;

        let mut session = store.snapshot(id).unwrap();
        assert!(!session.is_busy());
        assert!(session.result().is_none());
        assert_eq!(session.take_notification().unwrap().message, "Image too blurry");
    }

    #[tokio::test]
    async fn test_dropped_guard_clears_busy() {
        let (store, id) = loaded_store();
        let (_image, guard) = begin_analysis(&store, id).unwrap();
        assert!(store.snapshot(id).unwrap().is_busy());

        drop(guard);

        let session = store.snapshot(id).unwrap();
        assert!(!session.is_busy());
        assert_eq!(session.state(), ViewState::ImageLoaded);
    }

    #[tokio::test]
    async fn test_late_completion_does_not_revive_pruned_session() {
        let (store, id) = loaded_store();
        let (image, guard) = begin_analysis(&store, id).unwrap();

        store.with_session(id, |s| s.clear());
        store.prune_idle(chrono::Utc::now() + chrono::Duration::hours(2));
        assert!(store.snapshot(id).is_none());

        let settled = run_analysis(Arc::new(FixedBackend(Ok(result()))), image, guard).await;
        assert_eq!(settled, Settled::Stale);
        assert!(store.snapshot(id).is_none());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_dropped_guard_after_prune_leaves_store_empty() {
        let (store, id) = loaded_store();
        let (_image, guard) = begin_analysis(&store, id).unwrap();

        store.with_session(id, |s| s.clear());
        store.prune_idle(chrono::Utc::now() + chrono::Duration::hours(2));

        drop(guard);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_aborted_task_clears_busy() {
        struct NeverBackend;

        #[async_trait]
        impl AnalysisBackend for NeverBackend {
            async fn analyze(&self, _image: &str) -> Result<AnalysisResult, AnalysisError> {
                std::future::pending().await
            }
        }

        let (store, id) = loaded_store();
        let (image, guard) = begin_analysis(&store, id).unwrap();
        let handle = tokio::spawn(run_analysis(Arc::new(NeverBackend), image, guard));
        tokio::task::yield_now().await;

        handle.abort();
        let _ = handle.await;

        assert!(!store.snapshot(id).unwrap().is_busy());
    }
}
