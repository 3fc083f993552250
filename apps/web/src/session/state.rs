use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{AppError, GENERIC_ANALYSIS_FAILURE};
use crate::models::analysis::AnalysisResult;
use crate::models::image::UploadedImage;

/// Upload/Analysis view states.
///
/// Idle → ImageLoaded → Analyzing → ResultShown, with failure falling back to
/// ImageLoaded and clear returning to Idle from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewState {
    Idle,
    ImageLoaded,
    Analyzing,
    ResultShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One-shot message shown on the next render of the upload view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

/// What happened to an analysis completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// The image was replaced or cleared while the call was in flight.
    Stale,
}

/// Handed out by `begin_analysis`; identifies which image the call is for.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub generation: u64,
    pub image: Arc<UploadedImage>,
}

/// Image and result sit behind `Arc` so views and calls can hold them after
/// the store lock is released.
#[derive(Debug, Clone)]
pub struct UploadSession {
    image: Option<Arc<UploadedImage>>,
    result: Option<Arc<AnalysisResult>>,
    busy: bool,
    /// Bumped whenever the image is replaced or cleared.
    generation: u64,
    notification: Option<Notification>,
    last_seen: DateTime<Utc>,
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl UploadSession {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            image: None,
            result: None,
            busy: false,
            generation: 0,
            notification: None,
            last_seen: now,
        }
    }

    pub fn state(&self) -> ViewState {
        match (&self.image, self.busy, &self.result) {
            (_, true, _) => ViewState::Analyzing,
            (_, false, Some(_)) => ViewState::ResultShown,
            (Some(_), false, None) => ViewState::ImageLoaded,
            (None, false, None) => ViewState::Idle,
        }
    }

    pub fn image(&self) -> Option<&Arc<UploadedImage>> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&Arc<AnalysisResult>> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    /// Stores a freshly accepted image, dropping any previous image and result.
    /// An analysis still in flight for the old image becomes stale.
    pub fn load_image(&mut self, image: UploadedImage) {
        self.image = Some(Arc::new(image));
        self.result = None;
        self.busy = false;
        self.generation += 1;
    }

    /// Enters the busy state for the current image.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, AppError> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| AppError::Conflict("Upload an image first".to_string()))?;
        if self.busy {
            return Err(AppError::Conflict(
                "Your outfit is already being analyzed".to_string(),
            ));
        }
        if self.result.is_some() {
            return Err(AppError::Conflict(
                "This outfit has already been analyzed".to_string(),
            ));
        }

        self.busy = true;
        Ok(AnalysisTicket {
            generation: self.generation,
            image: Arc::clone(image),
        })
    }

    /// Applies the outcome of the call started under `generation`.
    /// Busy is always cleared for a current completion; stale ones change nothing.
    pub fn finish_analysis(
        &mut self,
        generation: u64,
        outcome: Result<AnalysisResult, AppError>,
    ) -> Settled {
        if generation != self.generation {
            return Settled::Stale;
        }

        self.busy = false;
        match outcome {
            Ok(result) => {
                self.result = Some(Arc::new(result));
                self.notify(NoticeLevel::Success, "Analysis complete!");
            }
            Err(e) => {
                self.result = None;
                self.notify(NoticeLevel::Error, e.notification_message());
            }
        }
        Settled::Applied
    }

    /// Clears busy for a call that ended without reporting an outcome.
    pub fn abandon_analysis(&mut self, generation: u64) {
        if generation == self.generation && self.busy {
            self.busy = false;
            self.notify(NoticeLevel::Error, GENERIC_ANALYSIS_FAILURE);
        }
    }

    /// "Clear" and "Analyze Another": back to Idle regardless of current state.
    pub fn clear(&mut self) {
        self.image = None;
        self.result = None;
        self.busy = false;
        self.generation += 1;
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notification = Some(Notification {
            level,
            message: message.into(),
        });
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::Accessory;

    fn image(name: &str) -> UploadedImage {
        UploadedImage {
            id: uuid::Uuid::new_v4(),
            data_url: format!("data:image/png;base64,{name}"),
            bytes: bytes::Bytes::from(name.to_string()),
            file_name: format!("{name}.png"),
            size_bytes: 4,
            mime_type: "image/png".to_string(),
        }
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            garment_description: "Red midi dress".to_string(),
            style: "Romantic".to_string(),
            color_palette: vec!["Red".to_string()],
            accessories: vec![Accessory {
                category: "Bag".to_string(),
                name: "Clutch".to_string(),
                description: "Small gold clutch".to_string(),
                color_suggestion: "Gold".to_string(),
            }],
            styling_tips: vec![],
            occasion_match: vec!["Date night".to_string()],
        }
    }

    fn analyzing() -> (UploadSession, AnalysisTicket) {
        let mut session = UploadSession::default();
        session.load_image(image("a"));
        let ticket = session.begin_analysis().unwrap();
        (session, ticket)
    }

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(UploadSession::default().state(), ViewState::Idle);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut session = UploadSession::default();
        session.load_image(image("a"));
        assert_eq!(session.state(), ViewState::ImageLoaded);

        let ticket = session.begin_analysis().unwrap();
        assert_eq!(ticket.image.data_url, "data:image/png;base64,a");
        assert_eq!(session.state(), ViewState::Analyzing);

        let settled = session.finish_analysis(ticket.generation, Ok(result()));
        assert_eq!(settled, Settled::Applied);
        assert_eq!(session.state(), ViewState::ResultShown);
        assert!(!session.is_busy());
        assert_eq!(
            session.take_notification().unwrap().level,
            NoticeLevel::Success
        );

        session.clear();
        assert_eq!(session.state(), ViewState::Idle);
    }

    #[test]
    fn test_failure_returns_to_image_loaded() {
        let (mut session, ticket) = analyzing();
        session.finish_analysis(
            ticket.generation,
            Err(AppError::Transport("connection reset".to_string())),
        );

        assert_eq!(session.state(), ViewState::ImageLoaded);
        assert!(session.result().is_none());
        assert!(!session.is_busy());
        assert!(session.image().is_some());
        let notice = session.take_notification().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, GENERIC_ANALYSIS_FAILURE);
    }

    #[test]
    fn test_clear_resets_from_every_state() {
        let mut loaded = UploadSession::default();
        loaded.load_image(image("a"));

        let (in_flight, _) = analyzing();

        let (mut shown, ticket) = analyzing();
        shown.finish_analysis(ticket.generation, Ok(result()));

        for mut session in [loaded, in_flight, shown] {
            session.clear();
            assert!(session.image().is_none());
            assert!(session.result().is_none());
            assert!(!session.is_busy());
            assert_eq!(session.state(), ViewState::Idle);
        }
    }

    #[test]
    fn test_completion_after_clear_is_discarded() {
        let (mut session, ticket) = analyzing();
        session.clear();

        let settled = session.finish_analysis(ticket.generation, Ok(result()));
        assert_eq!(settled, Settled::Stale);
        assert!(session.result().is_none());
        assert_eq!(session.state(), ViewState::Idle);
    }

    #[test]
    fn test_new_image_discards_result_and_in_flight_call() {
        let (mut session, ticket) = analyzing();
        session.load_image(image("b"));
        assert_eq!(session.state(), ViewState::ImageLoaded);

        assert_eq!(
            session.finish_analysis(ticket.generation, Ok(result())),
            Settled::Stale
        );
        assert!(session.result().is_none());

        let ticket = session.begin_analysis().unwrap();
        session.finish_analysis(ticket.generation, Ok(result()));
        assert_eq!(session.state(), ViewState::ResultShown);

        session.load_image(image("c"));
        assert!(session.result().is_none());
        assert_eq!(session.image().unwrap().file_name, "c.png");
    }

    #[test]
    fn test_begin_requires_image_and_not_busy() {
        let mut session = UploadSession::default();
        assert!(matches!(
            session.begin_analysis(),
            Err(AppError::Conflict(_))
        ));

        let (mut session, _) = analyzing();
        assert!(matches!(
            session.begin_analysis(),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_abandon_clears_busy_only_for_current_call() {
        let (mut session, ticket) = analyzing();
        session.abandon_analysis(ticket.generation + 1);
        assert!(session.is_busy());

        session.abandon_analysis(ticket.generation);
        assert!(!session.is_busy());
        assert_eq!(session.state(), ViewState::ImageLoaded);
    }

    #[test]
    fn test_notification_is_one_shot() {
        let mut session = UploadSession::default();
        session.notify(NoticeLevel::Error, "Please upload an image file");
        assert!(session.take_notification().is_some());
        assert!(session.take_notification().is_none());
    }
}
