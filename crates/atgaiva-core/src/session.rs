//! Application controller: the restoration session state machine.
//!
//! All state changes go through [`SessionState::apply`], which acts as the
//! transition table. Events that make no sense in the current state are
//! ignored rather than producing an inconsistent state.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::gemini::{ImageRestorer, RestoreError};
use crate::messages::Locale;
use crate::options::{RestorationOption, RestorationOptions};
use crate::payload::ImagePayload;

/// Identifies one restoration request so late answers can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Where the session currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected yet.
    #[default]
    NoImage,
    /// Image selected, waiting for the user.
    HasImage { original: ImagePayload },
    /// One request in flight.
    Restoring {
        original: ImagePayload,
        request: RequestId,
    },
    /// The model answered with an image.
    Restored {
        original: ImagePayload,
        restored: ImagePayload,
    },
    /// The last request failed; the image is kept and may be retried.
    Failed {
        original: ImagePayload,
        message: String,
    },
}

/// Inputs to the transition table.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ImageSelected(ImagePayload),
    RestoreStarted(RequestId),
    RestoreSucceeded {
        request: RequestId,
        restored: ImagePayload,
    },
    RestoreFailed {
        request: RequestId,
        message: String,
    },
    ErrorDismissed,
    ResultDiscarded,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

impl SessionState {
    /// Apply `event`, returning the next state and whether anything changed.
    pub fn apply(self, event: SessionEvent) -> (SessionState, Transition) {
        use SessionEvent as E;
        use SessionState as S;

        match (self, event) {
            (_, E::ImageSelected(original)) => (S::HasImage { original }, Transition::Applied),
            (_, E::Reset) => (S::NoImage, Transition::Applied),

            (S::HasImage { original } | S::Failed { original, .. }, E::RestoreStarted(request)) => {
                (S::Restoring { original, request }, Transition::Applied)
            }

            (
                S::Restoring { original, request },
                E::RestoreSucceeded {
                    request: finished,
                    restored,
                },
            ) if request == finished => (S::Restored { original, restored }, Transition::Applied),

            (
                S::Restoring { original, request },
                E::RestoreFailed {
                    request: finished,
                    message,
                },
            ) if request == finished => (S::Failed { original, message }, Transition::Applied),

            (S::Failed { original, .. }, E::ErrorDismissed) => {
                (S::HasImage { original }, Transition::Applied)
            }
            (S::Restored { original, .. }, E::ResultDiscarded) => {
                (S::HasImage { original }, Transition::Applied)
            }

            (state, _) => (state, Transition::Ignored),
        }
    }

    pub fn original(&self) -> Option<&ImagePayload> {
        match self {
            SessionState::NoImage => None,
            SessionState::HasImage { original }
            | SessionState::Restoring { original, .. }
            | SessionState::Restored { original, .. }
            | SessionState::Failed { original, .. } => Some(original),
        }
    }

    pub fn restored(&self) -> Option<&ImagePayload> {
        match self {
            SessionState::Restored { restored, .. } => Some(restored),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_restoring(&self) -> bool {
        matches!(self, SessionState::Restoring { .. })
    }

    /// Whether a restore request would be accepted right now.
    pub fn can_restore(&self) -> bool {
        matches!(
            self,
            SessionState::HasImage { .. } | SessionState::Failed { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::NoImage => "no-image",
            SessionState::HasImage { .. } => "has-image",
            SessionState::Restoring { .. } => "restoring",
            SessionState::Restored { .. } => "restored",
            SessionState::Failed { .. } => "failed",
        }
    }
}

/// Everything a background task needs to run one restoration.
pub struct RestoreJob<R> {
    pub request: RequestId,
    pub image: ImagePayload,
    pub options: RestorationOptions,
    restorer: Arc<R>,
}

impl<R: ImageRestorer> RestoreJob<R> {
    /// Perform the network round trip.
    pub async fn run(self) -> (RequestId, Result<ImagePayload, RestoreError>) {
        let started = Instant::now();
        let result = self.restorer.restore(&self.image, self.options).await;
        debug!(
            request = self.request.get(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Restore job finished"
        );
        (self.request, result)
    }
}

/// Holds the current image, options and processing state and drives restorations.
pub struct RestorationController<R> {
    state: SessionState,
    options: RestorationOptions,
    restorer: Arc<R>,
    locale: Locale,
    next_request: u64,
}

impl<R: ImageRestorer> RestorationController<R> {
    pub fn new(restorer: R) -> Self {
        Self::with_shared(Arc::new(restorer))
    }

    pub fn with_shared(restorer: Arc<R>) -> Self {
        Self {
            state: SessionState::NoImage,
            options: RestorationOptions::default(),
            restorer,
            locale: Locale::default(),
            next_request: 1,
        }
    }

    pub fn with_options(mut self, options: RestorationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn options(&self) -> RestorationOptions {
        self.options
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Swap the restorer, e.g. after the API key changed.
    pub fn set_restorer(&mut self, restorer: R) {
        self.restorer = Arc::new(restorer);
    }

    pub fn toggle_option(&mut self, option: RestorationOption) {
        self.options.toggle(option);
        debug!(?option, enabled = self.options.is_enabled(option), "Option toggled");
    }

    /// Store a freshly selected image, dropping any previous result or error.
    pub fn select_image(&mut self, image: ImagePayload) {
        self.dispatch(SessionEvent::ImageSelected(image));
    }

    /// Return to the initial idle state.
    pub fn reset(&mut self) {
        self.dispatch(SessionEvent::Reset);
    }

    pub fn dismiss_error(&mut self) {
        self.dispatch(SessionEvent::ErrorDismissed);
    }

    /// Drop the result to pick different options for the same image.
    pub fn discard_result(&mut self) {
        self.dispatch(SessionEvent::ResultDiscarded);
    }

    /// Start a restoration unless one is already running or no image is loaded.
    pub fn begin_restore(&mut self) -> Option<RestoreJob<R>> {
        if !self.state.can_restore() {
            debug!(state = self.state.label(), "Restore request ignored");
            return None;
        }
        let image = self.state.original()?.clone();

        let request = RequestId(self.next_request);
        self.next_request += 1;
        self.dispatch(SessionEvent::RestoreStarted(request));
        info!(request = request.get(), options = ?self.options, "Restoration started");

        Some(RestoreJob {
            request,
            image,
            options: self.options,
            restorer: Arc::clone(&self.restorer),
        })
    }

    /// Record the outcome of a job. Answers for superseded requests are dropped.
    pub fn complete_restore(
        &mut self,
        request: RequestId,
        result: Result<ImagePayload, RestoreError>,
    ) -> Transition {
        let event = match result {
            Ok(restored) => SessionEvent::RestoreSucceeded { request, restored },
            Err(err) => {
                warn!(request = request.get(), error = %err, "Restoration failed");
                let message = match &err {
                    RestoreError::Service { message, .. } => message.trim().to_string(),
                    RestoreError::Http(source) => source.to_string(),
                    _ => err.to_string(),
                };
                let message = if message.is_empty() {
                    self.locale.messages().restore_failed.to_string()
                } else {
                    message
                };
                SessionEvent::RestoreFailed { request, message }
            }
        };

        let transition = self.dispatch(event);
        if transition == Transition::Ignored {
            info!(request = request.get(), "Discarding stale restoration result");
        }
        transition
    }

    /// Begin, await and record a restoration in one step.
    pub async fn restore(&mut self) -> Transition {
        let Some(job) = self.begin_restore() else {
            return Transition::Ignored;
        };
        let (request, result) = job.run().await;
        self.complete_restore(request, result)
    }

    fn dispatch(&mut self, event: SessionEvent) -> Transition {
        let from = self.state.label();
        let state = std::mem::take(&mut self.state);
        let (next, transition) = state.apply(event);
        self.state = next;
        if transition == Transition::Applied {
            debug!(from, to = self.state.label(), "Session transition");
        }
        transition
    }
}
