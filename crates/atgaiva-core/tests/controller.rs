use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use atgaiva_core::{
    ImagePayload, ImageRestorer, Locale, RestorationController, RestorationOption,
    RestorationOptions, RestoreError, SessionState, Transition,
};

/// Answers every request with a canned outcome and records what it saw.
#[derive(Default)]
struct FakeRestorer {
    calls: AtomicUsize,
    fail_with: Option<String>,
    last_instruction: std::sync::Mutex<Option<String>>,
}

impl FakeRestorer {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }
}

impl ImageRestorer for FakeRestorer {
    async fn restore(
        &self,
        image: &ImagePayload,
        options: RestorationOptions,
    ) -> Result<ImagePayload, RestoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_instruction.lock().unwrap() = Some(atgaiva_core::build_instruction(&options));
        match &self.fail_with {
            Some(message) => Err(RestoreError::Service {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(ImagePayload::from_base64(
                "image/png",
                format!("restored-{}", image.base64_body()),
            )),
        }
    }
}

fn photo() -> ImagePayload {
    ImagePayload::from_base64("image/jpeg", "b2xk")
}

#[tokio::test]
async fn successful_restore_shows_both_images() {
    let restorer = Arc::new(FakeRestorer::default());
    let mut controller = RestorationController::with_shared(Arc::clone(&restorer));

    controller.select_image(photo());
    assert_eq!(controller.restore().await, Transition::Applied);

    let state = controller.state();
    assert_eq!(state.original(), Some(&photo()));
    assert_eq!(
        state.restored().map(ImagePayload::as_data_uri).as_deref(),
        Some("data:image/png;base64,restored-b2xk")
    );
    assert_eq!(restorer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restore_without_image_does_nothing() {
    let restorer = Arc::new(FakeRestorer::default());
    let mut controller = RestorationController::with_shared(Arc::clone(&restorer));

    assert_eq!(controller.restore().await, Transition::Ignored);
    assert_eq!(controller.state(), &SessionState::NoImage);
    assert_eq!(restorer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn second_trigger_while_restoring_sends_one_request() {
    let restorer = Arc::new(FakeRestorer::default());
    let mut controller = RestorationController::with_shared(Arc::clone(&restorer));
    controller.select_image(photo());

    let job = controller.begin_restore().expect("first trigger starts a job");
    assert!(controller.state().is_restoring());
    assert!(controller.begin_restore().is_none());

    let (request, result) = job.run().await;
    assert_eq!(controller.complete_restore(request, result), Transition::Applied);
    assert_eq!(restorer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failure_keeps_image_and_allows_retry() {
    let mut controller = RestorationController::new(FakeRestorer::failing("quota exceeded"));
    controller.select_image(photo());

    controller.restore().await;
    let state = controller.state();
    assert_eq!(state.error(), Some("quota exceeded"));
    assert_eq!(state.original(), Some(&photo()));
    assert!(state.restored().is_none());

    assert!(controller.begin_restore().is_some());
}

#[tokio::test]
async fn blank_service_message_uses_localized_fallback() {
    let mut controller =
        RestorationController::new(FakeRestorer::failing("  ")).with_locale(Locale::English);
    controller.select_image(photo());
    controller.restore().await;

    assert_eq!(
        controller.state().error(),
        Some(Locale::English.messages().restore_failed)
    );
}

#[tokio::test]
async fn answer_arriving_after_reset_is_dropped() {
    let mut controller = RestorationController::new(FakeRestorer::default());
    controller.select_image(photo());
    let job = controller.begin_restore().expect("job");

    controller.reset();
    let (request, result) = job.run().await;

    assert_eq!(controller.complete_restore(request, result), Transition::Ignored);
    assert_eq!(controller.state(), &SessionState::NoImage);
}

#[tokio::test]
async fn answer_for_replaced_image_is_dropped() {
    let mut controller = RestorationController::new(FakeRestorer::default());
    controller.select_image(photo());
    let stale = controller.begin_restore().expect("job");

    let replacement = ImagePayload::from_base64("image/png", "bmV3");
    controller.select_image(replacement.clone());
    let fresh = controller.begin_restore().expect("new image can be restored");

    let (request, result) = stale.run().await;
    assert_eq!(controller.complete_restore(request, result), Transition::Ignored);
    assert!(controller.state().is_restoring());

    let (request, result) = fresh.run().await;
    assert_eq!(controller.complete_restore(request, result), Transition::Applied);
    assert_eq!(controller.state().original(), Some(&replacement));
}

#[tokio::test]
async fn toggled_options_shape_the_instruction() {
    let restorer = Arc::new(FakeRestorer::default());
    let mut controller = RestorationController::with_shared(Arc::clone(&restorer));
    controller.toggle_option(RestorationOption::FixDamage);
    controller.toggle_option(RestorationOption::EnhanceDetails);
    assert!(!controller.options().fix_damage);

    controller.select_image(photo());
    controller.restore().await;

    let instruction = restorer.last_instruction.lock().unwrap().clone().unwrap();
    assert!(instruction.contains("colorize"));
    assert!(!instruction.contains("scratches"));
    assert!(!instruction.contains("sharpen"));
}

#[tokio::test]
async fn discarding_result_returns_to_settings() {
    let mut controller = RestorationController::new(FakeRestorer::default());
    controller.select_image(photo());
    controller.restore().await;

    controller.discard_result();
    assert_eq!(
        controller.state(),
        &SessionState::HasImage { original: photo() }
    );
}
