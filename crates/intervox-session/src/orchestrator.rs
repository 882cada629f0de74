//! Conversation orchestrator: central coordinator for the assistant session.
//!
//! Owns the message log, the selected language, the mute and in-flight flags,
//! and the deferred timers (proactive nudge, human handoff). User intents flow
//! through its operations; completions of asynchronous work (resolution,
//! capture, playback, timers) are applied one at a time, so the log stays
//! append-ordered by completion.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use intervox_core::config::SessionConfig;
use intervox_core::events::SessionEvent;
use intervox_core::types::{Language, Message};
use intervox_reply::resolver::{AnswerSource, ResponseResolver};
use intervox_speech::capture::CaptureController;
use intervox_speech::error::SpeechError;
use intervox_speech::playback::PlaybackController;

use crate::error::SessionError;

/// Scripted greeting appended when the session starts.
const WELCOME_MESSAGE: &str = "Hello! I am your AI Interview Assistant. I am here to help you practice interview questions. Feel free to ask me about my background, skills, experience, or any other questions you might have for a candidate!";

/// Scripted suggestion appended once if the user stays silent.
const NUDGE_MESSAGE: &str = "Feel free to ask me questions like: \"What should we know about your life story?\", \"What is your #1 superpower?\", or \"What are your top 3 growth areas?\"";

/// First scripted human-handoff message, appended immediately.
const HANDOFF_WAIT_MESSAGE: &str = "Connecting you to a human representative... Please wait a moment.";

/// Second scripted human-handoff message, appended after the delay.
const HANDOFF_GREETING_MESSAGE: &str = "Hello! This is Sarah from the HR team. I have received your request for human assistance. How can I help you today?";

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Session state shared with the spawned capture/playback/timer tasks.
struct SessionCore {
    config: SessionConfig,
    resolver: ResponseResolver,
    capture: CaptureController,
    playback: PlaybackController,
    messages: Mutex<Vec<Message>>,
    language: Mutex<Language>,
    muted: AtomicBool,
    responding: AtomicBool,
    user_has_messaged: AtomicBool,
    torn_down: AtomicBool,
    // Monotonic ticket per resolution attempt; teardown bumps it so a late
    // completion is discarded instead of appended.
    resolution_seq: AtomicU64,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionCore {
    async fn submit(self: Arc<Self>, text: &str, was_voice: bool) -> Result<(), SessionError> {
        if self.torn_down.load(Ordering::SeqCst) {
            return Err(SessionError::Terminated);
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self
            .responding
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Rejecting submit while a resolution is in flight");
            return Err(SessionError::Busy);
        }
        let _responding = RespondingGuard(&self.responding);

        self.user_has_messaged.store(true, Ordering::SeqCst);
        self.append(Message::user(text, was_voice));

        let ticket = self.resolution_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let (answer, source) = self.resolver.resolve_with_source(text).await;

        if self.torn_down.load(Ordering::SeqCst)
            || self.resolution_seq.load(Ordering::SeqCst) != ticket
        {
            debug!("Discarding stale resolution result");
            return Ok(());
        }

        if source == AnswerSource::Fallback {
            self.emit(SessionEvent::CompletionFallback {
                reason: "remote completion failed or returned no text".to_string(),
            });
        }

        self.append(Message::bot(answer.clone()));

        if !self.muted.load(Ordering::SeqCst) {
            let locale = self.language_code();
            let core = Arc::clone(&self);
            tokio::spawn(async move {
                if core.playback.is_supported() {
                    core.emit(SessionEvent::PlaybackStarted {
                        locale: locale.clone(),
                    });
                }
                match core.playback.speak(&answer, &locale).await {
                    Ok(()) => {}
                    Err(SpeechError::PlaybackUnsupported) => {
                        core.emit(SessionEvent::PlaybackUnsupported);
                    }
                    Err(e) => {
                        debug!(error = %e, "Playback of reply failed");
                    }
                }
            });
        }

        Ok(())
    }

    /// One capture session: listen, then feed the transcript into `submit`.
    async fn run_capture(self: Arc<Self>, locale: String) {
        self.emit(SessionEvent::CaptureStarted {
            locale: locale.clone(),
        });
        match self.capture.capture(&locale).await {
            Ok(Some(transcript)) => {
                self.emit(SessionEvent::CaptureEnded);
                if let Err(e) = Arc::clone(&self).submit(&transcript, true).await {
                    debug!(error = %e, "Voice transcript was not submitted");
                }
            }
            Ok(None) => {
                self.emit(SessionEvent::CaptureEnded);
            }
            Err(e) => {
                self.emit(SessionEvent::CaptureFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Deferred second half of the handoff sequence.
    async fn run_handoff(self: Arc<Self>, delay: Duration) {
        tokio::time::sleep(delay).await;
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }
        self.append(Message::bot(HANDOFF_GREETING_MESSAGE));
    }

    /// One-shot proactive suggestion if the user stays silent.
    async fn run_nudge(self: Arc<Self>, delay: Duration) {
        tokio::time::sleep(delay).await;
        if self.torn_down.load(Ordering::SeqCst) || self.user_has_messaged.load(Ordering::SeqCst) {
            return;
        }
        debug!("Appending proactive suggestion");
        self.append(Message::bot(NUDGE_MESSAGE));
    }

    fn append(&self, message: Message) {
        let id = message.id;
        let sender = message.sender;
        self.messages
            .lock()
            .expect("messages mutex poisoned")
            .push(message);
        self.emit(SessionEvent::MessageAppended { id, sender });
    }

    fn emit(&self, event: SessionEvent) {
        debug!(event = event.event_name(), "Session event");
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    fn language_code(&self) -> String {
        self.language
            .lock()
            .expect("language mutex poisoned")
            .code
            .clone()
    }
}

/// Central coordinator wiring resolver, capture, and playback.
///
/// One instance is one session with an explicit lifecycle: `start` appends
/// the welcome message and arms the nudge timer, `teardown` (also run on
/// drop) cancels everything still pending.
pub struct ConversationOrchestrator {
    core: Arc<SessionCore>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ConversationOrchestrator {
    /// Start a new session. Must be called from within a tokio runtime.
    pub fn start(
        config: SessionConfig,
        resolver: ResponseResolver,
        capture: CaptureController,
        playback: PlaybackController,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let muted = config.start_muted;
        let nudge_delay = Duration::from_millis(config.nudge_delay_ms);

        let core = Arc::new(SessionCore {
            config,
            resolver,
            capture,
            playback,
            messages: Mutex::new(Vec::new()),
            language: Mutex::new(Language::default()),
            muted: AtomicBool::new(muted),
            responding: AtomicBool::new(false),
            user_has_messaged: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            resolution_seq: AtomicU64::new(0),
            events,
        });

        core.append(Message::bot(WELCOME_MESSAGE));
        info!("Conversation session started");

        let nudge = tokio::spawn(Arc::clone(&core).run_nudge(nudge_delay));

        Self {
            core,
            tasks: Mutex::new(vec![nudge]),
        }
    }

    // -- Public operations --

    /// Submit user text for resolution.
    ///
    /// Rejects empty/whitespace input and overlapping submissions (at most
    /// one resolution is in flight; the in-flight flag is cleared on every
    /// exit path). Appends the user message immediately, then the resolved
    /// bot message, and speaks the reply unless muted.
    pub async fn submit(&self, text: &str, was_voice: bool) -> Result<(), SessionError> {
        Arc::clone(&self.core).submit(text, was_voice).await
    }

    /// Toggle speech capture with the current language.
    ///
    /// Starts a capture session when idle and stops the active one when
    /// listening. A recognized transcript is fed back through
    /// [`submit`](Self::submit) flagged as voice input.
    pub fn toggle_capture(&self) -> Result<(), SessionError> {
        if self.core.torn_down.load(Ordering::SeqCst) {
            return Err(SessionError::Terminated);
        }
        if !self.core.capture.is_supported() {
            self.core.emit(SessionEvent::CaptureUnsupported);
            return Err(SpeechError::CaptureUnsupported.into());
        }

        if self.core.capture.is_listening() {
            self.core.capture.stop();
            return Ok(());
        }

        let locale = self.core.language_code();
        let handle = tokio::spawn(Arc::clone(&self.core).run_capture(locale));
        self.track(handle);
        Ok(())
    }

    /// Set the mute flag. Muting also stops any in-flight playback.
    pub fn set_muted(&self, muted: bool) {
        self.core.muted.store(muted, Ordering::SeqCst);
        if muted {
            self.core.playback.stop();
            self.core.emit(SessionEvent::PlaybackStopped);
        }
        self.core.emit(SessionEvent::MuteChanged { muted });
    }

    /// Select the language used by the next capture/playback invocation.
    pub fn set_language(&self, language: Language) {
        let code = language.code.clone();
        *self
            .core
            .language
            .lock()
            .expect("language mutex poisoned") = language;
        self.core.emit(SessionEvent::LanguageChanged { code });
    }

    /// Append the scripted handoff sequence: one message immediately, one
    /// after the configured delay. The deferred message is dropped if the
    /// session is torn down first.
    pub fn request_human_handoff(&self) {
        if self.core.torn_down.load(Ordering::SeqCst) {
            return;
        }
        self.core.append(Message::bot(HANDOFF_WAIT_MESSAGE));

        let delay = Duration::from_millis(self.core.config.handoff_delay_ms);
        let handle = tokio::spawn(Arc::clone(&self.core).run_handoff(delay));
        self.track(handle);
    }

    /// End the session: cancel pending timers, stop capture and playback,
    /// and invalidate in-flight resolutions. Idempotent.
    pub fn teardown(&self) {
        if self.core.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.core.resolution_seq.fetch_add(1, Ordering::SeqCst);
        for handle in self.tasks.lock().expect("tasks mutex poisoned").drain(..) {
            handle.abort();
        }
        self.core.capture.stop();
        self.core.playback.stop();
        self.core.emit(SessionEvent::SessionEnded);
        info!("Conversation session ended");
    }

    // -- Read surface --

    /// Snapshot of the conversation log, in append order.
    pub fn messages(&self) -> Vec<Message> {
        self.core
            .messages
            .lock()
            .expect("messages mutex poisoned")
            .clone()
    }

    /// Number of messages in the log.
    pub fn message_count(&self) -> usize {
        self.core
            .messages
            .lock()
            .expect("messages mutex poisoned")
            .len()
    }

    /// The currently selected language.
    pub fn language(&self) -> Language {
        self.core
            .language
            .lock()
            .expect("language mutex poisoned")
            .clone()
    }

    /// Whether playback is muted.
    pub fn is_muted(&self) -> bool {
        self.core.muted.load(Ordering::SeqCst)
    }

    /// Whether a resolution is in flight.
    pub fn is_responding(&self) -> bool {
        self.core.responding.load(Ordering::SeqCst)
    }

    /// Whether a capture session is listening.
    pub fn is_capturing(&self) -> bool {
        self.core.capture.is_listening()
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.core.events.subscribe()
    }

    // -- Private helpers --

    fn track(&self, handle: JoinHandle<()>) {
        self.tasks
            .lock()
            .expect("tasks mutex poisoned")
            .push(handle);
    }
}

impl Drop for ConversationOrchestrator {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Clears the in-flight flag on every exit path, including cancellation.
struct RespondingGuard<'a>(&'a AtomicBool);

impl Drop for RespondingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use intervox_core::types::Sender;
    use intervox_reply::error::CompletionError;
    use intervox_reply::remote::CompletionBackend;
    use intervox_speech::capability::{
        Capability, MockRecognizer, MockSynthesizer, SpeechRecognizer, SpeechSynthesizer,
    };

    /// Backend that always fails, forcing canned answers or the fallback.
    struct FailingBackend;

    #[async_trait]
    impl CompletionBackend for FailingBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Unavailable("connection refused".to_string()))
        }
    }

    /// Backend that answers after a delay, to hold a resolution in flight.
    struct SlowBackend(Duration);

    #[async_trait]
    impl CompletionBackend for SlowBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            tokio::time::sleep(self.0).await;
            Ok("slow generated reply".to_string())
        }
    }

    // The nudge delay is long by default so it never fires inside unrelated
    // timing tests; nudge tests build their own fixture with a short window.
    fn test_config() -> SessionConfig {
        SessionConfig {
            nudge_delay_ms: 5_000,
            handoff_delay_ms: 40,
            start_muted: false,
        }
    }

    fn nudge_config() -> SessionConfig {
        SessionConfig {
            nudge_delay_ms: 60,
            ..test_config()
        }
    }

    struct Fixture {
        orchestrator: Arc<ConversationOrchestrator>,
        synthesizer: Arc<MockSynthesizer>,
    }

    fn fixture_full(
        config: SessionConfig,
        backend: Box<dyn CompletionBackend>,
        recognizer: Capability<dyn SpeechRecognizer>,
    ) -> Fixture {
        let synthesizer = Arc::new(MockSynthesizer::new());
        let handle: Arc<dyn SpeechSynthesizer> = synthesizer.clone();
        let orchestrator = Arc::new(ConversationOrchestrator::start(
            config,
            ResponseResolver::new(backend),
            CaptureController::new(recognizer),
            PlaybackController::new(Capability::Available(handle)),
        ));
        Fixture {
            orchestrator,
            synthesizer,
        }
    }

    fn fixture_with(
        backend: Box<dyn CompletionBackend>,
        recognizer: Capability<dyn SpeechRecognizer>,
    ) -> Fixture {
        fixture_full(test_config(), backend, recognizer)
    }

    fn fixture() -> Fixture {
        fixture_with(Box::new(FailingBackend), Capability::Unavailable)
    }

    fn nudge_fixture() -> Fixture {
        fixture_full(
            nudge_config(),
            Box::new(FailingBackend),
            Capability::Unavailable,
        )
    }

    fn fixture_with_recognizer(recognizer: MockRecognizer) -> Fixture {
        fixture_with(
            Box::new(FailingBackend),
            Capability::Available(Arc::new(recognizer)),
        )
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // ---- Session start ----

    #[tokio::test]
    async fn test_start_appends_welcome_message() {
        let f = fixture();
        let messages = f.orchestrator.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Bot);
        assert!(messages[0].content.contains("AI Interview Assistant"));
    }

    #[tokio::test]
    async fn test_initial_flags() {
        let f = fixture();
        assert!(!f.orchestrator.is_muted());
        assert!(!f.orchestrator.is_responding());
        assert!(!f.orchestrator.is_capturing());
        assert_eq!(f.orchestrator.language().code, "en-US");
    }

    #[tokio::test]
    async fn test_start_muted_config() {
        let config = SessionConfig {
            start_muted: true,
            ..test_config()
        };
        let f = fixture_full(config, Box::new(FailingBackend), Capability::Unavailable);
        assert!(f.orchestrator.is_muted());
    }

    // ---- Submit ----

    #[tokio::test]
    async fn test_submit_appends_user_and_bot_messages() {
        let f = fixture();
        f.orchestrator
            .submit("What is your #1 superpower?", false)
            .await
            .unwrap();
        let messages = f.orchestrator.messages();
        assert_eq!(messages.len(), 3); // welcome + user + bot
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].content, "What is your #1 superpower?");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert!(messages[2].content.contains("adaptability"));
        assert!(!f.orchestrator.is_responding());
    }

    #[tokio::test]
    async fn test_submit_empty_is_rejected() {
        let f = fixture();
        let result = f.orchestrator.submit("", false).await;
        assert!(matches!(result, Err(SessionError::EmptyMessage)));
        assert_eq!(f.orchestrator.message_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_whitespace_is_rejected() {
        let f = fixture();
        let result = f.orchestrator.submit("   ", false).await;
        assert!(matches!(result, Err(SessionError::EmptyMessage)));
        assert_eq!(f.orchestrator.message_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_marks_voice_messages() {
        let f = fixture();
        f.orchestrator.submit("hello there", true).await.unwrap();
        let messages = f.orchestrator.messages();
        assert!(messages[1].is_voice);
        assert!(!messages[2].is_voice);
    }

    #[tokio::test]
    async fn test_submit_fallback_for_gibberish() {
        let f = fixture();
        f.orchestrator.submit("asdkjASD", false).await.unwrap();
        let messages = f.orchestrator.messages();
        assert_eq!(messages[2].content, ResponseResolver::fallback_answer());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_rejected() {
        let f = fixture_with(
            Box::new(SlowBackend(Duration::from_millis(150))),
            Capability::Unavailable,
        );
        let first = tokio::spawn({
            let orch = Arc::clone(&f.orchestrator);
            async move { orch.submit("zzz qqq", false).await }
        });
        settle().await;
        assert!(f.orchestrator.is_responding());

        let second = f.orchestrator.submit("another one", false).await;
        assert!(matches!(second, Err(SessionError::Busy)));

        first.await.unwrap().unwrap();
        // welcome + first user + first bot; the rejected submit left no trace
        assert_eq!(f.orchestrator.message_count(), 3);
        assert!(!f.orchestrator.is_responding());
    }

    #[tokio::test]
    async fn test_submit_after_teardown_is_rejected() {
        let f = fixture();
        f.orchestrator.teardown();
        let result = f.orchestrator.submit("hello", false).await;
        assert!(matches!(result, Err(SessionError::Terminated)));
    }

    // ---- Playback of replies ----

    #[tokio::test]
    async fn test_reply_is_spoken_when_unmuted() {
        let f = fixture();
        f.orchestrator.submit("hello there", false).await.unwrap();
        settle().await;
        let completed = f.synthesizer.completed();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].text.contains("Welcome to the AI Interview Bot"));
        assert_eq!(completed[0].locale, "en-US");
    }

    #[tokio::test]
    async fn test_reply_is_not_spoken_when_muted() {
        let f = fixture();
        f.orchestrator.set_muted(true);
        f.orchestrator.submit("hello there", false).await.unwrap();
        settle().await;
        assert!(f.synthesizer.completed().is_empty());
        assert!(f.synthesizer.started().is_empty());
    }

    #[tokio::test]
    async fn test_playback_uses_selected_language() {
        let f = fixture();
        f.orchestrator
            .set_language(Language::by_code("fr-FR").unwrap());
        f.orchestrator.submit("hello there", false).await.unwrap();
        settle().await;
        assert_eq!(f.synthesizer.completed()[0].locale, "fr-FR");
    }

    #[tokio::test]
    async fn test_mute_stops_in_flight_playback() {
        let synthesizer = Arc::new(MockSynthesizer::with_delay(Duration::from_secs(5)));
        let handle: Arc<dyn SpeechSynthesizer> = synthesizer.clone();
        let orchestrator = ConversationOrchestrator::start(
            test_config(),
            ResponseResolver::new(Box::new(FailingBackend)),
            CaptureController::new(Capability::Unavailable),
            PlaybackController::new(Capability::Available(handle)),
        );

        orchestrator.submit("hello there", false).await.unwrap();
        settle().await;
        assert_eq!(synthesizer.started().len(), 1);

        orchestrator.set_muted(true);
        settle().await;
        assert!(synthesizer.completed().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_playback_emits_event_not_error() {
        let orchestrator = ConversationOrchestrator::start(
            test_config(),
            ResponseResolver::new(Box::new(FailingBackend)),
            CaptureController::new(Capability::Unavailable),
            PlaybackController::new(Capability::Unavailable),
        );
        let mut events = orchestrator.subscribe();

        orchestrator.submit("hello there", false).await.unwrap();
        settle().await;

        // Reply was appended even though playback is impossible.
        assert_eq!(orchestrator.message_count(), 3);

        let mut saw_unsupported = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SessionEvent::PlaybackUnsupported) {
                saw_unsupported = true;
            }
        }
        assert!(saw_unsupported);
    }

    // ---- Capture ----

    #[tokio::test]
    async fn test_toggle_capture_unsupported() {
        let f = fixture();
        let mut events = f.orchestrator.subscribe();
        let result = f.orchestrator.toggle_capture();
        assert!(matches!(
            result,
            Err(SessionError::Speech(SpeechError::CaptureUnsupported))
        ));
        assert!(!f.orchestrator.is_capturing());
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::CaptureUnsupported)
        ));
    }

    #[tokio::test]
    async fn test_capture_transcript_is_submitted_as_voice() {
        let f = fixture_with_recognizer(
            MockRecognizer::new("what is your superpower").with_delay(Duration::from_millis(10)),
        );
        f.orchestrator.toggle_capture().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let messages = f.orchestrator.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "what is your superpower");
        assert!(messages[1].is_voice);
        assert!(messages[2].content.contains("adaptability"));
    }

    #[tokio::test]
    async fn test_toggle_while_listening_stops_capture() {
        let f = fixture_with_recognizer(
            MockRecognizer::new("never delivered").with_delay(Duration::from_secs(5)),
        );
        f.orchestrator.toggle_capture().unwrap();
        settle().await;
        assert!(f.orchestrator.is_capturing());

        f.orchestrator.toggle_capture().unwrap();
        settle().await;
        assert!(!f.orchestrator.is_capturing());
        // No transcript, no new messages.
        assert_eq!(f.orchestrator.message_count(), 1);
    }

    #[tokio::test]
    async fn test_capture_failure_emits_event_and_returns_to_idle() {
        let f = fixture_with_recognizer(MockRecognizer::failing());
        let mut events = f.orchestrator.subscribe();
        f.orchestrator.toggle_capture().unwrap();
        settle().await;

        assert!(!f.orchestrator.is_capturing());
        assert_eq!(f.orchestrator.message_count(), 1);

        let mut saw_failure = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SessionEvent::CaptureFailed { .. }) {
                saw_failure = true;
            }
        }
        assert!(saw_failure);
    }

    // ---- Proactive nudge ----

    #[tokio::test]
    async fn test_nudge_appears_once_after_silence() {
        let f = nudge_fixture();
        tokio::time::sleep(Duration::from_millis(150)).await;
        let messages = f.orchestrator.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("What is your #1 superpower?"));

        // It is one-shot.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(f.orchestrator.message_count(), 2);

        // A later real message does not duplicate it.
        f.orchestrator.submit("hello there", false).await.unwrap();
        let nudges = f
            .orchestrator
            .messages()
            .iter()
            .filter(|m| m.content.contains("Feel free to ask me questions like"))
            .count();
        assert_eq!(nudges, 1);
    }

    #[tokio::test]
    async fn test_nudge_suppressed_when_user_messaged_first() {
        let f = nudge_fixture();
        f.orchestrator.submit("hello there", false).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        let nudges = f
            .orchestrator
            .messages()
            .iter()
            .filter(|m| m.content.contains("Feel free to ask me questions like"))
            .count();
        assert_eq!(nudges, 0);
    }

    #[tokio::test]
    async fn test_nudge_cancelled_by_teardown() {
        let f = nudge_fixture();
        f.orchestrator.teardown();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(f.orchestrator.message_count(), 1);
    }

    // ---- Human handoff ----

    #[tokio::test]
    async fn test_handoff_two_messages_in_order() {
        let f = fixture();
        f.orchestrator.request_human_handoff();

        // First message is immediate.
        let messages = f.orchestrator.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("human representative"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        let messages = f.orchestrator.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[2].content.contains("Sarah from the HR team"));
    }

    #[tokio::test]
    async fn test_handoff_deferred_message_cancelled_by_teardown() {
        let f = fixture();
        f.orchestrator.request_human_handoff();
        assert_eq!(f.orchestrator.message_count(), 2);

        f.orchestrator.teardown();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(f.orchestrator.message_count(), 2);
    }

    #[tokio::test]
    async fn test_handoff_after_teardown_is_ignored() {
        let f = fixture();
        f.orchestrator.teardown();
        f.orchestrator.request_human_handoff();
        assert_eq!(f.orchestrator.message_count(), 1);
    }

    // ---- Language and mute flags ----

    #[tokio::test]
    async fn test_set_language_updates_selection() {
        let f = fixture();
        f.orchestrator
            .set_language(Language::by_code("de-DE").unwrap());
        assert_eq!(f.orchestrator.language().code, "de-DE");
    }

    #[tokio::test]
    async fn test_set_muted_roundtrip() {
        let f = fixture();
        f.orchestrator.set_muted(true);
        assert!(f.orchestrator.is_muted());
        f.orchestrator.set_muted(false);
        assert!(!f.orchestrator.is_muted());
    }

    // ---- Teardown and staleness ----

    #[tokio::test]
    async fn test_teardown_discards_stale_resolution() {
        let f = fixture_with(
            Box::new(SlowBackend(Duration::from_millis(100))),
            Capability::Unavailable,
        );
        let task = tokio::spawn({
            let orch = Arc::clone(&f.orchestrator);
            async move { orch.submit("zzz qqq", false).await }
        });
        settle().await;
        assert_eq!(f.orchestrator.message_count(), 2); // welcome + user

        f.orchestrator.teardown();
        task.await.unwrap().unwrap();

        // The late result was discarded; no bot reply was appended.
        assert_eq!(f.orchestrator.message_count(), 2);
        assert!(!f.orchestrator.is_responding());
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let f = fixture();
        f.orchestrator.teardown();
        f.orchestrator.teardown();
        assert_eq!(f.orchestrator.message_count(), 1);
    }

    #[tokio::test]
    async fn test_teardown_stops_active_capture() {
        let f = fixture_with_recognizer(
            MockRecognizer::new("never").with_delay(Duration::from_secs(5)),
        );
        f.orchestrator.toggle_capture().unwrap();
        settle().await;
        assert!(f.orchestrator.is_capturing());

        f.orchestrator.teardown();
        settle().await;
        assert!(!f.orchestrator.is_capturing());
    }

    // ---- Events ----

    #[tokio::test]
    async fn test_submit_emits_message_events() {
        let f = fixture();
        let mut events = f.orchestrator.subscribe();
        f.orchestrator.submit("hello there", false).await.unwrap();

        let mut appended = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SessionEvent::MessageAppended { .. }) {
                appended += 1;
            }
        }
        assert_eq!(appended, 2); // user + bot
    }

    #[tokio::test]
    async fn test_teardown_emits_session_ended() {
        let f = fixture();
        let mut events = f.orchestrator.subscribe();
        f.orchestrator.teardown();

        let mut saw_ended = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, SessionEvent::SessionEnded) {
                saw_ended = true;
            }
        }
        assert!(saw_ended);
    }
}
