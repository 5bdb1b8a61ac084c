use std::rc::Rc;

use chrono::{DateTime, Utc};
use yew::Reducible;

use crate::config::ChatConfig;
use crate::storage::SharedStore;
use crate::types::{ChatMessage, Sender};

use super::history::{history_key, load_history, save_history};

/// Handle for one scheduled assistant reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplyTicket(u64);

impl ReplyTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { user_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Idle,
    Recording,
}

/// One user's chat: message history, pending input, outstanding replies
/// and the voice capture toggle.
///
/// All persistence is write-through: every change to the message list
/// rewrites the user's slot in full.
#[derive(Debug, Clone)]
pub struct ChatSession {
    store: SharedStore,
    config: Rc<ChatConfig>,
    state: SessionState,
    messages: Vec<ChatMessage>,
    input: String,
    voice: VoiceState,
    listening: bool,
    /// Outstanding replies, oldest first
    pending: Vec<ReplyTicket>,
    next_ticket: u64,
    last_id: i64,
}

impl ChatSession {
    pub fn new(store: SharedStore, config: Rc<ChatConfig>) -> Self {
        Self {
            store,
            config,
            state: SessionState::Unauthenticated,
            messages: Vec::new(),
            input: String::new(),
            voice: VoiceState::Idle,
            listening: false,
            pending: Vec::new(),
            next_ticket: 1,
            last_id: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { user_id } => Some(user_id),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn voice(&self) -> VoiceState {
        self.voice
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn pending_replies(&self) -> &[ReplyTicket] {
        &self.pending
    }

    pub fn awaiting_reply(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Start chatting as `user_id`, loading whatever history it already has.
    /// Returns false (and stays unauthenticated) for a blank id, and is a
    /// no-op once a session has begun.
    pub fn begin_session(&mut self, user_id: &str) -> bool {
        let user_id = user_id.trim();
        if user_id.is_empty() || self.is_authenticated() {
            return false;
        }

        let key = history_key(&self.config.history_key_prefix, user_id);
        self.messages = load_history(&self.store, &key);
        self.last_id = self
            .messages
            .iter()
            .filter_map(|m| m.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        self.state = SessionState::Authenticated {
            user_id: user_id.to_string(),
        };
        log::info!(
            "chat session started for '{user_id}' with {} stored message(s)",
            self.messages.len()
        );
        true
    }

    pub fn set_input(&mut self, text: String) {
        self.input = text;
    }

    /// Whether `send_message(text)` would be accepted
    pub fn can_send(&self, text: &str) -> bool {
        self.is_authenticated() && !text.trim().is_empty()
    }

    /// Append a user message and schedule its reply. Blank text is a no-op.
    pub fn send_message(&mut self, text: &str, now: DateTime<Utc>) -> Option<ReplyTicket> {
        if !self.can_send(text) {
            return None;
        }

        self.append(text.to_string(), Sender::User, now);
        self.input.clear();

        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push(ticket);
        Some(ticket)
    }

    /// Append the canned reply for `ticket`. Unknown or cancelled tickets
    /// are ignored.
    pub fn deliver_reply(&mut self, ticket: ReplyTicket, now: DateTime<Utc>) -> bool {
        let Some(pos) = self.pending.iter().position(|t| *t == ticket) else {
            log::debug!("dropping reply for stale ticket {}", ticket.id());
            return false;
        };
        self.pending.remove(pos);

        let reply = self.config.canned_reply.clone();
        self.append(reply, Sender::Assistant, now);
        true
    }

    /// Forget all outstanding replies; returns what was cancelled
    pub fn cancel_pending_replies(&mut self) -> Vec<ReplyTicket> {
        std::mem::take(&mut self.pending)
    }

    pub fn start_recording(&mut self) {
        if self.is_authenticated() {
            self.voice = VoiceState::Recording;
            self.listening = true;
        }
    }

    /// Captured audio arrived. There is no transcription; a placeholder
    /// stands in for the text. The recorder flushes once, after stop, so
    /// this is accepted while listening whether or not recording has
    /// already stopped. Later data never overwrites the input.
    pub fn voice_captured(&mut self) {
        if self.listening {
            self.input = self.config.voice_placeholder.clone();
            self.listening = false;
        }
    }

    /// The user stopped recording. Listening continues until the final
    /// audio flush (or the recorder's stop event) arrives.
    pub fn stop_recording(&mut self) {
        self.voice = VoiceState::Idle;
    }

    /// The recorder has shut down; nothing more will be captured
    pub fn capture_finished(&mut self) {
        self.listening = false;
    }

    pub fn recording_failed(&mut self) {
        self.voice = VoiceState::Idle;
        self.listening = false;
    }

    fn next_message_id(&mut self, now: DateTime<Utc>) -> String {
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id.to_string()
    }

    fn append(&mut self, text: String, sender: Sender, now: DateTime<Utc>) {
        let Some(user_id) = self.user_id().map(str::to_string) else {
            return;
        };
        let id = self.next_message_id(now);
        self.messages
            .push(ChatMessage::new(id, text, sender, now, user_id.clone()));

        let key = history_key(&self.config.history_key_prefix, &user_id);
        if let Err(e) = save_history(&self.store, &key, &self.messages) {
            log::error!("could not persist chat history: {e}");
        }
    }
}

pub enum ChatAction {
    Begin(String),
    EditInput(String),
    Send(String),
    DeliverReply(ReplyTicket),
    CancelReplies,
    RecordingStarted,
    VoiceCaptured,
    RecordingStopped,
    CaptureFinished,
    RecordingFailed,
}

impl Reducible for ChatSession {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ChatAction::Begin(user_id) => {
                next.begin_session(&user_id);
            }
            ChatAction::EditInput(text) => next.set_input(text),
            ChatAction::Send(text) => {
                next.send_message(&text, Utc::now());
            }
            ChatAction::DeliverReply(ticket) => {
                next.deliver_reply(ticket, Utc::now());
            }
            ChatAction::CancelReplies => {
                next.cancel_pending_replies();
            }
            ChatAction::RecordingStarted => next.start_recording(),
            ChatAction::VoiceCaptured => next.voice_captured(),
            ChatAction::RecordingStopped => next.stop_recording(),
            ChatAction::CaptureFinished => next.capture_finished(),
            ChatAction::RecordingFailed => next.recording_failed(),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn session_with(store: &Rc<MemoryStore>) -> ChatSession {
        ChatSession::new(
            SharedStore::from_rc(store.clone()),
            Rc::new(ChatConfig::default()),
        )
    }

    fn signed_in(store: &Rc<MemoryStore>, user: &str) -> ChatSession {
        let mut session = session_with(store);
        assert!(session.begin_session(user));
        session
    }

    #[test]
    fn test_blank_user_id_stays_unauthenticated() {
        let store = Rc::new(MemoryStore::new());
        let mut session = session_with(&store);

        assert!(!session.begin_session(""));
        assert!(!session.begin_session("   "));
        assert_eq!(session.state(), &SessionState::Unauthenticated);
    }

    #[test]
    fn test_new_user_starts_empty() {
        let store = Rc::new(MemoryStore::new());
        let session = signed_in(&store, "alice");

        assert_eq!(
            session.state(),
            &SessionState::Authenticated {
                user_id: "alice".to_string()
            }
        );
        assert!(session.messages().is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_begin_twice_is_noop() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");
        assert!(!session.begin_session("bob"));
        assert_eq!(session.user_id(), Some("alice"));
    }

    #[test]
    fn test_send_appends_user_then_reply() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");
        session.set_input("hi".to_string());

        let ticket = session.send_message("hi", t0()).unwrap();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, "hi");
        assert_eq!(session.messages()[0].sender, Sender::User);
        assert_eq!(session.messages()[0].user_id, "alice");
        assert_eq!(session.input(), "");
        assert!(session.awaiting_reply());

        assert!(session.deliver_reply(ticket, t0() + Duration::seconds(1)));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].sender, Sender::Assistant);
        assert_eq!(session.messages()[1].text, ChatConfig::default().canned_reply);
        assert!(!session.awaiting_reply());

        // delivering the same ticket again adds nothing
        assert!(!session.deliver_reply(ticket, t0() + Duration::seconds(2)));
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn test_blank_message_is_noop() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        assert!(session.send_message("", t0()).is_none());
        assert!(session.send_message("   ", t0()).is_none());
        assert!(session.messages().is_empty());
        assert!(!session.awaiting_reply());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_send_requires_session() {
        let store = Rc::new(MemoryStore::new());
        let mut session = session_with(&store);
        assert!(session.send_message("hi", t0()).is_none());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        let ticket = session.send_message("hi", t0()).unwrap();
        assert_eq!(store.writes(), 1);
        session.deliver_reply(ticket, t0());
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_overlapping_replies_follow_schedule_order() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        let first = session.send_message("one", t0()).unwrap();
        let second = session.send_message("two", t0() + Duration::milliseconds(200)).unwrap();
        assert_eq!(session.pending_replies(), &[first, second]);

        session.deliver_reply(first, t0() + Duration::milliseconds(1000));
        session.deliver_reply(second, t0() + Duration::milliseconds(1200));

        let senders: Vec<Sender> = session.messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::User, Sender::User, Sender::Assistant, Sender::Assistant]
        );
    }

    #[test]
    fn test_cancelled_replies_never_arrive() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        let ticket = session.send_message("hi", t0()).unwrap();
        assert_eq!(session.cancel_pending_replies(), vec![ticket]);
        assert!(!session.deliver_reply(ticket, t0()));
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_history_round_trip_across_sessions() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            let at = t0() + Duration::seconds(i as i64);
            let ticket = session.send_message(text, at).unwrap();
            session.deliver_reply(ticket, at + Duration::milliseconds(1000));
        }
        let expected = session.messages().to_vec();

        let reloaded = signed_in(&store, "alice");
        assert_eq!(reloaded.messages(), expected.as_slice());

        let other = signed_in(&store, "bob");
        assert!(other.messages().is_empty());
    }

    #[test]
    fn test_ids_strictly_increase() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        // same millisecond for both sends and the reply
        let a = session.send_message("a", t0()).unwrap();
        session.send_message("b", t0());
        session.deliver_reply(a, t0());

        let ids: Vec<i64> = session.messages().iter().map(|m| m.id.parse().unwrap()).collect();
        assert_eq!(ids, vec![1_700_000_000_000, 1_700_000_000_001, 1_700_000_000_002]);

        // a reloaded session keeps counting past stored ids
        let mut reloaded = signed_in(&store, "alice");
        reloaded.send_message("c", t0());
        assert_eq!(reloaded.messages().last().unwrap().id, "1700000000003");
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let store = Rc::new(MemoryStore::with_slot("chat_history_alice", "definitely not json"));
        let mut session = signed_in(&store, "alice");
        assert!(session.messages().is_empty());

        session.send_message("hi", t0());
        assert_eq!(signed_in(&store, "alice").messages().len(), 1);
    }

    #[test]
    fn test_voice_capture_fills_placeholder() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        session.start_recording();
        assert_eq!(session.voice(), VoiceState::Recording);
        assert!(session.is_listening());

        session.voice_captured();
        assert_eq!(session.input(), ChatConfig::default().voice_placeholder);
        assert!(!session.is_listening());

        session.stop_recording();
        assert_eq!(session.voice(), VoiceState::Idle);
    }

    #[test]
    fn test_voice_data_after_stop_fills_placeholder() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        session.start_recording();
        session.stop_recording();
        assert_eq!(session.voice(), VoiceState::Idle);
        assert!(session.is_listening());

        session.voice_captured();
        assert_eq!(session.input(), ChatConfig::default().voice_placeholder);
        assert!(!session.is_listening());

        session.capture_finished();
        assert_eq!(session.input(), ChatConfig::default().voice_placeholder);
    }

    #[test]
    fn test_later_voice_data_keeps_user_edits() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        session.start_recording();
        session.voice_captured();
        session.set_input("my own words".to_string());
        session.voice_captured();
        assert_eq!(session.input(), "my own words");
    }

    #[test]
    fn test_stop_without_data_clears_listening() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");
        session.set_input("draft".to_string());

        session.start_recording();
        session.stop_recording();
        session.capture_finished();
        assert!(!session.is_listening());
        assert_eq!(session.input(), "draft");

        // a flush that arrives after shutdown is ignored
        session.voice_captured();
        assert_eq!(session.input(), "draft");
    }

    #[test]
    fn test_recording_failure_resets_to_idle() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");
        session.set_input("draft".to_string());

        session.start_recording();
        session.recording_failed();
        assert_eq!(session.voice(), VoiceState::Idle);
        assert!(!session.is_listening());
        assert_eq!(session.input(), "draft");
    }

    #[test]
    fn test_recording_and_reply_axes_are_independent() {
        let store = Rc::new(MemoryStore::new());
        let mut session = signed_in(&store, "alice");

        let ticket = session.send_message("hi", t0()).unwrap();
        session.start_recording();
        assert!(session.awaiting_reply());
        assert_eq!(session.voice(), VoiceState::Recording);

        session.deliver_reply(ticket, t0());
        assert_eq!(session.voice(), VoiceState::Recording);
    }

    #[test]
    fn test_reducer_actions() {
        let store = Rc::new(MemoryStore::new());
        let session = Rc::new(session_with(&store));

        let session = session.reduce(ChatAction::Begin("carol".to_string()));
        assert!(session.is_authenticated());

        let session = session.reduce(ChatAction::EditInput("hello".to_string()));
        assert_eq!(session.input(), "hello");

        let session = session.reduce(ChatAction::Send("hello".to_string()));
        let ticket = session.pending_replies()[0];
        let session = session.reduce(ChatAction::DeliverReply(ticket));
        assert_eq!(session.messages().len(), 2);

        let session = session.reduce(ChatAction::Send("again".to_string()));
        let session = session.reduce(ChatAction::CancelReplies);
        assert!(!session.awaiting_reply());
    }
}
