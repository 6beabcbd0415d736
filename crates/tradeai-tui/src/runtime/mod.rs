//! TUI runtime - owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox pattern
//!
//! Handlers send `UiEvent`s directly to `inbox_tx`; the runtime drains
//! `inbox_rx` each frame. Poller output is bridged into the same inbox so
//! the reducer sees one ordered event stream.

mod handlers;
mod inbox;

use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tradeai_core::api::ApiClient;
use tradeai_core::chat::spawn_reply_poller;
use tradeai_core::config::Config;

use crate::effects::UiEffect;
use crate::events::{ChatEvent, UiEvent};
use crate::state::AppState;
use crate::{render, terminal, update};

use inbox::{UiEventReceiver, UiEventSender};

/// How long to block on terminal input before looking at timers again.
const INPUT_POLL_DURATION: Duration = Duration::from_millis(50);

/// Spinner tick interval.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Terminal state is restored on drop, panic,
/// and Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: Arc<ApiClient>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates the runtime: installs the panic hook and takes over the
    /// terminal.
    pub fn new(config: Config, client: ApiClient) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal()?;
        let (inbox_tx, inbox_rx) = inbox::channel();
        Ok(Self {
            terminal,
            state: AppState::new(config),
            client: Arc::new(client),
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the event loop until quit. Must be called from within a tokio
    /// runtime (handlers are spawned on it).
    pub fn run(&mut self) -> Result<()> {
        // Startup: probe whether the stored session cookie is still valid.
        let task = self.state.tui.task_seq.next_id();
        self.state.tui.tasks.session_check.start(task);
        self.execute(UiEffect::CheckSession { task });

        loop {
            if self.state.tui.should_quit {
                break;
            }

            let mut effects: Vec<UiEffect> = Vec::new();

            // Drain async completions.
            while let Ok(event) = self.inbox_rx.try_recv() {
                effects.extend(update::update(&mut self.state, event));
            }

            // Terminal input (blocks briefly).
            if event::poll(INPUT_POLL_DURATION).context("Terminal poll failed")? {
                let term_event = event::read().context("Terminal read failed")?;
                effects.extend(update::update(&mut self.state, UiEvent::Terminal(term_event)));
            }

            // Spinner tick.
            if self.last_tick.elapsed() >= TICK_INTERVAL {
                self.last_tick = Instant::now();
                effects.extend(update::update(&mut self.state, UiEvent::Tick));
            }

            // Frame geometry, then render.
            let size = self.terminal.size().context("Terminal size failed")?;
            effects.extend(update::update(
                &mut self.state,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            ));
            self.terminal
                .draw(|frame| render::render(frame, &mut self.state))
                .context("Render failed")?;

            for effect in effects {
                self.execute(effect);
            }
        }
        Ok(())
    }

    /// Executes one effect by spawning its handler; the handler's event
    /// lands in the inbox.
    fn execute(&mut self, effect: UiEffect) {
        let client = Arc::clone(&self.client);
        let inbox = self.inbox_tx.clone();
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::Login {
                task,
                username,
                password,
            } => {
                spawn_into(inbox, handlers::login(client, task, username, password));
            }
            UiEffect::Register {
                task,
                username,
                email,
                password,
            } => {
                spawn_into(
                    inbox,
                    handlers::register(client, task, username, email, password),
                );
            }
            UiEffect::Logout { task } => {
                spawn_into(inbox, handlers::logout(client, task));
            }
            UiEffect::CheckSession { task } => {
                spawn_into(inbox, handlers::check_session(client, task));
            }
            UiEffect::LoadConversations { task } => {
                spawn_into(inbox, handlers::load_conversations(client, task));
            }
            UiEffect::CreateConversation { task, title } => {
                spawn_into(inbox, handlers::create_conversation(client, task, title));
            }
            UiEffect::LoadHistory {
                task,
                conversation_id,
                page_size,
            } => {
                spawn_into(
                    inbox,
                    handlers::load_history(client, task, conversation_id, page_size),
                );
            }
            UiEffect::LoadOlder {
                task,
                conversation_id,
                offset,
                page_size,
            } => {
                spawn_into(
                    inbox,
                    handlers::load_older(client, task, conversation_id, offset, page_size),
                );
            }
            UiEffect::SubmitMessage {
                task,
                conversation_id,
                temp_id,
                content,
                attachment,
            } => {
                spawn_into(
                    inbox,
                    handlers::submit_message(
                        client,
                        task,
                        conversation_id,
                        temp_id,
                        content,
                        attachment,
                    ),
                );
            }
            UiEffect::StartPoller { options } => {
                // Bridge the poller's events into the inbox; the handle goes
                // to the reducer, which owns (and cancels) it.
                let (poll_tx, mut poll_rx) = tokio::sync::mpsc::channel(8);
                let handle = spawn_reply_poller(client, options, poll_tx);
                let _ = inbox.send(UiEvent::Chat(ChatEvent::PollerStarted { handle }));
                tokio::spawn(async move {
                    while let Some(poll_event) = poll_rx.recv().await {
                        if inbox
                            .send(UiEvent::Chat(ChatEvent::Poll(poll_event)))
                            .is_err()
                        {
                            break;
                        }
                    }
                });
            }
            UiEffect::FetchNews { task, category } => {
                spawn_into(inbox, handlers::fetch_news(client, task, category));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

/// Spawns a handler future and forwards its event to the inbox.
fn spawn_into(inbox: UiEventSender, handler: impl Future<Output = UiEvent> + Send + 'static) {
    tokio::spawn(async move {
        let event = handler.await;
        let _ = inbox.send(event);
    });
}
