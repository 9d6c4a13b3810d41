//! Orchestrator for the voice dialogue
//!
//! Runs the dialogue controller on its own thread: Listen -> Handle -> Speak,
//! one event at a time. The handle talks to it over crossbeam channels and
//! interrupts speech directly on the shared speech adapter.

use crate::dialogue::{prompts, Continuation, DialogueController, DialogueState};
use crate::integration::config::VoxmailConfig;
use crate::mailbox::MailboxTransport;
use crate::speech::SpeechCapability;
use crate::ui::{StatusBoard, StatusSnapshot};
use crate::{Result, VoxmailError};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

/// How long to wait for a command when recognition stopped without a result
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Commands that can be sent to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerCommand {
    /// The user gesture that starts a session
    Activate,

    /// Shutdown the orchestrator
    Shutdown,
}

/// Events emitted by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// The dialogue moved to another state
    StateChanged(DialogueState),

    /// New status line text
    Status(String),

    /// A transcript was heard
    Heard(String),

    /// Speech capability is gone; only shutdown is possible
    Fatal(String),

    /// Orchestrator has shut down
    Shutdown,
}

/// Handle for controlling the orchestrator from the UI
pub struct OrchestratorHandle {
    command_tx: Sender<ControllerCommand>,
    event_rx: Receiver<ControllerEvent>,
    speech: Arc<dyn SpeechCapability>,
    board: StatusBoard,
}

impl OrchestratorHandle {
    fn send_command(&self, cmd: ControllerCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| VoxmailError::ChannelError(format!("Failed to send command: {}", e)))
    }

    /// Deliver the activation gesture
    pub fn activate(&self) -> Result<()> {
        self.send_command(ControllerCommand::Activate)
    }

    /// Cut the current utterance short. Never touches the dialogue state.
    pub fn interrupt(&self) {
        debug!("Interrupt requested");
        self.speech.cancel_speech();
    }

    /// Request shutdown; recognition is closed so no cycle outlives it
    pub fn shutdown(&self) -> Result<()> {
        self.send_command(ControllerCommand::Shutdown)?;
        self.speech.close();
        self.speech.cancel_speech();
        Ok(())
    }

    /// Try to receive an event from the orchestrator
    pub fn try_recv_event(&self) -> Option<ControllerEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event (blocking)
    pub fn recv_event(&self) -> Result<ControllerEvent> {
        self.event_rx
            .recv()
            .map_err(|e| VoxmailError::ChannelError(format!("Failed to receive event: {}", e)))
    }

    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<ControllerEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Get the event receiver for direct access
    pub fn event_receiver(&self) -> Receiver<ControllerEvent> {
        self.event_rx.clone()
    }

    pub fn status(&self) -> String {
        self.board.status()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.board.snapshot()
    }

    pub fn is_armed(&self) -> bool {
        self.board.is_armed()
    }
}

/// Main orchestrator that owns the dialogue controller
pub struct Orchestrator<S, T> {
    config: VoxmailConfig,
    speech: Arc<S>,
    transport: T,
    command_rx: Receiver<ControllerCommand>,
    board: StatusBoard,
}

impl<S, T> Orchestrator<S, T>
where
    S: SpeechCapability + 'static,
    T: MailboxTransport + 'static,
{
    /// Create a new orchestrator with the given configuration
    pub fn new(
        config: VoxmailConfig,
        speech: Arc<S>,
        transport: T,
    ) -> Result<(Self, OrchestratorHandle)> {
        config.validate().map_err(VoxmailError::ConfigError)?;

        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);
        let board = StatusBoard::new().with_events(event_tx);

        let shared: Arc<dyn SpeechCapability> = speech.clone();
        let handle = OrchestratorHandle {
            command_tx,
            event_rx,
            speech: shared,
            board: board.clone(),
        };

        let orchestrator = Self {
            config,
            speech,
            transport,
            command_rx,
            board,
        };

        Ok((orchestrator, handle))
    }

    /// Start the controller thread
    ///
    /// This consumes the orchestrator and returns the join handle for the worker thread.
    pub fn start(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("voxmail-dialogue".to_string())
            .spawn(move || {
                if let Err(e) = self.run() {
                    error!("Orchestrator error: {}", e);
                }
            })
            .map_err(VoxmailError::from)
    }

    fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let Orchestrator {
            config,
            speech,
            transport,
            command_rx,
            board,
        } = self;
        let mut controller = DialogueController::new(&config, speech, transport, board.clone());
        info!("Orchestrator started");

        if let Err(e) = runtime.block_on(controller.setup()) {
            board.publish(ControllerEvent::Fatal(VoxmailError::from(e).user_message()));
            wait_for_shutdown(&command_rx);
            board.publish(ControllerEvent::Shutdown);
            info!("Orchestrator stopped");
            return Ok(());
        }

        let mut reported_fatal = false;
        loop {
            // Control commands first
            loop {
                match command_rx.try_recv() {
                    Ok(cmd) => {
                        if !apply(&runtime, &mut controller, cmd) {
                            return finish(&board);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("Command channel disconnected");
                        return finish(&board);
                    }
                }
            }

            if !controller.session().is_armed() {
                if controller.session().capability_lost() && !reported_fatal {
                    reported_fatal = true;
                    board.publish(ControllerEvent::Fatal(
                        prompts::STATUS_NO_MICROPHONE.to_string(),
                    ));
                }

                // Idle: nothing to listen for until the next gesture
                match command_rx.recv() {
                    Ok(cmd) => {
                        if !apply(&runtime, &mut controller, cmd) {
                            return finish(&board);
                        }
                    }
                    Err(_) => {
                        warn!("Command channel disconnected");
                        return finish(&board);
                    }
                }
                continue;
            }

            match runtime.block_on(controller.listen_once()) {
                Some(Continuation::Listen) => {}
                Some(Continuation::Halt) => info!("Session halted, waiting for activation"),
                None => match command_rx.recv_timeout(IDLE_POLL) {
                    Ok(cmd) => {
                        if !apply(&runtime, &mut controller, cmd) {
                            return finish(&board);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        warn!("Command channel disconnected");
                        return finish(&board);
                    }
                },
            }
        }
    }
}

/// Apply one control command; false means stop the loop
fn apply<S, T>(
    runtime: &Runtime,
    controller: &mut DialogueController<S, T>,
    cmd: ControllerCommand,
) -> bool
where
    S: SpeechCapability + ?Sized,
    T: MailboxTransport,
{
    match cmd {
        ControllerCommand::Activate => {
            runtime.block_on(controller.activate());
            true
        }
        ControllerCommand::Shutdown => {
            info!("Orchestrator shutdown requested");
            controller.speech().cancel_speech();
            false
        }
    }
}

fn wait_for_shutdown(command_rx: &Receiver<ControllerCommand>) {
    loop {
        match command_rx.recv() {
            Ok(ControllerCommand::Shutdown) | Err(_) => return,
            Ok(ControllerCommand::Activate) => {
                warn!("Activation ignored: speech capability unavailable")
            }
        }
    }
}

fn finish(board: &StatusBoard) -> Result<()> {
    board.publish(ControllerEvent::Shutdown);
    info!("Orchestrator stopped");
    Ok(())
}
