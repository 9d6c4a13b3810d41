//! Session setup and activation

use super::controller::{Continuation, DialogueController};
use super::prompts;
use super::state::DialogueState;
use crate::audio::Cue;
use crate::mailbox::MailboxTransport;
use crate::speech::{CapabilityError, SpeechCapability};
use tracing::{debug, error, info, warn};

impl<S, T> DialogueController<S, T>
where
    S: SpeechCapability + ?Sized,
    T: MailboxTransport,
{
    /// One-time capability check. A failure leaves the session permanently idle.
    pub async fn setup(&mut self) -> Result<(), CapabilityError> {
        match self.speech.enable().await {
            Ok(()) => {
                info!("Speech capability ready");
                self.board.set_status(prompts::STATUS_ACTIVATE);
                Ok(())
            }
            Err(e) => {
                error!("Speech capability unavailable: {}", e);
                self.session.lose_capability();
                self.speech.play_cue(Cue::Error);
                self.board.set_status(prompts::STATUS_NO_MICROPHONE);
                self.publish_state();
                Err(e)
            }
        }
    }

    /// The user gesture: announce commands and start listening
    pub async fn activate(&mut self) -> Continuation {
        if self.session.capability_lost() {
            warn!("Activation refused: no speech capability");
            self.board.set_status(prompts::STATUS_NO_MICROPHONE);
            return Continuation::Halt;
        }
        if self.session.is_armed() {
            debug!("Session already active");
            return Continuation::Listen;
        }

        info!("Session activated");
        self.board.set_status(prompts::STATUS_STARTING);
        self.session.transition(DialogueState::Listening);
        self.publish_state();

        if let Err(e) = self.say(prompts::COMMANDS_ANNOUNCEMENT).await {
            warn!("Failed to announce commands: {}", e);
            self.speech.play_cue(Cue::Error);
        }
        Continuation::Listen
    }
}
