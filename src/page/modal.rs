//! E-mail modal: display toggling with a short fade in each direction
//!
//! The modal is `display: flex` first and gets the `show` class a tick later,
//! so the opacity transition runs. Closing reverses that. Every transition
//! hands out a ticket; a delayed step only applies if no newer transition
//! started in between.

pub const SHOW_CLASS: &str = "show";
/// Set on `<body>` while the modal is open to stop background scroll
pub const BODY_LOCK_CLASS: &str = "modal-open";
pub const SHOW_DELAY_MS: i32 = 10;
pub const HIDE_DELAY_MS: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Hidden,
    Opening,
    Shown,
    Closing,
}

#[derive(Debug, Default)]
pub struct ModalState {
    phase: ModalPhase,
    ticket: u32,
}

impl ModalState {
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    /// Start opening; the returned ticket is redeemed by `shown`
    pub fn open(&mut self) -> u32 {
        self.phase = ModalPhase::Opening;
        self.next_ticket()
    }

    /// The show delay elapsed. Returns whether to add the `show` class.
    pub fn shown(&mut self, ticket: u32) -> bool {
        if ticket != self.ticket || self.phase != ModalPhase::Opening {
            return false;
        }
        self.phase = ModalPhase::Shown;
        true
    }

    /// Start closing. `None` when the modal is already hidden or closing.
    pub fn close(&mut self) -> Option<u32> {
        match self.phase {
            ModalPhase::Hidden | ModalPhase::Closing => None,
            ModalPhase::Opening | ModalPhase::Shown => {
                self.phase = ModalPhase::Closing;
                Some(self.next_ticket())
            }
        }
    }

    /// The hide delay elapsed. Returns whether to hide and unlock the body.
    pub fn hidden(&mut self, ticket: u32) -> bool {
        if ticket != self.ticket || self.phase != ModalPhase::Closing {
            return false;
        }
        self.phase = ModalPhase::Hidden;
        true
    }

    fn next_ticket(&mut self) -> u32 {
        self.ticket = self.ticket.wrapping_add(1);
        self.ticket
    }
}
