//! Page behavior around the reveal engine: theme, layout, contact form,
//! e-mail modal, project cards and parallax. Only the decisions live here;
//! `crate::web::page` wires them to the document.

pub mod contact;
pub mod layout;
pub mod lifecycle;
pub mod modal;
pub mod parallax;
pub mod projects;
pub mod theme;

pub use contact::{ContactError, ContactSubmission, Severity, StatusLine};
pub use lifecycle::ReadyState;
pub use modal::{ModalPhase, ModalState};
pub use parallax::ParallaxFrame;
pub use projects::ProjectLinks;
pub use theme::Theme;
