pub mod controller;
pub mod input;
pub mod loader;

pub use controller::CardController;
pub use input::{ClientRect, InputEvent, PointerSample};
pub use loader::{LoadSlot, LoadTicket};
