pub mod choice_list;
pub mod constants;
pub mod spin_config;
pub mod validation;
pub mod wheel;

pub use choice_list::{ChoiceList, Entry, EntryId, ListChange};
pub use spin_config::SpinConfiguration;
pub use wheel::{SpinPhase, SpinStart, SpinState, SpinTicket, WheelError, WheelSelector};
