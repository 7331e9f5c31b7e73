pub mod sir_states;
pub use sir_states::*;

pub mod trajectory;
pub use trajectory::*;

pub mod gillespie;
pub use gillespie::*;
