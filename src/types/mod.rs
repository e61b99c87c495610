pub mod category;
pub mod location;
pub mod period;
pub mod sample;
pub mod variable;
